use rsvplog::{
    config::RsvpConfig,
    core::{
        registry::RsvpRegistry,
        schema::{self, header_cells},
        sheet::{Cell, MemorySheet},
        workbook::Workbook,
    },
    engine::{
        confirm::RowRange,
        outcome::{RowChange, SkipReason, StepOutcome},
    },
    error::ResponseStatus,
    rsvp::Submission,
    types::{Status, StoreKind},
};

fn rsvp(name: &str, attending: &str, guests: &str) -> Submission {
    Submission {
        attending: Some(attending.to_string()),
        guests: Some(guests.to_string()),
        ..Submission::named(name)
    }
}

fn column(registry: &RsvpRegistry, kind: StoreKind, header: &str) -> Vec<String> {
    let (rows, cols) = registry.workbook().load(kind, registry.config()).expect("load");
    rows.iter()
        .skip(registry.config().data_start_row())
        .map(|cells| cols.text(cells, header))
        .collect()
}

fn laid_out(config: &RsvpConfig, kind: StoreKind) -> MemorySheet {
    let layout = config.layout(kind);
    MemorySheet::with_rows(
        layout.name.as_str(),
        vec![header_cells(kind), vec![Cell::text(layout.caption.as_str())]],
    )
}

#[test]
fn alice_confirmed_then_cancelled() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");

    let first = registry.upsert(&rsvp("Alice", "Y", "2")).expect("upsert");
    assert_eq!(first.primary_log, RowChange::Inserted(2));
    assert_eq!(first.primary_status, Status::Pending);
    assert_eq!(first.guest_status, Some(Status::Pending));
    assert_eq!(column(&registry, StoreKind::GuestRoster, schema::GUESTS), vec!["2"]);

    let confirmed = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::single(2)])
        .expect("confirm");
    assert_eq!(confirmed.confirmed_count, 1);
    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::STATUS), vec!["Confirmed"]);
    assert_eq!(column(&registry, StoreKind::GuestRoster, schema::STATUS), vec!["Confirmed"]);

    let again = registry.upsert(&rsvp("Alice", "N", "2")).expect("resubmit");
    assert_eq!(again.primary_log, RowChange::Updated(2));
    assert_eq!(again.primary_status, Status::Cancelled);
    assert_eq!(again.guest_status, Some(Status::CancelledPreviouslyConfirmed));

    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::NAME), vec!["Alice"]);
    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::STATUS), vec!["Cancelled"]);
    assert_eq!(
        column(&registry, StoreKind::GuestRoster, schema::STATUS),
        vec!["Cancelled (Previously Confirmed)"]
    );
    assert_eq!(column(&registry, StoreKind::GuestRoster, schema::ATTENDING), vec!["N"]);
}

#[test]
fn confirmed_resubmission_while_attending_stays_confirmed() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");
    registry.upsert(&rsvp("Alice", "Y", "1")).expect("upsert");
    registry.confirm_by_row(2).expect("confirm");

    let again = registry.upsert(&rsvp("alice", "Maybe", "3")).expect("resubmit");
    assert_eq!(again.primary_status, Status::Confirmed);
    assert_eq!(again.guest_status, Some(Status::Confirmed));
    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::GUESTS), vec!["3"]);
}

#[test]
fn bob_maybe_vegan_keeps_stale_dietary_row() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");

    let first = registry
        .upsert(&Submission {
            dietary: Some("vegan".to_string()),
            ..rsvp("Bob", "Maybe", "")
        })
        .expect("upsert");
    assert_eq!(first.dietary_roster, StepOutcome::Applied(RowChange::Inserted(2)));
    assert_eq!(column(&registry, StoreKind::DietaryRoster, schema::GUESTS), vec!["1"]);

    let second = registry.upsert(&rsvp("Bob", "N", "")).expect("resubmit");
    assert_eq!(second.primary_status, Status::Cancelled);
    assert_eq!(second.guest_status, Some(Status::Cancelled));
    assert_eq!(second.dietary_roster, StepOutcome::Skipped(SkipReason::NoDietaryText));
    assert_eq!(column(&registry, StoreKind::DietaryRoster, schema::NAME), vec!["Bob"]);
}

#[test]
fn dietary_text_from_non_attendee_is_not_recorded() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");
    let out = registry
        .upsert(&Submission {
            dietary: Some("nut allergy".to_string()),
            ..rsvp("Carol", "N", "1")
        })
        .expect("upsert");

    assert_eq!(out.guest_roster, StepOutcome::Skipped(SkipReason::NotAttending));
    assert_eq!(out.dietary_roster, StepOutcome::Skipped(SkipReason::NotQualified));
    assert!(column(&registry, StoreKind::GuestRoster, schema::NAME).is_empty());
    assert!(column(&registry, StoreKind::DietaryRoster, schema::NAME).is_empty());
}

#[test]
fn same_submission_twice_leaves_one_row() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");
    let sub = Submission {
        dietary: Some("none".to_string()),
        ..rsvp("Dana", "Y", "4")
    };
    registry.upsert(&sub).expect("first");
    registry.upsert(&sub).expect("second");

    for kind in StoreKind::ALL {
        assert_eq!(column(&registry, kind, schema::NAME), vec!["Dana"], "{kind}");
    }
}

#[test]
fn guest_roster_failure_keeps_primary_write() {
    let config = RsvpConfig::default();
    let mut guests = laid_out(&config, StoreKind::GuestRoster);
    guests.set_fail_writes(true);
    let book = Workbook::new(
        Box::new(laid_out(&config, StoreKind::PrimaryLog)),
        Box::new(guests),
        Box::new(laid_out(&config, StoreKind::DietaryRoster)),
    );
    let mut registry = RsvpRegistry::new(config, book);

    let out = registry.upsert(&rsvp("Erin", "Y", "1")).expect("upsert");
    assert!(out.guest_roster.is_failed());
    assert!(!out.is_complete());
    assert!(out.response().is_success());
    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::NAME), vec!["Erin"]);
}

#[test]
fn submit_folds_errors_into_reply() {
    let config = RsvpConfig::default();
    let mut log = laid_out(&config, StoreKind::PrimaryLog);
    log.set_fail_writes(true);
    let book = Workbook::new(
        Box::new(log),
        Box::new(laid_out(&config, StoreKind::GuestRoster)),
        Box::new(laid_out(&config, StoreKind::DietaryRoster)),
    );
    let mut registry = RsvpRegistry::new(config, book);

    let blank = registry.submit(&Submission::named("  "));
    assert_eq!(blank.status, ResponseStatus::Error);
    assert!(blank.message.contains("Name is required"));

    let failed = registry.submit(&rsvp("Finn", "Y", "1"));
    assert_eq!(failed.status, ResponseStatus::Error);
    assert!(failed.message.starts_with("There was a problem saving your RSVP"));
    assert!(column(&registry, StoreKind::GuestRoster, schema::NAME).is_empty());
}

#[test]
fn missing_guest_count_defaults_to_one() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");
    registry
        .upsert(&Submission {
            attending: Some("yes".to_string()),
            ..Submission::named("Gus")
        })
        .expect("upsert");
    registry.upsert(&rsvp("Hana", "Y", "lots")).expect("upsert");

    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::GUESTS), vec!["1", "1"]);
    assert_eq!(column(&registry, StoreKind::PrimaryLog, schema::ATTENDING), vec!["Y", "Y"]);
}
