use rsvplog::{
    config::RsvpConfig,
    core::{
        registry::RsvpRegistry,
        schema::{self, header_cells},
        sheet::{Cell, MemorySheet, Sheet},
        workbook::Workbook,
    },
    engine::{confirm::RowRange, outcome::PropagationResult},
    error::RsvpError,
    rsvp::Submission,
    types::{RegenTarget, StoreKind},
};

fn rsvp(name: &str, attending: &str) -> Submission {
    Submission {
        attending: Some(attending.to_string()),
        ..Submission::named(name)
    }
}

fn statuses(registry: &RsvpRegistry, kind: StoreKind) -> Vec<(String, String)> {
    let (rows, cols) = registry.workbook().load(kind, registry.config()).expect("load");
    rows.iter()
        .skip(registry.config().data_start_row())
        .map(|cells| (cols.text(cells, schema::NAME), cols.text(cells, schema::STATUS)))
        .collect()
}

fn pair(name: &str, status: &str) -> (String, String) {
    (name.to_string(), status.to_string())
}

/// Log rows, newest first: Dan (N) at 2, Carol (Maybe) at 3, Bob (Y) at 4, Alice (Y) at 5.
fn seeded() -> RsvpRegistry {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");
    for (name, answer) in [("Alice", "Y"), ("Bob", "Y"), ("Carol", "Maybe"), ("Dan", "N")] {
        registry.upsert(&rsvp(name, answer)).expect("upsert");
    }
    registry
}

#[test]
fn selection_skips_decliners_and_clips_header_rows() {
    let mut registry = seeded();
    let out = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::new(0, 4)])
        .expect("confirm");

    assert_eq!(out.confirmed_names, vec!["Carol".to_string()]);
    assert_eq!(
        statuses(&registry, StoreKind::PrimaryLog),
        vec![
            pair("Dan", "Cancelled"),
            pair("Carol", "Confirmed"),
            pair("Bob", "Pending"),
            pair("Alice", "Pending"),
        ]
    );
    assert_eq!(out.propagation.len(), 1);
    assert_eq!(out.propagation[0].store, StoreKind::GuestRoster);
    assert!(matches!(out.propagation[0].result, PropagationResult::Propagated(_)));
}

#[test]
fn overlapping_ranges_confirm_each_row_once() {
    let mut registry = seeded();
    let out = registry
        .confirm_selection(
            StoreKind::PrimaryLog,
            &[RowRange::new(4, 2), RowRange::new(5, 1), RowRange::new(4, 1)],
        )
        .expect("confirm");

    assert_eq!(out.confirmed_count, 2);
    assert_eq!(out.confirmed_names, vec!["Bob".to_string(), "Alice".to_string()]);
    assert_eq!(
        statuses(&registry, StoreKind::GuestRoster),
        vec![pair("Carol", "Pending"), pair("Bob", "Confirmed"), pair("Alice", "Confirmed")]
    );
}

#[test]
fn roster_selection_propagates_to_log() {
    let mut registry = seeded();
    // Guest roster, newest first: Carol at 2, Bob at 3, Alice at 4.
    let out = registry
        .confirm_selection(StoreKind::GuestRoster, &[RowRange::single(4)])
        .expect("confirm");

    assert_eq!(out.store, StoreKind::GuestRoster);
    assert_eq!(out.propagation[0].store, StoreKind::PrimaryLog);
    assert_eq!(out.propagation[0].result, PropagationResult::Propagated(5));
    assert_eq!(registry.confirmed_names().expect("names"), vec!["Alice".to_string()]);
}

#[test]
fn missing_peer_row_is_reported_not_fatal() {
    let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry");
    registry.upsert(&rsvp("Alice", "Y")).expect("upsert");
    // Drop Alice from the roster by regenerating while her log row does not
    // qualify, then restore her answer.
    let (_, cols) = registry
        .workbook()
        .load(StoreKind::PrimaryLog, registry.config())
        .expect("load");
    let attending = cols.require(schema::ATTENDING).expect("attending");
    let status = cols.require(schema::STATUS).expect("status");
    {
        let log = registry.workbook_mut().sheet_mut(StoreKind::PrimaryLog);
        log.write_cell(2, attending, Cell::text("N")).expect("edit");
        log.write_cell(2, status, Cell::Empty).expect("edit");
    }
    registry.regenerate(RegenTarget::GuestRoster).expect("regenerate");
    {
        let log = registry.workbook_mut().sheet_mut(StoreKind::PrimaryLog);
        log.write_cell(2, attending, Cell::text("Y")).expect("edit");
    }

    let out = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::single(2)])
        .expect("confirm");
    assert_eq!(out.confirmed_count, 1);
    assert_eq!(out.propagation[0].result, PropagationResult::NotFound);
}

#[test]
fn failed_peer_write_keeps_acting_store_confirmed() {
    let config = RsvpConfig::default();
    let laid_out = |kind: StoreKind| {
        let layout = config.layout(kind);
        MemorySheet::with_rows(
            layout.name.as_str(),
            vec![header_cells(kind), vec![Cell::text(layout.caption.as_str())]],
        )
    };
    let mut log = laid_out(StoreKind::PrimaryLog);
    let row: Vec<Cell> = schema::PRIMARY_LOG_HEADERS
        .iter()
        .map(|h| match *h {
            schema::NAME => Cell::text("Alice"),
            schema::ATTENDING => Cell::text("Y"),
            schema::STATUS => Cell::text("Pending"),
            _ => Cell::Empty,
        })
        .collect();
    log.write_row(2, &row).expect("seed");

    let mut guests = laid_out(StoreKind::GuestRoster);
    guests.write_row(2, &[Cell::text("Alice")]).expect("seed");
    guests.set_fail_writes(true);

    let book = Workbook::new(
        Box::new(log),
        Box::new(guests),
        Box::new(laid_out(StoreKind::DietaryRoster)),
    );
    let mut registry = RsvpRegistry::new(config, book);

    let out = registry.confirm_by_row(2).expect("confirm");
    assert!(matches!(out.propagation[0].result, PropagationResult::Failed(_)));
    assert_eq!(registry.confirmed_names().expect("names"), vec!["Alice".to_string()]);
}

#[test]
fn invalid_selections_are_rejected() {
    let mut registry = seeded();
    let err = registry
        .confirm_selection(StoreKind::DietaryRoster, &[RowRange::single(2)])
        .expect_err("wrong store");
    assert!(matches!(err, RsvpError::Validation(_)));

    let err = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::new(2, 0)])
        .expect_err("empty");
    assert!(matches!(err, RsvpError::Validation(_)));
}

#[test]
fn confirm_by_row_ignores_attendance_but_not_bounds() {
    let mut registry = seeded();

    let err = registry.confirm_by_row(1).expect_err("caption row");
    assert!(matches!(err, RsvpError::NotFound(_)));
    let err = registry.confirm_by_row(40).expect_err("past end");
    assert!(matches!(err, RsvpError::NotFound(_)));

    let out = registry.confirm_by_row(2).expect("dan");
    assert_eq!(out.confirmed_names, vec!["Dan".to_string()]);
    // Dan declined and never got a roster row.
    assert_eq!(out.propagation[0].result, PropagationResult::NotFound);
    assert_eq!(statuses(&registry, StoreKind::PrimaryLog)[0], pair("Dan", "Confirmed"));
}

#[test]
fn oversized_selections_clip_to_existing_rows() {
    let mut registry = seeded();

    let out = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::new(usize::MAX, 2)])
        .expect("start past end");
    assert_eq!(out.confirmed_count, 0);
    assert!(out.propagation.is_empty());

    let out = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::new(0, usize::MAX / 2)])
        .expect("whole column");
    assert_eq!(
        out.confirmed_names,
        vec!["Carol".to_string(), "Bob".to_string(), "Alice".to_string()]
    );
    assert_eq!(registry.confirmed_names().expect("names").len(), 3);
}

#[test]
fn repeated_name_in_selection_propagates_once() {
    let mut registry = seeded();
    let (_, cols) = registry
        .workbook()
        .load(StoreKind::PrimaryLog, registry.config())
        .expect("load");
    let duplicate = cols.build_row(vec![
        (schema::NAME, Cell::text("alice")),
        (schema::ATTENDING, Cell::text("Y")),
        (schema::STATUS, Cell::text("Pending")),
    ]);
    registry
        .workbook_mut()
        .sheet_mut(StoreKind::PrimaryLog)
        .write_row(6, &duplicate)
        .expect("hand edit");

    let out = registry
        .confirm_selection(StoreKind::PrimaryLog, &[RowRange::new(5, 2)])
        .expect("confirm");

    assert_eq!(out.confirmed_count, 2);
    assert_eq!(out.confirmed_names, vec!["Alice".to_string(), "alice".to_string()]);
    assert_eq!(out.propagation.len(), 1);
    assert_eq!(out.propagation[0].name, "Alice");
    assert_eq!(out.propagation[0].result, PropagationResult::Propagated(4));
}
