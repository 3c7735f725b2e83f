use std::time::Duration;

use rsvplog::{
    config::RsvpConfig,
    core::registry::RsvpRegistry,
    rsvp::Submission,
    runtime::{
        events::RsvpEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_rsvplog},
    },
    types::{RegenTarget, StatusFilter, StoreKind},
};

fn rsvp(name: &str, attending: &str) -> Submission {
    Submission {
        attending: Some(attending.to_string()),
        ..Submission::named(name)
    }
}

fn registry() -> RsvpRegistry {
    RsvpRegistry::in_memory(RsvpConfig::default()).expect("registry")
}

#[tokio::test]
async fn runtime_commands_and_events_ordered() {
    let _ = rsvplog::logging::try_init();
    let handle = spawn_rsvplog(registry(), RuntimeConfig::default());
    let mut events = handle.subscribe();

    let out = handle.upsert(rsvp("Alice", "Y")).await.expect("upsert");
    handle.upsert(rsvp("alice", "Y")).await.expect("resubmit");
    handle.confirm_by_row(out.primary_log.row()).await.expect("confirm");
    handle.regenerate_all().await.expect("regenerate");

    assert_eq!(
        events.recv().await.expect("event"),
        RsvpEvent::Upserted { name: "Alice".to_string(), inserted: true }
    );
    assert_eq!(
        events.recv().await.expect("event"),
        RsvpEvent::Upserted { name: "alice".to_string(), inserted: false }
    );
    assert_eq!(
        events.recv().await.expect("event"),
        RsvpEvent::Confirmed { store: StoreKind::PrimaryLog, names: vec!["alice".to_string()] }
    );
    assert_eq!(
        events.recv().await.expect("event"),
        RsvpEvent::Regenerated { target: RegenTarget::GuestRoster, rows: 1 }
    );
    assert_eq!(
        events.recv().await.expect("event"),
        RsvpEvent::Regenerated { target: RegenTarget::DietaryRoster, rows: 0 }
    );

    let stats = handle.stats().await.expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(handle.confirmed_names().await.expect("names"), vec!["alice".to_string()]);
    assert_eq!(handle.by_status(StatusFilter::Pending).await.expect("pending").len(), 0);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn submit_replies_instead_of_failing() {
    let mut config = RsvpConfig::default();
    config.event.title = "Garden Party".to_string();
    let registry = RsvpRegistry::in_memory(config).expect("registry");
    let handle = spawn_rsvplog(registry, RuntimeConfig::default());
    let mut events = handle.subscribe();

    let reply = handle.submit(Submission::named("")).await.expect("reply");
    assert!(!reply.is_success());

    let reply = handle.submit(rsvp("Bob", "Maybe")).await.expect("reply");
    assert!(reply.is_success());
    assert_eq!(
        events.recv().await.expect("event"),
        RsvpEvent::Upserted { name: "Bob".to_string(), inserted: true }
    );

    let title = handle.event_details().await.expect("details").title;
    assert_eq!(title, "Garden Party");
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn expired_request_is_never_applied() {
    let handle = spawn_rsvplog(registry(), RuntimeConfig::default());
    let impatient = handle.with_request_timeout(Duration::ZERO);

    let err = impatient.upsert(rsvp("Carol", "Y")).await.expect_err("timeout");
    assert!(matches!(err, RuntimeError::Timeout));

    assert!(handle.existing_rsvps().await.expect("rows").is_empty());
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn calls_after_shutdown_report_closed_channel() {
    let handle = spawn_rsvplog(registry(), RuntimeConfig::default());
    handle.shutdown().await.expect("shutdown");

    let err = handle.stats().await.expect_err("closed");
    assert!(matches!(err, RuntimeError::ChannelClosed));
}
