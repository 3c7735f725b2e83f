//! Single-writer task owning the registry, and the handle that talks to it.

use std::sync::Arc;

use tokio::{
    sync::{Mutex, broadcast, mpsc, oneshot},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::{
    config::EventDetails,
    core::registry::RsvpRegistry,
    engine::{
        confirm::RowRange,
        outcome::{ConfirmOutcome, RegenerateOutcome, RowChange, UpsertOutcome},
    },
    error::{Response, RsvpError},
    rsvp::{RecordSummary, Stats, Submission},
    types::{RegenTarget, RowIndex, StatusFilter, StoreKind},
};

use super::events::RsvpEvent;

/// Failure of a runtime request.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The engine rejected the command.
    #[error(transparent)]
    Rsvp(#[from] RsvpError),
    /// The writer task has stopped.
    #[error("runtime channel closed")]
    ChannelClosed,
    /// The request deadline passed before the command ran or replied.
    #[error("timed out waiting for the write lock")]
    Timeout,
}

/// Runtime sizing and request timeout.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Commands queued before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before it lags.
    pub event_capacity: usize,
    /// Per-request deadline, covering the queue wait and the reply.
    pub request_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
            request_timeout_ms: 10_000,
        }
    }
}

/// Cloneable handle to the writer task.
#[derive(Clone)]
pub struct RsvpHandle {
    cmd_tx: mpsc::Sender<Envelope>,
    events_tx: broadcast::Sender<RsvpEvent>,
    timeout: Duration,
}

type Reply<T> = oneshot::Sender<Result<T, RuntimeError>>;

struct Envelope {
    deadline: Instant,
    cmd: Command,
}

enum Command {
    Upsert {
        sub: Submission,
        resp: Reply<UpsertOutcome>,
    },
    Submit {
        sub: Submission,
        resp: Reply<Response>,
    },
    Regenerate {
        target: RegenTarget,
        resp: Reply<RegenerateOutcome>,
    },
    RegenerateAll {
        resp: Reply<Vec<RegenerateOutcome>>,
    },
    ConfirmSelection {
        store: StoreKind,
        ranges: Vec<RowRange>,
        resp: Reply<ConfirmOutcome>,
    },
    ConfirmByRow {
        row: RowIndex,
        resp: Reply<ConfirmOutcome>,
    },
    Stats {
        resp: Reply<Stats>,
    },
    ByStatus {
        filter: StatusFilter,
        resp: Reply<Vec<RecordSummary>>,
    },
    ConfirmedNames {
        resp: Reply<Vec<String>>,
    },
    EventDetails {
        resp: Reply<EventDetails>,
    },
    EnsureLayout {
        resp: Reply<Vec<StoreKind>>,
    },
    Shutdown {
        resp: Reply<()>,
    },
}

impl Command {
    fn reject(self, err: RuntimeError) {
        match self {
            Command::Upsert { resp, .. } => drop(resp.send(Err(err))),
            Command::Submit { resp, .. } => drop(resp.send(Err(err))),
            Command::Regenerate { resp, .. } => drop(resp.send(Err(err))),
            Command::RegenerateAll { resp } => drop(resp.send(Err(err))),
            Command::ConfirmSelection { resp, .. } => drop(resp.send(Err(err))),
            Command::ConfirmByRow { resp, .. } => drop(resp.send(Err(err))),
            Command::Stats { resp } => drop(resp.send(Err(err))),
            Command::ByStatus { resp, .. } => drop(resp.send(Err(err))),
            Command::ConfirmedNames { resp } => drop(resp.send(Err(err))),
            Command::EventDetails { resp } => drop(resp.send(Err(err))),
            Command::EnsureLayout { resp } => drop(resp.send(Err(err))),
            Command::Shutdown { resp } => drop(resp.send(Err(err))),
        }
    }
}

/// Moves `registry` into a single writer task and returns a handle to it.
///
/// Commands run one at a time in arrival order. Store I/O runs on the blocking
/// pool.
pub fn spawn_rsvplog(registry: RsvpRegistry, config: RuntimeConfig) -> RsvpHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Envelope>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<RsvpEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();
    let registry = Arc::new(Mutex::new(registry));

    tokio::spawn(async move {
        while let Some(Envelope { deadline, cmd }) = cmd_rx.recv().await {
            if Instant::now() >= deadline {
                warn!("command expired before it could run");
                cmd.reject(RuntimeError::Timeout);
                continue;
            }
            let done = handle_command(cmd, &registry, &events_tx_loop).await;
            if done {
                break;
            }
        }
        debug!("rsvp runtime stopped");
    });

    RsvpHandle {
        cmd_tx,
        events_tx,
        timeout: Duration::from_millis(config.request_timeout_ms),
    }
}

impl RsvpHandle {
    /// Receiver for events committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RsvpEvent> {
        self.events_tx.subscribe()
    }

    /// Clone of this handle whose calls give up after `timeout`.
    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, RuntimeError> {
        let deadline = Instant::now() + self.timeout;
        let (tx, rx) = oneshot::channel();
        let envelope = Envelope {
            deadline,
            cmd: make(tx),
        };
        tokio::time::timeout_at(deadline, self.cmd_tx.send(envelope))
            .await
            .map_err(|_| RuntimeError::Timeout)?
            .map_err(|_| RuntimeError::ChannelClosed)?;
        tokio::time::timeout_at(deadline, rx)
            .await
            .map_err(|_| RuntimeError::Timeout)?
            .map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Records a submission across all three stores.
    pub async fn upsert(&self, sub: Submission) -> Result<UpsertOutcome, RuntimeError> {
        self.request(|resp| Command::Upsert { sub, resp }).await
    }

    /// Like [`RsvpHandle::upsert`] but folds engine errors into a [`Response`].
    pub async fn submit(&self, sub: Submission) -> Result<Response, RuntimeError> {
        self.request(|resp| Command::Submit { sub, resp }).await
    }

    /// Rebuilds one roster.
    pub async fn regenerate(&self, target: RegenTarget) -> Result<RegenerateOutcome, RuntimeError> {
        self.request(|resp| Command::Regenerate { target, resp }).await
    }

    /// Rebuilds both rosters.
    pub async fn regenerate_all(&self) -> Result<Vec<RegenerateOutcome>, RuntimeError> {
        self.request(|resp| Command::RegenerateAll { resp }).await
    }

    /// Confirms the attending rows inside `ranges` of `store`.
    pub async fn confirm_selection(
        &self,
        store: StoreKind,
        ranges: Vec<RowRange>,
    ) -> Result<ConfirmOutcome, RuntimeError> {
        self.request(|resp| Command::ConfirmSelection { store, ranges, resp })
            .await
    }

    /// Confirms one primary log row.
    pub async fn confirm_by_row(&self, row: RowIndex) -> Result<ConfirmOutcome, RuntimeError> {
        self.request(|resp| Command::ConfirmByRow { row, resp }).await
    }

    /// Counts over the primary log.
    pub async fn stats(&self) -> Result<Stats, RuntimeError> {
        self.request(|resp| Command::Stats { resp }).await
    }

    /// Named primary log rows matching `filter`.
    pub async fn by_status(&self, filter: StatusFilter) -> Result<Vec<RecordSummary>, RuntimeError> {
        self.request(|resp| Command::ByStatus { filter, resp }).await
    }

    /// Every named primary log row.
    pub async fn existing_rsvps(&self) -> Result<Vec<RecordSummary>, RuntimeError> {
        self.by_status(StatusFilter::All).await
    }

    /// Names with a `Confirmed` primary log status.
    pub async fn confirmed_names(&self) -> Result<Vec<String>, RuntimeError> {
        self.request(|resp| Command::ConfirmedNames { resp }).await
    }

    /// Display details for the event.
    pub async fn event_details(&self) -> Result<EventDetails, RuntimeError> {
        self.request(|resp| Command::EventDetails { resp }).await
    }

    /// Lays out any store missing its header and caption rows.
    pub async fn ensure_layout(&self) -> Result<Vec<StoreKind>, RuntimeError> {
        self.request(|resp| Command::EnsureLayout { resp }).await
    }

    /// Flushes every store and stops the writer task.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }
}

/// Runs `f` against the registry on the blocking pool.
async fn with_registry<T, F>(registry: &Arc<Mutex<RsvpRegistry>>, f: F) -> Result<T, RuntimeError>
where
    T: Send + 'static,
    F: FnOnce(&mut RsvpRegistry) -> Result<T, RsvpError> + Send + 'static,
{
    let registry = Arc::clone(registry);
    tokio::task::spawn_blocking(move || {
        let mut registry = registry.blocking_lock();
        f(&mut registry)
    })
    .await
    .map_err(|_| RuntimeError::ChannelClosed)?
    .map_err(RuntimeError::from)
}

async fn handle_command(
    cmd: Command,
    registry: &Arc<Mutex<RsvpRegistry>>,
    events_tx: &broadcast::Sender<RsvpEvent>,
) -> bool {
    match cmd {
        Command::Upsert { sub, resp } => {
            let res = with_registry(registry, move |r| r.upsert(&sub)).await;
            if let Ok(outcome) = &res {
                let _ = events_tx.send(upserted_event(outcome));
            }
            let _ = resp.send(res);
        }
        Command::Submit { sub, resp } => {
            let res = with_registry(registry, move |r| {
                let reply = match r.upsert(&sub) {
                    Ok(outcome) => (outcome.response(), Some(upserted_event(&outcome))),
                    Err(err) => (rejected_reply(&sub, &err), None),
                };
                Ok(reply)
            })
            .await
            .map(|(reply, event)| {
                if let Some(event) = event {
                    let _ = events_tx.send(event);
                }
                reply
            });
            let _ = resp.send(res);
        }
        Command::Regenerate { target, resp } => {
            let res = with_registry(registry, move |r| r.regenerate(target)).await;
            if let Ok(outcome) = &res {
                let _ = events_tx.send(regenerated_event(outcome));
            }
            let _ = resp.send(res);
        }
        Command::RegenerateAll { resp } => {
            let res = with_registry(registry, |r| r.regenerate_all()).await;
            if let Ok(outcomes) = &res {
                for outcome in outcomes {
                    let _ = events_tx.send(regenerated_event(outcome));
                }
            }
            let _ = resp.send(res);
        }
        Command::ConfirmSelection { store, ranges, resp } => {
            let res = with_registry(registry, move |r| r.confirm_selection(store, &ranges)).await;
            if let Ok(outcome) = &res {
                let _ = events_tx.send(confirmed_event(outcome));
            }
            let _ = resp.send(res);
        }
        Command::ConfirmByRow { row, resp } => {
            let res = with_registry(registry, move |r| r.confirm_by_row(row)).await;
            if let Ok(outcome) = &res {
                let _ = events_tx.send(confirmed_event(outcome));
            }
            let _ = resp.send(res);
        }
        Command::Stats { resp } => {
            let _ = resp.send(with_registry(registry, |r| r.stats()).await);
        }
        Command::ByStatus { filter, resp } => {
            let _ = resp.send(with_registry(registry, move |r| r.by_status(filter)).await);
        }
        Command::ConfirmedNames { resp } => {
            let _ = resp.send(with_registry(registry, |r| r.confirmed_names()).await);
        }
        Command::EventDetails { resp } => {
            let details = registry.lock().await.event_details().clone();
            let _ = resp.send(Ok(details));
        }
        Command::EnsureLayout { resp } => {
            let _ = resp.send(with_registry(registry, |r| r.ensure_layout()).await);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(with_registry(registry, |r| r.flush()).await);
            return true;
        }
    }

    false
}

fn rejected_reply(sub: &Submission, err: &RsvpError) -> Response {
    warn!(name = %sub.name, error = %err, "submission rejected");
    Response::from(err)
}

fn upserted_event(outcome: &UpsertOutcome) -> RsvpEvent {
    RsvpEvent::Upserted {
        name: outcome.name.clone(),
        inserted: matches!(outcome.primary_log, RowChange::Inserted(_)),
    }
}

fn regenerated_event(outcome: &RegenerateOutcome) -> RsvpEvent {
    RsvpEvent::Regenerated {
        target: outcome.target,
        rows: outcome.rows_written,
    }
}

fn confirmed_event(outcome: &ConfirmOutcome) -> RsvpEvent {
    RsvpEvent::Confirmed {
        store: outcome.store,
        names: outcome.confirmed_names.clone(),
    }
}
