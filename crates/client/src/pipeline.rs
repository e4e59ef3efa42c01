// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The lead pipeline event loop.
//!
//! One task owns the lead store, the view criteria, the notification
//! dispatcher, and the set of in-flight deletes. Every input — stream
//! events, bulk-fetch results, criteria changes, delete requests —
//! arrives through channels and is handled to completion before the
//! next one, so no two mutations can interleave. This reproduces the
//! serialization the original single-threaded event loop provided for
//! free, without any locking.

use leadwire::{LeadStore, MergeOutcome, ViewPage, compute};
use leadwire_api::{ApiError, BackendClient};
use leadwire_domain::{CriteriaPatch, Lead, LeadId, ViewCriteria};
use leadwire_notify::{AlertSink, Dispatcher};
use leadwire_stream::{BackoffPolicy, ConnectionManager, ConnectionState, EventSource};
use std::collections::HashSet;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What the UI renders: the current page plus the criteria it reflects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// The computed page.
    pub page: ViewPage,
    /// The criteria the page was computed under.
    pub criteria: ViewCriteria,
}

/// Failures surfaced to the user as explicit messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAlert {
    /// A delete was rejected by the backend; the lead is still present.
    DeleteFailed {
        /// The lead that was not deleted.
        id: LeadId,
        /// The failure description.
        reason: String,
    },
    /// A bulk fetch failed; the current list may be stale. Retryable.
    RefreshFailed {
        /// The failure description.
        reason: String,
    },
}

/// Inputs handled by the pipeline event loop.
enum PipelineMsg {
    /// The bulk fetch for `generation` resolved.
    SeedLoaded {
        generation: u64,
        leads: Vec<Lead>,
    },
    /// The bulk fetch for `generation` failed.
    SeedFailed {
        generation: u64,
        error: ApiError,
    },
    /// A criteria change from the UI.
    SetCriteria(CriteriaPatch),
    /// A delete request from the UI.
    DeleteRequested(LeadId),
    /// The delete call for `id` finished.
    DeleteResolved {
        id: LeadId,
        result: Result<(), ApiError>,
    },
    /// Re-run the bulk fetch and re-seed.
    Refresh,
    /// Tear the pipeline down.
    Stop,
}

/// Handle exposed to the UI layer.
///
/// Cheap message sends in, watch subscriptions out; the actual state
/// lives inside the event loop task.
pub struct PipelineHandle {
    msg_tx: mpsc::UnboundedSender<PipelineMsg>,
    view_rx: watch::Receiver<ViewSnapshot>,
    state_rx: watch::Receiver<ConnectionState>,
    alerts_rx: Option<mpsc::UnboundedReceiver<UserAlert>>,
    task: JoinHandle<()>,
}

impl PipelineHandle {
    /// Subscribes to view updates.
    ///
    /// The receiver always holds the latest snapshot; it changes whenever
    /// the store or the criteria change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.view_rx.clone()
    }

    /// Subscribes to connection state changes (the "reconnecting" and
    /// "live updates unavailable" indicators).
    #[must_use]
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Takes the user-alert receiver. Yields `None` after the first call.
    pub fn alerts(&mut self) -> Option<mpsc::UnboundedReceiver<UserAlert>> {
        self.alerts_rx.take()
    }

    /// Merges a partial criteria update and triggers a recompute.
    pub fn set_criteria(&self, patch: CriteriaPatch) {
        self.send(PipelineMsg::SetCriteria(patch));
    }

    /// Requests deletion of one lead.
    ///
    /// The lead is removed locally only once the backend confirms; a
    /// second request for the same id while one is in flight is ignored.
    pub fn delete_lead(&self, id: LeadId) {
        self.send(PipelineMsg::DeleteRequested(id));
    }

    /// Re-runs the bulk fetch and re-seeds the store.
    pub fn refresh(&self) {
        self.send(PipelineMsg::Refresh);
    }

    /// Stops the pipeline: tears down the stream connection, clears the
    /// notification record, and waits for the event loop to finish. No
    /// view update or alert is produced after this returns.
    pub async fn stop(self) {
        self.send(PipelineMsg::Stop);
        if let Err(error) = self.task.await
            && error.is_panic()
        {
            warn!(%error, "Pipeline task panicked during shutdown");
        }
    }

    fn send(&self, msg: PipelineMsg) {
        if self.msg_tx.send(msg).is_err() {
            debug!("Pipeline already stopped, dropping message");
        }
    }
}

/// Starts the pipeline: opens the stream connection, kicks off the
/// initial bulk fetch, and spawns the event loop.
pub fn start<S: EventSource>(
    client: BackendClient,
    source: S,
    backoff: BackoffPolicy,
    sinks: Vec<Box<dyn AlertSink>>,
) -> PipelineHandle {
    let (manager, stream_events, state_rx) = ConnectionManager::new(source, backoff);

    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let (alerts_tx, alerts_rx) = mpsc::unbounded_channel();
    let initial: ViewSnapshot = ViewSnapshot {
        page: compute(&[], &ViewCriteria::default()),
        criteria: ViewCriteria::default(),
    };
    let (view_tx, view_rx) = watch::channel(initial);

    // Seed the store before the stream is relied on for updates; the
    // merge rules make the ordering race harmless either way.
    let _ = msg_tx.send(PipelineMsg::Refresh);

    let task: JoinHandle<()> = tokio::spawn(run_loop(
        client,
        manager,
        stream_events,
        msg_tx.clone(),
        msg_rx,
        view_tx,
        alerts_tx,
        sinks,
    ));

    PipelineHandle {
        msg_tx,
        view_rx,
        state_rx,
        alerts_rx: Some(alerts_rx),
        task,
    }
}

/// Mutable state owned by the event loop.
struct PipelineState {
    store: LeadStore,
    criteria: ViewCriteria,
    dispatcher: Dispatcher,
    deletes_in_flight: HashSet<LeadId>,
    seed_generation: u64,
}

#[allow(clippy::too_many_arguments)]
async fn run_loop<S: EventSource>(
    client: BackendClient,
    mut manager: ConnectionManager<S>,
    mut stream_events: mpsc::UnboundedReceiver<Lead>,
    msg_tx: mpsc::UnboundedSender<PipelineMsg>,
    mut msg_rx: mpsc::UnboundedReceiver<PipelineMsg>,
    view_tx: watch::Sender<ViewSnapshot>,
    alerts_tx: mpsc::UnboundedSender<UserAlert>,
    sinks: Vec<Box<dyn AlertSink>>,
) {
    manager.start();

    let mut state: PipelineState = PipelineState {
        store: LeadStore::new(),
        criteria: ViewCriteria::default(),
        dispatcher: Dispatcher::new(sinks),
        deletes_in_flight: HashSet::new(),
        seed_generation: 0,
    };
    let mut stream_open: bool = true;

    loop {
        tokio::select! {
            lead = stream_events.recv(), if stream_open => match lead {
                Some(lead) => handle_lead_event(&mut state, &view_tx, lead),
                None => stream_open = false,
            },
            msg = msg_rx.recv() => match msg {
                Some(PipelineMsg::Stop) | None => {
                    manager.stop().await;
                    state.dispatcher.reset();
                    info!("Lead pipeline stopped");
                    break;
                }
                Some(msg) => handle_msg(
                    &mut state,
                    &client,
                    &msg_tx,
                    &view_tx,
                    &alerts_tx,
                    msg,
                ),
            },
        }
    }
}

/// Merges one stream event: dedup, classify, alert, recompute.
fn handle_lead_event(state: &mut PipelineState, view_tx: &watch::Sender<ViewSnapshot>, lead: Lead) {
    let outcome: MergeOutcome = state.store.merge(lead.clone());

    if outcome.is_new {
        debug!(lead_id = %lead.id, "New lead observed");
        state.dispatcher.notify(&lead);
    }

    // Redelivered duplicates change nothing and trigger no recompute.
    if outcome.is_new || outcome.updated {
        publish(state, view_tx);
    }
}

fn handle_msg(
    state: &mut PipelineState,
    client: &BackendClient,
    msg_tx: &mpsc::UnboundedSender<PipelineMsg>,
    view_tx: &watch::Sender<ViewSnapshot>,
    alerts_tx: &mpsc::UnboundedSender<UserAlert>,
    msg: PipelineMsg,
) {
    match msg {
        PipelineMsg::Refresh => {
            state.seed_generation += 1;
            let generation: u64 = state.seed_generation;
            let client: BackendClient = client.clone();
            let msg_tx: mpsc::UnboundedSender<PipelineMsg> = msg_tx.clone();
            tokio::spawn(async move {
                let msg: PipelineMsg = match client.fetch_leads().await {
                    Ok(leads) => PipelineMsg::SeedLoaded { generation, leads },
                    Err(error) => PipelineMsg::SeedFailed { generation, error },
                };
                let _ = msg_tx.send(msg);
            });
        }
        PipelineMsg::SeedLoaded { generation, leads } => {
            if generation != state.seed_generation {
                debug!(generation, "Ignoring stale bulk fetch result");
                return;
            }
            info!(count = leads.len(), "Seeding lead store from bulk fetch");
            state.store.seed(leads);
            publish(state, view_tx);
        }
        PipelineMsg::SeedFailed { generation, error } => {
            if generation != state.seed_generation {
                debug!(generation, "Ignoring stale bulk fetch failure");
                return;
            }
            warn!(%error, "Bulk lead fetch failed");
            let _ = alerts_tx.send(UserAlert::RefreshFailed {
                reason: error.to_string(),
            });
        }
        PipelineMsg::SetCriteria(patch) => {
            state.criteria = state.criteria.apply(patch);
            publish(state, view_tx);
        }
        PipelineMsg::DeleteRequested(id) => {
            if !state.deletes_in_flight.insert(id.clone()) {
                debug!(lead_id = %id, "Delete already in flight, ignoring");
                return;
            }
            let client: BackendClient = client.clone();
            let msg_tx: mpsc::UnboundedSender<PipelineMsg> = msg_tx.clone();
            tokio::spawn(async move {
                let result: Result<(), ApiError> = client.delete_lead(&id).await;
                let _ = msg_tx.send(PipelineMsg::DeleteResolved { id, result });
            });
        }
        PipelineMsg::DeleteResolved { id, result } => {
            state.deletes_in_flight.remove(&id);
            match result {
                Ok(()) => {
                    // Only a confirmed delete touches local state.
                    if state.store.remove(&id) {
                        publish(state, view_tx);
                    }
                }
                Err(error) => {
                    warn!(lead_id = %id, %error, "Delete rejected by backend");
                    let _ = alerts_tx.send(UserAlert::DeleteFailed {
                        id,
                        reason: error.to_string(),
                    });
                }
            }
        }
        PipelineMsg::Stop => unreachable!("Stop is handled by the event loop"),
    }
}

/// Recomputes the view and publishes it to subscribers.
fn publish(state: &PipelineState, view_tx: &watch::Sender<ViewSnapshot>) {
    let snapshot: ViewSnapshot = ViewSnapshot {
        page: compute(state.store.all(), &state.criteria),
        criteria: state.criteria.clone(),
    };
    let _ = view_tx.send(snapshot);
}
