// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lifecycle of the one live connection to the lead event stream.
//!
//! The manager hides every reconnection concern from consumers: they see
//! a channel of decoded leads and a watch of [`ConnectionState`], nothing
//! else. The manager never deduplicates — it cannot know about
//! application identity, so each frame received from the transport is
//! forwarded exactly once and the store decides what is new.

use crate::backoff::BackoffPolicy;
use crate::connector::EventSource;
use crate::error::StreamError;
use crate::state::ConnectionState;
use crate::wire::decode_frame;
use leadwire_domain::Lead;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Owns the streaming connection: connect, detect disconnect, retry with
/// bounded exponential backoff, tear down cleanly.
pub struct ConnectionManager<S: EventSource> {
    source: Arc<S>,
    backoff: BackoffPolicy,
    events_tx: mpsc::UnboundedSender<Lead>,
    state_tx: watch::Sender<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl<S: EventSource> ConnectionManager<S> {
    /// Creates a manager over the given event source.
    ///
    /// Returns the manager together with the receiving ends consumers
    /// use: the decoded-lead channel and the connection state watch.
    #[must_use]
    pub fn new(
        source: S,
        backoff: BackoffPolicy,
    ) -> (
        Self,
        mpsc::UnboundedReceiver<Lead>,
        watch::Receiver<ConnectionState>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (shutdown_tx, _) = watch::channel(false);

        (
            Self {
                source: Arc::new(source),
                backoff,
                events_tx,
                state_tx,
                shutdown_tx,
                task: None,
            },
            events_rx,
            state_rx,
        )
    }

    /// Opens the connection.
    ///
    /// Safe to call once; calling it again while running is a no-op.
    pub fn start(&mut self) {
        if self.task.is_some() {
            debug!("Connection manager already started");
            return;
        }

        let _ = self.shutdown_tx.send_replace(false);
        let shutdown: watch::Receiver<bool> = self.shutdown_tx.subscribe();

        self.task = Some(tokio::spawn(run_loop(
            Arc::clone(&self.source),
            self.backoff,
            self.events_tx.clone(),
            self.state_tx.clone(),
            shutdown,
        )));
    }

    /// Tears down the connection and cancels any pending reconnect timer.
    ///
    /// Awaits the connection task, so no event is delivered after this
    /// returns. Idempotent; stopping a manager that never started is a
    /// no-op.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        let _ = self.shutdown_tx.send(true);
        if let Err(error) = task.await
            && error.is_panic()
        {
            warn!(%error, "Connection task panicked during shutdown");
        }

        let _ = self.state_tx.send(ConnectionState::Disconnected);
    }
}

/// The connect/read/backoff loop.
///
/// Failures in here are logged, never thrown: transient connectivity
/// loss is an expected condition, and an exception escaping a stream
/// handler must not stop future events from being processed.
async fn run_loop<S: EventSource>(
    source: Arc<S>,
    backoff: BackoffPolicy,
    events_tx: mpsc::UnboundedSender<Lead>,
    state_tx: watch::Sender<ConnectionState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;
    let mut ever_connected: bool = false;

    'outer: loop {
        if *shutdown.borrow() {
            break;
        }

        if !ever_connected && attempt == 0 {
            let _ = state_tx.send(ConnectionState::Connecting);
        }

        let connected: Result<S::Frames, StreamError> = tokio::select! {
            result = source.connect() => result,
            _ = shutdown.changed() => break 'outer,
        };

        match connected {
            Ok(mut frames) => {
                attempt = 0;
                ever_connected = true;
                let _ = state_tx.send(ConnectionState::Connected);
                info!("Connected to lead event stream");

                loop {
                    let frame: Option<Result<String, StreamError>> = tokio::select! {
                        frame = futures::StreamExt::next(&mut frames) => frame,
                        _ = shutdown.changed() => break 'outer,
                    };

                    match frame {
                        Some(Ok(text)) => match decode_frame(&text) {
                            Ok(Some(lead)) => {
                                if events_tx.send(lead).is_err() {
                                    debug!("Event consumer dropped, stopping connection loop");
                                    break 'outer;
                                }
                            }
                            Ok(None) => {}
                            Err(error) => {
                                warn!(%error, "Dropping malformed stream frame");
                            }
                        },
                        Some(Err(error)) => {
                            warn!(%error, "Lead stream interrupted");
                            break;
                        }
                        None => {
                            warn!("Lead stream ended");
                            break;
                        }
                    }
                }

                let _ = state_tx.send(ConnectionState::Reconnecting { attempt });
            }
            Err(error) => {
                let next: ConnectionState = match error {
                    StreamError::Rejected { .. } => ConnectionState::Unavailable { attempt },
                    StreamError::Transport(_) | StreamError::Closed => {
                        ConnectionState::Reconnecting { attempt }
                    }
                };
                warn!(%error, attempt, "Failed to connect to lead event stream");
                let _ = state_tx.send(next);
            }
        }

        if *shutdown.borrow() {
            break;
        }

        let delay: Duration = backoff.jittered(attempt);
        attempt = attempt.saturating_add(1);
        debug!(?delay, attempt, "Scheduling reconnect");

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => break 'outer,
        }
    }

    let _ = state_tx.send(ConnectionState::Disconnected);
}
