// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod pipeline;
mod sinks;

use clap::Parser;
use leadwire_api::BackendClient;
use leadwire_notify::{AlertSink, SystemAlertSink, Toast, ToastSink};
use leadwire_stream::{BackoffPolicy, WsEventSource};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::pipeline::{PipelineHandle, UserAlert, ViewSnapshot};
use crate::sinks::{TracingNotifier, spawn_toast_logger};

/// Leadwire client - live lead list for the travel agency dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the lead backend REST API
    #[arg(long, default_value = "http://127.0.0.1:8080/api")]
    api_url: String,

    /// WebSocket URL of the lead event stream
    #[arg(long, default_value = "ws://127.0.0.1:8080/api/stream")]
    stream_url: String,

    /// Delay before the first reconnect attempt, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    backoff_seed_ms: u64,

    /// Maximum reconnect delay, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    backoff_cap_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Leadwire client");

    let client: BackendClient = BackendClient::new(&args.api_url)?;
    let source: WsEventSource = WsEventSource::new(&args.stream_url);
    let backoff: BackoffPolicy = BackoffPolicy::new(
        Duration::from_millis(args.backoff_seed_ms),
        Duration::from_millis(args.backoff_cap_ms),
    );

    let (toast_tx, toast_rx) = mpsc::unbounded_channel::<Toast>();
    let alert_sinks: Vec<Box<dyn AlertSink>> = vec![
        Box::new(ToastSink::new(toast_tx)),
        Box::new(SystemAlertSink::new(TracingNotifier)),
    ];

    let mut handle: PipelineHandle = pipeline::start(client, source, backoff, alert_sinks);

    spawn_toast_logger(toast_rx);

    if let Some(mut alerts) = handle.alerts() {
        tokio::spawn(async move {
            while let Some(alert) = alerts.recv().await {
                match alert {
                    UserAlert::DeleteFailed { id, reason } => {
                        warn!(lead_id = %id, reason, "Delete failed");
                    }
                    UserAlert::RefreshFailed { reason } => {
                        warn!(reason, "Refresh failed");
                    }
                }
            }
        });
    }

    let mut connection = handle.connection_state();
    tokio::spawn(async move {
        while connection.changed().await.is_ok() {
            let state = *connection.borrow();
            info!(%state, "Connection state changed");
        }
    });

    let mut view = handle.subscribe();
    tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let snapshot: ViewSnapshot = view.borrow().clone();
            debug!(
                page = snapshot.page.page,
                total_pages = snapshot.page.total_pages,
                total_matches = snapshot.page.total_matches,
                "View updated"
            );
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    handle.stop().await;

    Ok(())
}
