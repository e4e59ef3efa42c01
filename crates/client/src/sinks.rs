// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Alert sink wiring for the headless client binary.
//!
//! A desktop or browser shell would plug the real OS notification
//! capability in here; this binary degrades both sinks to structured log
//! lines so the pipeline is fully observable from a terminal.

use leadwire_notify::{SinkError, SystemNotifier, Toast};
use tokio::sync::mpsc;
use tracing::info;

/// OS notification capability that writes to the log.
///
/// Permission is always granted; `show` emits one info line per alert.
#[derive(Debug, Clone, Copy)]
pub struct TracingNotifier;

impl SystemNotifier for TracingNotifier {
    fn request_permission(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn show(&mut self, title: &str, body: &str) -> Result<(), SinkError> {
        info!(title, body, "Desktop notification");
        Ok(())
    }
}

/// Spawns the task that drains the toast queue into the log.
pub fn spawn_toast_logger(mut toasts: mpsc::UnboundedReceiver<Toast>) {
    tokio::spawn(async move {
        while let Some(toast) = toasts.recv().await {
            info!(lead_id = %toast.lead_id, "{}: {}", toast.title, toast.body);
        }
    });
}
