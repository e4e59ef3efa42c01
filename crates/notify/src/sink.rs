// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadwire_domain::{Lead, LeadId};
use tokio::sync::mpsc;
use tracing::warn;

/// Errors raised by an individual alert sink.
///
/// Sink failures are always recoverable: one sink failing must never
/// prevent the other sinks from firing, and must never stop the pipeline
/// from processing further leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The OS-level notification capability refused permission.
    PermissionDenied,
    /// The sink's delivery channel or backend is unavailable.
    Unavailable(String),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "Notification permission denied"),
            Self::Unavailable(msg) => write!(f, "Sink unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SinkError {}

/// One independently-failing destination for new-lead alerts.
pub trait AlertSink: Send {
    /// A short stable name used in log output.
    fn name(&self) -> &'static str;

    /// Delivers an alert for one newly observed lead.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when delivery fails; the dispatcher logs it
    /// and carries on with the remaining sinks.
    fn deliver(&mut self, lead: &Lead) -> Result<(), SinkError>;
}

/// An in-app toast message describing one new lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// The lead this toast announces.
    pub lead_id: LeadId,
    /// Short headline.
    pub title: String,
    /// One-line body with the contact and package.
    pub body: String,
}

/// Sink that queues in-app toasts onto a channel consumed by the UI layer.
#[derive(Debug)]
pub struct ToastSink {
    tx: mpsc::UnboundedSender<Toast>,
}

impl ToastSink {
    /// Creates a toast sink writing to the given channel.
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<Toast>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ToastSink {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn deliver(&mut self, lead: &Lead) -> Result<(), SinkError> {
        let toast: Toast = Toast {
            lead_id: lead.id.clone(),
            title: String::from("New lead received"),
            body: format!("{} · {}", lead.full_name(), lead.package_type),
        };
        self.tx
            .send(toast)
            .map_err(|_| SinkError::Unavailable(String::from("toast channel closed")))
    }
}

/// The OS/browser notification capability.
///
/// This is an external collaborator: real implementations wrap whatever
/// the host platform provides, and tests substitute fakes. Permission is
/// requested lazily on first use.
pub trait SystemNotifier: Send {
    /// Asks the platform for permission to show notifications.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::PermissionDenied`] when the user or platform
    /// refuses.
    fn request_permission(&mut self) -> Result<(), SinkError>;

    /// Shows one notification.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when the platform rejects the notification.
    fn show(&mut self, title: &str, body: &str) -> Result<(), SinkError>;
}

/// Permission lifecycle of a [`SystemAlertSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PermissionState {
    /// Permission has not been requested yet.
    Unrequested,
    /// Permission was granted; notifications are delivered.
    Granted,
    /// Permission was denied; the sink degrades to a silent no-op.
    Denied,
}

/// Sink that surfaces OS-level notifications through a [`SystemNotifier`].
///
/// Denied permission degrades this sink to a no-op for the rest of the
/// session: the denial is reported once, and later leads are skipped
/// silently rather than re-logging the same condition per lead.
#[derive(Debug)]
pub struct SystemAlertSink<N: SystemNotifier> {
    notifier: N,
    permission: PermissionState,
}

impl<N: SystemNotifier> SystemAlertSink<N> {
    /// Creates a system notification sink over the given capability.
    #[must_use]
    pub const fn new(notifier: N) -> Self {
        Self {
            notifier,
            permission: PermissionState::Unrequested,
        }
    }
}

impl<N: SystemNotifier> AlertSink for SystemAlertSink<N> {
    fn name(&self) -> &'static str {
        "system"
    }

    fn deliver(&mut self, lead: &Lead) -> Result<(), SinkError> {
        if self.permission == PermissionState::Unrequested {
            match self.notifier.request_permission() {
                Ok(()) => self.permission = PermissionState::Granted,
                Err(error) => {
                    self.permission = PermissionState::Denied;
                    warn!(%error, "OS notifications disabled for this session");
                    return Err(error);
                }
            }
        }

        if self.permission == PermissionState::Denied {
            return Ok(());
        }

        self.notifier.show(
            "New lead received",
            &format!("{} · {}", lead.full_name(), lead.package_type),
        )
    }
}
