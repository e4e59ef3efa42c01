// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::sink::AlertSink;
use leadwire_domain::{Lead, LeadId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Fans each newly observed lead out to the registered alert sinks,
/// at most once per lead per session.
///
/// The dispatcher is called only for leads the store classified as new,
/// but the upstream transport is at-least-once: a redelivered event that
/// somehow bypassed store dedup must still not re-alert. The notification
/// record (the set of already-notified ids) is the second line of defense,
/// owned here with an explicit lifecycle instead of living in ambient
/// module state. Per lead the record moves `unseen → notified` and never
/// back.
pub struct Dispatcher {
    /// The independently-failing alert destinations.
    sinks: Vec<Box<dyn AlertSink>>,
    /// Ids already announced this session.
    notified: HashSet<LeadId>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn AlertSink>>) -> Self {
        Self {
            sinks,
            notified: HashSet::new(),
        }
    }

    /// Announces one newly observed lead on every sink.
    ///
    /// No-op when the lead was already announced this session. The id is
    /// recorded before any sink runs, so a sink that fails mid-dispatch
    /// cannot cause a later retry to double-alert. Sink failures are
    /// caught and logged individually; one sink failing never blocks the
    /// others and never propagates into the merge pipeline.
    pub fn notify(&mut self, lead: &Lead) {
        if !self.notified.insert(lead.id.clone()) {
            debug!(lead_id = %lead.id, "Lead already notified, skipping");
            return;
        }

        for sink in &mut self.sinks {
            if let Err(error) = sink.deliver(lead) {
                warn!(sink = sink.name(), lead_id = %lead.id, %error, "Alert sink failed");
            }
        }
    }

    /// Checks whether a lead has already been announced this session.
    #[must_use]
    pub fn has_notified(&self, id: &LeadId) -> bool {
        self.notified.contains(id)
    }

    /// Number of leads announced this session.
    #[must_use]
    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    /// Clears the notification record.
    ///
    /// Called on pipeline shutdown so a fresh session starts with an
    /// empty record.
    pub fn reset(&mut self) {
        self.notified.clear();
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sinks", &self.sinks.len())
            .field("notified", &self.notified.len())
            .finish()
    }
}
