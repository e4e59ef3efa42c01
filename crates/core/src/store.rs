// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadwire_domain::{Lead, LeadId};
use std::collections::HashSet;

/// The result of merging one lead into the store.
///
/// Merges are atomic: they either insert, revise, or leave the store
/// untouched, and the outcome reports which of those happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// True only on the first-ever insertion of this lead's id.
    /// This is the sole trigger for user-visible notifications.
    pub is_new: bool,
    /// True when an already-present entry was overwritten because the
    /// incoming revision carried a strictly newer `updated_at`.
    pub updated: bool,
}

/// The canonical, deduplicated, insertion-ordered collection of leads.
///
/// This is the only place leads are accepted into memory. Both the bulk
/// snapshot and the event stream feed it, in either order; the merge rules
/// guarantee exactly one entry per live id no matter how the two sources
/// interleave. The upstream transport is at-least-once and may reorder, so
/// duplicate and stale deliveries are expected inputs, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadStore {
    /// All live leads in arrival order.
    leads: Vec<Lead>,
    /// Every id ever inserted this session, including removed ones.
    /// Governs the `is_new` classification.
    seen: HashSet<LeadId>,
    /// Ids that arrived through a stream merge this session. A re-seed
    /// retains these even when the snapshot has not caught up to them.
    stream_merged: HashSet<LeadId>,
}

impl LeadStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live leads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leads.len()
    }

    /// Returns whether the store holds no leads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Checks whether a lead with the given id is currently present.
    #[must_use]
    pub fn contains(&self, id: &LeadId) -> bool {
        self.leads.iter().any(|lead| &lead.id == id)
    }

    /// Returns a read-only snapshot of all live leads in stable order.
    #[must_use]
    pub fn all(&self) -> &[Lead] {
        &self.leads
    }

    /// Replaces the collection from a bulk snapshot, reconciling by id.
    ///
    /// The snapshot and the stream race: events merged before the snapshot
    /// resolved must survive the seed, and leads present in both must not
    /// be duplicated. Concretely:
    ///
    /// - Snapshot entries are inserted in snapshot order; when an entry is
    ///   already present, the revision with the newer `updated_at` wins.
    /// - Leads previously merged from the stream but absent from the
    ///   snapshot are retained in their original arrival order (the
    ///   snapshot may simply predate them).
    /// - Anything else absent from the snapshot is dropped, which is how a
    ///   `refresh` reconciles leads deleted server-side.
    ///
    /// Seeding never classifies a lead as new: the snapshot is history,
    /// not an observation of a fresh inquiry.
    pub fn seed(&mut self, snapshot: Vec<Lead>) {
        let current: Vec<Lead> = std::mem::take(&mut self.leads);
        let mut next: Vec<Lead> = Vec::with_capacity(snapshot.len());
        let mut kept: HashSet<LeadId> = HashSet::with_capacity(snapshot.len());

        for lead in snapshot {
            self.seen.insert(lead.id.clone());

            if kept.contains(&lead.id) {
                // The snapshot itself carried a duplicate id; keep the
                // newer revision.
                if let Some(existing) = next.iter_mut().find(|l| l.id == lead.id)
                    && lead.updated_at > existing.updated_at
                {
                    *existing = lead;
                }
                continue;
            }

            kept.insert(lead.id.clone());
            match current.iter().find(|l| l.id == lead.id) {
                Some(present) if present.updated_at > lead.updated_at => {
                    next.push(present.clone());
                }
                _ => next.push(lead),
            }
        }

        for lead in current {
            if !kept.contains(&lead.id) && self.stream_merged.contains(&lead.id) {
                kept.insert(lead.id.clone());
                next.push(lead);
            }
        }

        self.leads = next;
    }

    /// Incorporates one lead from the event stream.
    ///
    /// Inserts when the id is absent; otherwise overwrites non-identity
    /// fields only when the incoming revision is strictly newer
    /// (last-writer-wins protects against transport reordering). Merging
    /// the same lead twice yields a store identical to merging it once.
    ///
    /// `is_new` is reported only for the first-ever insertion of an id in
    /// this session, never for redeliveries and never for an id that was
    /// previously seeded or removed.
    pub fn merge(&mut self, lead: Lead) -> MergeOutcome {
        self.stream_merged.insert(lead.id.clone());

        if let Some(existing) = self.leads.iter_mut().find(|l| l.id == lead.id) {
            let updated: bool = lead.updated_at > existing.updated_at;
            if updated {
                *existing = lead;
            }
            return MergeOutcome {
                is_new: false,
                updated,
            };
        }

        let is_new: bool = self.seen.insert(lead.id.clone());
        self.leads.push(lead);
        MergeOutcome {
            is_new,
            updated: false,
        }
    }

    /// Removes the lead with the given id.
    ///
    /// Idempotent: removing an absent id is a no-op, not an error.
    /// Returns whether an entry was actually removed.
    pub fn remove(&mut self, id: &LeadId) -> bool {
        match self.leads.iter().position(|lead| &lead.id == id) {
            Some(index) => {
                self.leads.remove(index);
                true
            }
            None => false,
        }
    }
}
