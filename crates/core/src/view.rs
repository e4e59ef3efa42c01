// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadwire_domain::{Lead, ViewCriteria};

/// Number of leads shown per page.
pub const PAGE_SIZE: usize = 10;

/// The displayed subset of the lead store.
///
/// Derived data only: recomputing from the same store contents and the
/// same criteria yields a structurally equal page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPage {
    /// The leads on the current page, newest first.
    pub items: Vec<Lead>,
    /// The page actually shown, 1-based. May differ from the requested
    /// page when the requested one fell outside the result set.
    pub page: usize,
    /// Total number of pages, at least 1.
    pub total_pages: usize,
    /// Total number of leads matching the criteria across all pages.
    pub total_matches: usize,
}

/// Computes the displayed subset of `leads` under `criteria`.
///
/// Pure function over its inputs: no clock, no hidden state. The search
/// text matches case-insensitively as a substring of the contact's name,
/// email, or phone; the package filter matches the package type exactly;
/// both predicates are ANDed. Results are ordered newest first (ties
/// broken by id so the order is total), then paginated with a fixed page
/// size. The requested page is clamped into the valid range — a page
/// number left over from a larger result set is never presented as an
/// empty page.
#[must_use]
pub fn compute(leads: &[Lead], criteria: &ViewCriteria) -> ViewPage {
    let needle: String = criteria.search.trim().to_lowercase();

    let mut matches: Vec<&Lead> = leads
        .iter()
        .filter(|lead| {
            matches_search(lead, &needle) && criteria.package.matches(&lead.package_type)
        })
        .collect();
    matches.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let total_matches: usize = matches.len();
    let total_pages: usize = matches.len().div_ceil(PAGE_SIZE).max(1);
    let page: usize = criteria.page.clamp(1, total_pages);

    let items: Vec<Lead> = matches
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    ViewPage {
        items,
        page,
        total_pages,
        total_matches,
    }
}

/// Checks the search predicate against one lead.
///
/// An empty needle matches everything. The needle is expected to be
/// lowercased by the caller; phone numbers are matched verbatim.
fn matches_search(lead: &Lead, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    lead.full_name().to_lowercase().contains(needle)
        || lead.email.to_lowercase().contains(needle)
        || lead.phone.contains(needle)
}
