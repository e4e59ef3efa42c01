// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the package-type filter selected in the lead list view.
///
/// `All` disables package filtering; `Only` matches the lead's
/// `package_type` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PackageFilter {
    /// No package filtering.
    #[default]
    All,
    /// Exact match on a single package type.
    Only(String),
}

impl PackageFilter {
    /// Checks whether a lead's package type passes this filter.
    #[must_use]
    pub fn matches(&self, package_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(package) => package == package_type,
        }
    }
}

impl FromStr for PackageFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::InvalidPackageFilter(s.to_owned()));
        }
        if s == "all" {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_owned()))
        }
    }
}

impl std::fmt::Display for PackageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(package) => write!(f, "{package}"),
        }
    }
}

/// The user-controlled parameters that determine which subset of the lead
/// store is displayed.
///
/// Criteria are ephemeral and never persisted. Recomputing the view from
/// the store plus a `ViewCriteria` value is a pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCriteria {
    /// Case-insensitive substring applied to name, email, and phone.
    /// Empty disables search filtering.
    pub search: String,
    /// The package-type filter.
    pub package: PackageFilter,
    /// The current page, 1-based.
    pub page: usize,
}

impl ViewCriteria {
    /// Applies a partial update, returning the resulting criteria.
    ///
    /// Changing the search text or the package filter resets the page to 1:
    /// a page number chosen against the old result set must never be carried
    /// onto a different one.
    #[must_use]
    pub fn apply(&self, patch: CriteriaPatch) -> Self {
        let mut next: Self = self.clone();
        let mut filters_changed: bool = false;

        if let Some(search) = patch.search
            && search != next.search
        {
            next.search = search;
            filters_changed = true;
        }
        if let Some(package) = patch.package
            && package != next.package
        {
            next.package = package;
            filters_changed = true;
        }

        if filters_changed {
            next.page = 1;
        } else if let Some(page) = patch.page {
            next.page = page.max(1);
        }

        next
    }
}

impl Default for ViewCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            package: PackageFilter::All,
            page: 1,
        }
    }
}

/// A partial update to [`ViewCriteria`].
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CriteriaPatch {
    /// New search text, if changing.
    pub search: Option<String>,
    /// New package filter, if changing.
    pub package: Option<PackageFilter>,
    /// New page number, if changing. Ignored when a filter change resets
    /// the page.
    pub page: Option<usize>,
}

impl CriteriaPatch {
    /// A patch that only changes the search text.
    #[must_use]
    pub fn search(search: &str) -> Self {
        Self {
            search: Some(search.to_owned()),
            ..Self::default()
        }
    }

    /// A patch that only changes the package filter.
    #[must_use]
    pub fn package(package: PackageFilter) -> Self {
        Self {
            package: Some(package),
            ..Self::default()
        }
    }

    /// A patch that only changes the page.
    #[must_use]
    pub const fn page(page: usize) -> Self {
        Self {
            search: None,
            package: None,
            page: Some(page),
        }
    }
}
