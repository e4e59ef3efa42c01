// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A lead payload carried no identifier.
    MissingId,
    /// The traveler count is outside the accepted range.
    InvalidTravelerCount {
        /// The invalid count value.
        count: u32,
    },
    /// A package filter value is malformed.
    InvalidPackageFilter(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "Lead payload is missing an id"),
            Self::InvalidTravelerCount { count } => {
                write!(
                    f,
                    "Invalid traveler count: {count}. Must be greater than 0"
                )
            }
            Self::InvalidPackageFilter(value) => {
                write!(f, "Invalid package filter: '{value}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
