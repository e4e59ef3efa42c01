// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Represents the stable, server-assigned identifier of a lead.
///
/// Identifiers are unique across the system's lifetime and are never
/// reused after deletion within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId {
    /// The identifier value (non-empty).
    value: String,
}

impl LeadId {
    /// Creates a new `LeadId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The identifier value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingId` if the value is empty or whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::MissingId);
        }
        Ok(Self {
            value: value.to_owned(),
        })
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for LeadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents an inbound sales inquiry captured from a public-facing form.
///
/// The struct matches the backend wire shape exactly: the bulk-fetch response
/// and the stream event payload carry the same fields, so one type serves
/// both sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// The stable, server-assigned identifier.
    pub id: LeadId,
    /// The contact's first name.
    pub first_name: String,
    /// The contact's last name.
    pub last_name: String,
    /// The contact's email address.
    pub email: String,
    /// The contact's phone number.
    pub phone: String,
    /// Optional international dialing code (e.g., "+91").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// The package this inquiry is about (e.g., "4dham").
    pub package_type: String,
    /// Free-form trip classification tags (e.g., "family", "helicopter").
    #[serde(default)]
    pub trip_types: Vec<String>,
    /// The number of travelers in the party.
    pub traveler_count: u32,
    /// The free-text message entered on the form.
    #[serde(default)]
    pub message: String,
    /// When the lead was captured. Immutable after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the lead was last modified server-side.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Lead {
    /// Returns the contact's full name for display and search.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
