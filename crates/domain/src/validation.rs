// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Lead;

/// Validates that a lead's basic field constraints are met.
///
/// This runs against every lead entering the pipeline, whether it arrived
/// through the bulk fetch or the event stream; both sources share one wire
/// shape and one set of rules.
///
/// # Arguments
///
/// * `lead` - The lead to validate
///
/// # Returns
///
/// * `Ok(())` if the lead's fields are valid
/// * `Err(DomainError)` if any field is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The identifier is empty (a malformed payload slipped past parsing)
/// - The traveler count is zero
pub fn validate_lead(lead: &Lead) -> Result<(), DomainError> {
    // Rule: the id must be non-empty. LeadId::new enforces this on
    // construction; a deserialized id is re-checked here because serde
    // builds the newtype transparently.
    if lead.id.value().trim().is_empty() {
        return Err(DomainError::MissingId);
    }

    // Rule: a party has at least one traveler
    if lead.traveler_count == 0 {
        return Err(DomainError::InvalidTravelerCount {
            count: lead.traveler_count,
        });
    }

    Ok(())
}
