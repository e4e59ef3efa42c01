// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Lead, LeadId, validate_lead};
use time::OffsetDateTime;
use time::macros::datetime;

fn create_test_lead(id: &str, traveler_count: u32) -> Lead {
    let captured: OffsetDateTime = datetime!(2026-01-10 08:30:00 UTC);
    Lead {
        id: LeadId::new(id).unwrap(),
        first_name: String::from("Priya"),
        last_name: String::from("Nair"),
        email: String::from("priya.nair@example.com"),
        phone: String::from("9812345670"),
        country_code: None,
        package_type: String::from("kedarnath"),
        trip_types: Vec::new(),
        traveler_count,
        message: String::new(),
        created_at: captured,
        updated_at: captured,
    }
}

#[test]
fn test_validate_lead_accepts_valid_lead() {
    let lead: Lead = create_test_lead("L1", 2);
    assert!(validate_lead(&lead).is_ok());
}

#[test]
fn test_validate_lead_rejects_zero_travelers() {
    let lead: Lead = create_test_lead("L1", 0);
    assert_eq!(
        validate_lead(&lead),
        Err(DomainError::InvalidTravelerCount { count: 0 })
    );
}
