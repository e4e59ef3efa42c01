// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadwire_domain::{Lead, LeadId};
use time::OffsetDateTime;
use time::macros::datetime;

/// Base capture time for test leads; offsets are added per lead so the
/// newest-first ordering is deterministic.
const BASE: OffsetDateTime = datetime!(2026-01-10 08:00:00 UTC);

pub fn create_test_lead(id: &str, minutes_after_base: i64) -> Lead {
    let captured: OffsetDateTime = BASE + time::Duration::minutes(minutes_after_base);
    Lead {
        id: LeadId::new(id).unwrap(),
        first_name: String::from("Amit"),
        last_name: String::from("Sharma"),
        email: format!("{}@example.com", id.to_lowercase()),
        phone: String::from("9876543210"),
        country_code: Some(String::from("+91")),
        package_type: String::from("4dham"),
        trip_types: vec![String::from("family")],
        traveler_count: 4,
        message: String::from("Looking for a May departure"),
        created_at: captured,
        updated_at: captured,
    }
}

pub fn create_named_lead(id: &str, first_name: &str, package_type: &str) -> Lead {
    let mut lead: Lead = create_test_lead(id, 0);
    lead.first_name = String::from(first_name);
    lead.package_type = String::from(package_type);
    lead
}

pub fn revised(lead: &Lead, minutes_later: i64, message: &str) -> Lead {
    let mut next: Lead = lead.clone();
    next.updated_at = lead.updated_at + time::Duration::minutes(minutes_later);
    next.message = String::from(message);
    next
}
