// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AlertSink, SinkError, SystemNotifier};
use leadwire_domain::{Lead, LeadId};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_lead(id: &str) -> Lead {
    let captured: OffsetDateTime = datetime!(2026-01-10 08:30:00 UTC);
    Lead {
        id: LeadId::new(id).unwrap(),
        first_name: String::from("Amit"),
        last_name: String::from("Sharma"),
        email: String::from("amit.sharma@example.com"),
        phone: String::from("9876543210"),
        country_code: Some(String::from("+91")),
        package_type: String::from("4dham"),
        trip_types: vec![String::from("family")],
        traveler_count: 4,
        message: String::new(),
        created_at: captured,
        updated_at: captured,
    }
}

/// Sink that records the id of every lead it delivers.
pub struct RecordingSink {
    pub delivered: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let delivered: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                delivered: Arc::clone(&delivered),
            },
            delivered,
        )
    }
}

impl AlertSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn deliver(&mut self, lead: &Lead) -> Result<(), SinkError> {
        self.delivered.lock().unwrap().push(lead.id.to_string());
        Ok(())
    }
}

/// Sink that fails every delivery.
pub struct FailingSink;

impl AlertSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn deliver(&mut self, _lead: &Lead) -> Result<(), SinkError> {
        Err(SinkError::Unavailable(String::from("always down")))
    }
}

/// A scriptable OS notification capability.
pub struct FakeNotifier {
    grant_permission: bool,
    pub permission_requests: Arc<Mutex<u32>>,
    pub shown: Arc<Mutex<Vec<String>>>,
}

impl FakeNotifier {
    pub fn new(grant_permission: bool) -> (Self, Arc<Mutex<u32>>, Arc<Mutex<Vec<String>>>) {
        let permission_requests: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let shown: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                grant_permission,
                permission_requests: Arc::clone(&permission_requests),
                shown: Arc::clone(&shown),
            },
            permission_requests,
            shown,
        )
    }
}

impl SystemNotifier for FakeNotifier {
    fn request_permission(&mut self) -> Result<(), SinkError> {
        *self.permission_requests.lock().unwrap() += 1;
        if self.grant_permission {
            Ok(())
        } else {
            Err(SinkError::PermissionDenied)
        }
    }

    fn show(&mut self, _title: &str, body: &str) -> Result<(), SinkError> {
        self.shown.lock().unwrap().push(String::from(body));
        Ok(())
    }
}
