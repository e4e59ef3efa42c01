// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP client for the lead backend.
//!
//! Two operations exist: the bulk snapshot fetch that seeds the lead store
//! at startup (and on refresh), and the confirmed delete. Both are bounded
//! by a request timeout; a timed-out call is an ordinary failure, never a
//! hang.

use crate::error::ApiError;
use leadwire_domain::{Lead, LeadId, validate_lead};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for backend requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the lead backend REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a new backend client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g., `http://localhost:8080/api`)
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client: reqwest::Client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches the full lead snapshot.
    ///
    /// `GET {base}/leads` — used once at startup to seed the store and
    /// again on every refresh. Entries that fail domain validation are
    /// dropped with a warning rather than poisoning the whole snapshot;
    /// the stream side applies the same policy to its payloads.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the backend answers with
    /// a non-success status, or the body does not decode as a lead array.
    pub async fn fetch_leads(&self) -> Result<Vec<Lead>, ApiError> {
        let url: String = format!("{}/leads", self.base_url);
        debug!(%url, "Fetching lead snapshot");

        let response: reqwest::Response = self.client.get(&url).send().await?;
        let status: reqwest::StatusCode = response.status();
        let body: String = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let leads: Vec<Lead> = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })?;

        let mut valid: Vec<Lead> = Vec::with_capacity(leads.len());
        for lead in leads {
            match validate_lead(&lead) {
                Ok(()) => valid.push(lead),
                Err(error) => {
                    warn!(%error, "Dropping invalid lead from snapshot");
                }
            }
        }

        debug!(count = valid.len(), "Lead snapshot fetched");
        Ok(valid)
    }

    /// Deletes one lead.
    ///
    /// `DELETE {base}/leads/{id}` — a 2xx response is the only success
    /// signal; callers must not touch local state until it arrives.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the backend answers
    /// with a non-success status.
    pub async fn delete_lead(&self, id: &LeadId) -> Result<(), ApiError> {
        let url: String = format!("{}/leads/{}", self.base_url, id);
        debug!(%url, "Deleting lead");

        let response: reqwest::Response = self.client.delete(&url).send().await?;
        let status: reqwest::StatusCode = response.status();

        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
