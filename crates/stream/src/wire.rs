// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire format of the event stream.
//!
//! The stream is topic-less: one channel, one JSON text frame per event.
//! A frame is an envelope of `{"event": "...", "data": {...}}` where the
//! `newLead` payload matches the bulk-fetch lead shape exactly, so the
//! same merge logic serves both sources.

use crate::error::WireError;
use leadwire_domain::{Lead, validate_lead};
use serde::Deserialize;
use tracing::debug;

/// The raw envelope carried by every stream frame.
#[derive(Debug, Deserialize)]
struct RawFrame {
    /// The event name.
    event: String,
    /// The event payload; shape depends on the event.
    #[serde(default)]
    data: serde_json::Value,
}

/// Decodes one text frame into a lead, if it carries one.
///
/// Returns `Ok(None)` for event names this pipeline does not consume —
/// unknown events are a forward-compatibility surface, not an error.
///
/// # Errors
///
/// Returns a [`WireError`] when the frame is not valid JSON, the payload
/// does not decode as a lead, or the lead fails domain validation (such
/// as a missing id). Callers log the error and drop the frame; decoding
/// never panics and a bad frame never reaches the store.
pub fn decode_frame(text: &str) -> Result<Option<Lead>, WireError> {
    let frame: RawFrame =
        serde_json::from_str(text).map_err(|e| WireError::Malformed(e.to_string()))?;

    match frame.event.as_str() {
        "newLead" => {
            let lead: Lead = serde_json::from_value(frame.data)
                .map_err(|e| WireError::Malformed(e.to_string()))?;
            validate_lead(&lead)?;
            Ok(Some(lead))
        }
        other => {
            debug!(event = other, "Ignoring unknown stream event");
            Ok(None)
        }
    }
}
