// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the stream layer.

use leadwire_domain::DomainError;
use thiserror::Error;

/// Errors raised by the event source connection.
///
/// All of these are expected, recoverable conditions: the connection
/// manager logs them and retries, it never lets them propagate into the
/// rest of the pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The server explicitly refused the connection (e.g., a non-upgrade
    /// HTTP response during the handshake). Surfaced as the
    /// "live updates unavailable" state; retrying continues regardless.
    #[error("Event source rejected the connection with status {status}")]
    Rejected {
        /// The HTTP status returned instead of the protocol upgrade.
        status: u16,
    },

    /// The transport failed mid-flight or the endpoint was unreachable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The event source closed the connection.
    #[error("Connection closed by the event source")]
    Closed,
}

/// Errors raised while decoding one stream frame.
///
/// A frame failing to decode is dropped with a logged warning; it must
/// never throw further up and must never corrupt the lead store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WireError {
    /// The frame was not valid JSON or not the expected envelope shape.
    #[error("Malformed frame: {0}")]
    Malformed(String),

    /// The payload decoded but failed domain validation (e.g., missing id).
    #[error("Invalid lead payload: {0}")]
    InvalidLead(#[from] DomainError),
}
