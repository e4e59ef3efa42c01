// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the backend client.

use thiserror::Error;

/// Errors raised by calls against the lead backend.
///
/// All variants are recoverable at the pipeline level: a failed bulk fetch
/// is surfaced as a retryable condition and a failed delete leaves local
/// state untouched. Nothing here is allowed to escape as a panic.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("Failed to configure HTTP client: {0}")]
    Configuration(String),

    /// The request never produced a response (connection refused, DNS
    /// failure, request timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for the user-facing failure message.
        body: String,
    },

    /// The response body did not decode as the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// The decoding error message.
        message: String,
    },
}

impl ApiError {
    /// Returns whether this failure was a request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(error) => error.is_timeout(),
            _ => false,
        }
    }
}
