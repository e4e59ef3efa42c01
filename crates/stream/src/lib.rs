// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod backoff;
mod connector;
mod error;
mod manager;
mod state;
mod wire;

#[cfg(test)]
mod tests;

// Re-export public types
pub use backoff::BackoffPolicy;
pub use connector::{EventSource, WsEventSource};
pub use error::{StreamError, WireError};
pub use manager::ConnectionManager;
pub use state::ConnectionState;
pub use wire::decode_frame;
