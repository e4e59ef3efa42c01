// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The event source seam.
//!
//! The connection manager is generic over [`EventSource`] so tests can
//! drive it with scripted connections while production uses the
//! WebSocket implementation.

use crate::error::StreamError;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::debug;

/// A source of raw text frames from the lead event stream.
pub trait EventSource: Send + Sync + 'static {
    /// The stream of frames produced by one connection.
    type Frames: Stream<Item = Result<String, StreamError>> + Send + Unpin;

    /// Opens one connection to the event source.
    ///
    /// The returned stream yields text frames until the connection drops;
    /// transport failures surface as stream items so the caller can
    /// distinguish an orderly end from an interrupted one.
    fn connect(&self) -> impl Future<Output = Result<Self::Frames, StreamError>> + Send;
}

/// WebSocket implementation of [`EventSource`].
#[derive(Debug, Clone)]
pub struct WsEventSource {
    url: String,
}

impl WsEventSource {
    /// Creates an event source for the given WebSocket URL.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
        }
    }
}

impl EventSource for WsEventSource {
    type Frames = BoxStream<'static, Result<String, StreamError>>;

    async fn connect(&self) -> Result<Self::Frames, StreamError> {
        let (socket, _response) = connect_async(self.url.as_str())
            .await
            .map_err(map_connect_error)?;
        debug!(url = %self.url, "WebSocket connected");

        let frames = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text.to_string())),
                // Ping/pong are answered by the library; binary frames are
                // not part of this protocol.
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_)) => {
                    None
                }
                Ok(Message::Close(_)) => Some(Err(StreamError::Closed)),
                Err(error) => Some(Err(StreamError::Transport(error.to_string()))),
            }
        });

        Ok(frames.boxed())
    }
}

/// Maps a handshake failure onto the stream error taxonomy.
///
/// An HTTP response instead of a protocol upgrade is an explicit
/// rejection; everything else is transient transport trouble.
fn map_connect_error(error: tungstenite::Error) -> StreamError {
    match error {
        tungstenite::Error::Http(response) => StreamError::Rejected {
            status: response.status().as_u16(),
        },
        other => StreamError::Transport(other.to_string()),
    }
}
