// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ConnectionState, EventSource, StreamError};
use futures::StreamExt;
use futures::stream::BoxStream;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// One scripted connection attempt for the fake event source.
pub enum ScriptStep {
    /// The connection attempt fails.
    Fail(StreamError),
    /// The connection succeeds and serves these frames, then ends.
    Serve(Vec<Result<String, StreamError>>),
    /// The connection succeeds, serves these frames, then stays open.
    ServeThenHang(Vec<Result<String, StreamError>>),
}

/// Event source that replays a script of connection attempts.
///
/// Once the script is exhausted, further connect calls park forever,
/// leaving the manager idle so tests can observe the final state.
pub struct FakeEventSource {
    script: Arc<Mutex<VecDeque<ScriptStep>>>,
}

impl FakeEventSource {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(steps.into())),
        }
    }
}

impl EventSource for FakeEventSource {
    type Frames = BoxStream<'static, Result<String, StreamError>>;

    async fn connect(&self) -> Result<Self::Frames, StreamError> {
        let step: Option<ScriptStep> = self.script.lock().unwrap().pop_front();
        match step {
            Some(ScriptStep::Fail(error)) => Err(error),
            Some(ScriptStep::Serve(frames)) => Ok(futures::stream::iter(frames).boxed()),
            Some(ScriptStep::ServeThenHang(frames)) => Ok(futures::stream::iter(frames)
                .chain(futures::stream::pending())
                .boxed()),
            None => futures::future::pending().await,
        }
    }
}

/// Builds a valid `newLead` frame for the given id.
pub fn lead_frame(id: &str) -> String {
    json!({
        "event": "newLead",
        "data": {
            "id": id,
            "firstName": "Amit",
            "lastName": "Sharma",
            "email": "amit.sharma@example.com",
            "phone": "9876543210",
            "packageType": "4dham",
            "tripTypes": ["family"],
            "travelerCount": 4,
            "message": "",
            "createdAt": "2026-01-10T08:30:00Z",
            "updatedAt": "2026-01-10T08:30:00Z"
        }
    })
    .to_string()
}

/// Awaits until the connection state satisfies the predicate.
pub async fn wait_for_state<F>(rx: &mut watch::Receiver<ConnectionState>, predicate: F)
where
    F: Fn(&ConnectionState) -> bool,
{
    let waited = tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            if predicate(&rx.borrow()) {
                return;
            }
            rx.changed().await.expect("State channel closed");
        }
    })
    .await;
    waited.expect("Timed out waiting for connection state");
}
