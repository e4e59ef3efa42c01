// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection manager tests.
//!
//! These run under paused time, so backoff sleeps complete instantly in
//! virtual time and many disconnect/reconnect cycles can be simulated
//! without real delays.

use crate::tests::helpers::{FakeEventSource, ScriptStep, lead_frame, wait_for_state};
use crate::{BackoffPolicy, ConnectionManager, ConnectionState, StreamError};
use leadwire_domain::Lead;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;

fn backoff() -> BackoffPolicy {
    BackoffPolicy::new(Duration::from_millis(100), Duration::from_secs(5))
}

#[tokio::test(start_paused = true)]
async fn test_frames_are_forwarded_as_leads() {
    let source: FakeEventSource = FakeEventSource::new(vec![ScriptStep::Serve(vec![
        Ok(lead_frame("L1")),
        Ok(lead_frame("L2")),
    ])]);
    let (mut manager, mut events, _state) = ConnectionManager::new(source, backoff());

    manager.start();

    let first: Lead = events.recv().await.expect("Expected first lead");
    let second: Lead = events.recv().await.expect("Expected second lead");
    assert_eq!(first.id.value(), "L1");
    assert_eq!(second.id.value(), "L2");

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_frames_are_forwarded_without_dedup() {
    // Deduplication is the store's job; the manager forwards one callback
    // per frame received from the transport.
    let source: FakeEventSource = FakeEventSource::new(vec![ScriptStep::Serve(vec![
        Ok(lead_frame("L1")),
        Ok(lead_frame("L1")),
    ])]);
    let (mut manager, mut events, _state) = ConnectionManager::new(source, backoff());

    manager.start();

    let first: Lead = events.recv().await.expect("Expected first delivery");
    let second: Lead = events.recv().await.expect("Expected second delivery");
    assert_eq!(first.id, second.id);

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_malformed_frame_is_dropped_and_stream_continues() {
    let source: FakeEventSource = FakeEventSource::new(vec![ScriptStep::Serve(vec![
        Ok(String::from("{ not json")),
        Ok(lead_frame("L2")),
    ])]);
    let (mut manager, mut events, _state) = ConnectionManager::new(source, backoff());

    manager.start();

    let lead: Lead = events.recv().await.expect("Expected the valid lead");
    assert_eq!(lead.id.value(), "L2");

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_reconnects_after_stream_ends() {
    let source: FakeEventSource = FakeEventSource::new(vec![
        ScriptStep::Serve(vec![Ok(lead_frame("L1"))]),
        ScriptStep::Serve(vec![Ok(lead_frame("L2"))]),
    ]);
    let (mut manager, mut events, _state) = ConnectionManager::new(source, backoff());

    manager.start();

    // Receiving the second lead proves a full disconnect → backoff →
    // reconnect cycle completed.
    assert_eq!(events.recv().await.expect("first").id.value(), "L1");
    assert_eq!(events.recv().await.expect("second").id.value(), "L2");

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_retries_through_repeated_connect_failures() {
    let source: FakeEventSource = FakeEventSource::new(vec![
        ScriptStep::Fail(StreamError::Transport(String::from("connection refused"))),
        ScriptStep::Fail(StreamError::Transport(String::from("connection refused"))),
        ScriptStep::Fail(StreamError::Transport(String::from("connection refused"))),
    ]);
    let (mut manager, _events, mut state) = ConnectionManager::new(source, backoff());

    manager.start();

    // The attempt counter climbs across failures; retrying never stops.
    wait_for_state(&mut state, |s| {
        matches!(s, ConnectionState::Reconnecting { attempt: 2 })
    })
    .await;

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_rejection_is_surfaced_as_unavailable() {
    let source: FakeEventSource = FakeEventSource::new(vec![ScriptStep::Fail(
        StreamError::Rejected { status: 403 },
    )]);
    let (mut manager, _events, mut state) = ConnectionManager::new(source, backoff());

    manager.start();

    wait_for_state(&mut state, |s| {
        matches!(s, ConnectionState::Unavailable { .. })
    })
    .await;

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_rejection() {
    let source: FakeEventSource = FakeEventSource::new(vec![
        ScriptStep::Fail(StreamError::Rejected { status: 503 }),
        ScriptStep::Serve(vec![Ok(lead_frame("L1"))]),
    ]);
    let (mut manager, mut events, mut state) = ConnectionManager::new(source, backoff());

    manager.start();

    // Rejection does not stop retrying; the next attempt connects.
    let lead: Lead = events.recv().await.expect("Expected lead after recovery");
    assert_eq!(lead.id.value(), "L1");
    wait_for_state(&mut state, |s| !matches!(s, ConnectionState::Unavailable { .. })).await;

    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_connected_state_transitions() {
    let source: FakeEventSource = FakeEventSource::new(vec![
        ScriptStep::Fail(StreamError::Transport(String::from("flaky network"))),
        ScriptStep::ServeThenHang(vec![Ok(lead_frame("L1"))]),
    ]);
    let (mut manager, mut events, mut state) = ConnectionManager::new(source, backoff());

    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
    manager.start();

    wait_for_state(&mut state, ConnectionState::is_live).await;
    assert_eq!(events.recv().await.expect("lead").id.value(), "L1");

    manager.stop().await;
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_pending_reconnect() {
    // A one-hour backoff is pending when stop is called; stop must not
    // wait for it.
    let slow: BackoffPolicy = BackoffPolicy::new(Duration::from_secs(3600), Duration::from_secs(7200));
    let source: FakeEventSource = FakeEventSource::new(vec![ScriptStep::Fail(
        StreamError::Transport(String::from("down")),
    )]);
    let (mut manager, _events, mut state) = ConnectionManager::new(source, slow);

    manager.start();
    wait_for_state(&mut state, ConnectionState::is_retrying).await;

    manager.stop().await;

    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_no_events_after_stop() {
    let source: FakeEventSource = FakeEventSource::new(vec![ScriptStep::ServeThenHang(vec![
        Ok(lead_frame("L1")),
        Ok(lead_frame("L2")),
        Ok(lead_frame("L3")),
    ])]);
    let (mut manager, mut events, _state) = ConnectionManager::new(source, backoff());

    manager.start();
    let _first: Lead = events.recv().await.expect("Expected first lead");

    manager.stop().await;

    // Drain whatever was delivered before the stop completed; afterwards
    // the channel must stay silent.
    while events.try_recv().is_ok() {}
    drop(manager);
    assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_start_is_idempotent() {
    let source: FakeEventSource =
        FakeEventSource::new(vec![ScriptStep::Serve(vec![Ok(lead_frame("L1"))])]);
    let (mut manager, mut events, _state) = ConnectionManager::new(source, backoff());

    manager.start();
    manager.start();

    assert_eq!(events.recv().await.expect("lead").id.value(), "L1");
    manager.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_start_is_noop() {
    let source: FakeEventSource = FakeEventSource::new(Vec::new());
    let (mut manager, _events, state) = ConnectionManager::new(source, backoff());

    manager.stop().await;

    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
}
