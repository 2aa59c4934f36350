//! Foundation crate tests
//!
//! Tests cover:
//! - Pipeline state machine transitions
//! - State subscription channel

use aria_foundation::state::{PipelineState, StateTracker};

// ─── State Machine Tests ────────────────────────────────────────────

#[test]
fn starts_idle() {
    let tracker = StateTracker::new();
    assert_eq!(tracker.current(), PipelineState::Idle);
}

#[test]
fn full_session_lifecycle() {
    let tracker = StateTracker::new();
    tracker.transition(PipelineState::Active).unwrap();
    tracker.transition(PipelineState::Draining).unwrap();
    tracker.transition(PipelineState::Idle).unwrap();
    assert_eq!(tracker.current(), PipelineState::Idle);
}

#[test]
fn restart_while_active_is_valid() {
    let tracker = StateTracker::new();
    tracker.transition(PipelineState::Active).unwrap();
    tracker.transition(PipelineState::Active).unwrap();
    assert_eq!(tracker.current(), PipelineState::Active);
}

#[test]
fn restart_while_draining_is_valid() {
    let tracker = StateTracker::new();
    tracker.transition(PipelineState::Active).unwrap();
    tracker.transition(PipelineState::Draining).unwrap();
    tracker.transition(PipelineState::Active).unwrap();
    assert_eq!(tracker.current(), PipelineState::Active);
}

#[test]
fn stop_while_active_goes_straight_to_idle() {
    let tracker = StateTracker::new();
    tracker.transition(PipelineState::Active).unwrap();
    tracker.transition(PipelineState::Idle).unwrap();
    assert_eq!(tracker.current(), PipelineState::Idle);
}

#[test]
fn draining_without_session_is_rejected() {
    let tracker = StateTracker::new();
    let err = tracker.transition(PipelineState::Draining).unwrap_err();
    assert_eq!(err.from, PipelineState::Idle);
    assert_eq!(err.to, PipelineState::Draining);
    // State is unchanged after a rejected transition.
    assert_eq!(tracker.current(), PipelineState::Idle);
}

#[test]
fn idle_to_idle_is_a_no_op_transition() {
    let tracker = StateTracker::new();
    tracker.transition(PipelineState::Idle).unwrap();
    assert_eq!(tracker.current(), PipelineState::Idle);
}

// ─── Subscription Tests ─────────────────────────────────────────────

#[test]
fn subscribers_observe_transitions_in_order() {
    let tracker = StateTracker::new();
    let rx = tracker.subscribe();
    tracker.transition(PipelineState::Active).unwrap();
    tracker.transition(PipelineState::Draining).unwrap();
    tracker.transition(PipelineState::Idle).unwrap();
    assert_eq!(rx.try_recv().unwrap(), PipelineState::Active);
    assert_eq!(rx.try_recv().unwrap(), PipelineState::Draining);
    assert_eq!(rx.try_recv().unwrap(), PipelineState::Idle);
}

#[test]
fn clones_share_state() {
    let tracker = StateTracker::new();
    let clone = tracker.clone();
    tracker.transition(PipelineState::Active).unwrap();
    assert_eq!(clone.current(), PipelineState::Active);
}
