//! Transport operations: variable rate, toggling, stepping, buffering
//! recovery.

use std::{sync::Arc, time::Duration};

use rstest::rstest;
use vidra::play::{
    ControllerConfig, ItemStatus, TimeRange,
    mock::{DelegateEvent, MockAsset, MockItem},
};

use super::fixture::{Session, session, source, wait_for_item};

async fn ready_session(config: ControllerConfig) -> (Session, Arc<MockItem>) {
    let s = session(config);
    s.provider.register(
        &source(),
        Arc::new(MockAsset::playable().with_frame_rate(25.0)),
    );
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;
    (s, item)
}

#[rstest]
#[case::forward(1, 4.0)]
#[case::reverse(-1, -4.0)]
#[tokio::test]
async fn stepping_clamps_at_the_domain_maximum(#[case] direction: i32, #[case] expected: f32) {
    let s = session(ControllerConfig::default());
    for _ in 0..6 {
        if direction > 0 {
            s.controller.play_forward();
        } else {
            s.controller.play_reverse();
        }
        assert!(s.controller.rate() != 0.0);
    }
    assert!((s.controller.rate() - expected).abs() < f32::EPSILON);
}

// Stepping down from +1 jumps past zero straight to -1.
#[tokio::test]
async fn rate_never_passes_through_zero() {
    let s = session(ControllerConfig::default());
    s.controller.play_forward();
    assert!((s.controller.rate() - 1.0).abs() < f32::EPSILON);

    s.controller.play_reverse();
    assert!((s.controller.rate() + 1.0).abs() < f32::EPSILON);

    s.controller.play_forward();
    assert!((s.controller.rate() - 1.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn mixed_stepping_sequences_stay_in_domain() {
    let s = session(ControllerConfig::default());
    let script = [1, 1, -1, -1, -1, 1, -1, -1, -1, -1, 1, 1, 1, 1, 1, 1];
    for direction in script {
        if direction > 0 {
            s.controller.play_forward();
        } else {
            s.controller.play_reverse();
        }
        let rate = s.controller.rate();
        assert!(rate != 0.0);
        assert!(rate.abs() <= 4.0);
    }
}

#[tokio::test]
async fn play_pause_toggles() {
    let (s, _item) = ready_session(ControllerConfig::default()).await;

    s.controller.play_pause();
    assert!((s.controller.rate() - 1.0).abs() < f32::EPSILON);

    s.controller.play_pause();
    assert!(s.controller.rate().abs() < f32::EPSILON);
}

#[tokio::test]
async fn play_pause_at_the_end_rewinds_first() {
    let (s, item) = ready_session(ControllerConfig::default()).await;

    // MockAsset reports a 60 s duration.
    s.controller.seek_to(60.0);
    let cancels_before_rewind = item.cancelled_seek_count();
    s.controller.play_pause();

    assert!((s.controller.rate() - 1.0).abs() < f32::EPSILON);
    assert!(s.controller.current_time().seconds().abs() < 1e-9);
    // The rewind is a seek like any other: it cancels in-flight seeks.
    assert_eq!(item.cancelled_seek_count(), cancels_before_rewind + 1);
}

#[tokio::test]
async fn step_seconds_is_invertible() {
    let (s, item) = ready_session(ControllerConfig::default()).await;
    s.controller.seek_to(10.0);

    s.controller.step_seconds(4.0);
    assert!(s.controller.rate().abs() < f32::EPSILON);
    assert!((s.controller.current_time().seconds() - 14.0).abs() < 1e-6);

    s.controller.step_seconds(-4.0);
    assert!((s.controller.current_time().seconds() - 10.0).abs() < 1e-6);
    assert!(item.cancelled_seek_count() >= 2);
}

#[tokio::test]
async fn step_frames_converts_through_the_frame_rate() {
    let (s, _item) = ready_session(ControllerConfig::default()).await;
    s.controller.seek_to(10.0);

    // 25 fps: 5 frames is 0.2 s.
    s.controller.step_frames(5);
    assert!((s.controller.current_time().seconds() - 10.2).abs() < 1e-6);
}

#[tokio::test]
async fn step_frames_prefers_the_native_primitive() {
    let (s, item) = ready_session(ControllerConfig::default()).await;
    s.controller.seek_to(10.0);
    item.set_can_step(true);

    s.controller.step_frames(-3);

    assert_eq!(item.stepped_frames(), vec![-3]);
    assert!((s.controller.current_time().seconds() - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn buffering_brackets_and_restores_the_rate() {
    let (s, item) = ready_session(ControllerConfig::default()).await;
    s.controller.play();
    s.controller.settle().await;

    item.set_buffer_empty(true);
    s.controller.settle().await;
    assert_eq!(s.delegate.count(&DelegateEvent::BufferingStarted), 1);

    item.set_likely_to_keep_up(true);
    s.controller.settle().await;
    assert_eq!(s.delegate.count(&DelegateEvent::BufferingFinished), 1);
    assert!((s.controller.rate() - 1.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn buffering_recovers_once_enough_runway_is_loaded() {
    let (s, item) = ready_session(ControllerConfig::default()).await;

    item.set_buffer_empty(true);
    s.controller.settle().await;
    assert_eq!(s.delegate.count(&DelegateEvent::BufferingStarted), 1);

    // 2 s of runway is below the 5 s resume lead.
    item.set_loaded_ranges(vec![TimeRange::new(
        Duration::ZERO,
        Duration::from_secs(2),
    )]);
    s.controller.settle().await;
    assert_eq!(s.delegate.count(&DelegateEvent::BufferingFinished), 0);

    item.set_loaded_ranges(vec![TimeRange::new(
        Duration::ZERO,
        Duration::from_secs(20),
    )]);
    s.controller.settle().await;
    assert_eq!(s.delegate.count(&DelegateEvent::BufferingFinished), 1);
}

#[tokio::test]
async fn repeated_stalls_bracket_each_episode_once() {
    let (s, item) = ready_session(ControllerConfig::default()).await;

    for _ in 0..3 {
        item.set_buffer_empty(true);
        item.set_buffer_empty(true);
        item.set_likely_to_keep_up(true);
        item.set_likely_to_keep_up(true);
    }
    s.controller.settle().await;

    assert_eq!(s.delegate.count(&DelegateEvent::BufferingStarted), 3);
    assert_eq!(s.delegate.count(&DelegateEvent::BufferingFinished), 3);
}

#[tokio::test]
async fn half_rate_is_reachable_with_a_smaller_step() {
    let s = session(ControllerConfig::default().with_rate_step(0.5).with_max_rate(2.0));
    s.controller.play_forward();
    // From zero the first step lands on the step size itself.
    assert!((s.controller.rate() - 0.5).abs() < f32::EPSILON);

    for _ in 0..5 {
        s.controller.play_forward();
    }
    assert!((s.controller.rate() - 2.0).abs() < f32::EPSILON);
}

// MockPlayer routes play/pause through rate observers, so the delegate
// sees every transition exactly once.
#[tokio::test]
async fn rate_transitions_are_not_duplicated() {
    let (s, _item) = ready_session(ControllerConfig::default()).await;

    s.controller.play();
    s.controller.pause();
    s.controller.play();
    s.controller.settle().await;

    assert_eq!(s.delegate.count(&DelegateEvent::RateChanged(1.0)), 2);
    assert_eq!(s.delegate.count(&DelegateEvent::RateChanged(0.0)), 1);
}
