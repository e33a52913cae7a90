//! Loading, readiness, observation pairing, and queue-exhaustion
//! scenarios.

use std::sync::Arc;

use vidra::play::{
    CapabilityKey, ControllerConfig, ItemStatus, Player, QueueEndPolicy,
    mock::{DelegateEvent, MockAsset},
};

use super::fixture::{session, source, wait_for_item};

fn has_error(events: &[DelegateEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, DelegateEvent::Error(_)))
}

#[tokio::test]
async fn ready_fires_at_most_once_per_item() {
    let s = session(ControllerConfig::default());
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;

    item.set_status(ItemStatus::ReadyToPlay, None);
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;

    assert_eq!(s.delegate.count(&DelegateEvent::ReadyToPlay), 1);
}

#[tokio::test]
async fn protected_asset_reports_error_instead_of_ready() {
    let s = session(ControllerConfig::default());
    s.provider
        .register(&source(), Arc::new(MockAsset::protected()));

    s.controller.load(&source());
    s.delegate.wait_for(has_error).await;

    assert_eq!(s.delegate.count(&DelegateEvent::ReadyToPlay), 0);
    assert!(s.player.current_item().is_none());
}

#[tokio::test]
async fn unplayable_asset_reports_error() {
    let s = session(ControllerConfig::default());
    s.provider
        .register(&source(), Arc::new(MockAsset::unplayable()));

    s.controller.load(&source());
    s.delegate.wait_for(has_error).await;

    assert_eq!(s.delegate.count(&DelegateEvent::ReadyToPlay), 0);
}

#[tokio::test]
async fn failed_capability_key_reports_error() {
    let s = session(ControllerConfig::default());
    s.provider.register(
        &source(),
        Arc::new(MockAsset::with_failing_key(CapabilityKey::Playable)),
    );

    s.controller.load(&source());
    s.delegate.wait_for(has_error).await;

    let events = s.delegate.events();
    let DelegateEvent::Error(message) = events
        .iter()
        .find(|event| matches!(event, DelegateEvent::Error(_)))
        .unwrap()
    else {
        unreachable!()
    };
    assert!(message.contains("capability key"));
    assert_eq!(s.delegate.count(&DelegateEvent::ReadyToPlay), 0);
}

// Capability keys can change state between asynchronous resolution and
// status delivery, so readiness revalidates them.
#[tokio::test]
async fn key_failure_after_resolution_blocks_readiness() {
    let s = session(ControllerConfig::default());
    let asset = Arc::new(MockAsset::playable());
    s.provider.register(&source(), Arc::clone(&asset));

    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;

    asset.mark_key_failed(CapabilityKey::HasProtectedContent);
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;

    assert_eq!(s.delegate.count(&DelegateEvent::ReadyToPlay), 0);
    assert!(has_error(&s.delegate.events()));
}

#[tokio::test]
async fn failed_item_surfaces_its_error() {
    let s = session(ControllerConfig::default());
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;

    item.set_status(ItemStatus::Failed, Some("segment fetch 404".into()));
    s.controller.settle().await;

    assert!(
        s.delegate
            .events()
            .contains(&DelegateEvent::Error("segment fetch 404".into()))
    );
}

#[tokio::test]
async fn frame_rate_resolves_from_asset_on_ready() {
    let s = session(ControllerConfig::default());
    s.provider.register(
        &source(),
        Arc::new(MockAsset::playable().with_frame_rate(30.0)),
    );

    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;

    assert!((s.controller.frame_rate() - 30.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn teardown_balances_every_attach_with_one_detach() {
    let s = session(ControllerConfig::default());
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;

    s.controller.tear_down();
    s.controller.settle().await;

    assert_eq!(item.attach_count(), item.detach_count());
    assert_eq!(item.observer_count(), 0);
    assert_eq!(s.player.attach_count(), s.player.detach_count());
    assert_eq!(s.player.time_observer_count(), 0);
    assert_eq!(s.player.queue_len(), 0);
    assert_eq!(s.delegate.count(&DelegateEvent::RateChanged(0.0)), 1);
}

#[tokio::test]
async fn second_load_does_not_install_a_second_time_observer() {
    let s = session(ControllerConfig::default());
    s.controller.load(&source());
    let first = wait_for_item(&s.player).await;

    s.controller.load(&source());
    let mut second = wait_for_item(&s.player).await;
    for _ in 0..400 {
        if !Arc::ptr_eq(&second, &first) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        second = wait_for_item(&s.player).await;
    }
    assert!(!Arc::ptr_eq(&second, &first), "second load never replaced the item");

    assert_eq!(s.player.time_observer_count(), 1);
    assert_eq!(first.observer_count(), 0);
    assert!(second.observer_count() > 0);
}

#[tokio::test]
async fn time_ticks_reach_the_delegate() {
    let s = session(ControllerConfig::default());
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;

    s.player.tick(vidra::play::MediaTime::with_seconds(3.0, 600));
    s.controller.settle().await;

    assert!(s.delegate.events().contains(&DelegateEvent::TimeUpdate(3.0)));
}

#[tokio::test]
async fn queue_exhaustion_reset_tears_down_and_reports_rate_zero() {
    let s = session(ControllerConfig::default().with_queue_end_policy(QueueEndPolicy::Reset));
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.play();
    s.controller.settle().await;

    s.player.finish_current_item();
    s.controller.settle().await;

    assert_eq!(s.player.queue_len(), 0);
    assert!((s.controller.rate() - 0.0).abs() < f32::EPSILON);
    assert_eq!(s.delegate.count(&DelegateEvent::RateChanged(0.0)), 1);
    assert_eq!(item.observer_count(), 0);
}

#[tokio::test]
async fn queue_exhaustion_loop_reinserts_the_finished_item() {
    let s = session(ControllerConfig::default().with_queue_end_policy(QueueEndPolicy::Loop));
    s.controller.load(&source());
    let item = wait_for_item(&s.player).await;
    item.set_status(ItemStatus::ReadyToPlay, None);
    s.controller.settle().await;

    s.player.finish_current_item();
    s.controller.settle().await;

    assert_eq!(s.player.queue_len(), 1);
    assert!(Arc::ptr_eq(&s.player.current_item().unwrap(), &item));
    assert_eq!(s.delegate.count(&DelegateEvent::RateChanged(0.0)), 0);
}
