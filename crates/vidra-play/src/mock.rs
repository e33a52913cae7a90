//! Stateful fakes for the player boundary.
//!
//! [`Player`] carries an associated `Item` type, which rules out
//! attribute-generated mocks; these are manual fakes with enough real
//! behavior to drive the session end to end: observers fire
//! synchronously on mutation, transport calls feed back through the
//! rate observer, and attach/detach is counted so tests can assert the
//! pairing contract.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    delegate::PlaybackDelegate,
    error::PlayError,
    observe::{ChangeCallback, ItemProperty, PlayerProperty, PropertyChange, TimeCallback},
    time::MediaTime,
    traits::{
        asset::{Asset, KeyStatus},
        item::PlayerItem,
        player::Player,
        provider::AssetProvider,
    },
    types::{CapabilityKey, ItemStatus, MediaSource, ObserverId, TimeRange},
};

// -- asset --------------------------------------------------------------------

/// Scripted [`Asset`]: capability keys resolve instantly to the
/// configured statuses, and individual keys can be flipped to `Failed`
/// after resolution to exercise the ready-time revalidation path.
pub struct MockAsset {
    url: Option<url::Url>,
    duration: MediaTime,
    playable: bool,
    protected: bool,
    frame_rate: Option<f64>,
    fail_key: Option<CapabilityKey>,
    key_statuses: Mutex<HashMap<CapabilityKey, KeyStatus>>,
}

impl MockAsset {
    pub fn playable() -> Self {
        Self {
            url: None,
            duration: MediaTime::with_seconds(60.0, 600),
            playable: true,
            protected: false,
            frame_rate: None,
            fail_key: None,
            key_statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn protected() -> Self {
        Self {
            protected: true,
            ..Self::playable()
        }
    }

    pub fn unplayable() -> Self {
        Self {
            playable: false,
            ..Self::playable()
        }
    }

    /// Asset whose `key` resolution fails outright.
    pub fn with_failing_key(key: CapabilityKey) -> Self {
        Self {
            fail_key: Some(key),
            ..Self::playable()
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: MediaTime) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Flip a key to `Failed` after it already resolved, simulating a
    /// state change between resolution and notification delivery.
    pub fn mark_key_failed(&self, key: CapabilityKey) {
        self.key_statuses.lock().insert(key, KeyStatus::Failed);
    }
}

#[async_trait]
impl Asset for MockAsset {
    fn url(&self) -> Option<url::Url> {
        self.url.clone()
    }

    fn duration(&self) -> MediaTime {
        self.duration
    }

    fn is_playable(&self) -> bool {
        self.playable
    }

    fn has_protected_content(&self) -> bool {
        self.protected
    }

    fn nominal_frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    async fn load_capability_keys(&self, keys: &[CapabilityKey]) -> Result<(), PlayError> {
        let mut statuses = self.key_statuses.lock();
        for &key in keys {
            if self.fail_key == Some(key) {
                statuses.insert(key, KeyStatus::Failed);
                return Err(PlayError::CapabilityKey {
                    key,
                    reason: "scripted failure".into(),
                });
            }
            statuses.insert(key, KeyStatus::Loaded);
        }
        Ok(())
    }

    fn key_status(&self, key: CapabilityKey) -> KeyStatus {
        self.key_statuses
            .lock()
            .get(&key)
            .copied()
            .unwrap_or_default()
    }
}

// -- item ---------------------------------------------------------------------

struct ItemState {
    status: ItemStatus,
    error: Option<String>,
    loaded_ranges: Vec<TimeRange>,
    likely_to_keep_up: bool,
    buffer_empty: bool,
}

/// Observable [`PlayerItem`] fake. Mutations fire matching observers
/// synchronously, and [`remove_observer`](PlayerItem::remove_observer)
/// panics on an id that is not attached, like the real framework.
pub struct MockItem {
    asset: Arc<dyn Asset>,
    state: Mutex<ItemState>,
    observers: Mutex<HashMap<u64, (ItemProperty, ChangeCallback)>>,
    next_id: AtomicU64,
    attach_count: AtomicUsize,
    detach_count: AtomicUsize,
    can_step: std::sync::atomic::AtomicBool,
    stepped_frames: Mutex<Vec<i32>>,
    cancelled_seeks: AtomicUsize,
}

impl MockItem {
    fn new(asset: Arc<dyn Asset>) -> Self {
        Self {
            asset,
            state: Mutex::new(ItemState {
                status: ItemStatus::Unknown,
                error: None,
                loaded_ranges: Vec::new(),
                likely_to_keep_up: true,
                buffer_empty: false,
            }),
            observers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            attach_count: AtomicUsize::new(0),
            detach_count: AtomicUsize::new(0),
            can_step: std::sync::atomic::AtomicBool::new(false),
            stepped_frames: Mutex::new(Vec::new()),
            cancelled_seeks: AtomicUsize::new(0),
        }
    }

    fn notify(&self, property: ItemProperty, change: &PropertyChange) {
        let observers = self.observers.lock();
        for (observed, callback) in observers.values() {
            if *observed == property {
                callback(change.clone());
            }
        }
    }

    pub fn set_status(&self, status: ItemStatus, error: Option<String>) {
        {
            let mut state = self.state.lock();
            state.status = status;
            state.error = error;
        }
        self.notify(ItemProperty::Status, &PropertyChange::Status { status });
    }

    pub fn set_buffer_empty(&self, empty: bool) {
        self.state.lock().buffer_empty = empty;
        self.notify(
            ItemProperty::BufferEmpty,
            &PropertyChange::BufferEmpty { empty },
        );
    }

    pub fn set_likely_to_keep_up(&self, likely: bool) {
        self.state.lock().likely_to_keep_up = likely;
        self.notify(
            ItemProperty::LikelyToKeepUp,
            &PropertyChange::LikelyToKeepUp { likely },
        );
    }

    pub fn set_loaded_ranges(&self, ranges: Vec<TimeRange>) {
        self.state.lock().loaded_ranges = ranges.clone();
        self.notify(
            ItemProperty::LoadedTimeRanges,
            &PropertyChange::LoadedTimeRanges { ranges },
        );
    }

    /// Make [`can_step_by_frames`](PlayerItem::can_step_by_frames)
    /// report `enabled`.
    pub fn set_can_step(&self, enabled: bool) {
        self.can_step.store(enabled, Ordering::SeqCst);
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count.load(Ordering::SeqCst)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn stepped_frames(&self) -> Vec<i32> {
        self.stepped_frames.lock().clone()
    }

    pub fn cancelled_seek_count(&self) -> usize {
        self.cancelled_seeks.load(Ordering::SeqCst)
    }
}

impl PlayerItem for MockItem {
    fn status(&self) -> ItemStatus {
        self.state.lock().status
    }

    fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    fn duration(&self) -> MediaTime {
        self.asset.duration()
    }

    fn loaded_time_ranges(&self) -> Vec<TimeRange> {
        self.state.lock().loaded_ranges.clone()
    }

    fn is_playback_likely_to_keep_up(&self) -> bool {
        self.state.lock().likely_to_keep_up
    }

    fn is_playback_buffer_empty(&self) -> bool {
        self.state.lock().buffer_empty
    }

    fn cancel_pending_seeks(&self) {
        self.cancelled_seeks.fetch_add(1, Ordering::SeqCst);
    }

    fn can_step_by_frames(&self) -> bool {
        self.can_step.load(Ordering::SeqCst)
    }

    fn step_by_frames(&self, count: i32) {
        self.stepped_frames.lock().push(count);
    }

    fn asset(&self) -> Arc<dyn Asset> {
        Arc::clone(&self.asset)
    }

    fn add_observer(&self, property: ItemProperty, callback: ChangeCallback) -> ObserverId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.observers.lock().insert(id, (property, callback));
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        ObserverId::new(id)
    }

    fn remove_observer(&self, id: ObserverId) {
        assert!(
            self.observers.lock().remove(&id.raw()).is_some(),
            "removing item observer {id:?} that is not attached"
        );
        self.detach_count.fetch_add(1, Ordering::SeqCst);
    }
}

// -- player -------------------------------------------------------------------

/// Queue-player fake.
///
/// `play`/`pause` route through [`set_rate`](Player::set_rate), which
/// fires rate observers, so the session sees the same feedback loop the
/// real player produces. Time is advanced explicitly with
/// [`tick`](MockPlayer::tick).
#[derive(Default)]
pub struct MockPlayer {
    rate: Mutex<f32>,
    time: Mutex<MediaTime>,
    items: Mutex<Vec<Arc<MockItem>>>,
    observers: Mutex<HashMap<u64, (PlayerProperty, ChangeCallback)>>,
    time_observers: Mutex<HashMap<u64, TimeCallback>>,
    next_id: AtomicU64,
    attach_count: AtomicUsize,
    detach_count: AtomicUsize,
}

impl MockPlayer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            time: Mutex::new(MediaTime::ZERO),
            next_id: AtomicU64::new(1),
            ..Self::default()
        })
    }

    fn notify(&self, property: PlayerProperty, change: &PropertyChange) {
        let observers = self.observers.lock();
        for (observed, callback) in observers.values() {
            if *observed == property {
                callback(change.clone());
            }
        }
    }

    /// Pop the head of the queue, as the real player does when an item
    /// plays to its end, and fire the current-item observer.
    pub fn finish_current_item(&self) {
        let present = {
            let mut items = self.items.lock();
            if !items.is_empty() {
                items.remove(0);
            }
            !items.is_empty()
        };
        self.notify(
            PlayerProperty::CurrentItem,
            &PropertyChange::CurrentItem { present },
        );
    }

    /// Advance the playhead and fire every periodic time observer.
    pub fn tick(&self, time: MediaTime) {
        *self.time.lock() = time;
        let observers = self.time_observers.lock();
        for callback in observers.values() {
            callback(time);
        }
    }

    pub fn queue_len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn time_observer_count(&self) -> usize {
        self.time_observers.lock().len()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count.load(Ordering::SeqCst)
    }
}

impl Player for MockPlayer {
    type Item = MockItem;

    fn rate(&self) -> f32 {
        *self.rate.lock()
    }

    fn set_rate(&self, rate: f32) {
        *self.rate.lock() = rate;
        self.notify(PlayerProperty::Rate, &PropertyChange::Rate { rate });
    }

    fn play(&self) {
        self.set_rate(1.0);
    }

    fn pause(&self) {
        self.set_rate(0.0);
    }

    fn current_time(&self) -> MediaTime {
        *self.time.lock()
    }

    fn seek_with_tolerance(&self, to: MediaTime, _before: MediaTime, _after: MediaTime) {
        *self.time.lock() = to;
    }

    fn current_item(&self) -> Option<Arc<MockItem>> {
        self.items.lock().first().cloned()
    }

    fn make_item(&self, asset: Arc<dyn Asset>) -> Arc<MockItem> {
        Arc::new(MockItem::new(asset))
    }

    fn insert(&self, item: Arc<MockItem>) {
        self.items.lock().push(item);
    }

    fn remove_all_items(&self) {
        self.items.lock().clear();
    }

    fn add_observer(&self, property: PlayerProperty, callback: ChangeCallback) -> ObserverId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.observers.lock().insert(id, (property, callback));
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        ObserverId::new(id)
    }

    fn remove_observer(&self, id: ObserverId) {
        assert!(
            self.observers.lock().remove(&id.raw()).is_some(),
            "removing player observer {id:?} that is not attached"
        );
        self.detach_count.fetch_add(1, Ordering::SeqCst);
    }

    fn add_periodic_time_observer(&self, _interval: Duration, callback: TimeCallback) -> ObserverId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.time_observers.lock().insert(id, callback);
        ObserverId::new(id)
    }

    fn remove_time_observer(&self, id: ObserverId) {
        assert!(
            self.time_observers.lock().remove(&id.raw()).is_some(),
            "removing time observer {id:?} that is not attached"
        );
    }
}

// -- provider -----------------------------------------------------------------

/// [`AssetProvider`] backed by a registry of scripted assets keyed by
/// source locator. Unregistered sources resolve to a plain playable
/// asset.
#[derive(Default)]
pub struct MockAssetProvider {
    assets: Mutex<HashMap<String, Arc<MockAsset>>>,
}

impl MockAssetProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(&self, source: &MediaSource, asset: Arc<MockAsset>) {
        self.assets.lock().insert(source.to_string(), asset);
    }
}

impl AssetProvider for MockAssetProvider {
    fn make_asset(&self, source: &MediaSource) -> Arc<dyn Asset> {
        if let Some(asset) = self.assets.lock().get(&source.to_string()) {
            return Arc::clone(asset) as Arc<dyn Asset>;
        }
        Arc::new(MockAsset::playable())
    }
}

// -- delegate -----------------------------------------------------------------

/// One recorded delegate callback.
#[derive(Clone, Debug, PartialEq)]
pub enum DelegateEvent {
    TimeUpdate(f64),
    ReadyToPlay,
    RateChanged(f32),
    BufferingStarted,
    BufferingFinished,
    Error(String),
}

/// Delegate that records every callback and wakes waiters on each one.
#[derive(Default)]
pub struct RecordingDelegate {
    events: Mutex<Vec<DelegateEvent>>,
    notify: Notify,
}

impl RecordingDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: &DelegateEvent) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }

    /// Wait until the recorded event log satisfies `pred`.
    ///
    /// The notified future is created before the predicate check so a
    /// wakeup between check and await is never lost.
    pub async fn wait_for(&self, pred: impl Fn(&[DelegateEvent]) -> bool) {
        loop {
            let notified = self.notify.notified();
            if pred(&self.events.lock()) {
                return;
            }
            notified.await;
        }
    }

    fn record(&self, event: DelegateEvent) {
        self.events.lock().push(event);
        self.notify.notify_waiters();
    }
}

impl PlaybackDelegate for RecordingDelegate {
    fn time_update(&self, seconds: f64) {
        self.record(DelegateEvent::TimeUpdate(seconds));
    }

    fn ready_to_play(&self) {
        self.record(DelegateEvent::ReadyToPlay);
    }

    fn rate_changed(&self, rate: f32) {
        self.record(DelegateEvent::RateChanged(rate));
    }

    fn buffering_started(&self) {
        self.record(DelegateEvent::BufferingStarted);
    }

    fn buffering_finished(&self) {
        self.record(DelegateEvent::BufferingFinished);
    }

    fn playback_error(&self, message: &str) {
        self.record(DelegateEvent::Error(message.to_string()));
    }
}
