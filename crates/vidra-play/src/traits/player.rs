use std::{sync::Arc, time::Duration};

use crate::{
    observe::{ChangeCallback, PlayerProperty, TimeCallback},
    time::MediaTime,
    traits::{asset::Asset, item::PlayerItem},
    types::ObserverId,
};

/// The native queue player being wrapped.
///
/// Implementations deliver observer callbacks from arbitrary threads and
/// are expected to serialize their own internal state; the session never
/// relies on delivery ordering across different properties.
pub trait Player: Send + Sync + 'static {
    type Item: PlayerItem;

    // -- transport --

    fn rate(&self) -> f32;

    fn set_rate(&self, rate: f32);

    fn play(&self);

    fn pause(&self);

    // -- timing --

    fn current_time(&self) -> MediaTime;

    fn seek_with_tolerance(
        &self,
        to: MediaTime,
        tolerance_before: MediaTime,
        tolerance_after: MediaTime,
    );

    // -- item queue --

    fn current_item(&self) -> Option<Arc<Self::Item>>;

    fn make_item(&self, asset: Arc<dyn Asset>) -> Arc<Self::Item>;

    /// Append an item at the queue tail.
    fn insert(&self, item: Arc<Self::Item>);

    fn remove_all_items(&self);

    // -- observation --

    fn add_observer(&self, property: PlayerProperty, callback: ChangeCallback) -> ObserverId;

    /// Remove a previously attached observer. Panics on an id that is not
    /// currently attached (unbalanced removal is a programming error).
    fn remove_observer(&self, id: ObserverId);

    fn add_periodic_time_observer(&self, interval: Duration, callback: TimeCallback) -> ObserverId;

    fn remove_time_observer(&self, id: ObserverId);
}
