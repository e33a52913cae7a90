use std::sync::Arc;

use crate::{
    observe::{ChangeCallback, ItemProperty},
    time::MediaTime,
    traits::asset::Asset,
    types::{ItemStatus, ObserverId, TimeRange},
};

/// The unit of playable media tracked through property-change
/// notifications.
///
/// Observation is not idempotent: [`remove_observer`] with an id that is
/// not currently attached is a programming-contract violation and panics,
/// mirroring the underlying framework's crash on unbalanced removal.
///
/// [`remove_observer`]: PlayerItem::remove_observer
pub trait PlayerItem: Send + Sync + 'static {
    fn status(&self) -> ItemStatus;

    fn error(&self) -> Option<String>;

    fn duration(&self) -> MediaTime;

    fn loaded_time_ranges(&self) -> Vec<TimeRange>;

    fn is_playback_likely_to_keep_up(&self) -> bool;

    fn is_playback_buffer_empty(&self) -> bool;

    /// Cancel every seek currently in flight on this item.
    fn cancel_pending_seeks(&self);

    /// Whether the item supports the native frame-step primitive.
    fn can_step_by_frames(&self) -> bool;

    /// Step by `count` frames using the native primitive.
    fn step_by_frames(&self, count: i32);

    fn asset(&self) -> Arc<dyn Asset>;

    fn add_observer(&self, property: ItemProperty, callback: ChangeCallback) -> ObserverId;

    fn remove_observer(&self, id: ObserverId);
}
