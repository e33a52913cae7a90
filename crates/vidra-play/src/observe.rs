//! Per-session observation registry.
//!
//! Replaces the usual shared observation context token: every session owns
//! its own registry, so attach and detach are deterministic and the
//! platform never sees an unpaired removal.

use crate::{
    time::MediaTime,
    traits::{item::PlayerItem, player::Player},
    types::{ItemStatus, ObserverId, TimeRange},
};

/// Player-level observed property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerProperty {
    Rate,
    CurrentItem,
}

/// Item-level observed property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemProperty {
    Status,
    LoadedTimeRanges,
    LikelyToKeepUp,
    BufferEmpty,
}

/// Typed payload of a property-change notification.
///
/// Delivered from arbitrary threads; the session marshals every change
/// onto its own context before acting on it.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum PropertyChange {
    Rate { rate: f32 },
    CurrentItem { present: bool },
    Status { status: ItemStatus },
    LoadedTimeRanges { ranges: Vec<TimeRange> },
    LikelyToKeepUp { likely: bool },
    BufferEmpty { empty: bool },
}

pub type ChangeCallback = Box<dyn Fn(PropertyChange) + Send + Sync + 'static>;
pub type TimeCallback = Box<dyn Fn(MediaTime) + Send + Sync + 'static>;

/// Tracks every observation a session holds on the player and its item.
///
/// Attach/detach on the underlying platform is not idempotent (removing
/// an unknown observer is a programming-contract violation), so the
/// registry records exactly what was attached and detaches it exactly
/// once.
#[derive(Default)]
pub(crate) struct ObservationRegistry {
    player_ids: Vec<ObserverId>,
    item_ids: Vec<ObserverId>,
}

impl ObservationRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_attached(&self) -> bool {
        !self.player_ids.is_empty() || !self.item_ids.is_empty()
    }

    pub(crate) fn observe_player<P: Player>(
        &mut self,
        player: &P,
        property: PlayerProperty,
        callback: ChangeCallback,
    ) {
        self.player_ids.push(player.add_observer(property, callback));
    }

    pub(crate) fn observe_item<I: PlayerItem>(
        &mut self,
        item: &I,
        property: ItemProperty,
        callback: ChangeCallback,
    ) {
        self.item_ids.push(item.add_observer(property, callback));
    }

    /// Remove every recorded observation, in reverse attach order.
    pub(crate) fn detach_all<P: Player>(&mut self, player: &P, item: &P::Item) {
        for id in self.item_ids.drain(..).rev() {
            item.remove_observer(id);
        }
        for id in self.player_ids.drain(..).rev() {
            player.remove_observer(id);
        }
    }
}
