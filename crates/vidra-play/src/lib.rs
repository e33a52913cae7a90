#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::ignored_unit_patterns)]

mod config;
mod controller;
mod delegate;
mod error;
mod loader;
mod observe;
mod session;
mod time;
mod types;

pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use config::ControllerConfig;
pub use controller::PlaybackController;
pub use delegate::PlaybackDelegate;
pub use error::{PlayError, PlayResult};
pub use observe::{ChangeCallback, ItemProperty, PlayerProperty, PropertyChange, TimeCallback};
pub use time::{DEFAULT_TIMESCALE, MediaTime};
pub use traits::{
    asset::{Asset, KeyStatus, REQUIRED_CAPABILITY_KEYS},
    item::PlayerItem,
    player::Player,
    provider::AssetProvider,
};
pub use types::{CapabilityKey, ItemStatus, MediaSource, ObserverId, QueueEndPolicy, TimeRange};
