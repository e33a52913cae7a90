use async_trait::async_trait;

use crate::{
    error::PlayError,
    time::MediaTime,
    types::CapabilityKey,
};

/// Keys that must resolve before any playback decision is trusted.
pub const REQUIRED_CAPABILITY_KEYS: &[CapabilityKey] =
    &[CapabilityKey::Playable, CapabilityKey::HasProtectedContent];

/// Resolution state of a single capability key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// Opaque playable media resource resolved from a source locator.
///
/// Capability keys resolve asynchronously and their state can still move
/// between resolution and notification delivery, so [`key_status`] is
/// re-checked when the item reports ready.
///
/// [`key_status`]: Asset::key_status
#[async_trait]
pub trait Asset: Send + Sync + 'static {
    fn url(&self) -> Option<url::Url>;

    fn duration(&self) -> MediaTime;

    fn is_playable(&self) -> bool;

    fn has_protected_content(&self) -> bool {
        false
    }

    /// Measured or nominal frame rate of the primary video track.
    fn nominal_frame_rate(&self) -> Option<f64> {
        None
    }

    /// Resolve `keys` asynchronously. Fails on the first key that cannot
    /// be loaded.
    async fn load_capability_keys(&self, keys: &[CapabilityKey]) -> Result<(), PlayError>;

    fn key_status(&self, key: CapabilityKey) -> KeyStatus;
}
