use std::sync::Arc;

use crate::{traits::asset::Asset, types::MediaSource};

/// Constructs platform assets from source locators.
///
/// Construction is cheap and synchronous; the expensive part is the
/// asynchronous capability-key resolution on the returned [`Asset`].
pub trait AssetProvider: Send + Sync + 'static {
    fn make_asset(&self, source: &MediaSource) -> Arc<dyn Asset>;
}
