//! Shared session fixture for controller tests.

use std::{sync::Arc, time::Duration};

use vidra::play::{
    ControllerConfig, MediaSource, PlaybackController, Player,
    mock::{MockAssetProvider, MockItem, MockPlayer, RecordingDelegate},
};

pub struct Session {
    pub player: Arc<MockPlayer>,
    pub provider: Arc<MockAssetProvider>,
    pub delegate: Arc<RecordingDelegate>,
    pub controller: PlaybackController<MockPlayer>,
}

pub fn session(config: ControllerConfig) -> Session {
    let player = MockPlayer::new();
    let provider = MockAssetProvider::new();
    let delegate = RecordingDelegate::new();
    let provider_dyn: Arc<dyn vidra::play::AssetProvider> = provider.clone();
    let delegate_dyn: Arc<dyn vidra::play::PlaybackDelegate> = delegate.clone();
    let controller = PlaybackController::new(Arc::clone(&player), provider_dyn, delegate_dyn, config);
    Session {
        player,
        provider,
        delegate,
        controller,
    }
}

pub fn source() -> MediaSource {
    MediaSource::Url("vidra://cdn.example.com/live/index.m3u8".parse().unwrap())
}

/// Poll until the asynchronous load has inserted an item into the queue.
pub async fn wait_for_item(player: &Arc<MockPlayer>) -> Arc<MockItem> {
    for _ in 0..400 {
        if let Some(item) = player.current_item() {
            return item;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("load never inserted an item");
}
