//! Transport controller and session entry point.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use portable_atomic::AtomicF64;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    config::ControllerConfig,
    delegate::PlaybackDelegate,
    loader,
    session::{self, SessionCtx, SessionMsg},
    time::{DEFAULT_TIMESCALE, MediaTime},
    traits::{item::PlayerItem, player::Player, provider::AssetProvider},
    types::MediaSource,
};

/// Owns one playback session over a [`Player`].
///
/// The controller is a thin handle: all session state lives in a spawned
/// reconciler task, and transport operations act on the player directly.
/// The delegate is bound at construction and cannot be rebound, so every
/// event has a receiver for the lifetime of the session.
pub struct PlaybackController<P: Player> {
    player: Arc<P>,
    provider: Arc<dyn AssetProvider>,
    config: ControllerConfig,
    tx: mpsc::UnboundedSender<SessionMsg>,
    frame_rate: Arc<AtomicF64>,
    generation: Arc<AtomicU64>,
    load_token: Mutex<CancellationToken>,
}

impl<P: Player> PlaybackController<P> {
    /// Create a controller and spawn its reconciler task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        player: Arc<P>,
        provider: Arc<dyn AssetProvider>,
        delegate: Arc<dyn PlaybackDelegate>,
        config: ControllerConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let frame_rate = Arc::new(AtomicF64::new(config.default_frame_rate));
        let generation = Arc::new(AtomicU64::new(0));

        let ctx = SessionCtx {
            player: Arc::clone(&player),
            delegate,
            config: config.clone(),
            frame_rate: Arc::clone(&frame_rate),
            generation: Arc::clone(&generation),
            tx: tx.clone(),
        };
        tokio::spawn(session::run(ctx, rx));

        Self {
            player,
            provider,
            config,
            tx,
            frame_rate,
            generation,
            load_token: Mutex::new(CancellationToken::new()),
        }
    }

    // -- loading --------------------------------------------------------------

    /// Start resolving `source` into a playable item.
    ///
    /// Supersedes any load still in flight: the previous load task is
    /// cancelled and its result, should it race the cancellation, is
    /// discarded by the session. Completion is reported through the
    /// delegate (`ready_to_play` or `playback_error`).
    pub fn load(&self, source: &MediaSource) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let token = CancellationToken::new();
        {
            let mut slot = self.load_token.lock();
            slot.cancel();
            *slot = token.clone();
        }

        debug!(%source, generation, "loading source");
        let asset = self.provider.make_asset(source);
        tokio::spawn(loader::resolve(asset, generation, token, self.tx.clone()));
    }

    /// Release the current item and all observers, leaving the controller
    /// reusable for a subsequent [`load`](Self::load).
    pub fn tear_down(&self) {
        self.player.pause();
        self.load_token.lock().cancel();
        // Bump the generation so any completion that slipped past the
        // token is discarded too.
        self.generation.fetch_add(1, Ordering::AcqRel);
        let _ = self.tx.send(SessionMsg::TearDown);
    }

    // -- transport ------------------------------------------------------------

    pub fn play(&self) {
        self.player.play();
    }

    pub fn pause(&self) {
        self.player.pause();
    }

    /// Toggle playback. When the playhead sits at the end of the item,
    /// rewinds to the start before playing.
    pub fn play_pause(&self) {
        if self.player.rate() == 1.0 {
            self.player.pause();
            return;
        }
        if let Some(item) = self.player.current_item() {
            let duration = item.duration();
            if duration.is_valid()
                && !duration.is_indefinite()
                && self.player.current_time() >= duration
            {
                item.cancel_pending_seeks();
                self.player
                    .seek_with_tolerance(MediaTime::ZERO, MediaTime::ZERO, MediaTime::ZERO);
            }
        }
        self.player.play();
    }

    pub fn play_forward(&self) {
        self.step_rate(1.0);
    }

    pub fn play_reverse(&self) {
        self.step_rate(-1.0);
    }

    /// Step the rate by one increment in `direction` (`+1.0` / `-1.0`).
    ///
    /// The result never equals zero: a step that would land on or cross
    /// zero jumps past it to `direction * 1.0`. Magnitude is clamped to
    /// the configured maximum.
    fn step_rate(&self, direction: f32) {
        let current = self.player.rate();
        let mut next = current + direction * self.config.rate_step;
        if next == 0.0 || (current != 0.0 && next.signum() != current.signum()) {
            next = direction;
        }
        next = next.clamp(-self.config.max_rate, self.config.max_rate);
        debug!(current, next, "stepping rate");
        self.player.set_rate(next);
    }

    /// Advance by `count` frames (negative steps backward).
    ///
    /// Pauses first, then uses the item's native frame stepping when it
    /// supports it, otherwise converts the count to seconds through the
    /// resolved frame rate and seeks precisely.
    pub fn step_frames(&self, count: i32) {
        let Some(item) = self.player.current_item() else {
            return;
        };
        self.player.pause();
        item.cancel_pending_seeks();

        if item.can_step_by_frames() {
            item.step_by_frames(count);
            return;
        }
        let frame_rate = self.frame_rate.load(Ordering::Acquire);
        if frame_rate <= 0.0 {
            return;
        }
        self.seek_relative(f64::from(count) / frame_rate);
    }

    /// Advance by `count` seconds (negative steps backward). Pauses first.
    pub fn step_seconds(&self, count: f64) {
        let Some(item) = self.player.current_item() else {
            return;
        };
        self.player.pause();
        item.cancel_pending_seeks();
        self.seek_relative(count);
    }

    /// Zero-tolerance seek to an absolute position in seconds.
    pub fn seek_to(&self, seconds: f64) {
        if let Some(item) = self.player.current_item() {
            item.cancel_pending_seeks();
        }
        self.player.seek_with_tolerance(
            MediaTime::with_seconds(seconds, DEFAULT_TIMESCALE),
            MediaTime::ZERO,
            MediaTime::ZERO,
        );
    }

    fn seek_relative(&self, seconds: f64) {
        let target = self.player.current_time().seconds() + seconds;
        self.player.seek_with_tolerance(
            MediaTime::with_seconds(target, DEFAULT_TIMESCALE),
            MediaTime::ZERO,
            MediaTime::ZERO,
        );
    }

    // -- accessors ------------------------------------------------------------

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.player.rate()
    }

    #[must_use]
    pub fn current_time(&self) -> MediaTime {
        self.player.current_time()
    }

    /// Duration of the current item, or [`MediaTime::ZERO`] when no item
    /// is loaded.
    #[must_use]
    pub fn duration(&self) -> MediaTime {
        self.player
            .current_item()
            .map_or(MediaTime::ZERO, |item| item.duration())
    }

    /// Frame rate resolved for the current item, or the configured
    /// default before any item became ready.
    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn player(&self) -> &Arc<P> {
        &self.player
    }

    /// Wait until the reconciler has drained every message sent before
    /// this call. Test-only synchronization point.
    #[cfg(any(test, feature = "test-utils"))]
    pub async fn settle(&self) {
        let (ack, done) = tokio::sync::oneshot::channel();
        if self.tx.send(SessionMsg::Barrier(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

impl<P: Player> Drop for PlaybackController<P> {
    fn drop(&mut self) {
        self.load_token.lock().cancel();
        let _ = self.tx.send(SessionMsg::Shutdown);
    }
}
