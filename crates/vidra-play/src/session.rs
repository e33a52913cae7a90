//! Session reconciler: the single context that owns playback state.
//!
//! Property-change notifications, periodic ticks, and load completions
//! all arrive as messages on one unbounded channel; the reconciler task
//! is the only code that mutates session state, so no locks guard it.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use portable_atomic::AtomicF64;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    config::ControllerConfig,
    delegate::PlaybackDelegate,
    observe::{ChangeCallback, ItemProperty, ObservationRegistry, PlayerProperty, PropertyChange},
    time::MediaTime,
    traits::{
        asset::{Asset, KeyStatus, REQUIRED_CAPABILITY_KEYS},
        item::PlayerItem,
        player::Player,
    },
    types::{ItemStatus, ObserverId, QueueEndPolicy},
};

pub(crate) enum SessionMsg {
    Change(PropertyChange),
    Tick(MediaTime),
    AssetReady {
        asset: Arc<dyn Asset>,
        generation: u64,
    },
    LoadFailed {
        message: String,
        generation: u64,
    },
    TearDown,
    Shutdown,
    #[cfg(any(test, feature = "test-utils"))]
    Barrier(tokio::sync::oneshot::Sender<()>),
}

/// Everything the reconciler task shares with the controller handle.
pub(crate) struct SessionCtx<P: Player> {
    pub player: Arc<P>,
    pub delegate: Arc<dyn PlaybackDelegate>,
    pub config: ControllerConfig,
    pub frame_rate: Arc<AtomicF64>,
    pub generation: Arc<AtomicU64>,
    pub tx: mpsc::UnboundedSender<SessionMsg>,
}

struct SessionState<P: Player> {
    item: Option<Arc<P::Item>>,
    registry: ObservationRegistry,
    time_observer: Option<ObserverId>,
    ready_fired: bool,
    buffering: bool,
    resume_rate: Option<f32>,
    last_rate: Option<f32>,
}

impl<P: Player> SessionState<P> {
    fn new() -> Self {
        Self {
            item: None,
            registry: ObservationRegistry::new(),
            time_observer: None,
            ready_fired: false,
            buffering: false,
            resume_rate: None,
            last_rate: None,
        }
    }
}

pub(crate) async fn run<P: Player>(ctx: SessionCtx<P>, mut rx: mpsc::UnboundedReceiver<SessionMsg>) {
    let mut state = SessionState::<P>::new();

    loop {
        let Some(msg) = rx.recv().await else {
            // Controller handle gone without an explicit shutdown.
            break;
        };
        match msg {
            SessionMsg::Change(change) => handle_change(&ctx, &mut state, change),
            SessionMsg::Tick(time) => ctx.delegate.time_update(time.seconds()),
            SessionMsg::AssetReady { asset, generation } => {
                handle_asset_ready(&ctx, &mut state, asset, generation);
            }
            SessionMsg::LoadFailed {
                message,
                generation,
            } => {
                if generation == ctx.generation.load(Ordering::Acquire) {
                    ctx.delegate.playback_error(&message);
                } else {
                    debug!(generation, "stale load failure discarded");
                }
            }
            SessionMsg::TearDown => cleanup(&ctx, &mut state),
            SessionMsg::Shutdown => break,
            #[cfg(any(test, feature = "test-utils"))]
            SessionMsg::Barrier(ack) => {
                let _ = ack.send(());
            }
        }
    }

    // Cleanup runs on every exit route so observers are never left
    // dangling on the player or item.
    cleanup(&ctx, &mut state);
}

// -- load completion ----------------------------------------------------------

fn handle_asset_ready<P: Player>(
    ctx: &SessionCtx<P>,
    state: &mut SessionState<P>,
    asset: Arc<dyn Asset>,
    generation: u64,
) {
    if generation != ctx.generation.load(Ordering::Acquire) {
        debug!(generation, "stale asset resolution discarded");
        return;
    }

    // Replacing a source: release the previous item completely first.
    if let Some(old) = state.item.take() {
        state.registry.detach_all(&*ctx.player, &*old);
        ctx.player.remove_all_items();
    }

    let item = ctx.player.make_item(asset);
    ctx.player.insert(Arc::clone(&item));
    attach_observers(ctx, state, &item);
    state.item = Some(item);
    state.ready_fired = false;
    state.buffering = false;
    state.resume_rate = None;

    ensure_time_observer(ctx, state);
    debug!("asset resolved, item inserted and observed");
}

fn attach_observers<P: Player>(
    ctx: &SessionCtx<P>,
    state: &mut SessionState<P>,
    item: &Arc<P::Item>,
) {
    for property in [PlayerProperty::Rate, PlayerProperty::CurrentItem] {
        state
            .registry
            .observe_player(&*ctx.player, property, change_sink(ctx));
    }
    for property in [
        ItemProperty::Status,
        ItemProperty::LoadedTimeRanges,
        ItemProperty::LikelyToKeepUp,
        ItemProperty::BufferEmpty,
    ] {
        state
            .registry
            .observe_item(&**item, property, change_sink(ctx));
    }
}

fn change_sink<P: Player>(ctx: &SessionCtx<P>) -> ChangeCallback {
    let tx = ctx.tx.clone();
    Box::new(move |change| {
        let _ = tx.send(SessionMsg::Change(change));
    })
}

/// Install the periodic time observer, once per session lifetime.
fn ensure_time_observer<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>) {
    if state.time_observer.is_some() {
        return;
    }
    let tx = ctx.tx.clone();
    let id = ctx.player.add_periodic_time_observer(
        ctx.config.time_update_interval,
        Box::new(move |time| {
            let _ = tx.send(SessionMsg::Tick(time));
        }),
    );
    state.time_observer = Some(id);
}

// -- property changes ---------------------------------------------------------

fn handle_change<P: Player>(
    ctx: &SessionCtx<P>,
    state: &mut SessionState<P>,
    change: PropertyChange,
) {
    match change {
        PropertyChange::Rate { rate } => on_rate(ctx, state, rate),
        PropertyChange::CurrentItem { present: false } => on_queue_exhausted(ctx, state),
        PropertyChange::CurrentItem { present: true } => {}
        PropertyChange::Status { status } => on_status(ctx, state, status),
        PropertyChange::LoadedTimeRanges { ranges } => on_loaded_ranges(ctx, state, &ranges),
        PropertyChange::LikelyToKeepUp { likely: true } => finish_buffering(ctx, state),
        PropertyChange::LikelyToKeepUp { likely: false } => {}
        PropertyChange::BufferEmpty { empty: true } => start_buffering(ctx, state),
        PropertyChange::BufferEmpty { empty: false } => {}
    }
}

fn on_rate<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>, rate: f32) {
    if state.last_rate == Some(rate) {
        return;
    }
    state.last_rate = Some(rate);
    ctx.delegate.rate_changed(rate);
}

fn on_status<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>, status: ItemStatus) {
    match status {
        ItemStatus::Unknown => {}
        ItemStatus::Failed => {
            let reason = state
                .item
                .as_ref()
                .and_then(|item| item.error())
                .unwrap_or_else(|| "playback item failed".to_string());
            warn!(%reason, "item reported terminal failure");
            ctx.delegate.playback_error(&reason);
        }
        ItemStatus::ReadyToPlay => on_ready(ctx, state),
    }
}

/// ReadyToPlay handler.
///
/// Capability keys can still flip state between asynchronous resolution
/// and notification delivery, so the load-time validation is repeated
/// here before the session is declared playable.
fn on_ready<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>) {
    if state.ready_fired {
        return;
    }
    let Some(item) = state.item.as_ref() else {
        return;
    };
    let asset = item.asset();

    for &key in REQUIRED_CAPABILITY_KEYS {
        if asset.key_status(key) == KeyStatus::Failed {
            ctx.delegate
                .playback_error(&format!("capability key {key} failed to load"));
            return;
        }
    }
    if !asset.is_playable() || asset.has_protected_content() {
        ctx.delegate
            .playback_error("asset cannot be played: unplayable or protected content");
        return;
    }

    let frame_rate = asset
        .nominal_frame_rate()
        .filter(|rate| *rate > 0.0)
        .unwrap_or(ctx.config.default_frame_rate);
    ctx.frame_rate.store(frame_rate, Ordering::Release);

    state.ready_fired = true;
    debug!(frame_rate, "item ready to play");
    ctx.delegate.ready_to_play();
}

fn start_buffering<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>) {
    if state.buffering {
        return;
    }
    state.buffering = true;
    if ctx.config.resume_after_buffering {
        let rate = ctx.player.rate();
        if rate != 0.0 {
            state.resume_rate = Some(rate);
        }
    }
    debug!("buffering started");
    ctx.delegate.buffering_started();
}

fn finish_buffering<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>) {
    if !state.buffering {
        return;
    }
    state.buffering = false;
    debug!("buffering finished");
    ctx.delegate.buffering_finished();
    if let Some(rate) = state.resume_rate.take() {
        ctx.player.set_rate(rate);
    }
}

/// Loaded-range updates double as a buffering-recovery signal: enough
/// buffered runway past the playhead, or a fully buffered item, ends the
/// episode even if the keep-up flag never flips.
fn on_loaded_ranges<P: Player>(
    ctx: &SessionCtx<P>,
    state: &mut SessionState<P>,
    ranges: &[crate::types::TimeRange],
) {
    if !state.buffering {
        return;
    }
    let Some(position) = ctx.player.current_time().to_duration() else {
        return;
    };
    let Some(horizon) = ranges
        .iter()
        .filter(|range| range.start <= position && range.end() >= position)
        .map(|range| range.end())
        .max()
    else {
        return;
    };

    let fully_buffered = state
        .item
        .as_ref()
        .and_then(|item| item.duration().to_duration())
        .is_some_and(|duration| horizon >= duration);

    if fully_buffered || horizon >= position + ctx.config.buffer_resume_lead {
        finish_buffering(ctx, state);
    }
}

// -- queue exhaustion ---------------------------------------------------------

fn on_queue_exhausted<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>) {
    match ctx.config.queue_end_policy {
        QueueEndPolicy::Loop => {
            if let Some(item) = state.item.clone() {
                debug!("queue exhausted, reinserting finished item");
                ctx.player.insert(item);
            }
        }
        QueueEndPolicy::Reset => {
            debug!("queue exhausted, resetting session");
            cleanup(ctx, state);
        }
    }
}

// -- teardown -----------------------------------------------------------------

/// Release the item, its observers, and the periodic time observer.
///
/// Detach happens before the item is dropped, exactly once; the rate-zero
/// delegate event is emitted directly because the rate observer is gone
/// by the time the player settles.
fn cleanup<P: Player>(ctx: &SessionCtx<P>, state: &mut SessionState<P>) {
    if let Some(item) = state.item.take() {
        state.registry.detach_all(&*ctx.player, &*item);
    }
    debug_assert!(!state.registry.is_attached());
    // Observers are gone, so this pause produces no change message; the
    // delegate hears about it through the synthesized event below.
    ctx.player.pause();
    if let Some(id) = state.time_observer.take() {
        ctx.player.remove_time_observer(id);
    }
    ctx.player.remove_all_items();
    state.ready_fired = false;
    state.buffering = false;
    state.resume_rate = None;

    if state.last_rate != Some(0.0) {
        state.last_rate = Some(0.0);
        ctx.delegate.rate_changed(0.0);
    }
}
