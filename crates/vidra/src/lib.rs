#![forbid(unsafe_code)]

//! # Vidra
//!
//! Facade crate for video playback session control.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use vidra::prelude::*;
//!
//! let controller = PlaybackController::new(player, provider, delegate, ControllerConfig::default());
//! controller.load(&MediaSource::Url("vidra://cdn.example.com/live/index.m3u8".parse()?));
//! controller.play();
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod hls {
    pub use vidra_hls::*;
}

pub mod net {
    pub use vidra_net::*;
}

pub mod play {
    pub use vidra_play::*;
}

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use vidra_hls::{
        InterceptError, InterceptorOptions, LoadOutcome, LoadingRequest, ResourceLoaderInterceptor,
    };
    pub use vidra_net::{HttpClient, Net, NetOptions};
    pub use vidra_play::{
        Asset, AssetProvider, ControllerConfig, MediaSource, MediaTime, PlaybackController,
        PlaybackDelegate, Player, PlayerItem, QueueEndPolicy,
    };
}
