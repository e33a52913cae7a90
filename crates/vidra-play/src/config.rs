use std::time::Duration;

use derivative::Derivative;
use derive_setters::Setters;

use crate::types::QueueEndPolicy;

/// Configuration for a [`PlaybackController`](crate::PlaybackController).
#[derive(Clone, Debug, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct ControllerConfig {
    /// Policy applied when the player's item queue runs out.
    pub queue_end_policy: QueueEndPolicy,
    /// Rate magnitude ceiling for variable-rate playback. Default: 4.0.
    #[derivative(Default(value = "4.0"))]
    pub max_rate: f32,
    /// Rate increment applied by forward/reverse stepping. Default: 1.0.
    #[derivative(Default(value = "1.0"))]
    pub rate_step: f32,
    /// Frame rate assumed when the asset does not report one. Default: 25.
    #[derivative(Default(value = "25.0"))]
    pub default_frame_rate: f64,
    /// Buffered runway past the playhead that counts as recovered
    /// buffering. Default: 5 s.
    #[derivative(Default(value = "Duration::from_secs(5)"))]
    pub buffer_resume_lead: Duration,
    /// Restore the pre-stall rate once buffering recovers. Default: true.
    #[derivative(Default(value = "true"))]
    pub resume_after_buffering: bool,
    /// Interval of the periodic time observer. Default: 1 s.
    #[derivative(Default(value = "Duration::from_secs(1)"))]
    pub time_update_interval: Duration,
}
