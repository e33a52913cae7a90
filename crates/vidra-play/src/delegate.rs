/// Push surface toward the UI collaborator.
///
/// A delegate is bound at controller construction and can never be absent,
/// so playback operations never race a missing callback target. All
/// methods are invoked from the session context, one at a time.
pub trait PlaybackDelegate: Send + Sync + 'static {
    /// Periodic tick with the current playhead position.
    fn time_update(&self, seconds: f64);

    /// The active item became playable. At most once per item instance.
    fn ready_to_play(&self);

    /// The playback rate changed, including `0.0` on stop and teardown.
    fn rate_changed(&self, rate: f32);

    /// A buffering episode began.
    fn buffering_started(&self);

    /// A buffering episode ended.
    fn buffering_finished(&self);

    /// Single error-message channel for load, capability, item, and fetch
    /// failures. Never fatal.
    fn playback_error(&self, message: &str);
}
