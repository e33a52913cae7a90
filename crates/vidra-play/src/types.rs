use std::{path::PathBuf, time::Duration};

/// Status of an observed playable item.
///
/// `Failed` is terminal: once an item reports it, the only recovery is
/// loading a new source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ItemStatus {
    #[default]
    Unknown,
    ReadyToPlay,
    Failed,
}

/// Asset property that must resolve asynchronously before playback
/// decisions can be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CapabilityKey {
    Playable,
    HasProtectedContent,
}

impl std::fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Playable => f.write_str("playable"),
            Self::HasProtectedContent => f.write_str("has-protected-content"),
        }
    }
}

/// What the session does when the player runs out of queued items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueueEndPolicy {
    /// Treat exhaustion as end of content: tear the session back down to
    /// its initial state and report rate zero.
    #[default]
    Reset,
    /// Reinsert the finished item at the queue tail, looping forever.
    Loop,
}

/// Opaque token for an attached observation or time observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Source locator for a playback session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MediaSource {
    Url(url::Url),
    Path(PathBuf),
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A contiguous buffered (or seekable) span of media time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct TimeRange {
    pub start: Duration,
    pub duration: Duration,
}

impl TimeRange {
    #[must_use]
    pub fn new(start: Duration, duration: Duration) -> Self {
        Self { start, duration }
    }

    #[must_use]
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    #[must_use]
    pub fn contains(&self, time: Duration) -> bool {
        time >= self.start && time < self.end()
    }
}
