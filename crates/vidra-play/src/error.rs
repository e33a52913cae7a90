use crate::types::CapabilityKey;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlayError {
    #[error("capability key {key} failed to load: {reason}")]
    CapabilityKey { key: CapabilityKey, reason: String },

    #[error("asset is not playable")]
    NotPlayable,

    #[error("asset has protected content")]
    ProtectedContent,

    #[error("item failed to load: {reason}")]
    ItemFailed { reason: String },

    #[error("{0}")]
    Internal(String),
}

pub type PlayResult<T> = Result<T, PlayError>;
