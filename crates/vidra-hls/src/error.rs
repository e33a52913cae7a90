#![forbid(unsafe_code)]

use thiserror::Error;

/// Resource interception errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InterceptError {
    #[error("Network error: {0}")]
    Net(#[from] vidra_net::NetError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Manifest is not valid UTF-8")]
    ManifestEncoding,

    #[error("Key resource handling is not implemented")]
    KeyHandlingUnimplemented,

    #[error("Loading request was abandoned before completion")]
    Abandoned,
}

pub type InterceptResult<T> = Result<T, InterceptError>;
