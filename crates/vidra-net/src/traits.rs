use bytes::Bytes;
use url::Url;

use crate::{error::NetError, types::Headers};

/// Out-of-band byte fetch used by the resource-loader interceptor.
///
/// Implementations must be safe to call from any task; responses are
/// marshalled back to the session context by the caller.
#[expect(async_fn_in_trait)]
#[cfg_attr(any(test, feature = "test-utils"), unimock::unimock(api = NetMock))]
pub trait Net: Send + Sync {
    /// Get all bytes from a URL.
    async fn get_bytes(&self, url: Url, headers: Option<Headers>) -> Result<Bytes, NetError>;
}
