#![forbid(unsafe_code)]

//! Encryption-key resource handling.
//!
//! Key fetches arrive through the same private-scheme interception path
//! as manifests, but their final behavior (decryption, token exchange,
//! persistent-key sessions) is product-specific, so it is a pluggable
//! hook. The default handler rejects every key request.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::{InterceptError, InterceptResult};

/// Per-request context handed to a [`KeyHandler`].
#[derive(Clone, Debug)]
pub struct KeyContext {
    /// Private-scheme URL the item layer requested.
    pub url: Url,
    /// Same resource with the real transport scheme.
    pub transport_url: Url,
}

/// Hook invoked for intercepted key-resource requests.
#[async_trait]
pub trait KeyHandler: Send + Sync + 'static {
    async fn load_key(&self, ctx: KeyContext) -> InterceptResult<Bytes>;
}

/// Default handler: fails every key request with
/// [`InterceptError::KeyHandlingUnimplemented`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedKeyHandler;

#[async_trait]
impl KeyHandler for UnimplementedKeyHandler {
    async fn load_key(&self, ctx: KeyContext) -> InterceptResult<Bytes> {
        let _ = ctx;
        Err(InterceptError::KeyHandlingUnimplemented)
    }
}
