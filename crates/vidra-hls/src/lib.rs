#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc)]

//! Custom-scheme resource interception and HLS manifest rewriting.
//!
//! The item layer issues loading requests for URLs carrying a private
//! scheme token. [`ResourceLoaderInterceptor`] answers them: it fetches
//! the real resource over the transport scheme, rewrites manifest
//! bodies so sub-resources route where they belong, and hands key
//! resources to a pluggable [`KeyHandler`].

mod error;
mod interceptor;
mod keys;
mod options;
mod request;
mod rewrite;

pub use error::{InterceptError, InterceptResult};
pub use interceptor::ResourceLoaderInterceptor;
pub use keys::{KeyContext, KeyHandler, UnimplementedKeyHandler};
pub use options::InterceptorOptions;
pub use request::{LoadOutcome, LoadingRequest, Responder};
pub use rewrite::{
    is_variant_playlist, rewrite_manifest, rewrite_media_playlist, rewrite_variant_playlist,
    swap_scheme,
};
