#![forbid(unsafe_code)]

//! Resource-loader interception.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace, warn};
use vidra_net::Net;

use crate::{
    error::{InterceptError, InterceptResult},
    keys::{KeyContext, KeyHandler, UnimplementedKeyHandler},
    options::InterceptorOptions,
    request::{LoadOutcome, LoadingRequest},
    rewrite::{rewrite_manifest, swap_scheme},
};

/// Intercepts private-scheme loading requests, fetches the real resource
/// over the network, rewrites manifest bodies, and answers through the
/// request's responder.
///
/// Rewrite state (base URL, scheme token, response bytes) lives only on
/// the stack of one [`intercept`](Self::intercept) call; nothing is
/// retained between requests.
pub struct ResourceLoaderInterceptor<N> {
    net: N,
    options: InterceptorOptions,
    key_handler: Arc<dyn KeyHandler>,
}

impl<N: Net> ResourceLoaderInterceptor<N> {
    pub fn new(net: N, options: InterceptorOptions) -> Self {
        Self {
            net,
            options,
            key_handler: Arc::new(UnimplementedKeyHandler),
        }
    }

    /// Replace the default key handler.
    #[must_use]
    pub fn with_key_handler(mut self, handler: Arc<dyn KeyHandler>) -> Self {
        self.key_handler = handler;
        self
    }

    /// Handle one loading request.
    ///
    /// Requests whose scheme is not the configured private token are
    /// declined and handed back untouched. Everything else is answered
    /// through the responder, success or failure.
    pub async fn intercept(&self, request: LoadingRequest) -> LoadOutcome {
        if request.url.scheme() != self.options.scheme {
            trace!(url = %request.url, "declining foreign-scheme request");
            return LoadOutcome::Declined(request);
        }

        let LoadingRequest { url, responder } = request;
        match self.load(&url).await {
            Ok(bytes) => responder.fulfill(bytes),
            Err(err) => {
                warn!(%url, error = %err, "intercepted load failed");
                responder.fail(err);
            }
        }
        LoadOutcome::Handled
    }

    async fn load(&self, url: &url::Url) -> InterceptResult<Bytes> {
        let transport_url = swap_scheme(url, &self.options.transport_scheme)?;

        if self.is_key_resource(url) {
            debug!(%url, "routing key resource to key handler");
            return self
                .key_handler
                .load_key(KeyContext {
                    url: url.clone(),
                    transport_url,
                })
                .await;
        }

        debug!(%url, %transport_url, "fetching manifest");
        let raw = self.net.get_bytes(transport_url, None).await?;
        let body = std::str::from_utf8(&raw).map_err(|_| InterceptError::ManifestEncoding)?;
        let rewritten = rewrite_manifest(body, url, &self.options)?;
        Ok(Bytes::from(rewritten))
    }

    fn is_key_resource(&self, url: &url::Url) -> bool {
        std::path::Path::new(url.path())
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.options.key_extension))
    }
}
