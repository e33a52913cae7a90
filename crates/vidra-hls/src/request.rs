#![forbid(unsafe_code)]

//! Loading requests and their single-shot responders.

use bytes::Bytes;
use tokio::sync::oneshot;
use tracing::warn;
use url::Url;

use crate::error::{InterceptError, InterceptResult};

/// One intercepted resource load issued by the item layer.
///
/// Carries the requested URL and a [`Responder`] that must be completed
/// exactly once with either the resource bytes or an error.
pub struct LoadingRequest {
    pub url: Url,
    pub responder: Responder,
}

impl LoadingRequest {
    /// Pair a request with the receiver its completion arrives on.
    #[must_use]
    pub fn new(url: Url) -> (Self, oneshot::Receiver<InterceptResult<Bytes>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                url,
                responder: Responder { tx: Some(tx) },
            },
            rx,
        )
    }
}

/// Single-shot completion channel for a [`LoadingRequest`].
///
/// `fulfill` and `fail` consume the responder, so a request cannot be
/// answered twice. Dropping an unanswered responder reports
/// [`InterceptError::Abandoned`] to the requester instead of leaving it
/// hanging.
pub struct Responder {
    tx: Option<oneshot::Sender<InterceptResult<Bytes>>>,
}

impl Responder {
    pub fn fulfill(mut self, bytes: Bytes) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Ok(bytes));
        }
    }

    pub fn fail(mut self, error: InterceptError) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(error));
        }
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            warn!("loading request dropped without a response");
            let _ = tx.send(Err(InterceptError::Abandoned));
        }
    }
}

/// What the interceptor did with a request.
pub enum LoadOutcome {
    /// The request used the private scheme and was answered through its
    /// responder.
    Handled,
    /// Foreign scheme: the request is returned untouched for the caller
    /// to route elsewhere.
    Declined(LoadingRequest),
}
