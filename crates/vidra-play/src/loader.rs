//! Asynchronous asset resolution.
//!
//! Each `load` call runs as its own cancellable task: the controller
//! hands it a generation number and a cancellation token, and the task
//! reports back to the session channel. A superseded load is cancelled
//! and its result, should it still arrive, is discarded by generation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    error::PlayError,
    session::SessionMsg,
    traits::asset::{Asset, REQUIRED_CAPABILITY_KEYS},
};

pub(crate) async fn resolve(
    asset: Arc<dyn Asset>,
    generation: u64,
    token: CancellationToken,
    tx: mpsc::UnboundedSender<SessionMsg>,
) {
    let outcome = tokio::select! {
        () = token.cancelled() => {
            debug!(generation, "asset load cancelled");
            return;
        }
        outcome = validate(&*asset) => outcome,
    };

    let msg = match outcome {
        Ok(()) => SessionMsg::AssetReady { asset, generation },
        Err(err) => {
            warn!(generation, error = %err, "asset load failed");
            SessionMsg::LoadFailed {
                message: err.to_string(),
                generation,
            }
        }
    };
    let _ = tx.send(msg);
}

/// Resolve the required capability keys, then gate on what they report.
async fn validate(asset: &dyn Asset) -> Result<(), PlayError> {
    asset.load_capability_keys(REQUIRED_CAPABILITY_KEYS).await?;

    if !asset.is_playable() {
        return Err(PlayError::NotPlayable);
    }
    if asset.has_protected_content() {
        return Err(PlayError::ProtectedContent);
    }
    Ok(())
}
