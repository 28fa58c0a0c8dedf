// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Cancellable Result Delivery
 * Every result a source emits goes through send_with_cancel
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::errors::SourceError;
use crate::result::SubdomainResult;

/// Buffer between a producer and its consumer. Small on purpose: a slow
/// consumer throttles producers instead of letting results pile up.
pub const RESULT_CHANNEL_CAPACITY: usize = 16;

/// Lazy, single-pass stream of results. Closes when every sender is gone.
pub type ResultStream = mpsc::Receiver<SubdomainResult>;

pub fn result_channel() -> (mpsc::Sender<SubdomainResult>, ResultStream) {
    mpsc::channel(RESULT_CHANNEL_CAPACITY)
}

/// Deliver `item` unless `cancel` fires first.
///
/// Returns `false` when the token is cancelled or the receiver is gone;
/// the caller must stop producing.
pub async fn send_with_cancel<T>(cancel: &CancellationToken, tx: &mpsc::Sender<T>, item: T) -> bool {
    if cancel.is_cancelled() {
        return false;
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

/// Output handle given to a source body: labels every result and routes
/// it through [`send_with_cancel`].
#[derive(Debug, Clone)]
pub struct ResultSender {
    label: String,
    tx: mpsc::Sender<SubdomainResult>,
    cancel: CancellationToken,
}

impl ResultSender {
    pub fn new(
        label: impl Into<String>,
        tx: mpsc::Sender<SubdomainResult>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            label: label.into(),
            tx,
            cancel,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// True once nobody will take further results.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    pub async fn send(&self, result: SubdomainResult) -> bool {
        send_with_cancel(&self.cancel, &self.tx, result).await
    }

    pub async fn success(&self, value: impl Into<String>) -> bool {
        self.send(SubdomainResult::success(self.label.as_str(), value)).await
    }

    pub async fn failure(&self, err: impl Into<SourceError>) -> bool {
        self.send(SubdomainResult::failure(self.label.as_str(), err)).await
    }
}
