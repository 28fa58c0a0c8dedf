// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Per-Source Concurrency Limiter
 * Weighted admission gate owned by each source instance
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::SourceError;

/// Default number of in-flight queries per source instance.
pub const DEFAULT_SOURCE_WEIGHT: usize = 1;

/// Limits how many queries run against one upstream provider at a time.
///
/// The semaphore is created on first use. Recursive enumeration may ask
/// the same source about many domains concurrently; with the default
/// weight those queries run one after another.
#[derive(Debug)]
pub struct SourceLimiter {
    weight: usize,
    slots: OnceCell<Arc<Semaphore>>,
}

impl SourceLimiter {
    pub fn new() -> Self {
        Self::with_weight(DEFAULT_SOURCE_WEIGHT)
    }

    pub fn with_weight(weight: usize) -> Self {
        Self {
            weight: weight.max(1),
            slots: OnceCell::new(),
        }
    }

    pub fn weight(&self) -> usize {
        self.weight
    }

    fn slots(&self) -> &Arc<Semaphore> {
        self.slots.get_or_init(|| Arc::new(Semaphore::new(self.weight)))
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.slots().available_permits()
    }

    /// Wait for a slot, giving up with [`SourceError::Cancelled`] if
    /// `cancel` fires first. The slot is released when the permit drops.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<OwnedSemaphorePermit, SourceError> {
        let slots = Arc::clone(self.slots());

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Slot acquisition cancelled");
                Err(SourceError::Cancelled)
            }
            permit = slots.acquire_owned() => permit.map_err(|_| SourceError::Cancelled),
        }
    }
}

impl Default for SourceLimiter {
    fn default() -> Self {
        Self::new()
    }
}
