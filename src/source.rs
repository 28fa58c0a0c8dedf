// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Source Contract
 * The single capability every subdomain provider implements
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::SourceError;
use crate::limiter::SourceLimiter;
use crate::send::{result_channel, ResultSender, ResultStream};

/// A provider of subdomains for a given domain.
///
/// `process_domain` returns at once with a live stream; the work runs in
/// the background and results are pushed as they are found. The stream
/// closes when the query is exhausted, after an unrecoverable failure, or
/// once `cancel` fires. Implementations must check `cancel` on every loop
/// iteration and deliver results only through
/// [`send_with_cancel`](crate::send::send_with_cancel).
pub trait Source: Send + Sync + 'static {
    /// Label stamped on every result
    fn name(&self) -> &str;

    fn process_domain(self: Arc<Self>, cancel: CancellationToken, domain: String) -> ResultStream;
}

/// Query logic of an upstream service, without the streaming plumbing.
///
/// Every `Provider` is a [`Source`]: the blanket implementation opens the
/// result channel, spawns the query task, holds a slot of the provider's
/// limiter for the whole query and turns a returned error into one failure
/// result.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    fn label(&self) -> &str;

    fn limiter(&self) -> &SourceLimiter;

    /// Emit discoveries for `domain` through `out`. Return early, with
    /// `Ok(())`, as soon as a send reports the consumer is gone.
    async fn query(&self, domain: &str, out: &ResultSender) -> Result<(), SourceError>;
}

impl<P: Provider> Source for P {
    fn name(&self) -> &str {
        self.label()
    }

    fn process_domain(self: Arc<Self>, cancel: CancellationToken, domain: String) -> ResultStream {
        let (tx, rx) = result_channel();

        tokio::spawn(async move {
            let out = ResultSender::new(self.label(), tx, cancel.clone());

            let _slot = match self.limiter().acquire(&cancel).await {
                Ok(slot) => slot,
                Err(err) => {
                    out.failure(err).await;
                    return;
                }
            };

            debug!("[{}] Querying {}", self.label(), domain);

            if let Err(err) = self.query(&domain, &out).await {
                if !err.is_cancellation() {
                    warn!("[{}] Query for {} failed: {}", self.label(), domain, err);
                }
                out.failure(err).await;
            }
        });

        rx
    }
}
