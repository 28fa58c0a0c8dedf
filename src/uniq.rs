// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::result::SubdomainResult;
use crate::send::{result_channel, send_with_cancel, ResultStream};

/// First-seen filter over successful values. Failures always pass.
#[derive(Debug, Default)]
pub struct UniqFilter {
    seen: HashSet<String>,
}

impl UniqFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `result` should be forwarded.
    pub fn admit(&mut self, result: &SubdomainResult) -> bool {
        if !result.is_success() {
            return true;
        }
        match result.success_value() {
            Some(value) => self.seen.insert(value),
            None => true,
        }
    }

    /// Records `value`, returning true the first time it is seen.
    pub fn first_seen(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Drop successful results whose value already went by, keeping the
/// first occurrence and the input order.
///
/// The filter runs as its own task and stops as soon as the input closes,
/// the returned stream is dropped or `cancel` fires.
pub fn uniq_results(cancel: &CancellationToken, mut input: ResultStream) -> ResultStream {
    let (tx, rx) = result_channel();
    let cancel = cancel.clone();

    tokio::spawn(async move {
        let mut filter = UniqFilter::new();
        let mut dropped = 0usize;

        while let Some(result) = input.recv().await {
            if !filter.admit(&result) {
                dropped += 1;
                continue;
            }
            if !send_with_cancel(&cancel, &tx, result).await {
                break;
            }
        }

        debug!("Uniq filter finished: {} unique, {} duplicates dropped", filter.len(), dropped);
    });

    rx
}
