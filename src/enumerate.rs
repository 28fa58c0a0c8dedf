// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Subdomain Enumeration Orchestrator
 * Fan-out to every source, fan-in into one stream, optional recursion
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::result::SubdomainResult;
use crate::send::{result_channel, send_with_cancel, ResultStream, RESULT_CHANNEL_CAPACITY};
use crate::source::Source;
use crate::uniq::uniq_results;

/// Configuration for one enumeration call
#[derive(Clone, Default)]
pub struct EnumerationOptions {
    /// Sources queried for every pending domain, in order
    pub sources: Vec<Arc<dyn Source>>,

    /// Feed newly discovered names back in as new queries
    pub recursive: bool,

    /// Drop repeated successful values from the output
    pub uniq: bool,

    /// Cap on fan-out rounds; `None` runs until a round finds nothing new
    pub max_depth: Option<usize>,
}

impl EnumerationOptions {
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn uniq(mut self, uniq: bool) -> Self {
        self.uniq = uniq;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

impl fmt::Debug for EnumerationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("EnumerationOptions")
            .field("sources", &names)
            .field("recursive", &self.recursive)
            .field("uniq", &self.uniq)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Enumerate subdomains of `domain` with every configured source.
///
/// Returns immediately; results from all sources (and, when recursive,
/// from all rounds) arrive interleaved on the returned stream. The stream
/// closes once every query has finished and nothing new is pending, or
/// promptly after `cancel` fires. Dropping the stream cancels the
/// remaining work without touching `cancel` itself.
pub fn enumerate_subdomains(
    cancel: &CancellationToken,
    domain: &str,
    options: &EnumerationOptions,
) -> ResultStream {
    let (tx, rx) = result_channel();
    let cancel = cancel.child_token();

    let enumeration = Enumeration {
        cancel: cancel.clone(),
        options: options.clone(),
        seen: HashSet::new(),
    };
    tokio::spawn(enumeration.run(domain.to_string(), tx));

    if options.uniq {
        uniq_results(&cancel, rx)
    } else {
        rx
    }
}

/// Tags a result with the domain whose query produced it.
type Tagged = (Arc<str>, SubdomainResult);

/// State of one enumeration call, owned by its merging task.
struct Enumeration {
    cancel: CancellationToken,
    options: EnumerationOptions,
    /// Every distinct name seen so far; only grows
    seen: HashSet<String>,
}

impl Enumeration {
    async fn run(mut self, seed: String, out: mpsc::Sender<SubdomainResult>) {
        let seed = normalize(&seed);
        info!(
            "Starting subdomain enumeration for {} ({} sources, recursive={})",
            seed,
            self.options.sources.len(),
            self.options.recursive
        );

        self.seen.insert(seed.clone());
        let mut pending = vec![seed.clone()];
        let mut rounds = 0usize;

        while !pending.is_empty() && !self.cancel.is_cancelled() {
            if self.options.max_depth.is_some_and(|max| rounds >= max) {
                debug!("Depth limit reached with {} domain(s) still pending", pending.len());
                break;
            }

            rounds += 1;
            let batch = std::mem::take(&mut pending);
            debug!("Round {}: {} domain(s)", rounds, batch.len());

            match self.round(&batch, &out).await {
                Some(discovered) => pending = discovered,
                None => break,
            }
        }

        info!(
            "[SUCCESS] Enumeration of {} finished after {} round(s): {} distinct names{}",
            seed,
            rounds,
            self.seen.len() - 1,
            if self.cancel.is_cancelled() { " (cancelled)" } else { "" }
        );
    }

    /// Query every (domain, source) pair of `batch` and merge the results
    /// into `out`. Returns the names to query next, or `None` if the
    /// enumeration has to stop.
    async fn round(&mut self, batch: &[String], out: &mpsc::Sender<SubdomainResult>) -> Option<Vec<String>> {
        let (merge_tx, mut merge_rx) = mpsc::channel::<Tagged>(RESULT_CHANNEL_CAPACITY);
        let mut forwarders = JoinSet::new();

        for domain in batch {
            let parent: Arc<str> = Arc::from(domain.as_str());
            for source in &self.options.sources {
                let stream = Arc::clone(source).process_domain(self.cancel.clone(), domain.clone());
                forwarders.spawn(forward(
                    self.cancel.clone(),
                    Arc::clone(&parent),
                    stream,
                    merge_tx.clone(),
                ));
            }
        }
        drop(merge_tx);

        let mut discovered = Vec::new();
        let mut delivered = true;

        while let Some((parent, result)) = merge_rx.recv().await {
            if let Some(name) = self.record(&result) {
                if self.options.recursive && name != *parent {
                    discovered.push(name);
                }
            }

            if !send_with_cancel(&self.cancel, out, result).await {
                // cancelled, or nobody reads the output any more
                self.cancel.cancel();
                delivered = false;
                break;
            }
        }

        drop(merge_rx);
        while forwarders.join_next().await.is_some() {}

        if !delivered || self.cancel.is_cancelled() {
            return None;
        }

        debug!("Round finished: {} new name(s) to query", discovered.len());
        Some(discovered)
    }

    /// Add a successful value to the seen set, returning it if it is new.
    fn record(&mut self, result: &SubdomainResult) -> Option<String> {
        if !result.is_success() {
            return None;
        }
        let name = normalize(&result.success_value()?);
        if self.seen.insert(name.clone()) {
            Some(name)
        } else {
            None
        }
    }
}

/// Pump one source stream into the round's merge channel until it closes
/// or the enumeration is cancelled.
async fn forward(
    cancel: CancellationToken,
    parent: Arc<str>,
    mut stream: ResultStream,
    merge: mpsc::Sender<Tagged>,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = stream.recv() => next,
        };

        let Some(result) = next else { break };
        if !send_with_cancel(&cancel, &merge, (Arc::clone(&parent), result)).await {
            break;
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
