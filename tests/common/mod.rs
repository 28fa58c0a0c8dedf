// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scripted sources and helpers shared by the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use lonkero_subenum::{result_channel, send_with_cancel, ResultStream, Source, SubdomainResult};

/// Replays a fixed list of results per queried domain.
pub struct ScriptedSource {
    name: String,
    script: HashMap<String, Vec<SubdomainResult>>,
    fallback: Vec<String>,
    queried: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: HashMap::new(),
            fallback: Vec::new(),
            queried: Mutex::new(Vec::new()),
        }
    }

    /// Results to emit when `domain` is queried, in order
    pub fn on(mut self, domain: &str, results: Vec<SubdomainResult>) -> Self {
        self.script.insert(domain.to_string(), results);
        self
    }

    /// Success values emitted for every domain without a script
    pub fn always(mut self, names: &[&str]) -> Self {
        self.fallback = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.queried.lock().len()
    }
}

impl Source for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_domain(self: Arc<Self>, cancel: CancellationToken, domain: String) -> ResultStream {
        let (tx, rx) = result_channel();
        self.queried.lock().push(domain.clone());

        tokio::spawn(async move {
            let results = match self.script.get(&domain) {
                Some(results) => results.clone(),
                None => self
                    .fallback
                    .iter()
                    .map(|name| SubdomainResult::success(self.name.as_str(), name.as_str()))
                    .collect(),
            };

            for result in results {
                if cancel.is_cancelled() || !send_with_cancel(&cancel, &tx, result).await {
                    return;
                }
            }
        });

        rx
    }
}

/// Emits `n<i>.<domain>` forever until cancelled or the stream is dropped.
pub struct EndlessSource {
    emitted: AtomicUsize,
    stopped: AtomicBool,
}

impl EndlessSource {
    pub fn new() -> Self {
        Self {
            emitted: AtomicUsize::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Source for EndlessSource {
    fn name(&self) -> &str {
        "endless"
    }

    fn process_domain(self: Arc<Self>, cancel: CancellationToken, domain: String) -> ResultStream {
        let (tx, rx) = result_channel();

        tokio::spawn(async move {
            let mut i = 0usize;
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                let result = SubdomainResult::success("endless", format!("n{}.{}", i, domain));
                if !send_with_cancel(&cancel, &tx, result).await {
                    break;
                }
                self.emitted.fetch_add(1, Ordering::SeqCst);
                i += 1;
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            self.stopped.store(true, Ordering::SeqCst);
        });

        rx
    }
}

/// Collect a stream to completion, failing the test if it does not close.
pub async fn collect(mut stream: ResultStream) -> Vec<SubdomainResult> {
    tokio::time::timeout(Duration::from_secs(10), async move {
        let mut results = Vec::new();
        while let Some(result) = stream.recv().await {
            results.push(result);
        }
        results
    })
    .await
    .expect("result stream did not close")
}

pub fn successes(results: &[SubdomainResult]) -> Vec<String> {
    results.iter().filter_map(|r| r.success_value()).collect()
}

/// Poll `condition` until it holds or `within` elapses.
pub async fn eventually(within: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
