// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Enumeration Orchestrator Tests
 * Fan-in, deduplication, recursion, depth limits and cancellation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

mod common;

use common::{collect, eventually, successes, EndlessSource, ScriptedSource};
use lonkero_subenum::{enumerate_subdomains, EnumerationOptions, Source, SourceError, SubdomainResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn options(sources: Vec<Arc<dyn Source>>) -> EnumerationOptions {
    EnumerationOptions::new(sources)
}

fn ok(name: &str) -> SubdomainResult {
    SubdomainResult::success("mock", name)
}

#[tokio::test]
async fn test_uniq_drops_duplicates_and_keeps_failures() {
    let source = Arc::new(ScriptedSource::new("mock").on(
        "example.com",
        vec![
            ok("a.example.com"),
            ok("a.example.com"),
            SubdomainResult::failure("mock", "timeout"),
        ],
    ));

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(
        &cancel,
        "example.com",
        &options(vec![source]).uniq(true),
    ))
    .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label(), "mock");
    assert_eq!(results[0].success_value().as_deref(), Some("a.example.com"));
    assert_eq!(results[1].failure_error(), Some(SourceError::Other("timeout".into())));
}

#[tokio::test]
async fn test_without_uniq_duplicates_are_surfaced() {
    let source = Arc::new(
        ScriptedSource::new("mock").on("example.com", vec![ok("a.example.com"), ok("a.example.com")]),
    );

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(&cancel, "example.com", &options(vec![source]))).await;

    assert_eq!(successes(&results), vec!["a.example.com", "a.example.com"]);
}

#[tokio::test]
async fn test_recursive_runs_two_rounds() {
    let source = Arc::new(
        ScriptedSource::new("mock")
            .on("root.com", vec![ok("leaf.root.com")])
            .on("leaf.root.com", vec![ok("leaf.root.com")]),
    );

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(
        &cancel,
        "root.com",
        &options(vec![source.clone()]).recursive(true),
    ))
    .await;

    assert_eq!(source.queried(), vec!["root.com", "leaf.root.com"]);
    assert_eq!(successes(&results), vec!["leaf.root.com", "leaf.root.com"]);
}

#[tokio::test]
async fn test_non_recursive_queries_seed_only() {
    let source = Arc::new(ScriptedSource::new("mock").on("root.com", vec![ok("leaf.root.com")]));

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(&cancel, "root.com", &options(vec![source.clone()]))).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_recursion_terminates_on_fixed_set() {
    let source = Arc::new(ScriptedSource::new("mock").always(&["a.fixed.com", "b.fixed.com"]));

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(
        &cancel,
        "seed.com",
        &options(vec![source.clone()]).recursive(true),
    ))
    .await;

    let mut queried = source.queried();
    queried.sort();
    assert_eq!(queried, vec!["a.fixed.com", "b.fixed.com", "seed.com"]);
    assert_eq!(results.len(), 6);
}

#[tokio::test]
async fn test_seed_is_never_requeried() {
    let source = Arc::new(ScriptedSource::new("mock").on("root.com", vec![ok("ROOT.com."), ok("root.com")]));

    let cancel = CancellationToken::new();
    collect(enumerate_subdomains(
        &cancel,
        "root.com",
        &options(vec![source.clone()]).recursive(true),
    ))
    .await;

    assert_eq!(source.queried(), vec!["root.com"]);
}

#[tokio::test]
async fn test_seen_set_ignores_case() {
    let source = Arc::new(
        ScriptedSource::new("mock").on("root.com", vec![ok("WWW.Root.com"), ok("www.root.com")]),
    );

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(
        &cancel,
        "Root.COM",
        &options(vec![source.clone()]).recursive(true),
    ))
    .await;

    assert_eq!(source.queried(), vec!["root.com", "www.root.com"]);
    // values are reported as the source produced them
    assert_eq!(successes(&results), vec!["WWW.Root.com", "www.root.com"]);
}

#[tokio::test]
async fn test_max_depth_limits_rounds() {
    let source = Arc::new(
        ScriptedSource::new("mock")
            .on("root.com", vec![ok("l1.root.com")])
            .on("l1.root.com", vec![ok("l2.l1.root.com")])
            .on("l2.l1.root.com", vec![ok("l3.l2.l1.root.com")]),
    );

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(
        &cancel,
        "root.com",
        &options(vec![source.clone()]).recursive(true).max_depth(2),
    ))
    .await;

    assert_eq!(source.queried(), vec!["root.com", "l1.root.com"]);
    assert_eq!(successes(&results), vec!["l1.root.com", "l2.l1.root.com"]);
}

#[tokio::test]
async fn test_every_source_is_queried() {
    let crtsh = Arc::new(ScriptedSource::new("crtsh").always(&["a.example.com"]));
    let yahoo = Arc::new(ScriptedSource::new("yahoo").always(&["b.example.com"]));

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(
        &cancel,
        "example.com",
        &options(vec![crtsh.clone(), yahoo.clone()]),
    ))
    .await;

    assert_eq!(crtsh.queried(), vec!["example.com"]);
    assert_eq!(yahoo.queried(), vec!["example.com"]);

    let mut labels: Vec<String> = results.iter().map(|r| r.label()).collect();
    labels.sort();
    assert_eq!(labels, vec!["crtsh", "yahoo"]);
}

#[tokio::test]
async fn test_failing_source_does_not_stop_others() {
    let broken = Arc::new(ScriptedSource::new("broken").on(
        "example.com",
        vec![SubdomainResult::failure("broken", SourceError::HttpStatus {
            status: 500,
            reason: "Internal Server Error".into(),
        })],
    ));
    let healthy = Arc::new(ScriptedSource::new("healthy").always(&["a.example.com", "b.example.com"]));

    let cancel = CancellationToken::new();
    let results = collect(enumerate_subdomains(&cancel, "example.com", &options(vec![broken, healthy]))).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_failure()).count(), 1);

    let mut names = successes(&results);
    names.sort();
    assert_eq!(names, vec!["a.example.com", "b.example.com"]);
}

#[tokio::test]
async fn test_cancel_closes_stream() {
    let source = Arc::new(EndlessSource::new());
    let cancel = CancellationToken::new();
    let mut stream = enumerate_subdomains(&cancel, "example.com", &options(vec![source.clone()]));

    for _ in 0..5 {
        assert!(stream.recv().await.is_some());
    }
    cancel.cancel();

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while stream.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok(), "stream must close after cancellation");
    assert!(eventually(Duration::from_secs(5), || source.stopped()).await);
}

#[tokio::test]
async fn test_cancel_before_start_yields_nothing() {
    let source = Arc::new(ScriptedSource::new("mock").always(&["a.example.com"]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let results = collect(enumerate_subdomains(&cancel, "example.com", &options(vec![source]))).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_dropping_stream_stops_producers() {
    let source = Arc::new(EndlessSource::new());
    let cancel = CancellationToken::new();
    let mut stream = enumerate_subdomains(&cancel, "example.com", &options(vec![source.clone()]));

    for _ in 0..3 {
        assert!(stream.recv().await.is_some());
    }
    drop(stream);

    assert!(eventually(Duration::from_secs(5), || source.stopped()).await);
    assert!(!cancel.is_cancelled());

    let emitted = source.emitted();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.emitted(), emitted);
}

#[tokio::test]
async fn test_uniq_with_cancellation_closes() {
    let source = Arc::new(EndlessSource::new());
    let cancel = CancellationToken::new();
    let mut stream = enumerate_subdomains(&cancel, "example.com", &options(vec![source.clone()]).uniq(true));

    assert!(stream.recv().await.is_some());
    cancel.cancel();

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while stream.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok());
}
