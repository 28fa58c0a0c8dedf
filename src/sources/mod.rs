// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Passive Subdomain Providers
 * Certificate transparency, passive DNS, threat intel and search engine sources
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod crtsh;
pub mod hackertarget;
pub mod ptrarchive;
pub mod threatcrowd;
pub mod threatminer;
pub mod yahoo;

pub use crtsh::CrtSh;
pub use hackertarget::HackerTarget;
pub use ptrarchive::PtrArchive;
pub use threatcrowd::ThreatCrowd;
pub use threatminer::Threatminer;
pub use yahoo::Yahoo;

use std::sync::Arc;
use tokio::io::AsyncBufRead;
use url::Url;

use crate::config::EnumeratorConfig;
use crate::errors::SourceError;
use crate::extractor::SubdomainExtractor;
use crate::http_client::{HttpClient, ResponseScanner};
use crate::send::ResultSender;
use crate::source::Source;
use crate::uniq::UniqFilter;

/// The standard provider set. Plain-HTTP providers are added only when
/// `config.insecure` is set.
pub fn default_sources(http: &HttpClient, config: &EnumeratorConfig) -> Vec<Arc<dyn Source>> {
    let mut hackertarget = HackerTarget::new(http.clone());
    if let Some(key) = &config.hackertarget_api_key {
        hackertarget = hackertarget.with_api_key(key.clone());
    }

    let mut sources: Vec<Arc<dyn Source>> = vec![
        Arc::new(CrtSh::new(http.clone())),
        Arc::new(hackertarget),
        Arc::new(ThreatCrowd::new(http.clone())),
        Arc::new(Threatminer::new(http.clone())),
        Arc::new(Yahoo::new(http.clone())),
    ];

    if config.insecure {
        sources.push(Arc::new(PtrArchive::new(http.clone())));
    }

    sources
}

/// `base` + `path` with url-encoded query parameters.
pub(crate) fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, SourceError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse_with_params(&raw, params)
        .map_err(|e| SourceError::Parse(format!("invalid URL {}: {}", raw, e)))
}

/// Emit every match of `extractor` in the remaining words of `body`,
/// skipping names `seen` already holds.
///
/// Returns the number of new names, or `None` once the consumer is gone.
pub(crate) async fn emit_word_matches<R>(
    body: &mut ResponseScanner<R>,
    extractor: &SubdomainExtractor,
    seen: &mut UniqFilter,
    out: &ResultSender,
) -> Result<Option<usize>, SourceError>
where
    R: AsyncBufRead + Unpin,
{
    let mut found = 0;

    while let Some(word) = body.next_word().await? {
        for name in extractor.find_all(&word) {
            if !seen.first_seen(&name) {
                continue;
            }
            if !out.success(name).await {
                return Ok(None);
            }
            found += 1;
        }
    }

    Ok(Some(found))
}
