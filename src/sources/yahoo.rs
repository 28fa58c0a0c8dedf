// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use tracing::debug;

use super::{build_url, emit_word_matches};
use crate::errors::SourceError;
use crate::extractor::SubdomainExtractor;
use crate::http_client::HttpClient;
use crate::limiter::SourceLimiter;
use crate::send::ResultSender;
use crate::source::Provider;
use crate::uniq::UniqFilter;

const LABEL: &str = "yahoo";
const DEFAULT_BASE_URL: &str = "https://search.yahoo.com";

/// Yahoo stops serving results well before this
const MAX_PAGES: usize = 750;
const RESULTS_PER_PAGE: usize = 10;

/// `site:` search on Yahoo, paging until a page brings nothing new.
pub struct Yahoo {
    http: HttpClient,
    limiter: SourceLimiter,
    base_url: String,
    max_pages: usize,
}

impl Yahoo {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            limiter: SourceLimiter::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.clamp(1, MAX_PAGES);
        self
    }
}

#[async_trait]
impl Provider for Yahoo {
    fn label(&self) -> &str {
        LABEL
    }

    fn limiter(&self) -> &SourceLimiter {
        &self.limiter
    }

    async fn query(&self, domain: &str, out: &ResultSender) -> Result<(), SourceError> {
        let extractor = SubdomainExtractor::new(domain)?;
        let site = format!("site:{}", extractor.domain());
        let mut seen = UniqFilter::new();

        for page in 1..=self.max_pages {
            if out.is_cancelled() {
                return Ok(());
            }

            let offset = (page * RESULTS_PER_PAGE).to_string();
            let url = build_url(
                &self.base_url,
                "/search",
                &[
                    ("p", site.as_str()),
                    ("b", offset.as_str()),
                    ("pz", "10"),
                    ("bct", "0"),
                    ("xargs", "0"),
                ],
            )?;

            let mut body = self.http.get_scanner(url.as_str(), out.cancellation()).await?;

            match emit_word_matches(&mut body, &extractor, &mut seen, out).await? {
                None => return Ok(()),
                Some(0) => {
                    debug!("[{}] Page {} brought nothing new, stopping", LABEL, page);
                    return Ok(());
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}
