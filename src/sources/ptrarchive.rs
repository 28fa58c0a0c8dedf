// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;

use super::build_url;
use crate::errors::SourceError;
use crate::extractor::SingleSubdomainExtractor;
use crate::http_client::HttpClient;
use crate::limiter::SourceLimiter;
use crate::send::ResultSender;
use crate::source::Provider;

const LABEL: &str = "ptrarchive";

/// Plain HTTP only, hence part of the insecure set
const DEFAULT_BASE_URL: &str = "http://ptrarchive.com";

/// PTRarchive reverse DNS history, scanned word by word.
pub struct PtrArchive {
    http: HttpClient,
    limiter: SourceLimiter,
    base_url: String,
}

impl PtrArchive {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            limiter: SourceLimiter::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Provider for PtrArchive {
    fn label(&self) -> &str {
        LABEL
    }

    fn limiter(&self) -> &SourceLimiter {
        &self.limiter
    }

    async fn query(&self, domain: &str, out: &ResultSender) -> Result<(), SourceError> {
        let extractor = SingleSubdomainExtractor::new(domain)?;
        let url = build_url(
            &self.base_url,
            "/tools/search3.htm",
            &[("label", domain), ("date", "ALL")],
        )?;

        let mut body = self.http.get_scanner(url.as_str(), out.cancellation()).await?;

        while let Some(word) = body.next_word().await? {
            if let Some(name) = extractor.extract(&word) {
                if !out.success(name).await {
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}
