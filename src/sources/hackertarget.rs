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

const LABEL: &str = "hackertarget";
const DEFAULT_BASE_URL: &str = "https://api.hackertarget.com";

/// Sent with a 200 status once the free quota is used up
const QUOTA_EXCEEDED: &str = "API count exceeded";

/// HackerTarget host search: one `host,ip` pair per line.
pub struct HackerTarget {
    http: HttpClient,
    limiter: SourceLimiter,
    base_url: String,
    api_key: Option<String>,
}

impl HackerTarget {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            limiter: SourceLimiter::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Provider for HackerTarget {
    fn label(&self) -> &str {
        LABEL
    }

    fn limiter(&self) -> &SourceLimiter {
        &self.limiter
    }

    async fn query(&self, domain: &str, out: &ResultSender) -> Result<(), SourceError> {
        let extractor = SingleSubdomainExtractor::new(domain)?;

        let mut params = vec![("q", domain)];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.as_str()));
        }
        let url = build_url(&self.base_url, "/hostsearch/", &params)?;

        let mut body = self.http.get_scanner(url.as_str(), out.cancellation()).await?;

        while let Some(line) = body.next_line().await? {
            if line.contains(QUOTA_EXCEEDED) {
                return Err(SourceError::RateLimited(line));
            }

            let host = line.split(',').next().unwrap_or_default();
            if let Some(name) = extractor.extract(host) {
                if !out.success(name).await {
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}
