// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;

use super::{build_url, emit_word_matches};
use crate::errors::SourceError;
use crate::extractor::SubdomainExtractor;
use crate::http_client::HttpClient;
use crate::limiter::SourceLimiter;
use crate::send::ResultSender;
use crate::source::Provider;
use crate::uniq::UniqFilter;

const LABEL: &str = "threatminer";
const DEFAULT_BASE_URL: &str = "https://www.threatminer.org";

pub struct Threatminer {
    http: HttpClient,
    limiter: SourceLimiter,
    base_url: String,
}

impl Threatminer {
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
impl Provider for Threatminer {
    fn label(&self) -> &str {
        LABEL
    }

    fn limiter(&self) -> &SourceLimiter {
        &self.limiter
    }

    async fn query(&self, domain: &str, out: &ResultSender) -> Result<(), SourceError> {
        let extractor = SubdomainExtractor::new(domain)?;
        let url = build_url(
            &self.base_url,
            "/getData.php",
            &[
                ("e", "subdomains_container"),
                ("q", domain),
                ("t", "0"),
                ("rt", "10"),
                ("p", "1"),
            ],
        )?;

        let mut body = self.http.get_scanner(url.as_str(), out.cancellation()).await?;
        let mut seen = UniqFilter::new();

        emit_word_matches(&mut body, &extractor, &mut seen, out).await?;
        Ok(())
    }
}
