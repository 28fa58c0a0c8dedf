// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Subdomain Extraction
 * Pulls host names belonging to a target domain out of raw provider text
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::errors::ExtractorError;

/// Longest host name DNS allows.
const MAX_HOSTNAME_LEN: usize = 253;

/// One DNS label: alphanumerics and inner hyphens, at most 63 characters.
const LABEL: &str = r"[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?";

/// Subdomain labels may also start with an underscore (`_dmarc`, `_sip`).
const SUBDOMAIN_LABEL: &str = r"[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9])?";

/// Maximal runs of host-name characters, trimmed of edge dots and hyphens.
const HOST_RUN: &str = r"[A-Za-z0-9_](?:[A-Za-z0-9_.-]*[A-Za-z0-9_])?";

static HOST_RUNS: OnceCell<Regex> = OnceCell::new();
static VALID_DOMAIN: OnceCell<Regex> = OnceCell::new();

fn host_runs() -> Result<&'static Regex, ExtractorError> {
    Ok(HOST_RUNS.get_or_try_init(|| Regex::new(HOST_RUN))?)
}

fn valid_domain() -> Result<&'static Regex, ExtractorError> {
    Ok(VALID_DOMAIN.get_or_try_init(|| Regex::new(&format!(r"^(?:{LABEL}\.)*{LABEL}$")))?)
}

/// Finds every host name under one target domain.
///
/// Candidates are maximal runs of host-name characters, so a match is
/// always anchored on label boundaries: for `example.com`,
/// `notexample.com` and `example.com.evil.org` are rejected while
/// `a.example.com` and `example.com` are accepted. Matching ignores case
/// and results are returned lower-cased.
///
/// Build one per queried domain and apply it token by token (or line by
/// line) while reading a response; it never needs the whole body.
#[derive(Debug, Clone)]
pub struct SubdomainExtractor {
    domain: String,
    runs: &'static Regex,
    host: Regex,
}

impl SubdomainExtractor {
    pub fn new(domain: &str) -> Result<Self, ExtractorError> {
        let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();

        if domain.is_empty() || domain.len() > MAX_HOSTNAME_LEN || !valid_domain()?.is_match(&domain) {
            return Err(ExtractorError::InvalidDomain(domain));
        }

        let host = Regex::new(&format!(
            r"(?i)^(?:{SUBDOMAIN_LABEL}\.)*{}$",
            regex::escape(&domain)
        ))?;

        Ok(Self {
            domain,
            runs: host_runs()?,
            host,
        })
    }

    /// The normalized target domain
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// True if `candidate` as a whole is the domain or one of its subdomains.
    pub fn is_match(&self, candidate: &str) -> bool {
        candidate.len() <= MAX_HOSTNAME_LEN && self.host.is_match(candidate)
    }

    /// Every non-overlapping match in `text`, in order of appearance.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.matches(text).collect()
    }

    /// The first match in `text`.
    pub fn find(&self, text: &str) -> Option<String> {
        self.matches(text).next()
    }

    fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.runs
            .find_iter(text)
            .map(|run| run.as_str())
            .filter(|run| self.is_match(run))
            .map(|run| run.to_ascii_lowercase())
    }
}

/// Single-match form of [`SubdomainExtractor`], for providers that put at
/// most one host name in each token or line.
#[derive(Debug, Clone)]
pub struct SingleSubdomainExtractor {
    inner: SubdomainExtractor,
}

impl SingleSubdomainExtractor {
    pub fn new(domain: &str) -> Result<Self, ExtractorError> {
        Ok(Self {
            inner: SubdomainExtractor::new(domain)?,
        })
    }

    pub fn domain(&self) -> &str {
        self.inner.domain()
    }

    /// The host name in `token`, if any.
    pub fn extract(&self, token: &str) -> Option<String> {
        self.inner.find(token)
    }

    /// Same as [`extract`](Self::extract) for raw response bytes.
    pub fn extract_bytes(&self, token: &[u8]) -> Option<String> {
        self.extract(&String::from_utf8_lossy(token))
    }
}
