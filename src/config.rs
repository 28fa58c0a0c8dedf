// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Enumerator settings shared by the CLI, the HTTP client and providers
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnumeratorConfig {
    /// Overall deadline for one enumeration
    #[validate(range(min = 1, max = 86400))]
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Run without a deadline (Ctrl-C still cancels)
    #[serde(default)]
    pub no_timeout: bool,

    /// Timeout for each HTTP request a provider sends
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub recursive: bool,

    #[serde(default)]
    pub uniq: bool,

    /// Include providers only reachable over plain HTTP
    #[serde(default)]
    pub insecure: bool,

    /// Stop after this many reported results (0 = no limit)
    #[serde(default)]
    pub limit: usize,

    #[serde(default)]
    pub hackertarget_api_key: Option<String>,

    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            no_timeout: false,
            request_timeout_secs: default_request_timeout(),
            recursive: false,
            uniq: false,
            insecure: false,
            limit: 0,
            hackertarget_api_key: None,
            user_agent: None,
        }
    }
}

impl EnumeratorConfig {
    /// Load configuration from environment variables with sensible defaults
    ///
    /// Supports the following environment variables:
    /// - SUBENUM_TIMEOUT: overall deadline in seconds
    /// - SUBENUM_NO_TIMEOUT: disable the deadline
    /// - SUBENUM_REQUEST_TIMEOUT: per-request timeout in seconds
    /// - SUBENUM_RECURSIVE / SUBENUM_UNIQ / SUBENUM_INSECURE: booleans
    /// - SUBENUM_LIMIT: maximum number of reported results
    /// - SUBENUM_USER_AGENT: fixed User-Agent instead of a rotating one
    /// - HACKERTARGET_API_KEY: HackerTarget API key
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SUBENUM_TIMEOUT") {
            config.timeout_secs = parse_var("SUBENUM_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_NO_TIMEOUT") {
            config.no_timeout = parse_var("SUBENUM_NO_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_REQUEST_TIMEOUT") {
            config.request_timeout_secs = parse_var("SUBENUM_REQUEST_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_RECURSIVE") {
            config.recursive = parse_var("SUBENUM_RECURSIVE", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_UNIQ") {
            config.uniq = parse_var("SUBENUM_UNIQ", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_INSECURE") {
            config.insecure = parse_var("SUBENUM_INSECURE", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_LIMIT") {
            config.limit = parse_var("SUBENUM_LIMIT", &value)?;
        }
        if let Some(value) = lookup("SUBENUM_USER_AGENT") {
            config.user_agent = Some(value);
        }
        if let Some(value) = lookup("HACKERTARGET_API_KEY") {
            if !value.is_empty() {
                config.hackertarget_api_key = Some(value);
            }
        }

        config.validate().context("Invalid enumerator configuration")?;
        Ok(config)
    }

    /// Deadline for one enumeration, if any.
    pub fn deadline(&self) -> Option<Duration> {
        if self.no_timeout {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid {} value: {:?}", key, value))
}
