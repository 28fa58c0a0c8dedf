// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::EnumeratorConfig;
use crate::errors::SourceError;

/// Realistic browser User-Agents; search engines block obvious bots
const BROWSER_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Get a realistic browser User-Agent (rotates per client)
fn get_browser_user_agent() -> &'static str {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let index = COUNTER.fetch_add(1, Ordering::Relaxed) % BROWSER_USER_AGENTS.len();
    BROWSER_USER_AGENTS[index]
}

/// Maximum bytes read from one response (10MB); the rest is ignored
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Maximum bytes buffered for one line or word (64KB)
const MAX_TOKEN_SIZE: usize = 64 * 1024;

const DEFAULT_POOL_IDLE_PER_HOST: usize = 8;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

/// HTTP client shared by all providers.
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, SourceError> {
        Self::with_user_agent(timeout_secs, None)
    }

    pub fn from_config(config: &EnumeratorConfig) -> Result<Self, SourceError> {
        Self::with_user_agent(config.request_timeout_secs, config.user_agent.as_deref())
    }

    pub fn with_user_agent(timeout_secs: u64, user_agent: Option<&str>) -> Result<Self, SourceError> {
        // Only for dev/testing against self-signed endpoints
        let accept_invalid_certs = std::env::var("ACCEPT_INVALID_CERTS")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        if accept_invalid_certs {
            warn!("Certificate validation is DISABLED (ACCEPT_INVALID_CERTS=true)");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent.unwrap_or_else(|| get_browser_user_agent()))
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: Duration::from_secs(timeout_secs),
            max_body_size: MAX_BODY_SIZE,
        })
    }

    /// Limit how much of each response body is read
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a GET and hand back a scanner over the body.
    ///
    /// Anything but `200 OK` is an `HttpStatus` failure. The request is
    /// abandoned as soon as `cancel` fires.
    pub async fn get_scanner(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ResponseScanner<impl AsyncBufRead + Unpin + Send>, SourceError> {
        debug!("GET {}", url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            response = self.client.get(url).send() => response?,
        };

        if response.status() != StatusCode::OK {
            debug!("GET {} answered {}", url, response.status());
            return Err(SourceError::from_status(response.status()));
        }

        let body = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(std::io::Error::other)),
        );

        Ok(ResponseScanner::new(StreamReader::new(body), cancel.clone())
            .with_max_body_size(self.max_body_size))
    }
}

/// Reads a response body one line or one whitespace-separated word at a
/// time. No single read buffers more than `max_token_size` bytes: a longer
/// line is cut after its last whitespace and the rest carried over, so
/// words stay intact. Reading stops for good after `max_body_size` bytes.
///
/// Every read also watches the cancellation token.
pub struct ResponseScanner<R> {
    reader: R,
    cancel: CancellationToken,
    /// Bytes of the current segment, or the carry-over of a split line
    buf: Vec<u8>,
    words: VecDeque<String>,
    consumed: usize,
    max_body_size: usize,
    max_token_size: usize,
    truncated: bool,
}

impl<R: AsyncBufRead + Unpin> ResponseScanner<R> {
    pub fn new(reader: R, cancel: CancellationToken) -> Self {
        Self {
            reader,
            cancel,
            buf: Vec::new(),
            words: VecDeque::new(),
            consumed: 0,
            max_body_size: MAX_BODY_SIZE,
            max_token_size: MAX_TOKEN_SIZE,
            truncated: false,
        }
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn with_max_token_size(mut self, max_token_size: usize) -> Self {
        self.max_token_size = max_token_size.max(1);
        self
    }

    /// Next line without its terminator, `None` at end of body.
    ///
    /// Lines longer than the token limit come back in several pieces.
    pub async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        let Some(segment) = self.next_segment().await? else {
            return Ok(None);
        };

        let line = String::from_utf8_lossy(&segment);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Next whitespace-separated word, `None` at end of body.
    pub async fn next_word(&mut self) -> Result<Option<String>, SourceError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(SourceError::Cancelled);
            }
            if let Some(word) = self.words.pop_front() {
                return Ok(Some(word));
            }
            match self.next_segment().await? {
                Some(segment) => self.words.extend(
                    String::from_utf8_lossy(&segment)
                        .split_whitespace()
                        .map(str::to_string),
                ),
                None => return Ok(None),
            }
        }
    }

    /// A full line including its newline, or the longest prefix of an
    /// over-long line that ends in whitespace.
    async fn next_segment(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        if self.cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }

        let remaining = self.max_body_size.saturating_sub(self.consumed);
        let room = self.max_token_size.saturating_sub(self.buf.len());
        let limit = remaining.min(room);

        let mut read = 0;
        if limit > 0 {
            let mut bounded = (&mut self.reader).take(limit as u64);
            read = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(SourceError::Cancelled),
                read = bounded.read_until(b'\n', &mut self.buf) => read?,
            };
            self.consumed += read;
        }

        if self.buf.is_empty() {
            if remaining == 0 && !self.truncated {
                warn!("Response body exceeds {} bytes, ignoring the rest", self.max_body_size);
                self.truncated = true;
            }
            return Ok(None);
        }

        let line_done = self.buf.last() == Some(&b'\n');
        let body_done = read < limit || self.consumed >= self.max_body_size;
        if line_done || body_done {
            return Ok(Some(std::mem::take(&mut self.buf)));
        }

        // token limit reached in the middle of a line
        match self.buf.iter().rposition(u8::is_ascii_whitespace) {
            Some(end) => {
                let carry = self.buf.split_off(end + 1);
                Ok(Some(std::mem::replace(&mut self.buf, carry)))
            }
            None => {
                debug!("Token longer than {} bytes, splitting it", self.max_token_size);
                Ok(Some(std::mem::take(&mut self.buf)))
            }
        }
    }
}
