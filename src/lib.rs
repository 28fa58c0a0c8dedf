// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Subdomain Enumeration Library
 * Concurrent passive sources merged into one cancellable result stream
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

// Result data model and error handling
pub mod errors;
pub mod result;

// Streaming primitives shared by every source
pub mod extractor;
pub mod limiter;
pub mod send;
pub mod uniq;

// Source contract and orchestration
pub mod enumerate;
pub mod source;

// Provider plumbing
pub mod config;
pub mod http_client;
pub mod sources;

pub use enumerate::{enumerate_subdomains, EnumerationOptions};
pub use errors::{ExtractorError, ResultError, SourceError};
pub use extractor::{SingleSubdomainExtractor, SubdomainExtractor};
pub use limiter::SourceLimiter;
pub use result::{Outcome, ResultRecord, SubdomainResult};
pub use send::{result_channel, send_with_cancel, ResultSender, ResultStream};
pub use source::{Provider, Source};
pub use uniq::{uniq_results, UniqFilter};
