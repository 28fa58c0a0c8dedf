// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Lonkero Subenum - Passive Subdomain Enumeration CLI
 *
 * Queries certificate transparency, passive DNS, threat intel and search
 * engine sources concurrently and prints every subdomain found.
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;
use validator::Validate;

use lonkero_subenum::config::EnumeratorConfig;
use lonkero_subenum::http_client::HttpClient;
use lonkero_subenum::send::RESULT_CHANNEL_CAPACITY;
use lonkero_subenum::sources::default_sources;
use lonkero_subenum::{enumerate_subdomains, send_with_cancel, EnumerationOptions, SubdomainResult};

/// Lonkero Subenum - passive subdomain enumeration
#[derive(Parser)]
#[command(name = "lonkero-subenum")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Find subdomains from passive sources. Fast, concurrent, Rust.", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate subdomains for the given domains
    Enumerate(EnumerateArgs),
}

#[derive(Args)]
struct EnumerateArgs {
    /// Domains to enumerate
    #[arg(required = true)]
    domains: Vec<String>,

    /// Limit the reported results to the given number
    #[arg(long)]
    limit: Option<usize>,

    /// Number of seconds until timeout
    #[arg(long)]
    timeout: Option<u64>,

    /// Do not time out
    #[arg(long)]
    no_timeout: bool,

    /// Show errors and other available diagnostic information
    #[arg(short, long)]
    verbose: bool,

    /// Include potentially insecure sources using plain HTTP
    #[arg(long)]
    insecure: bool,

    /// Filter unique results
    #[arg(long)]
    uniq: bool,

    /// Use results to find more results
    #[arg(long)]
    recursive: bool,

    /// Show the source of each domain in output
    #[arg(long)]
    labels: bool,

    /// Print one JSON object per result
    #[arg(long)]
    json: bool,

    /// HackerTarget API key
    #[arg(long, env = "HACKERTARGET_API_KEY", hide_env_values = true)]
    hackertarget_api_key: Option<String>,
}

impl EnumerateArgs {
    /// Command-line flags win over the environment.
    fn apply(&self, config: &mut EnumeratorConfig) {
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config.no_timeout |= self.no_timeout;
        config.insecure |= self.insecure;
        config.uniq |= self.uniq;
        config.recursive |= self.recursive;
        if self.hackertarget_api_key.is_some() {
            config.hackertarget_api_key = self.hackertarget_api_key.clone();
        }
    }

    /// Output line for `result`, if it should be reported at all.
    fn render(&self, result: &SubdomainResult) -> Result<Option<String>> {
        if !result.is_success() && !(self.verbose && result.is_failure()) {
            return Ok(None);
        }

        if self.json {
            return Ok(Some(result.to_json()?));
        }

        let line = match (result.success_value(), result.failure_error()) {
            (_, Some(err)) => format!("{} {}", result.label(), err),
            (Some(value), None) if self.labels => format!("{} {}", result.label(), value),
            (Some(value), None) => value,
            (None, None) => return Ok(None),
        };
        Ok(Some(line))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Results go to stdout, logs to stderr
    let verbose = match &cli.command {
        Commands::Enumerate(args) => args.verbose,
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.debug, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("lonkero-subenum")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

/// `RUST_LOG` wins; otherwise the level follows `--debug` / `--verbose`.
fn log_filter(debug: bool, verbose: bool) -> EnvFilter {
    let log_level = if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()))
}

async fn async_main(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Enumerate(args) => run_enumerate(args).await,
    }
}

async fn run_enumerate(args: EnumerateArgs) -> Result<()> {
    let mut config = EnumeratorConfig::from_env()?;
    args.apply(&mut config);
    config.validate().context("Invalid command line options")?;
    debug!("Configuration: {:?}", config);

    let http = HttpClient::from_config(&config).context("Failed to create HTTP client")?;
    let options = EnumerationOptions::new(default_sources(&http, &config))
        .recursive(config.recursive)
        .uniq(config.uniq);
    info!("Enumerating {} domain(s) with {:?}", args.domains.len(), options);

    let cancel = CancellationToken::new();

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping");
            interrupt.cancel();
        }
    });

    if let Some(deadline) = config.deadline() {
        let expiry = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            info!("Timeout of {:?} reached", deadline);
            expiry.cancel();
        });
    }

    let (tx, mut results) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
    for domain in &args.domains {
        let mut stream = enumerate_subdomains(&cancel, domain, &options);
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            while let Some(result) = stream.recv().await {
                if !send_with_cancel(&cancel, &tx, result).await {
                    break;
                }
            }
        });
    }
    drop(tx);

    let mut reported = 0usize;
    while let Some(result) = results.recv().await {
        let Some(line) = args.render(&result)? else {
            continue;
        };
        println!("{}", line);

        reported += 1;
        if config.limit != 0 && reported >= config.limit {
            debug!("Result limit of {} reached", config.limit);
            break;
        }
    }

    cancel.cancel();
    info!("Reported {} result(s)", reported);
    Ok(())
}
