//! Exchange Core - line-oriented JSON adapter.
//!
//! Reads one request per line from stdin and writes one response per line to
//! stdout. Logs go to stderr.
//!
//! ```text
//! $ echo '{"Op":"GetBook","Market":"ETH"}' | exchange-core --market ETH
//! {"Status":200,"Body":{"TotalAskVolume":0.0,"TotalBidVolume":0.0,"Asks":[],"Bids":[]}}
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use exchange_core::api::{handle_line, Response};
use exchange_core::{Exchange, ExchangeConfig};

/// Command-line flags; each one overrides the matching config file value
#[derive(Parser, Debug, Clone)]
#[command(name = "exchange-core")]
#[command(version)]
#[command(about = "Price-time priority matching engine over stdin/stdout", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Market to open (repeatable)
    #[arg(short, long = "market")]
    markets: Vec<String>,

    /// Pre-allocated order slots per book
    #[arg(long)]
    capacity: Option<usize>,

    /// Log filter when RUST_LOG is unset
    #[arg(short, long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,
}

impl Cli {
    fn resolve(self) -> Result<ExchangeConfig, exchange_core::error::ConfigError> {
        let mut config = match &self.config {
            Some(path) => ExchangeConfig::from_json_file(path)?,
            None => ExchangeConfig::default(),
        };
        if !self.markets.is_empty() {
            config.markets = self.markets;
        }
        if let Some(capacity) = self.capacity {
            config.order_capacity = capacity;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn serve(exchange: &Exchange) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let response = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(exchange, &line),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                Response::message(400, "malformed request: input is not valid UTF-8")
            }
            Err(err) => return Err(err),
        };
        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = match Cli::parse().resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("exchange-core: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    let exchange = Exchange::from_config(&config);
    info!(markets = ?exchange.markets(), capacity = config.order_capacity, "exchange ready");

    match serve(&exchange) {
        Ok(()) => {
            info!("input closed, shutting down");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "i/o failure");
            ExitCode::FAILURE
        }
    }
}
