//! Server Configuration
//!
//! Settings are read from command-line flags first and fall back to environment variables,
//! then to built-in defaults.

use anyhow::{Context, Result, bail};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
/// Delay before each streamed search result.
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 1000;
pub const DEFAULT_STATS_INTERVAL_SECS: u64 = 30;

pub const ENV_BIND: &str = "FACE_PROFILER_BIND";
pub const ENV_SEARCH_DELAY_MS: &str = "FACE_PROFILER_SEARCH_DELAY_MS";
pub const ENV_STATS_INTERVAL_SECS: &str = "FACE_PROFILER_STATS_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub search_pacing: Duration,
    pub stats_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            search_pacing: Duration::from_millis(DEFAULT_SEARCH_DELAY_MS),
            stats_interval: Duration::from_secs(DEFAULT_STATS_INTERVAL_SECS),
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from `args` (without the program name) and `env`.
    ///
    /// `env` is injected so callers can pass `std::env::var` or a fixed map in tests.
    pub fn from_args<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut bind = env(ENV_BIND);
        let mut search_delay = env(ENV_SEARCH_DELAY_MS);
        let mut stats_interval = env(ENV_STATS_INTERVAL_SECS);

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    bind = Some(flag_value(args, i)?);
                    i += 2;
                }
                "--search-delay-ms" => {
                    search_delay = Some(flag_value(args, i)?);
                    i += 2;
                }
                "--stats-interval-secs" => {
                    stats_interval = Some(flag_value(args, i)?);
                    i += 2;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument: {}", other);
                    i += 1;
                }
            }
        }

        let mut config = Self::default();
        if let Some(bind) = bind {
            config.bind_addr = bind
                .parse()
                .with_context(|| format!("invalid bind address '{}'", bind))?;
        }
        if let Some(delay) = search_delay {
            let ms: u64 = delay
                .parse()
                .with_context(|| format!("invalid search delay '{}'", delay))?;
            config.search_pacing = Duration::from_millis(ms);
        }
        if let Some(interval) = stats_interval {
            let secs: u64 = interval
                .parse()
                .with_context(|| format!("invalid stats interval '{}'", interval))?;
            if secs == 0 {
                bail!("stats interval must be at least one second");
            }
            config.stats_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn flag_value(args: &[String], i: usize) -> Result<String> {
    match args.get(i + 1) {
        Some(value) => Ok(value.clone()),
        None => bail!("{} requires a value", args[i]),
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--bind <addr:port>] [--search-delay-ms <ms>] [--stats-interval-secs <secs>]\n\
         Example: {program} --bind 127.0.0.1:5000 --search-delay-ms 250\n\
         Environment: {ENV_BIND}, {ENV_SEARCH_DELAY_MS}, {ENV_STATS_INTERVAL_SECS}\n\
         Defaults: bind {DEFAULT_BIND_ADDR}, search delay {DEFAULT_SEARCH_DELAY_MS} ms, stats every {DEFAULT_STATS_INTERVAL_SECS} s"
    )
}
