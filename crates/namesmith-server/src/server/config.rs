//! Runtime configuration for the `namesmith-server` binary.

use anyhow::bail;
use clap::Parser;
use namesmith::Limits;
use std::path::PathBuf;
use std::time::Duration;

/// All values are parsed from CLI arguments or environment variables, with
/// defaults suitable for a small deployment. Artifact paths are optional:
/// the service runs with a sparse table and a degraded scorer when they
/// are absent.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "namesmith-server",
    version,
    about = "An HTTP service for scored, filtered name generation"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:5000"))]
    pub server_addr: String,

    /// Path to the whitespace-separated `name SEX rank` historical table.
    ///
    /// Environment variable: `NAMES_PATH`
    #[arg(long, env = "NAMES_PATH")]
    pub names_path: Option<PathBuf>,

    /// Path to the tab-separated `word<TAB>score` flagged-word list merged
    /// into the historical table under both genders.
    ///
    /// Environment variable: `FLAGGED_PATH`
    #[arg(long, env = "FLAGGED_PATH")]
    pub flagged_path: Option<PathBuf>,

    /// Path to the JSON linear-model artifact. When absent, evaluation and
    /// generation run in degraded scoring mode instead of failing.
    ///
    /// Environment variable: `MODEL_PATH`
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Maximum number of names a single generate request may ask for.
    ///
    /// Environment variable: `MAX_COUNT`
    #[arg(long, env = "MAX_COUNT", default_value_t = 100)]
    pub max_count: usize,

    /// Attempt cap per session. A session that cannot satisfy its filter
    /// criteria within this many attempts ends as `exhausted` instead of
    /// spinning forever.
    ///
    /// Environment variable: `MAX_ATTEMPTS`
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = 250_000)]
    pub max_attempts: u64,

    /// Seconds a terminal session stays pollable before the sweeper may
    /// evict it.
    ///
    /// Environment variable: `SESSION_TTL_SECS`
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 600)]
    pub session_ttl_secs: u64,

    /// Seconds between eviction sweeps.
    ///
    /// Environment variable: `SWEEP_INTERVAL_SECS`
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub names_path: Option<PathBuf>,
    pub flagged_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub limits: Limits,
    pub sweep_interval: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_count == 0 {
            bail!("MAX_COUNT must be greater than 0");
        }
        if args.max_attempts == 0 {
            bail!("MAX_ATTEMPTS must be greater than 0");
        }
        if args.sweep_interval_secs == 0 {
            bail!("SWEEP_INTERVAL_SECS must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            names_path: args.names_path,
            flagged_path: args.flagged_path,
            model_path: args.model_path,
            limits: Limits {
                max_attempts: args.max_attempts,
                max_target: args.max_count,
                session_ttl: Duration::from_secs(args.session_ttl_secs),
            },
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
        })
    }
}
