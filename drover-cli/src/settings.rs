//! Progress settings gathered once at startup from flags, environment and file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;

use drover_core::config::{DroverConfig, OutputFormat, ProgressConfig};

#[derive(Args, Debug, Default)]
pub struct ProgressArgs {
    /// Path to a drover.toml configuration file
    #[arg(long, global = true, env = "DROVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable progress output entirely
    #[arg(
        long,
        global = true,
        env = "DROVER_NO_PROGRESS",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub no_progress: bool,

    /// Format of the command result on stdout (text or json)
    #[arg(long, global = true, env = "DROVER_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// Stream JSON progress events to stderr (with --output json)
    #[arg(
        long,
        global = true,
        env = "DROVER_PROGRESS_EVENTS",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub progress_events: bool,

    /// Minimum milliseconds between progress redraws
    #[arg(long, global = true)]
    pub progress_throttle_ms: Option<u64>,
}

impl ProgressArgs {
    /// Merge the config file (if any) with flags; flags win.
    pub fn resolve(&self) -> anyhow::Result<ProgressConfig> {
        let mut config = match &self.config {
            Some(path) => {
                DroverConfig::load(path)
                    .with_context(|| format!("Cannot load config: {}", path.display()))?
                    .progress
            }
            None => ProgressConfig::default(),
        };

        if self.no_progress {
            config.disabled = true;
        }
        if let Some(format) = self.output {
            config.format = format;
        }
        if self.progress_events {
            config.stream_events = true;
        }
        if let Some(ms) = self.progress_throttle_ms {
            config.throttle_ms = Some(ms);
        }

        debug!(?config, "Resolved progress settings");
        Ok(config)
    }
}
