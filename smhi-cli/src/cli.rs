use std::{io::Write, time::Duration};

use anyhow::Context;
use clap::{ArgAction, Parser};
use smhi_core::{Config, SmhiApi, config};
use tracing::Level;

/// Top-level CLI struct. Each flag runs its pipeline independently.
#[derive(Debug, Parser)]
#[command(
    name = "smhi",
    version,
    about = "Script to extract data from SMHI's Open API"
)]
pub struct Cli {
    /// List SMHI API parameters.
    #[arg(long)]
    pub parameters: bool,

    /// Show the stations with the highest and lowest latest-day air temperature.
    #[arg(long)]
    pub temperatures: bool,

    /// API root to talk to.
    #[arg(long, value_name = "URL", default_value = config::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Maximum number of station requests in flight.
    #[arg(long, value_name = "N", default_value_t = config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::default()
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_concurrency(self.concurrency)
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if !self.parameters && !self.temperatures {
            return Ok(());
        }

        let api = SmhiApi::new(self.config()).context("Failed to set up SMHI API client")?;
        let mut out = std::io::stdout();

        if self.parameters {
            api.display_parameters(&mut out)
                .await
                .context("Failed to write parameter list")?;
        }

        if self.temperatures {
            api.display_temperature_info(&mut out)
                .await
                .context("Failed to write temperature report")?;
        }

        out.flush()?;
        Ok(())
    }
}
