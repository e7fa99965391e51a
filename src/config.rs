use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// NBA game-total prediction engine
#[derive(Parser, Debug, Clone)]
#[command(name = "courtcast", version, about)]
pub struct Config {
    /// Path to the matchup fixture (JSON)
    #[arg(long, env = "COURTCAST_INPUT")]
    pub input: PathBuf,

    /// Reference total line to compare the projection against
    #[arg(long, env = "COURTCAST_LINE")]
    pub line: Option<f64>,

    /// Output format
    #[arg(long, env = "COURTCAST_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Formula tuning overrides (JSON; partial files are merged over
    /// the defaults)
    #[arg(long, env = "COURTCAST_TUNING")]
    pub tuning: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(line) = self.line {
            if !line.is_finite() || line <= 0.0 {
                anyhow::bail!("--line must be a positive number, got {line}");
            }
        }
        Ok(())
    }
}
