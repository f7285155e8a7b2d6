pub mod cli;

#[cfg(feature = "cli")]
use crate::adapters::nominatim::DEFAULT_ENDPOINT;
#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, MissPolicy};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_shapefile_path,
    validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "csv-geocode")]
#[command(about = "Geocode the place names in a CSV file and write the points to a shapefile")]
#[command(version)]
pub struct CliConfig {
    #[arg(long, help = "CSV file with a header row")]
    pub input: String,

    #[arg(long, help = "Output shapefile (.shp, or a path without extension)")]
    pub output: String,

    #[arg(long, default_value = "name", help = "Column holding the place name to look up")]
    pub name_column: String,

    #[arg(long, default_value = "2", help = "Seconds to wait between geocoding requests")]
    pub delay_secs: f64,

    #[arg(long, value_enum, default_value_t = MissPolicy::Abort, help = "What to do when a name has no match")]
    pub on_miss: MissPolicy,

    #[arg(long, default_value = DEFAULT_ENDPOINT, help = "Nominatim base URL")]
    pub endpoint: String,

    #[arg(long, help = "User-Agent sent to the geocoding service")]
    pub user_agent: Option<String>,

    #[arg(long, default_value = "30", help = "Timeout for each geocoding request, in seconds")]
    pub timeout_secs: u64,

    #[arg(long, help = "Disable the progress bar")]
    pub no_progress: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or_default()
    }

    pub fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(crate::adapters::nominatim::default_user_agent)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_shapefile_path("output", &self.output)?;
        validate_non_empty_string("name_column", &self.name_column)?;
        validate_range("delay_secs", self.delay_secs, 0.0, 3600.0)?;
        validate_range("timeout_secs", self.timeout_secs, 1, 600)?;
        validate_url("endpoint", &self.endpoint)?;
        if let Some(ua) = &self.user_agent {
            validate_non_empty_string("user_agent", ua)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn name_column(&self) -> &str {
        &self.name_column
    }

    fn miss_policy(&self) -> MissPolicy {
        self.on_miss
    }

    fn show_progress(&self) -> bool {
        !self.no_progress
    }
}
