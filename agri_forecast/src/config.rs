//! Configuration for the forecasting, ranking and advisory components
//!
//! Every section and field is optional in the JSON file; anything omitted
//! takes its default.
//!
//! ```json
//! {
//!   "forecast": { "horizon_days": 14, "n_trees": 50 },
//!   "market": { "window_days": 30 },
//!   "files": { "prices": "prices.csv" }
//! }
//! ```

use crate::advisor::AdvisorConfig;
use crate::error::{AgriError, Result};
use crate::forecast::ForecastConfig;
use crate::market::MarketConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File names of the three source tables inside a data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub prices: String,
    pub production: String,
    pub soil: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            prices: "bd_crop_price_data.csv".to_string(),
            production: "bd_crop_production_data.csv".to_string(),
            soil: "bd_soil_analysis_data.csv".to_string(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgriConfig {
    pub forecast: ForecastConfig,
    pub market: MarketConfig,
    pub advisor: AdvisorConfig,
    pub files: DataFiles,
}

impl AgriConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AgriConfig = serde_json::from_str(json)
            .map_err(|e| AgriError::InvalidParameter(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        self.market.validate()?;
        if self.advisor.top_n == 0 {
            return Err(AgriError::InvalidParameter(
                "advisor.top_n must be positive".to_string(),
            ));
        }
        for (name, file) in [
            ("prices", &self.files.prices),
            ("production", &self.files.production),
            ("soil", &self.files.soil),
        ] {
            if file.trim().is_empty() {
                return Err(AgriError::InvalidParameter(format!(
                    "files.{} must name a file",
                    name
                )));
            }
        }
        Ok(())
    }
}
