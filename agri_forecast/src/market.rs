//! Cross-district price comparison for a crop
//!
//! "Current" means the latest observation per district within a trailing
//! window anchored at the newest date in the whole price table, not at
//! today's date, so historical datasets rank the same way every time.

use crate::data::TimeSeriesStore;
use crate::error::{AgriError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Market ranking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Trailing window, in days, that counts as current
    pub window_days: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self { window_days: 60 }
    }
}

impl MarketConfig {
    /// Longest accepted window, one hundred years
    pub const MAX_WINDOW_DAYS: u32 = 36_500;

    pub fn validate(&self) -> Result<()> {
        if self.window_days > Self::MAX_WINDOW_DAYS {
            return Err(AgriError::InvalidParameter(format!(
                "market.window_days must be at most {}, got {}",
                Self::MAX_WINDOW_DAYS,
                self.window_days
            )));
        }
        Ok(())
    }
}

/// Latest price of a crop in one district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub district: String,
    pub price: f64,
    /// Date the price was observed
    pub date: NaiveDate,
}

/// Districts ranked by current price, highest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRanking {
    pub crop: String,
    /// Anchor date of the recency window
    pub as_of: NaiveDate,
    pub window_days: u32,
    /// Every qualifying district, price descending
    pub entries: Vec<MarketQuote>,
    pub best_district: String,
    pub best_price: f64,
}

impl MarketRanking {
    /// Difference between the best and the worst current price
    pub fn price_spread(&self) -> f64 {
        self.entries
            .last()
            .map_or(0.0, |worst| self.best_price - worst.price)
    }
}

/// Ranks districts by their most recent price for a crop
#[derive(Debug, Clone, Default)]
pub struct MarketRanker {
    config: MarketConfig,
}

impl MarketRanker {
    pub fn new(config: MarketConfig) -> Self {
        Self { config }
    }

    /// Ranking settings
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Rank every district with a recent price for `crop`.
    ///
    /// Equal prices keep ascending district-name order.
    pub fn rank(&self, store: &TimeSeriesStore, crop: &str) -> Result<MarketRanking> {
        let no_recent = || AgriError::NoRecentDataError {
            crop: crop.to_string(),
            window_days: self.config.window_days,
        };

        let as_of = store.max_date().ok_or_else(no_recent)?;
        let mut entries: Vec<MarketQuote> = store
            .recent_by_district(crop, self.config.window_days, as_of)
            .into_values()
            .map(|o| MarketQuote {
                district: o.district,
                price: o.price,
                date: o.date,
            })
            .collect();

        entries.sort_by(|a, b| b.price.total_cmp(&a.price));

        let best = entries.first().cloned().ok_or_else(no_recent)?;
        debug!(
            crop,
            %as_of,
            districts = entries.len(),
            best_district = %best.district,
            best_price = best.price,
            "ranked markets"
        );

        Ok(MarketRanking {
            crop: crop.to_string(),
            as_of,
            window_days: self.config.window_days,
            entries,
            best_district: best.district,
            best_price: best.price,
        })
    }
}
