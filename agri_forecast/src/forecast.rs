//! N-day-ahead price forecasting for one (district, crop) selection
//!
//! The engine retrains its model on every call. Nothing is cached here;
//! memoization, if wanted, belongs to the caller.

use crate::data::PriceObservation;
use crate::error::{AgriError, Result};
use crate::models::random_forest::RandomForestModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;
use tracing::debug;

/// Forecast engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of days forecast after the last observation
    pub horizon_days: usize,
    /// Observations required before a forecast is attempted
    pub min_observations: usize,
    /// Leading forecast days summarised as the near-term average
    pub near_term_days: usize,
    /// Trees in the forest
    pub n_trees: usize,
    /// Seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            min_observations: 11,
            near_term_days: 7,
            n_trees: 100,
            seed: 42,
        }
    }
}

impl ForecastConfig {
    /// Reject settings that cannot produce a forecast
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(AgriError::InvalidParameter(
                "horizon_days must be positive".to_string(),
            ));
        }
        if self.near_term_days == 0 || self.near_term_days > self.horizon_days {
            return Err(AgriError::InvalidParameter(format!(
                "near_term_days must be between 1 and horizon_days ({})",
                self.horizon_days
            )));
        }
        if self.min_observations < 2 {
            return Err(AgriError::InvalidParameter(
                "min_observations must be at least 2".to_string(),
            ));
        }
        if self.n_trees == 0 {
            return Err(AgriError::InvalidParameter(
                "n_trees must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Origin of a point in a forecast result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Observed market price
    Historical,
    /// Model prediction
    Forecast,
}

/// Dated price tagged with its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: SeriesKind,
}

/// Direction of the forecast relative to the current price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    /// Increasing only when the forecast average is strictly above the
    /// current price; equality counts as decreasing.
    pub fn classify(forecast_average: f64, current_price: f64) -> Self {
        if forecast_average > current_price {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Historical series, forecast series and summary figures for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub district: String,
    pub crop: String,
    /// Observed prices, ascending by date
    pub historical: Vec<SeriesPoint>,
    /// One prediction per day following the last observation
    pub forecast: Vec<SeriesPoint>,
    /// Last observed price
    pub current_price: f64,
    /// Mean of all forecast prices
    pub forecast_average: f64,
    /// Mean of the first `near_term_days` forecast prices
    pub near_term_average: f64,
    pub trend: Trend,
    /// Name of the model that produced the forecast
    pub model: String,
}

impl ForecastResult {
    /// Historical points followed by forecast points
    pub fn combined(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.historical.iter().chain(self.forecast.iter())
    }

    /// Forecast prices in date order
    pub fn forecast_prices(&self) -> Vec<f64> {
        self.forecast.iter().map(|p| p.price).collect()
    }

    /// Date of the last observation
    pub fn last_observed_date(&self) -> Option<NaiveDate> {
        self.historical.last().map(|p| p.date)
    }

    /// Change from the current price to the forecast average, in percent
    pub fn expected_change_pct(&self) -> Option<f64> {
        if self.current_price == 0.0 {
            return None;
        }
        Some((self.forecast_average - self.current_price) / self.current_price * 100.0)
    }
}

/// Trains a model per request and produces a daily forecast
#[derive(Debug, Clone)]
pub struct ForecastEngine<M: ForecastModel = RandomForestModel> {
    model: M,
    config: ForecastConfig,
}

impl ForecastEngine<RandomForestModel> {
    /// Engine backed by the random forest model described by `config`
    pub fn new(config: ForecastConfig) -> Result<Self> {
        let model = RandomForestModel::new(config.n_trees, config.seed)?;
        Self::with_model(model, config)
    }
}

impl<M: ForecastModel> ForecastEngine<M> {
    /// Engine backed by an arbitrary model
    pub fn with_model(model: M, config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    /// Engine settings
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast `horizon_days` daily prices for a date-ascending series.
    pub fn forecast(
        &self,
        district: &str,
        crop: &str,
        series: &[PriceObservation],
    ) -> Result<ForecastResult> {
        if series.len() < self.config.min_observations {
            return Err(AgriError::InsufficientDataError {
                district: district.to_string(),
                crop: crop.to_string(),
                found: series.len(),
                required: self.config.min_observations,
            });
        }

        if series.windows(2).any(|w| w[0].date > w[1].date) {
            return Err(AgriError::InvalidParameter(format!(
                "series for {} in {} is not sorted by date",
                crop, district
            )));
        }

        // Guarded above: the series holds at least two observations
        let last = &series[series.len() - 1];
        let future_dates: Vec<NaiveDate> = (1..=self.config.horizon_days as i64)
            .map(|offset| last.date + Duration::days(offset))
            .collect();

        let trained = self.model.train(series)?;
        let predictions = trained.predict(&future_dates)?;
        if predictions.len() != future_dates.len() {
            return Err(AgriError::InvalidParameter(format!(
                "model {} returned {} predictions for {} dates",
                trained.name(),
                predictions.len(),
                future_dates.len()
            )));
        }

        let current_price = last.price;
        let forecast_average = predictions.iter().mean();
        let near_term_average = predictions
            .iter()
            .take(self.config.near_term_days)
            .mean();
        let trend = Trend::classify(forecast_average, current_price);

        debug!(
            district,
            crop,
            observations = series.len(),
            current_price,
            forecast_average,
            %trend,
            "forecast complete"
        );

        Ok(ForecastResult {
            district: district.to_string(),
            crop: crop.to_string(),
            historical: series
                .iter()
                .map(|o| SeriesPoint {
                    date: o.date,
                    price: o.price,
                    kind: SeriesKind::Historical,
                })
                .collect(),
            forecast: future_dates
                .into_iter()
                .zip(predictions)
                .map(|(date, price)| SeriesPoint {
                    date,
                    price,
                    kind: SeriesKind::Forecast,
                })
                .collect(),
            current_price,
            forecast_average,
            near_term_average,
            trend,
            model: trained.name().to_string(),
        })
    }
}
