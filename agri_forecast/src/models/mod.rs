//! Forecasting models for price series
//!
//! A model is trained on a date-ordered series of observations and then
//! asked for prices at arbitrary future dates. Dates enter the model through
//! a single numeric feature, the proleptic Gregorian ordinal of the date.

use crate::data::PriceObservation;
use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use std::fmt::Debug;

/// Day count with 0001-01-01 as day 1
pub fn date_ordinal(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict one price per requested date
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a date-ordered series
    fn train(&self, series: &[PriceObservation]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod random_forest;
