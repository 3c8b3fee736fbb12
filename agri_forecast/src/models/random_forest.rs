//! Random forest price model over the date ordinal

use crate::data::PriceObservation;
use crate::error::Result;
use crate::models::{date_ordinal, ForecastModel, TrainedForecastModel};
use agri_math::{ForestConfig, RandomForestRegressor};
use chrono::NaiveDate;

/// Bagged regression-tree model with the date ordinal as its only feature
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    /// Name of the model
    name: String,
    /// Ensemble settings
    config: ForestConfig,
}

/// Trained random forest model
#[derive(Debug, Clone)]
pub struct TrainedRandomForest {
    /// Name of the model
    name: String,
    /// Fitted ensemble
    forest: RandomForestRegressor,
    /// Number of observations the forest was fitted on
    n_samples: usize,
}

impl RandomForestModel {
    /// Create a forest model with `n_trees` trees and a fixed seed
    pub fn new(n_trees: usize, seed: u64) -> Result<Self> {
        Self::with_config(ForestConfig {
            n_trees,
            seed,
            ..Default::default()
        })
    }

    /// Create a forest model from a full ensemble configuration
    pub fn with_config(config: ForestConfig) -> Result<Self> {
        // Surface configuration errors here rather than on the first query
        RandomForestRegressor::new(config.clone())?;

        Ok(Self {
            name: format!(
                "Random Forest (trees={}, seed={})",
                config.n_trees, config.seed
            ),
            config,
        })
    }

    /// Ensemble settings
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl ForecastModel for RandomForestModel {
    type Trained = TrainedRandomForest;

    fn train(&self, series: &[PriceObservation]) -> Result<Self::Trained> {
        let features: Vec<Vec<f64>> = series.iter().map(|o| vec![date_ordinal(o.date)]).collect();
        let targets: Vec<f64> = series.iter().map(|o| o.price).collect();

        let mut forest = RandomForestRegressor::new(self.config.clone())?;
        forest.fit(&features, &targets)?;

        Ok(TrainedRandomForest {
            name: self.name.clone(),
            forest,
            n_samples: series.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRandomForest {
    /// Number of observations the forest was fitted on
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }
}

impl TrainedForecastModel for TrainedRandomForest {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<f64>> {
        let samples: Vec<Vec<f64>> = dates.iter().map(|d| vec![date_ordinal(*d)]).collect();
        Ok(self.forest.predict(&samples)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
