//! Random forest regressor
//!
//! A bagged ensemble of [`RegressionTree`]s. Each tree is grown on a
//! bootstrap resample of the training set and the forest prediction is the
//! mean of the tree predictions. All randomness flows from `seed` through
//! ChaCha8, so a given training set always yields the same forest.

use crate::stats::validate_training_set;
use crate::tree::{RegressionTree, TreeConfig};
use crate::{MathError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Draw a bootstrap resample for each tree (otherwise every tree sees all samples)
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
    /// Growth limits applied to every tree
    pub tree: TreeConfig,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            bootstrap: true,
            seed: 42,
            tree: TreeConfig::default(),
        }
    }
}

/// Random forest regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Create an unfitted forest
    pub fn new(config: ForestConfig) -> Result<Self> {
        if config.n_trees == 0 {
            return Err(MathError::InvalidInput(
                "A forest needs at least one tree".to_string(),
            ));
        }
        config.tree.validate()?;

        Ok(Self {
            config,
            trees: Vec::new(),
        })
    }

    /// Train the forest, replacing any previously fitted trees
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        let n_features = validate_training_set(features, targets)?;
        let n_samples = targets.len();
        let mut seeds = ChaCha8Rng::seed_from_u64(self.config.seed);

        let mut trees = Vec::with_capacity(self.config.n_trees);
        for _ in 0..self.config.n_trees {
            let tree_seed: u64 = seeds.gen();
            let indices = if self.config.bootstrap {
                bootstrap_indices(n_samples, tree_seed)
            } else {
                (0..n_samples).collect()
            };

            let mut tree = RegressionTree::new(self.config.tree.clone());
            tree.fit_indices(features, targets, n_features, indices);
            trees.push(tree);
        }

        self.trees = trees;
        debug!(
            n_trees = self.trees.len(),
            n_samples,
            seed = self.config.seed,
            "fitted random forest"
        );
        Ok(())
    }

    /// Predict the target for one sample as the mean over all trees
    pub fn predict_one(&self, sample: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(MathError::CalculationError(
                "Random forest has not been fitted".to_string(),
            ));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict_one(sample)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    /// Predict the target for each sample
    pub fn predict(&self, samples: &[Vec<f64>]) -> Result<Vec<f64>> {
        samples.iter().map(|s| self.predict_one(s)).collect()
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Whether `fit` has been called
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Forest configuration
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

/// Draw `n` sample indices uniformly with replacement
fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}
