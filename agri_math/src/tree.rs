//! CART regression tree
//!
//! Splits are chosen by variance reduction. Candidate thresholds are the
//! midpoints between consecutive distinct feature values, and a sample goes
//! left when its feature value is `<=` the threshold.

use crate::stats::{mean, sum_squared_deviations, validate_training_set};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Impurity at or below which a node is treated as pure
const PURITY_EPSILON: f64 = 1e-12;

/// Growth limits for a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree (None = grow until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may be split
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeConfig {
    /// Check that the limits can produce a tree
    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(MathError::InvalidInput(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(MathError::InvalidInput(
                "min_samples_leaf must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Regression tree fitted to minimise squared error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    config: TreeConfig,
    root: Option<Node>,
    n_features: usize,
}

impl RegressionTree {
    /// Create an unfitted tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    /// Fit the tree to every sample of the training set
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        self.config.validate()?;
        let n_features = validate_training_set(features, targets)?;
        let indices: Vec<usize> = (0..targets.len()).collect();
        self.fit_indices(features, targets, n_features, indices);
        Ok(())
    }

    /// Fit on the given sample indices, which may repeat (bootstrap draws).
    ///
    /// The training set must already have been validated.
    pub(crate) fn fit_indices(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        n_features: usize,
        indices: Vec<usize>,
    ) {
        self.n_features = n_features;
        self.root = Some(self.build(features, targets, indices, 0));
    }

    fn build(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
    ) -> Node {
        let labels: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();
        let value = mean(&labels).unwrap_or(0.0);
        let impurity = sum_squared_deviations(&labels) / labels.len().max(1) as f64;

        let depth_reached = self.config.max_depth.map_or(false, |d| depth >= d);
        if depth_reached
            || indices.len() < self.config.min_samples_split
            || impurity <= PURITY_EPSILON
        {
            return Node::Leaf {
                value,
                n_samples: indices.len(),
            };
        }

        match self.find_best_split(features, targets, &indices) {
            Some(split) => Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.build(features, targets, split.left, depth + 1)),
                right: Box::new(self.build(features, targets, split.right, depth + 1)),
            },
            None => Node::Leaf {
                value,
                n_samples: indices.len(),
            },
        }
    }

    /// Scan every feature for the threshold with the lowest summed child SSE
    fn find_best_split(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
    ) -> Option<BestSplit> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf;
        let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();

        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..self.n_features {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for pos in 0..n - 1 {
                let y = targets[order[pos]];
                left_sum += y;
                left_sq += y * y;

                let x_here = features[order[pos]][feature];
                let x_next = features[order[pos + 1]][feature];
                if x_here == x_next {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if best.map_or(true, |(_, _, best_sse)| sse < best_sse) {
                    let mut threshold = x_here + (x_next - x_here) / 2.0;
                    if threshold >= x_next {
                        threshold = x_here;
                    }
                    best = Some((feature, threshold, sse));
                }
            }
        }

        best.map(|(feature, threshold, _)| {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| features[i][feature] <= threshold);
            BestSplit {
                feature,
                threshold,
                left,
                right,
            }
        })
    }

    /// Predict the target for one sample
    pub fn predict_one(&self, sample: &[f64]) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or_else(|| {
            MathError::CalculationError("Regression tree has not been fitted".to_string())
        })?;

        if sample.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Sample has {} features, tree was fitted on {}",
                sample.len(),
                self.n_features
            )));
        }

        loop {
            match node {
                Node::Leaf { value, .. } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Whether `fit` has been called
    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Depth of the fitted tree (0 when unfitted)
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Number of leaves of the fitted tree (0 when unfitted)
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Node::n_leaves)
    }

    /// Number of training samples that reached the leaf predicting `sample`
    pub fn leaf_samples(&self, sample: &[f64]) -> Option<usize> {
        let mut node = self.root.as_ref()?;
        loop {
            match node {
                Node::Leaf { n_samples, .. } => return Some(*n_samples),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = sample.get(*feature)?;
                    node = if *x <= *threshold { left } else { right };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn column(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_fits_step_function_exactly() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 2.0 } else { 8.0 }).collect();

        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&column(&x), &y).unwrap();

        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.depth(), 2);
        assert_relative_eq!(tree.predict_one(&[4.0]).unwrap(), 2.0);
        assert_relative_eq!(tree.predict_one(&[4.4]).unwrap(), 2.0);
        assert_relative_eq!(tree.predict_one(&[4.6]).unwrap(), 8.0);
    }

    #[test]
    fn test_extrapolates_with_outermost_leaf() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 20.0, 30.0, 40.0];

        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&column(&x), &y).unwrap();

        // Fully grown: every distinct x is its own leaf
        assert_eq!(tree.n_leaves(), 4);
        assert_relative_eq!(tree.predict_one(&[100.0]).unwrap(), 40.0);
        assert_relative_eq!(tree.predict_one(&[-5.0]).unwrap(), 10.0);
    }

    #[test]
    fn test_duplicate_feature_values_share_a_leaf() {
        let x = [1.0, 1.0, 2.0];
        let y = [3.0, 5.0, 9.0];

        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&column(&x), &y).unwrap();

        assert_relative_eq!(tree.predict_one(&[1.0]).unwrap(), 4.0);
        assert_eq!(tree.leaf_samples(&[1.0]), Some(2));
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let y = x.clone();

        let mut tree = RegressionTree::new(TreeConfig {
            max_depth: Some(2),
            ..Default::default()
        });
        tree.fit(&column(&x), &y).unwrap();

        assert_eq!(tree.depth(), 3);
        assert!(tree.n_leaves() <= 4);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&column(&[1.0, 2.0, 3.0]), &[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(tree.n_leaves(), 1);
        assert_relative_eq!(tree.predict_one(&[2.5]).unwrap(), 7.0);
    }

    #[test]
    fn test_unfitted_and_bad_input() {
        let tree = RegressionTree::new(TreeConfig::default());
        assert!(!tree.is_fitted());
        assert!(matches!(
            tree.predict_one(&[1.0]),
            Err(MathError::CalculationError(_))
        ));

        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&column(&[1.0, 2.0]), &[1.0, 2.0]).unwrap();
        assert!(matches!(
            tree.predict_one(&[1.0, 2.0]),
            Err(MathError::InvalidInput(_))
        ));

        let mut tree = RegressionTree::new(TreeConfig {
            min_samples_split: 1,
            ..Default::default()
        });
        assert!(tree.fit(&column(&[1.0]), &[1.0]).is_err());
    }
}
