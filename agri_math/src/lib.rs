//! # Agri Math
//!
//! Numerical building blocks for the crop price forecaster.
//! This crate provides CART regression trees and a bagged ensemble of them
//! (a random forest regressor), plus the small statistics helpers both rely on.
//!
//! ## Example
//!
//! ```
//! use agri_math::{ForestConfig, RandomForestRegressor};
//!
//! let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
//! let targets: Vec<f64> = (0..20).map(|i| if i < 10 { 1.0 } else { 5.0 }).collect();
//!
//! let mut forest = RandomForestRegressor::new(ForestConfig::default()).unwrap();
//! forest.fit(&features, &targets).unwrap();
//!
//! let prediction = forest.predict_one(&[25.0]).unwrap();
//! assert!(prediction > 1.0 && prediction <= 5.0);
//! ```

use thiserror::Error;

pub mod forest;
pub mod stats;
pub mod tree;

pub use forest::{ForestConfig, RandomForestRegressor};
pub use tree::{RegressionTree, TreeConfig};

/// Errors that can occur while fitting or evaluating regression models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for regression operations
pub type Result<T> = std::result::Result<T, MathError>;
