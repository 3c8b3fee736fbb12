//! Descriptive statistics shared by the tree learners

use crate::{MathError, Result};

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from the mean (zero for an empty slice)
pub fn sum_squared_deviations(values: &[f64]) -> f64 {
    match mean(values) {
        Some(m) => values.iter().map(|v| (v - m).powi(2)).sum(),
        None => 0.0,
    }
}

/// Check that a training set is non-empty, rectangular and finite.
///
/// Returns the number of features per row.
pub fn validate_training_set(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if targets.is_empty() {
        return Err(MathError::InsufficientData(
            "Training set contains no samples".to_string(),
        ));
    }

    if features.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Feature rows ({}) and targets ({}) differ in length",
            features.len(),
            targets.len()
        )));
    }

    let n_features = features[0].len();
    if n_features == 0 {
        return Err(MathError::InvalidInput(
            "Samples must have at least one feature".to_string(),
        ));
    }

    for (i, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(MathError::InvalidInput(format!(
                "Row {} has {} features, expected {}",
                i,
                row.len(),
                n_features
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Row {} contains a non-finite feature",
                i
            )));
        }
    }

    if let Some(i) = targets.iter().position(|t| !t.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Target {} is not finite",
            i
        )));
    }

    Ok(n_features)
}
