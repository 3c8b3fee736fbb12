//! # Agri Smart workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`math`]: regression trees and the seeded random forest
//! - [`forecast`]: price tables, forecasting, market ranking and yield advice
//! - [`smart`]: the memoizing query facade
//!
//! ## Example
//!
//! ```
//! use agri_smart_workspace::forecast::Trend;
//!
//! // A forecast average equal to today's price is not a rise
//! assert_eq!(Trend::classify(31.0, 30.0), Trend::Increasing);
//! assert_eq!(Trend::classify(30.0, 30.0), Trend::Decreasing);
//! ```

pub use agri_forecast as forecast;
pub use agri_math as math;
pub use agri_smart as smart;

pub use agri_smart::{AgriConfig, AgriError, AgriSmart};
