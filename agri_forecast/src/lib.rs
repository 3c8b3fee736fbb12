//! # Agri Forecast
//!
//! Short-horizon crop price forecasting and market comparison over district
//! price histories.
//!
//! ## Features
//!
//! - Typed price, production and soil tables with CSV loading
//! - 30-day price forecasts from a random forest over the date ordinal
//! - Best-market ranking of districts by their most recent price
//! - Crop recommendations from historical yields with soil context
//!
//! ## Quick Start
//!
//! ```no_run
//! use agri_forecast::{AgriConfig, DataLoader, ForecastEngine, MarketRanker, YieldAdvisor};
//!
//! let config = AgriConfig::default();
//! let dataset = DataLoader::from_dir("data", &config.files)?;
//!
//! // Forecast the next 30 days for one selection
//! let engine = ForecastEngine::new(config.forecast.clone())?;
//! let series = dataset.prices().filter("Dhaka", "Rice");
//! let forecast = engine.forecast("Dhaka", "Rice", &series)?;
//! println!("{} trend, avg {:.2}", forecast.trend, forecast.forecast_average);
//!
//! // Where does rice sell best right now?
//! let ranking = MarketRanker::new(config.market.clone()).rank(dataset.prices(), "Rice")?;
//! println!("sell in {} at {:.2}", ranking.best_district, ranking.best_price);
//!
//! // What grows best in Dhaka?
//! let advisor = YieldAdvisor::new(config.advisor.clone())?;
//! let advice = advisor.advise(dataset.production(), dataset.soil(), "Dhaka")?;
//! # Ok::<(), agri_forecast::AgriError>(())
//! ```

pub mod advisor;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod market;
pub mod models;

// Re-export commonly used types
pub use crate::advisor::{AdvisorConfig, CropAdvice, CropYield, YieldAdvisor};
pub use crate::config::{AgriConfig, DataFiles};
pub use crate::data::{
    AgriDataset, PriceObservation, ProductionRecord, RawPriceRow, SoilRecord, TimeSeriesStore,
};
pub use crate::error::{AgriError, Result};
pub use crate::forecast::{
    ForecastConfig, ForecastEngine, ForecastResult, SeriesKind, SeriesPoint, Trend,
};
pub use crate::loader::DataLoader;
pub use crate::market::{MarketConfig, MarketQuote, MarketRanker, MarketRanking};
pub use crate::models::random_forest::RandomForestModel;
pub use crate::models::{ForecastModel, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
