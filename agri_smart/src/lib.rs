//! # Agri Smart
//!
//! `agri_smart` answers the three questions a farmer brings to the price
//! tables: what will this crop fetch over the next month, where does it
//! sell best right now, and what grows best in my district.
//!
//! ## Example
//!
//! ```no_run
//! use agri_smart::{AgriConfig, AgriSmart};
//!
//! let smart = AgriSmart::from_dir("data", AgriConfig::default())?;
//! let forecast = smart.forecast("Dhaka", "Rice")?;
//! let market = smart.best_market("Rice")?;
//! let advice = smart.advise("Dhaka")?;
//! println!(
//!     "{} is {}; sell in {}; top crop {}",
//!     forecast.crop,
//!     forecast.trend,
//!     market.best_district,
//!     advice.recommendations[0].crop
//! );
//! # Ok::<(), agri_smart::AgriError>(())
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

pub use agri_forecast::{
    AgriConfig, AgriDataset, AgriError, CropAdvice, CropYield, DataLoader, ForecastResult,
    MarketQuote, MarketRanking, Result, SeriesKind, SeriesPoint, Trend,
};
use agri_forecast::{ForecastEngine, MarketRanker, YieldAdvisor};

type CacheKey = (String, String);

/// Loaded tables plus the three query engines.
///
/// Forecasts are memoized per selection and tagged with the data version
/// they were computed from; `reload` bumps the version and drops them.
#[derive(Debug)]
pub struct AgriSmart {
    dataset: RwLock<Arc<AgriDataset>>,
    config: AgriConfig,
    engine: ForecastEngine,
    ranker: MarketRanker,
    advisor: YieldAdvisor,
    version: AtomicU64,
    cache: Mutex<HashMap<CacheKey, (u64, ForecastResult)>>,
}

impl AgriSmart {
    /// Build the facade over an already loaded dataset
    pub fn new(dataset: AgriDataset, config: AgriConfig) -> Result<Self> {
        config.validate()?;
        let engine = ForecastEngine::new(config.forecast.clone())?;
        let ranker = MarketRanker::new(config.market.clone());
        let advisor = YieldAdvisor::new(config.advisor.clone())?;

        Ok(Self {
            dataset: RwLock::new(Arc::new(dataset)),
            config,
            engine,
            ranker,
            advisor,
            version: AtomicU64::new(0),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Load the three CSV tables named in `config.files` from `dir`
    pub fn from_dir<P: AsRef<Path>>(dir: P, config: AgriConfig) -> Result<Self> {
        let dataset = DataLoader::from_dir(dir, &config.files)?;
        Self::new(dataset, config)
    }

    pub fn config(&self) -> &AgriConfig {
        &self.config
    }

    /// Snapshot of the current dataset
    pub fn dataset(&self) -> Arc<AgriDataset> {
        match self.dataset.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Incremented on every reload, starting at 0
    pub fn data_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// 30-day forecast for one district and crop.
    ///
    /// Repeated calls for the same selection and data version return the
    /// memoized result without retraining.
    pub fn forecast(&self, district: &str, crop: &str) -> Result<ForecastResult> {
        let key = (district.to_string(), crop.to_string());
        let version = self.data_version();

        if let Some((cached_version, result)) = self.lock_cache().get(&key) {
            if *cached_version == version {
                debug!(district, crop, version, "forecast cache hit");
                return Ok(result.clone());
            }
        }

        let dataset = self.dataset();
        let series = dataset.prices().filter(district, crop);
        let result = self.engine.forecast(district, crop, &series)?;

        // A reload in the meantime makes this result stale; don't cache it
        if self.data_version() == version {
            self.lock_cache().insert(key, (version, result.clone()));
        }
        Ok(result)
    }

    /// Districts ranked by their current price for `crop`
    pub fn best_market(&self, crop: &str) -> Result<MarketRanking> {
        self.ranker.rank(self.dataset().prices(), crop)
    }

    /// Soil record and best-yielding crops for `district`
    pub fn advise(&self, district: &str) -> Result<CropAdvice> {
        let dataset = self.dataset();
        self.advisor.advise(dataset.production(), dataset.soil(), district)
    }

    /// Districts that appear in the price table
    pub fn districts(&self) -> BTreeSet<String> {
        self.dataset().prices().distinct_districts()
    }

    /// Crops in the price table, optionally limited to one district
    pub fn crops(&self, district: Option<&str>) -> BTreeSet<String> {
        self.dataset().prices().distinct_crops(district)
    }

    /// Districts that have a soil record
    pub fn soil_districts(&self) -> BTreeSet<String> {
        YieldAdvisor::soil_districts(self.dataset().soil())
    }

    /// Swap in a freshly loaded dataset and invalidate memoized forecasts
    pub fn reload(&self, dataset: AgriDataset) {
        let dataset = Arc::new(dataset);
        match self.dataset.write() {
            Ok(mut guard) => *guard = dataset,
            Err(poisoned) => *poisoned.into_inner() = dataset,
        }
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_cache().clear();
        info!(version, "dataset reloaded");
    }

    /// Number of memoized forecasts
    pub fn cached_forecasts(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<CacheKey, (u64, ForecastResult)>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
