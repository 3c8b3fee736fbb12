//! Crop recommendations from historical yields, with soil context

use crate::data::{ProductionRecord, SoilRecord, SOIL_TABLE};
use crate::error::{AgriError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Yield advisor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Number of crops recommended
    pub top_n: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

/// Average yield of a crop across the seasons on record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropYield {
    pub crop: String,
    /// Mean yield in quintals per hectare
    pub average_yield: f64,
    /// Production records averaged
    pub season_count: usize,
}

/// Soil report and ranked crops for a district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAdvice {
    pub district: String,
    pub soil: SoilRecord,
    /// Highest average yield first
    pub recommendations: Vec<CropYield>,
}

/// Ranks crops for a district by historical average yield
#[derive(Debug, Clone, Default)]
pub struct YieldAdvisor {
    config: AdvisorConfig,
}

impl YieldAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        if config.top_n == 0 {
            return Err(AgriError::InvalidParameter(
                "top_n must be positive".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Advisor settings
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Soil record and top crops for `district`.
    ///
    /// A district without a soil record is an error even when production
    /// data exists. If the soil table lists the district more than once the
    /// first record is used.
    pub fn advise(
        &self,
        production: &[ProductionRecord],
        soil: &[SoilRecord],
        district: &str,
    ) -> Result<CropAdvice> {
        let mut matches = soil.iter().filter(|s| s.district == district);
        let record = matches
            .next()
            .cloned()
            .ok_or_else(|| AgriError::not_found(SOIL_TABLE, district))?;

        let extra = matches.count();
        if extra > 0 {
            warn!(
                district,
                records = extra + 1,
                "multiple soil records for district, using the first"
            );
        }

        let mut recommendations = average_yields(production, district);
        recommendations.sort_by(|a, b| descending_nan_last(a.average_yield, b.average_yield));
        recommendations.truncate(self.config.top_n);

        debug!(
            district,
            crops = recommendations.len(),
            "computed crop recommendations"
        );

        Ok(CropAdvice {
            district: district.to_string(),
            soil: record,
            recommendations,
        })
    }

    /// Districts present in the soil table
    pub fn soil_districts(soil: &[SoilRecord]) -> BTreeSet<String> {
        soil.iter().map(|s| s.district.clone()).collect()
    }
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.total_cmp(&a),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

/// Mean yield per crop for a district, crops in first-appearance order
fn average_yields(production: &[ProductionRecord], district: &str) -> Vec<CropYield> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for record in production.iter().filter(|p| p.district == district) {
        match groups.iter().position(|(crop, _)| *crop == record.crop) {
            Some(i) => groups[i].1.push(record.yield_q_per_ha),
            None => groups.push((record.crop.clone(), vec![record.yield_q_per_ha])),
        }
    }

    groups
        .into_iter()
        .map(|(crop, yields)| CropYield {
            crop,
            season_count: yields.len(),
            average_yield: yields.iter().mean(),
        })
        .collect()
}
