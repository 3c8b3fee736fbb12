//! Source tables: price observations, production records and soil records
//!
//! Everything here is read-only once constructed. [`TimeSeriesStore`] owns
//! the price table and answers the filtered, date-ordered lookups the
//! forecaster and the market ranker need.

use crate::error::{AgriError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the price table in error messages
pub const PRICE_TABLE: &str = "price";
/// Name of the production table in error messages
pub const PRODUCTION_TABLE: &str = "production";
/// Name of the soil table in error messages
pub const SOIL_TABLE: &str = "soil";

/// A single market price for a crop in a district on a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// District the market belongs to
    pub district: String,
    /// Crop name
    pub crop: String,
    /// Observation date
    pub date: NaiveDate,
    /// Price in currency per kg
    pub price: f64,
}

impl PriceObservation {
    /// Create a new observation
    pub fn new(
        district: impl Into<String>,
        crop: impl Into<String>,
        date: NaiveDate,
        price: f64,
    ) -> Self {
        Self {
            district: district.into(),
            crop: crop.into(),
            date,
            price,
        }
    }
}

/// Untyped price row as delivered by a loader, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPriceRow {
    #[serde(alias = "District_Name")]
    pub district: Option<String>,
    #[serde(alias = "Crop_Name")]
    pub crop: Option<String>,
    #[serde(alias = "Price_Date")]
    pub date: Option<String>,
    #[serde(alias = "Price_Tk_kg")]
    pub price: Option<String>,
}

impl RawPriceRow {
    /// Convenience constructor with every field present
    pub fn new(district: &str, crop: &str, date: &str, price: &str) -> Self {
        Self {
            district: Some(district.to_string()),
            crop: Some(crop.to_string()),
            date: Some(date.to_string()),
            price: Some(price.to_string()),
        }
    }

    /// Validate and convert into a typed observation
    fn parse(self, row: usize) -> Result<PriceObservation> {
        let district = required_text(self.district, row, "district")?;
        let crop = required_text(self.crop, row, "crop")?;

        let raw_date = required_text(self.date, row, "date")?;
        let date = parse_date(&raw_date).ok_or_else(|| {
            AgriError::data(PRICE_TABLE, row, format!("unparseable date '{}'", raw_date))
        })?;

        let raw_price = required_text(self.price, row, "price")?;
        let price: f64 = raw_price.parse().map_err(|_| {
            AgriError::data(PRICE_TABLE, row, format!("non-numeric price '{}'", raw_price))
        })?;

        let observation = PriceObservation {
            district,
            crop,
            date,
            price,
        };
        check_observation(&observation, row)?;
        Ok(observation)
    }
}

fn required_text(value: Option<String>, row: usize, field: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AgriError::data(
            PRICE_TABLE,
            row,
            format!("missing {}", field),
        )),
    }
}

/// Parse `YYYY-MM-DD`, also accepting a trailing `HH:MM:SS` time part
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn check_observation(observation: &PriceObservation, row: usize) -> Result<()> {
    if observation.district.is_empty() {
        return Err(AgriError::data(PRICE_TABLE, row, "missing district"));
    }
    if observation.crop.is_empty() {
        return Err(AgriError::data(PRICE_TABLE, row, "missing crop"));
    }
    if !observation.price.is_finite() {
        return Err(AgriError::data(PRICE_TABLE, row, "price is not finite"));
    }
    if observation.price < 0.0 {
        return Err(AgriError::data(
            PRICE_TABLE,
            row,
            format!("negative price {}", observation.price),
        ));
    }
    Ok(())
}

/// Seasonal production figures for a crop in a district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    #[serde(alias = "District_Name")]
    pub district: String,
    #[serde(alias = "Crop_Name")]
    pub crop: String,
    #[serde(alias = "Season")]
    pub season: String,
    /// Cultivated area in hectares
    #[serde(alias = "Cultivated_Area_Hectares")]
    pub area_ha: f64,
    /// Yield in quintals per hectare
    #[serde(alias = "Yield_Quintals_per_Ha")]
    pub yield_q_per_ha: f64,
    /// Production in metric tons
    #[serde(alias = "Production_Metric_Tons")]
    pub production_tonnes: f64,
}

impl ProductionRecord {
    /// Reject non-finite or negative figures; `row` is the 0-based data row
    pub fn validate(&self, row: usize) -> Result<()> {
        for (field, value) in [
            ("area", self.area_ha),
            ("yield", self.yield_q_per_ha),
            ("production", self.production_tonnes),
        ] {
            if !value.is_finite() {
                return Err(AgriError::data(
                    PRODUCTION_TABLE,
                    row,
                    format!("{} is not finite", field),
                ));
            }
            if value < 0.0 {
                return Err(AgriError::data(
                    PRODUCTION_TABLE,
                    row,
                    format!("negative {} {}", field, value),
                ));
            }
        }
        Ok(())
    }
}

/// Soil analysis for a district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecord {
    #[serde(alias = "District_Name")]
    pub district: String,
    #[serde(alias = "Soil_Type")]
    pub soil_type: String,
    #[serde(alias = "pH_Level")]
    pub ph: f64,
    #[serde(alias = "Organic_Matter_Percent")]
    pub organic_matter_pct: f64,
    #[serde(alias = "Nitrogen_Content_kg_ha")]
    pub nitrogen_kg_ha: f64,
    #[serde(alias = "Phosphorus_Content_kg_ha")]
    pub phosphorus_kg_ha: f64,
    #[serde(alias = "Potassium_Content_kg_ha")]
    pub potassium_kg_ha: f64,
}

/// In-memory price table with filtered lookups
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    observations: Vec<PriceObservation>,
}

impl TimeSeriesStore {
    /// Build the store from raw rows.
    ///
    /// The first malformed row aborts the whole load.
    pub fn load<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawPriceRow>,
    {
        let observations = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| raw.parse(row))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { observations })
    }

    /// Build the store from already typed observations
    pub fn from_observations(observations: Vec<PriceObservation>) -> Result<Self> {
        for (row, observation) in observations.iter().enumerate() {
            check_observation(observation, row)?;
        }
        Ok(Self { observations })
    }

    /// All observations for the pair, ascending by date.
    ///
    /// Observations sharing a date keep their input order.
    pub fn filter(&self, district: &str, crop: &str) -> Vec<PriceObservation> {
        let mut series: Vec<PriceObservation> = self
            .observations
            .iter()
            .filter(|o| o.district == district && o.crop == crop)
            .cloned()
            .collect();
        series.sort_by_key(|o| o.date);
        series
    }

    /// Every district with at least one observation
    pub fn distinct_districts(&self) -> BTreeSet<String> {
        self.observations
            .iter()
            .map(|o| o.district.clone())
            .collect()
    }

    /// Every crop, optionally limited to one district
    pub fn distinct_crops(&self, district: Option<&str>) -> BTreeSet<String> {
        self.observations
            .iter()
            .filter(|o| district.map_or(true, |d| o.district == d))
            .map(|o| o.crop.clone())
            .collect()
    }

    /// Latest date across all observations
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).max()
    }

    /// Latest observation per district for `crop` dated within
    /// `[as_of - window_days, as_of]`.
    ///
    /// When a district has several observations on its latest date the one
    /// appearing last in input order is kept.
    pub fn recent_by_district(
        &self,
        crop: &str,
        window_days: u32,
        as_of: NaiveDate,
    ) -> BTreeMap<String, PriceObservation> {
        let start = as_of
            .checked_sub_signed(Duration::days(i64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);
        let mut latest: BTreeMap<String, PriceObservation> = BTreeMap::new();

        for observation in self
            .observations
            .iter()
            .filter(|o| o.crop == crop && o.date >= start && o.date <= as_of)
        {
            let replace = latest
                .get(&observation.district)
                .map_or(true, |current| observation.date >= current.date);
            if replace {
                latest.insert(observation.district.clone(), observation.clone());
            }
        }

        latest
    }

    /// All observations in input order
    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the store holds no observations
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// The three source tables loaded together
#[derive(Debug, Clone, Default)]
pub struct AgriDataset {
    prices: TimeSeriesStore,
    production: Vec<ProductionRecord>,
    soil: Vec<SoilRecord>,
}

impl AgriDataset {
    /// Bundle already loaded tables
    pub fn new(
        prices: TimeSeriesStore,
        production: Vec<ProductionRecord>,
        soil: Vec<SoilRecord>,
    ) -> Self {
        Self {
            prices,
            production,
            soil,
        }
    }

    /// Price table
    pub fn prices(&self) -> &TimeSeriesStore {
        &self.prices
    }

    /// Production table
    pub fn production(&self) -> &[ProductionRecord] {
        &self.production
    }

    /// Soil table
    pub fn soil(&self) -> &[SoilRecord] {
        &self.soil
    }
}
