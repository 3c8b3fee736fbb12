//! CSV loading of the price, production and soil tables

use crate::config::DataFiles;
use crate::data::{
    AgriDataset, ProductionRecord, RawPriceRow, SoilRecord, TimeSeriesStore, PRICE_TABLE,
    PRODUCTION_TABLE, SOIL_TABLE,
};
use crate::error::{AgriError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Data loader for the source tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load all three tables from `dir`.
    ///
    /// Every file is opened before any is parsed, so a missing table is
    /// reported without touching the others.
    pub fn from_dir<P: AsRef<Path>>(dir: P, files: &DataFiles) -> Result<AgriDataset> {
        let dir = dir.as_ref();
        let prices = Self::open(&dir.join(&files.prices), PRICE_TABLE)?;
        let production = Self::open(&dir.join(&files.production), PRODUCTION_TABLE)?;
        let soil = Self::open(&dir.join(&files.soil), SOIL_TABLE)?;

        let dataset = AgriDataset::new(
            Self::read_prices(prices)?,
            Self::read_production(production)?,
            Self::read_soil(soil)?,
        );

        info!(
            dir = %dir.display(),
            prices = dataset.prices().len(),
            production = dataset.production().len(),
            soil = dataset.soil().len(),
            "loaded agricultural dataset"
        );
        Ok(dataset)
    }

    /// Read the price table
    pub fn read_prices<R: Read>(reader: R) -> Result<TimeSeriesStore> {
        let rows: Vec<RawPriceRow> = Self::read_table(reader, PRICE_TABLE)?;
        TimeSeriesStore::load(rows)
    }

    /// Read the production table; a non-finite or negative figure aborts the load
    pub fn read_production<R: Read>(reader: R) -> Result<Vec<ProductionRecord>> {
        let records: Vec<ProductionRecord> = Self::read_table(reader, PRODUCTION_TABLE)?;
        for (row, record) in records.iter().enumerate() {
            record.validate(row)?;
        }
        Ok(records)
    }

    /// Read the soil table
    pub fn read_soil<R: Read>(reader: R) -> Result<Vec<SoilRecord>> {
        Self::read_table(reader, SOIL_TABLE)
    }

    fn open(path: &Path, table: &str) -> Result<File> {
        File::open(path)
            .map_err(|e| AgriError::unavailable(table, format!("{}: {}", path.display(), e)))
    }

    fn read_table<T, R>(reader: R, table: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        csv_reader
            .deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()
            .map_err(|e| AgriError::unavailable(table, e))
    }
}
