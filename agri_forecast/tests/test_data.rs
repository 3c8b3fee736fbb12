use agri_forecast::data::{PRICE_TABLE, SOIL_TABLE};
use agri_forecast::{AgriError, DataFiles, DataLoader, RawPriceRow, TimeSeriesStore};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

const PRICES: &str = "District_Name,Crop_Name,Market_Name,Price_Date,Price_Tk_kg\n\
Dhaka,Rice,Dhaka Sadar Bazar,2024-01-02,31.0\n\
Dhaka,Rice,Dhaka Sadar Bazar,2024-01-01,30.0\n\
Sylhet,Rice,Sylhet Sadar Bazar,2024-01-03,29.0\n\
Sylhet,Wheat,Sylhet Sadar Bazar,2024-01-03,41.0\n";

const PRODUCTION: &str = "District_Name,Crop_Name,Season,Cultivated_Area_Hectares,Yield_Quintals_per_Ha,Production_Metric_Tons\n\
Dhaka,Rice,Kharif,1200,42.5,5100\n\
Dhaka,Jute,Kharif,800,25.0,2000\n";

const SOIL: &str = "District_Name,Soil_Type,pH_Level,Organic_Matter_Percent,Nitrogen_Content_kg_ha,Phosphorus_Content_kg_ha,Potassium_Content_kg_ha\n\
Dhaka,Loamy,6.8,2.5,280,35,190\n";

fn write_tables(dir: &Path, files: &DataFiles) {
    fs::write(dir.join(&files.prices), PRICES).unwrap();
    fs::write(dir.join(&files.production), PRODUCTION).unwrap();
    fs::write(dir.join(&files.soil), SOIL).unwrap();
}

#[test]
fn test_data_loader_from_dir() {
    let dir = tempdir().unwrap();
    let files = DataFiles::default();
    write_tables(dir.path(), &files);

    let dataset = DataLoader::from_dir(dir.path(), &files).unwrap();

    assert_eq!(dataset.prices().len(), 4);
    assert_eq!(dataset.production().len(), 2);
    assert_eq!(dataset.soil().len(), 1);
    assert_eq!(
        dataset.prices().max_date(),
        NaiveDate::from_ymd_opt(2024, 1, 3)
    );
}

#[test]
fn test_missing_table_is_unavailable() {
    let dir = tempdir().unwrap();
    let files = DataFiles::default();
    write_tables(dir.path(), &files);
    fs::remove_file(dir.path().join(&files.soil)).unwrap();

    match DataLoader::from_dir(dir.path(), &files) {
        Err(AgriError::DataUnavailableError { table, .. }) => assert_eq!(table, SOIL_TABLE),
        other => panic!("expected DataUnavailableError, got {:?}", other),
    }
}

#[test]
fn test_custom_file_names() {
    let dir = tempdir().unwrap();
    let files = DataFiles {
        prices: "p.csv".to_string(),
        production: "q.csv".to_string(),
        soil: "s.csv".to_string(),
    };
    write_tables(dir.path(), &files);

    assert!(DataLoader::from_dir(dir.path(), &files).is_ok());
    assert!(DataLoader::from_dir(dir.path(), &DataFiles::default()).is_err());
}

#[test]
fn test_malformed_price_aborts_load() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "District_Name,Crop_Name,Price_Date,Price_Tk_kg").unwrap();
    writeln!(file, "Dhaka,Rice,2024-01-01,30.0").unwrap();
    writeln!(file, "Dhaka,Rice,01/02/2024,31.0").unwrap();

    let reader = fs::File::open(file.path()).unwrap();
    match DataLoader::read_prices(reader) {
        Err(AgriError::DataError { table, row, .. }) => {
            assert_eq!(table, PRICE_TABLE);
            assert_eq!(row, 1);
        }
        other => panic!("expected DataError, got {:?}", other),
    }
}

#[test]
fn test_store_queries() {
    let store = TimeSeriesStore::load(vec![
        RawPriceRow::new("Dhaka", "Rice", "2024-02-01", "30"),
        RawPriceRow::new("Dhaka", "Rice", "2024-01-01", "28"),
        RawPriceRow::new("Khulna", "Onion", "2024-02-02", "55"),
    ])
    .unwrap();

    assert_eq!(store.len(), 3);
    assert!(!store.is_empty());

    let series = store.filter("Dhaka", "Rice");
    assert_eq!(series.len(), 2);
    assert!(series[0].date < series[1].date);

    assert!(store.distinct_crops(Some("Khulna")).contains("Onion"));
    assert!(!store.distinct_crops(Some("Khulna")).contains("Rice"));
    assert_eq!(store.distinct_districts().len(), 2);
}
