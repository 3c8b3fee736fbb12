use agri_smart::{AgriConfig, AgriError, AgriSmart, DataLoader, Trend};
use pretty_assertions::assert_eq;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PRODUCTION: &str = "District_Name,Crop_Name,Season,Cultivated_Area_Hectares,Yield_Quintals_per_Ha,Production_Metric_Tons\n\
Dhaka,Rice,Kharif,1200,40.0,4800\n\
Dhaka,Rice,Rabi,1000,50.0,5000\n\
Dhaka,Potato,Rabi,300,180.0,5400\n\
Sylhet,Tea,Kharif,900,12.0,1080\n";

const SOIL: &str = "District_Name,Soil_Type,pH_Level,Organic_Matter_Percent,Nitrogen_Content_kg_ha,Phosphorus_Content_kg_ha,Potassium_Content_kg_ha\n\
Dhaka,Loamy,6.8,2.5,280,35,190\n\
Chittagong,Hill,5.2,3.1,210,22,160\n";

/// Fifteen daily Dhaka rice prices plus one recent rice price elsewhere
fn price_table() -> String {
    let mut csv = String::from("District_Name,Crop_Name,Market_Name,Price_Date,Price_Tk_kg\n");
    for day in 1..=15 {
        let price = if day == 15 { 32.0 } else { 30.0 + (day % 3) as f64 };
        writeln!(csv, "Dhaka,Rice,Kawran Bazar,2024-01-{:02},{}", day, price).unwrap();
    }
    writeln!(csv, "Chittagong,Rice,Reazuddin Bazar,2024-01-10,35.0").unwrap();
    writeln!(csv, "Sylhet,Rice,Bandar Bazar,2024-01-12,30.0").unwrap();
    writeln!(csv, "Sylhet,Wheat,Bandar Bazar,2023-06-01,41.0").unwrap();
    csv
}

fn write_tables(dir: &Path, config: &AgriConfig) {
    fs::write(dir.join(&config.files.prices), price_table()).unwrap();
    fs::write(dir.join(&config.files.production), PRODUCTION).unwrap();
    fs::write(dir.join(&config.files.soil), SOIL).unwrap();
}

#[test]
fn test_end_to_end_queries() {
    let dir = tempdir().unwrap();
    let config = AgriConfig::default();
    write_tables(dir.path(), &config);

    let smart = AgriSmart::from_dir(dir.path(), config).unwrap();

    let forecast = smart.forecast("Dhaka", "Rice").unwrap();
    assert_eq!(forecast.forecast.len(), 30);
    assert_eq!(forecast.forecast[0].date.to_string(), "2024-01-16");
    assert_eq!(forecast.forecast[29].date.to_string(), "2024-02-14");
    assert!(matches!(forecast.trend, Trend::Increasing | Trend::Decreasing));

    let ranking = smart.best_market("Rice").unwrap();
    let order: Vec<&str> = ranking.entries.iter().map(|q| q.district.as_str()).collect();
    assert_eq!(order, vec!["Chittagong", "Dhaka", "Sylhet"]);
    assert_eq!(ranking.best_price, 35.0);

    let advice = smart.advise("Dhaka").unwrap();
    let crops: Vec<&str> = advice.recommendations.iter().map(|c| c.crop.as_str()).collect();
    assert_eq!(crops, vec!["Potato", "Rice"]);
    assert_eq!(advice.recommendations[1].average_yield, 45.0);
}

#[test]
fn test_recoverable_errors_surface_per_query() {
    let dir = tempdir().unwrap();
    let config = AgriConfig::default();
    write_tables(dir.path(), &config);
    let smart = AgriSmart::from_dir(dir.path(), config).unwrap();

    // Wheat was last traded months before the newest record
    assert!(matches!(
        smart.best_market("Wheat"),
        Err(AgriError::NoRecentDataError { .. })
    ));
    assert!(matches!(
        smart.forecast("Sylhet", "Rice"),
        Err(AgriError::InsufficientDataError { found: 1, .. })
    ));
    // Production history alone is not enough without a soil record
    assert!(matches!(
        smart.advise("Sylhet"),
        Err(AgriError::NotFoundError { .. })
    ));
    // Soil record without production history gives an empty list
    assert!(smart.advise("Chittagong").unwrap().recommendations.is_empty());
}

#[test]
fn test_reload_from_disk() {
    let dir = tempdir().unwrap();
    let config = AgriConfig::default();
    write_tables(dir.path(), &config);
    let smart = AgriSmart::from_dir(dir.path(), config.clone()).unwrap();
    let before = smart.forecast("Dhaka", "Rice").unwrap();

    let extra = "Dhaka,Rice,Kawran Bazar,2024-01-16,40.0\n";
    let mut prices = price_table();
    prices.push_str(extra);
    fs::write(dir.path().join(&config.files.prices), prices).unwrap();

    smart.reload(DataLoader::from_dir(dir.path(), &config.files).unwrap());
    let after = smart.forecast("Dhaka", "Rice").unwrap();

    assert_eq!(smart.data_version(), 1);
    assert_eq!(before.historical.len(), 15);
    assert_eq!(after.historical.len(), 16);
    assert_eq!(after.forecast[0].date.to_string(), "2024-01-17");
}

#[test]
fn test_missing_directory_fails_to_load() {
    let dir = tempdir().unwrap();
    let result = AgriSmart::from_dir(dir.path().join("absent"), AgriConfig::default());
    assert!(matches!(result, Err(AgriError::DataUnavailableError { .. })));
}
