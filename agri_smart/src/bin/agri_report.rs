use agri_smart::{AgriConfig, AgriError, AgriSmart};
use std::env;
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("Usage: agri_report <data-dir> [config.json]");
    process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let data_dir = match args.get(1) {
        Some(dir) => dir,
        None => usage(),
    };
    let config = match args.get(2) {
        Some(path) => AgriConfig::from_json_file(path)?,
        None => AgriConfig::default(),
    };

    let smart = AgriSmart::from_dir(data_dir, config)?;
    let districts = smart.districts();
    println!(
        "Loaded {} districts, {} crops, {} soil records",
        districts.len(),
        smart.crops(None).len(),
        smart.soil_districts().len()
    );

    // Forecast for the first selection that has enough history
    println!("\n=== Price forecast ===");
    let selection = districts.iter().find_map(|district| {
        smart
            .crops(Some(district))
            .into_iter()
            .find_map(|crop| match smart.forecast(district, &crop) {
                Ok(result) => Some(result),
                Err(e) if e.is_recoverable() => None,
                Err(e) => {
                    warn!(error = %e, "forecast failed");
                    None
                }
            })
    });
    match selection {
        Some(forecast) => {
            println!(
                "{} in {}: current {:.2} Tk/kg, next 7 days {:.2}, next {} days {:.2} ({})",
                forecast.crop,
                forecast.district,
                forecast.current_price,
                forecast.near_term_average,
                forecast.forecast.len(),
                forecast.forecast_average,
                forecast.trend
            );
            if let Some(change) = forecast.expected_change_pct() {
                println!("Expected change: {:+.1}%", change);
            }
        }
        None => println!("No district/crop pair has enough history to forecast"),
    }

    println!("\n=== Best markets ===");
    for crop in smart.crops(None) {
        match smart.best_market(&crop) {
            Ok(ranking) => println!(
                "{:<15} {:<15} {:>8.2} Tk/kg (spread {:.2}, as of {})",
                crop,
                ranking.best_district,
                ranking.best_price,
                ranking.price_spread(),
                ranking.as_of
            ),
            Err(AgriError::NoRecentDataError { window_days, .. }) => {
                println!("{:<15} no prices in the last {} days", crop, window_days)
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("\n=== Crop advice ===");
    for district in smart.soil_districts() {
        let advice = smart.advise(&district)?;
        let crops: Vec<String> = advice
            .recommendations
            .iter()
            .map(|c| format!("{} ({:.1} q/ha)", c.crop, c.average_yield))
            .collect();
        println!(
            "{:<15} {} soil, pH {:.1}: {}",
            district,
            advice.soil.soil_type,
            advice.soil.ph,
            if crops.is_empty() {
                "no production history".to_string()
            } else {
                crops.join(", ")
            }
        );
    }

    Ok(())
}
