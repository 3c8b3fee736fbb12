use agri_forecast::{AdvisorConfig, AgriError, ProductionRecord, SoilRecord, YieldAdvisor};
use approx::assert_relative_eq;

fn production(district: &str, crop: &str, season: &str, yield_q: f64) -> ProductionRecord {
    ProductionRecord {
        district: district.to_string(),
        crop: crop.to_string(),
        season: season.to_string(),
        area_ha: 500.0,
        yield_q_per_ha: yield_q,
        production_tonnes: 500.0 * yield_q / 10.0,
    }
}

fn soil(district: &str) -> SoilRecord {
    SoilRecord {
        district: district.to_string(),
        soil_type: "Alluvial".to_string(),
        ph: 6.4,
        organic_matter_pct: 1.8,
        nitrogen_kg_ha: 240.0,
        phosphorus_kg_ha: 28.0,
        potassium_kg_ha: 170.0,
    }
}

#[test]
fn test_single_season_yield_is_not_averaged_down() {
    let records = vec![production("Rajshahi", "Mango", "Zaid", 73.0)];
    let advice = YieldAdvisor::default()
        .advise(&records, &[soil("Rajshahi")], "Rajshahi")
        .unwrap();

    assert_eq!(advice.recommendations.len(), 1);
    assert_relative_eq!(advice.recommendations[0].average_yield, 73.0);
    assert_eq!(advice.recommendations[0].season_count, 1);
}

#[test]
fn test_top_five_by_average_yield() {
    let records = vec![
        production("Bogra", "Rice", "Kharif", 40.0),
        production("Bogra", "Rice", "Rabi", 60.0),
        production("Bogra", "Potato", "Rabi", 200.0),
        production("Bogra", "Jute", "Kharif", 25.0),
        production("Bogra", "Wheat", "Rabi", 30.0),
        production("Bogra", "Maize", "Rabi", 70.0),
        production("Bogra", "Lentil", "Rabi", 12.0),
        production("Bogra", "Mustard", "Rabi", 14.0),
        production("Dhaka", "Potato", "Rabi", 999.0),
    ];

    let advice = YieldAdvisor::default()
        .advise(&records, &[soil("Dhaka"), soil("Bogra")], "Bogra")
        .unwrap();

    let crops: Vec<&str> = advice
        .recommendations
        .iter()
        .map(|c| c.crop.as_str())
        .collect();
    assert_eq!(crops, vec!["Potato", "Maize", "Rice", "Wheat", "Jute"]);
    assert_relative_eq!(advice.recommendations[2].average_yield, 50.0);
    assert_eq!(advice.soil.district, "Bogra");
    assert_eq!(advice.district, "Bogra");
}

#[test]
fn test_equal_yields_keep_first_appearance_order() {
    let records = vec![
        production("Khulna", "Jute", "Kharif", 30.0),
        production("Khulna", "Rice", "Kharif", 30.0),
    ];
    let advice = YieldAdvisor::default()
        .advise(&records, &[soil("Khulna")], "Khulna")
        .unwrap();
    assert_eq!(advice.recommendations[0].crop, "Jute");
    assert_eq!(advice.recommendations[1].crop, "Rice");
}

#[test]
fn test_missing_soil_is_not_found() {
    let records = vec![production("Sylhet", "Tea", "Kharif", 15.0)];
    match YieldAdvisor::default().advise(&records, &[soil("Dhaka")], "Sylhet") {
        Err(AgriError::NotFoundError { table, key }) => {
            assert_eq!(table, "soil");
            assert_eq!(key, "Sylhet");
        }
        other => panic!("expected NotFoundError, got {:?}", other),
    }
}

#[test]
fn test_custom_top_n() {
    let records = vec![
        production("Dinajpur", "Rice", "Kharif", 45.0),
        production("Dinajpur", "Wheat", "Rabi", 32.0),
        production("Dinajpur", "Litchi", "Zaid", 80.0),
    ];
    let advisor = YieldAdvisor::new(AdvisorConfig { top_n: 2 }).unwrap();
    let advice = advisor
        .advise(&records, &[soil("Dinajpur")], "Dinajpur")
        .unwrap();
    assert_eq!(advice.recommendations.len(), 2);
    assert_eq!(advice.recommendations[0].crop, "Litchi");
}
