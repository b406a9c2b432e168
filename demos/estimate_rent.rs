//! Fill the form once against a running valuation service.
//!
//! ```text
//! MIETPREIS_API_BASE=http://localhost:8000 RUST_LOG=info \
//!     cargo run --example estimate_rent -- 80331 62
//! ```

use mietpreis_rs::prediction::{format_percent, HeatingType, HttpPredictionService};
use mietpreis_rs::{FormSession, GeoLoader, ServiceConfig};
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let postal_code = args.next().unwrap_or_else(|| "80331".to_string());
    let living_space: f64 = args.next().map(|a| a.parse()).transpose()?.unwrap_or(62.0);

    let config = ServiceConfig::from_env()?;
    println!("=== Mietpreis estimate via {} ===\n", config.base_url);

    let client = reqwest::Client::new();
    let mut session = FormSession::new(GeoLoader::from_config(client.clone(), &config));
    let service = HttpPredictionService::from_config(client, &config);

    if let Err(failure) = session.load_geo().await {
        eprintln!("Standortdaten: {}", failure.message);
        return Ok(());
    }

    let lookup = session.selector_mut().edit_postal_code(&postal_code)?;
    session.selector_mut().finish_postal_code_edit();
    println!("Postleitzahl {postal_code}: {lookup:?}");

    let attrs = session.attributes_mut();
    attrs.living_space = living_space;
    attrs.heating_type = HeatingType::Fernwaerme;
    attrs.balcony = true;

    match session.submit(&service).await {
        Ok(result) => {
            println!("Geschätzte Gesamtmiete: {} €", result.point_estimate_text());
            if let Some(interval) = result.interval_text() {
                println!("Intervall: {interval} €");
            }
            if let Some(per_area) = result.price_per_area_text() {
                println!("Preis pro m²: {per_area}");
            }
            if let Some(summary) = session.view().summary {
                println!("{summary}");
            }
            for warning in &result.warnings {
                println!("Hinweis: {warning}");
            }
            for feature in &result.feature_importance {
                println!("  {:<20} {}", feature.name, format_percent(feature.weight));
            }
            if let Some(note) = &result.confidence_note {
                println!("({note})");
            }
        }
        Err(failure) => eprintln!("Fehler: {}", failure.user_message()),
    }
    Ok(())
}
