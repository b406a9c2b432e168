//! Walk through the location selects offline.
//!
//! Loads `demos/geo_data.json` (or the file given as first argument) and
//! shows how state, city and postal code keep each other consistent.
//!
//! ```text
//! RUST_LOG=debug cargo run --example walk_selection
//! ```

use mietpreis_rs::loader::{FileSource, StaticSource};
use mietpreis_rs::{GeoLoader, LocationSelector};
use std::error::Error;

const EMPTY: &str = "{}";

fn print_selection(step: &str, selector: &LocationSelector) {
    let s = selector.selection();
    println!(
        "{step:<28} state={:<10} city={:<20} plz={}",
        s.state(),
        s.city(),
        s.postal_code()
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    println!("=== Mietpreis location selection ===\n");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/geo_data.json").to_string());

    // The file is the primary; an empty payload stands in for the fallback.
    let loader = GeoLoader::new(FileSource::new(path), StaticSource::new("empty", EMPTY));
    let index = loader.load().await?;
    println!("Loaded: {:?}\n", index.stats());

    let mut selector = LocationSelector::with_index(index);
    print_selection("initial", &selector);
    println!("  states: {:?}", selector.state_options());

    selector.select_state("Hessen")?;
    print_selection("select state Hessen", &selector);
    println!("  cities: {:?}", selector.city_options());

    selector.select_city("Wiesbaden")?;
    print_selection("select city Wiesbaden", &selector);

    for typed in ["8", "803", "80331"] {
        let lookup = selector.edit_postal_code(typed)?;
        print_selection(&format!("type {typed:?} ({lookup:?})"), &selector);
    }

    let lookup = selector.edit_postal_code("99999")?;
    print_selection(&format!("type \"99999\" ({lookup:?})"), &selector);
    let repair = selector.finish_postal_code_edit();
    print_selection(&format!("leave field ({repair:?})"), &selector);

    if let Some(index) = selector.index() {
        println!("\nCities in Bayern matching \"nurn\": {:?}", index.search_cities("Bayern", "nurn"));
        println!("Postal codes starting with 603..: {:?}", index.postal_codes_with_prefix("603", 5));
    }

    assert!(selector.is_consistent());
    Ok(())
}
