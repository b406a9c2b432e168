// crates/mietpreis-core/src/prediction/features.rs

//! Display names for the model's feature-importance entries.
//!
//! The service reports features under their pipeline names, e.g.
//! `num__livingSpace` or `cat__heatingType_encoded`. Stage prefixes and
//! encoding suffixes are stripped, then known fields get their German form
//! label. Anything else is made readable generically.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const STRIPPED_SUFFIXES: &[&str] = &["_was_missing", "_missing", "_encoded"];

static FEATURE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("livingSpace", "Wohnfläche"),
        ("noRooms", "Zimmer"),
        ("floor", "Etage"),
        ("yearConstructed", "Baujahr"),
        ("regio1", "Bundesland"),
        ("regio2", "Stadt / Landkreis"),
        ("geo_plz", "Postleitzahl"),
        ("heatingType", "Heizung"),
        ("condition", "Zustand"),
        ("interiorQual", "Qualität"),
        ("typeOfFlat", "Wohnungstyp"),
        ("balcony", "Balkon"),
        ("lift", "Aufzug"),
        ("hasKitchen", "Einbauküche"),
        ("garden", "Garten"),
        ("cellar", "Keller"),
        ("post_year", "Inseratsjahr"),
        ("post_month", "Inseratsmonat"),
    ])
});

/// Strip the stage prefix (everything up to the last `__`) and one
/// encoding suffix.
pub fn base_feature_name(raw: &str) -> &str {
    let name = raw.rsplit_once("__").map_or(raw, |(_, tail)| tail);
    STRIPPED_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(name)
}

/// Human-readable name of a raw feature identifier.
///
/// ```
/// use mietpreis_core::prediction::humanize_feature;
///
/// assert_eq!(humanize_feature("num__livingSpace"), "Wohnfläche");
/// assert_eq!(humanize_feature("cat__heatingType_encoded"), "Heizung");
/// assert_eq!(humanize_feature("noise_level-db"), "noise level db");
/// ```
pub fn humanize_feature(raw: &str) -> String {
    let base = base_feature_name(raw.trim());
    if let Some(label) = FEATURE_LABELS.get(base) {
        return (*label).to_string();
    }
    base.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
