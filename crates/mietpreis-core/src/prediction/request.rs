// crates/mietpreis-core/src/prediction/request.rs
use super::attributes::{Condition, FlatType, HeatingType, InteriorQuality, PropertyAttributes};
use super::response::format_area;
use crate::selection::LocationSelection;
use serde::{Deserialize, Serialize};

/// Body of `POST /predict`.
///
/// Field names are the service's; nothing is validated or normalized on
/// the way out. An unset location part goes out as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "livingSpace")]
    pub living_space: f64,
    #[serde(rename = "noRooms")]
    pub rooms: f64,
    pub floor: f64,
    #[serde(rename = "yearConstructed")]
    pub year_constructed: f64,

    /// Bundesland.
    pub regio1: String,
    /// Stadt / Landkreis.
    pub regio2: String,
    pub geo_plz: String,

    #[serde(rename = "heatingType")]
    pub heating_type: HeatingType,
    pub condition: Condition,
    #[serde(rename = "interiorQual")]
    pub interior_quality: InteriorQuality,
    #[serde(rename = "typeOfFlat")]
    pub flat_type: FlatType,

    pub balcony: bool,
    pub lift: bool,
    #[serde(rename = "hasKitchen")]
    pub fitted_kitchen: bool,
    pub garden: bool,
    pub cellar: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl PredictionRequest {
    pub fn build(attrs: &PropertyAttributes, location: &LocationSelection) -> Self {
        PredictionRequest {
            living_space: attrs.living_space,
            rooms: attrs.rooms,
            floor: attrs.floor,
            year_constructed: attrs.year_constructed,
            regio1: location.state().to_string(),
            regio2: location.city().to_string(),
            geo_plz: location.postal_code().to_string(),
            heating_type: attrs.heating_type,
            condition: attrs.condition,
            interior_quality: attrs.interior_quality,
            flat_type: attrs.flat_type,
            balcony: attrs.balcony,
            lift: attrs.lift,
            fitted_kitchen: attrs.fitted_kitchen,
            garden: attrs.garden,
            cellar: attrs.cellar,
            date: attrs.listing_date.clone(),
        }
    }

    /// Result-card caption for this request: `Berechnet für München (80331) • 62 m²`.
    pub fn summary_line(&self) -> String {
        format!(
            "Berechnet für {} ({}) • {} m²",
            self.regio2,
            self.geo_plz,
            format_area(self.living_space)
        )
    }
}
