// crates/mietpreis-core/src/prediction/mod.rs

//! # Prediction
//!
//! Form fields → `POST /predict` body → renderable result or failure.

mod attributes;
mod controller;
mod features;
mod request;
mod response;
mod service;

pub use attributes::{
    coerce_number, coerce_postal_code, Condition, FieldRange, FlatType, FormChoice, HeatingType,
    InteriorQuality, PropertyAttributes, FLOOR_RANGE, LIVING_SPACE_RANGE, ROOMS_RANGE,
    YEAR_CONSTRUCTED_RANGE,
};
pub use controller::{PredictionController, SubmissionTicket, SubmissionView};
pub use features::{base_feature_name, humanize_feature};
pub use request::PredictionRequest;
pub use response::{
    format_amount, format_percent, interpret_response, ConfidenceInterval, FeatureImportance,
    PredictionResponse, PredictionResult, RawFeatureWeight,
};
#[cfg(feature = "http")]
pub use service::HttpPredictionService;
pub use service::PredictionService;
