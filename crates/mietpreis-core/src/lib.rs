// crates/mietpreis-core/src/lib.rs

pub mod common;
pub mod config;
pub mod error;
pub mod liveness;
pub mod loader; // primary → fallback geo acquisition
pub mod model; // GeoIndex
pub mod prediction;
pub mod search; // type-to-search on top of GeoIndex
pub mod selection; // the three linked location selects
pub mod session;
pub mod text;
// Raw payload shape, shared by every geo source
#[doc(hidden)]
pub mod raw;

// Re-exports
pub use crate::common::IndexStats;
pub use crate::config::ServiceConfig;
pub use crate::error::{Error, GeoLoadFailure, Result, SelectionError, SubmissionFailure};
pub use crate::liveness::Liveness;
pub use crate::loader::{GeoLoader, GeoSource, LoadStatus};
pub use crate::model::GeoIndex;
pub use crate::prediction::{
    PredictionController, PredictionRequest, PredictionResult, PredictionService,
    PropertyAttributes,
};
pub use crate::selection::{LocationSelection, LocationSelector, PostalCodeLookup, SelectorPhase};
pub use crate::session::{FormSession, FormView};
