// crates/mietpreis-core/src/raw.rs

//! Raw geo payload as served by `GET /geo` and the static fallback.
//!
//! ```json
//! { "Bayern": { "Muenchen": ["80331", "80333"] }, "Hessen": { "Frankfurt": ["60311"] } }
//! ```

use std::collections::BTreeMap;

/// Postal codes of one city, in source order.
pub type PostalCodesRaw = Vec<String>;

/// Cities of one state.
pub type CitiesRaw = BTreeMap<String, PostalCodesRaw>;

/// The whole payload: state → city → postal codes.
pub type GeoRaw = BTreeMap<String, CitiesRaw>;
