// crates/mietpreis-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a loaded index.
///
/// Returned by [`GeoIndex::stats`](crate::GeoIndex::stats). The counts
/// reflect the index after cross-listed postal codes were dropped at build
/// time; `dropped_duplicates` says how many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub states: usize,
    pub cities: usize,
    pub postal_codes: usize,
    pub dropped_duplicates: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Pull a service-provided `detail` string out of an error body.
///
/// Bodies that are not JSON, lack `detail`, or carry a non-string `detail`
/// (e.g. a list of validation errors) yield `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}
