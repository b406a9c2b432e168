// crates/mietpreis-core/src/prediction/response.rs
use super::features::humanize_feature;
use crate::common::extract_detail;
use crate::error::SubmissionFailure;
use serde::{Deserialize, Serialize};

/// Success body of `POST /predict` as the service sends it.
///
/// Only `prediction` is required; the service may send `null` for any of
/// the optional parts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
    #[serde(default)]
    pub interval_lower: Option<f64>,
    #[serde(default)]
    pub interval_upper: Option<f64>,
    #[serde(default)]
    pub eur_per_sqm: Option<f64>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub feature_importance: Option<Vec<RawFeatureWeight>>,
    #[serde(default)]
    pub confidence_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFeatureWeight {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// One feature-importance entry, display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImportance {
    pub name: String,
    pub raw_name: String,
    /// Share of the total importance, in percent.
    pub weight: f64,
}

/// A successful estimate, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub point_estimate: f64,
    pub confidence_interval: Option<ConfidenceInterval>,
    pub price_per_area: Option<f64>,
    /// Display order is priority order.
    pub warnings: Vec<String>,
    /// Service order (descending importance); never re-sorted here.
    pub feature_importance: Vec<FeatureImportance>,
    pub confidence_note: Option<String>,
}

impl From<PredictionResponse> for PredictionResult {
    fn from(response: PredictionResponse) -> Self {
        let confidence_interval = match (response.interval_lower, response.interval_upper) {
            (Some(lower), Some(upper)) => Some(ConfidenceInterval { lower, upper }),
            _ => None,
        };
        let feature_importance = response
            .feature_importance
            .unwrap_or_default()
            .into_iter()
            .map(|f| FeatureImportance {
                name: humanize_feature(&f.name),
                raw_name: f.name,
                weight: f.weight,
            })
            .collect();

        PredictionResult {
            point_estimate: response.prediction,
            confidence_interval,
            price_per_area: response.eur_per_sqm,
            warnings: response.warnings.unwrap_or_default(),
            feature_importance,
            confidence_note: response.confidence_note.filter(|n| !n.trim().is_empty()),
        }
    }
}

impl PredictionResult {
    pub fn point_estimate_text(&self) -> String {
        format_amount(self.point_estimate)
    }

    pub fn interval_text(&self) -> Option<String> {
        self.confidence_interval
            .map(|ci| format!("{} – {}", format_amount(ci.lower), format_amount(ci.upper)))
    }

    pub fn price_per_area_text(&self) -> Option<String> {
        self.price_per_area
            .map(|p| format!("{} €/m²", format_amount(p)))
    }
}

/// Two decimals, `.` as separator: `1234.5` → `"1234.50"`.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Percent with one decimal: `23.4` → `"23.4 %"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1} %")
}

pub(crate) fn format_area(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Map a finished `POST /predict` exchange to a result or a failure.
///
/// Non-2xx: the body's string `detail`, if any, becomes the message.
/// 2xx with a body that lacks a numeric `prediction`: invalid response.
pub fn interpret_response(status: u16, body: &str) -> Result<PredictionResult, SubmissionFailure> {
    if !(200..300).contains(&status) {
        return Err(SubmissionFailure::rejected(status, extract_detail(body)));
    }
    serde_json::from_str::<PredictionResponse>(body)
        .map(PredictionResult::from)
        .map_err(|e| SubmissionFailure::InvalidResponse {
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_SUBMISSION_MESSAGE;

    #[test]
    fn bare_prediction_has_no_optional_parts() {
        let result = interpret_response(200, r#"{"prediction": 1234.5}"#).unwrap();
        assert_eq!(result.point_estimate_text(), "1234.50");
        assert_eq!(result.confidence_interval, None);
        assert_eq!(result.interval_text(), None);
        assert!(result.warnings.is_empty());
        assert!(result.feature_importance.is_empty());
    }

    #[test]
    fn full_response_is_mapped() {
        let body = r#"{
            "prediction": 1000.0,
            "interval_lower": 900.0,
            "interval_upper": 1100.0,
            "eur_per_sqm": 16.129,
            "warnings": ["Baujahr ungewöhnlich", "Wenige Vergleichsobjekte"],
            "feature_importance": [
                {"name": "num__livingSpace", "weight": 41.2},
                {"name": "cat__regio2_encoded", "weight": 12.0}
            ],
            "confidence_note": "Intervall basiert auf ±10% Heuristik."
        }"#;
        let result = interpret_response(200, body).unwrap();

        assert_eq!(result.interval_text().as_deref(), Some("900.00 – 1100.00"));
        assert_eq!(result.price_per_area_text().as_deref(), Some("16.13 €/m²"));
        assert_eq!(result.warnings[0], "Baujahr ungewöhnlich");
        let names: Vec<_> = result.feature_importance.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Wohnfläche", "Stadt / Landkreis"]);
        assert_eq!(result.feature_importance[1].raw_name, "cat__regio2_encoded");
        assert!(result.confidence_note.is_some());
    }

    #[test]
    fn half_interval_is_dropped() {
        let result =
            interpret_response(200, r#"{"prediction": 800, "interval_lower": 700}"#).unwrap();
        assert_eq!(result.confidence_interval, None);
    }

    #[test]
    fn nulls_count_as_absent() {
        let result = interpret_response(
            200,
            r#"{"prediction": 800, "eur_per_sqm": null, "warnings": null, "feature_importance": null}"#,
        )
        .unwrap();
        assert_eq!(result.price_per_area, None);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn rejection_prefers_service_detail() {
        let err = interpret_response(422, r#"{"detail": "Wohnfläche fehlt"}"#).unwrap_err();
        assert_eq!(err.user_message(), "Wohnfläche fehlt");
        assert!(matches!(err, SubmissionFailure::Rejected { status: 422, .. }));
    }

    #[test]
    fn rejection_without_detail_uses_generic_message() {
        let err = interpret_response(500, "Internal Server Error").unwrap_err();
        assert_eq!(err.user_message(), GENERIC_SUBMISSION_MESSAGE);

        // FastAPI validation errors carry a list, not a string.
        let err = interpret_response(422, r#"{"detail": [{"loc": ["body"]}]}"#).unwrap_err();
        assert_eq!(err.user_message(), GENERIC_SUBMISSION_MESSAGE);
    }

    #[test]
    fn success_without_prediction_is_invalid() {
        let err = interpret_response(200, r#"{"estimate": 5}"#).unwrap_err();
        assert!(matches!(err, SubmissionFailure::InvalidResponse { .. }));
        assert_eq!(err.user_message(), GENERIC_SUBMISSION_MESSAGE);
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(41.26), "41.3 %");
    }
}
