// crates/mietpreis-core/tests/http_sources.rs
//
// The reqwest-backed geo source and prediction service against an
// in-process axum server.

#![cfg(feature = "http")]

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use mietpreis_core::loader::HttpSource;
use mietpreis_core::prediction::HttpPredictionService;
use mietpreis_core::{
    FormSession, GeoLoader, LocationSelection, PredictionService, PropertyAttributes,
    PredictionRequest, ServiceConfig, SubmissionFailure,
};
use serde_json::{json, Value};

const GEO: &str = r#"{
    "Bayern": { "München": ["80331", "80333"], "Augsburg": ["86150"] },
    "Hessen": { "Frankfurt am Main": ["60311", "60313"] }
}"#;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn geo_json() -> Json<Value> {
    Json(serde_json::from_str(GEO).unwrap())
}

fn config(base: &str) -> ServiceConfig {
    ServiceConfig::with_base_url(base).unwrap()
}

#[tokio::test]
async fn primary_endpoint_serves_index() {
    let base = spawn(Router::new().route("/geo", get(|| async { geo_json() }))).await;
    let loader = GeoLoader::from_config(reqwest::Client::new(), &config(&base));

    let index = loader.load().await.unwrap();
    assert_eq!(index.locate("60313"), Some(("Hessen", "Frankfurt am Main")));
    assert_eq!(index.stats().postal_codes, 5);
}

#[tokio::test]
async fn failing_primary_falls_back_to_static_file() {
    let app = Router::new()
        .route(
            "/geo",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "detail": "Geo-Dienst nicht bereit" })),
                )
            }),
        )
        .route("/geo_data.json", get(|| async { geo_json() }));
    let base = spawn(app).await;
    let loader = GeoLoader::from_config(reqwest::Client::new(), &config(&base));

    let index = loader.load().await.unwrap();
    assert_eq!(index.first_state(), Some("Bayern"));
}

#[tokio::test]
async fn unreachable_primary_falls_back() {
    let base = spawn(Router::new().route("/geo_data.json", get(|| async { geo_json() }))).await;
    let client = reqwest::Client::new();
    let loader = GeoLoader::new(
        HttpSource::new(client.clone(), "http://127.0.0.1:1/geo"),
        HttpSource::new(client, format!("{base}/geo_data.json")),
    );

    assert!(loader.load().await.is_ok());
}

#[tokio::test]
async fn both_sources_failing_reports_fallback_detail() {
    let app = Router::new().route(
        "/geo_data.json",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "geo_data.json fehlt" })),
            )
        }),
    );
    let base = spawn(app).await;
    let loader = GeoLoader::from_config(reqwest::Client::new(), &config(&base));

    let failure = loader.load().await.unwrap_err();
    assert_eq!(failure.message, "geo_data.json fehlt");
    assert!(failure.primary.contains("404"), "{}", failure.primary);
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn malformed_payload_on_both_sides_is_generic() {
    let app = Router::new()
        .route("/geo", get(|| async { "<html>oops</html>" }))
        .route("/geo_data.json", get(|| async { Json(json!([1, 2, 3])) }));
    let base = spawn(app).await;
    let loader = GeoLoader::from_config(reqwest::Client::new(), &config(&base));

    let failure = loader.load().await.unwrap_err();
    assert!(!failure.message.is_empty());
}

fn predict_app() -> Router {
    Router::new().route(
        "/predict",
        post(|Json(body): Json<Value>| async move {
            let area = body["livingSpace"].as_f64().unwrap_or(0.0);
            if area <= 0.0 {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": "Wohnfläche muss positiv sein" })),
                );
            }
            if body["geo_plz"] == "00000" {
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
            }
            let estimate = area * 15.0;
            let heating = format!("cat__{}", body["heatingType"].as_str().unwrap_or(""));
            (
                StatusCode::OK,
                Json(json!({
                    "prediction": estimate,
                    "interval_lower": estimate * 0.9,
                    "interval_upper": estimate * 1.1,
                    "eur_per_sqm": 15.0,
                    "warnings": [],
                    "feature_importance": [
                        { "name": "num__livingSpace", "weight": 55.0 },
                        { "name": heating, "weight": 3.5 }
                    ],
                    "confidence_note": "Intervall basiert auf ±10% Heuristik."
                })),
            )
        }),
    )
}

fn request(living_space: f64, postal_code: &str) -> PredictionRequest {
    let attrs = PropertyAttributes {
        living_space,
        ..PropertyAttributes::default()
    };
    PredictionRequest::build(&attrs, &LocationSelection::new("Bayern", "München", postal_code))
}

#[tokio::test]
async fn prediction_success_is_mapped() {
    let base = spawn(predict_app()).await;
    let service = HttpPredictionService::from_config(reqwest::Client::new(), &config(&base));

    let result = service.predict(&request(80.0, "80331")).await.unwrap();
    assert_eq!(result.point_estimate_text(), "1200.00");
    assert_eq!(result.interval_text().as_deref(), Some("1080.00 – 1320.00"));
    assert_eq!(result.feature_importance[0].name, "Wohnfläche");
    assert_eq!(result.feature_importance[1].name, "Zentralheizung");
}

#[tokio::test]
async fn prediction_rejection_carries_detail() {
    let base = spawn(predict_app()).await;
    let service = HttpPredictionService::from_config(reqwest::Client::new(), &config(&base));

    let err = service.predict(&request(0.0, "80331")).await.unwrap_err();
    assert_eq!(err.user_message(), "Wohnfläche muss positiv sein");
    assert!(matches!(err, SubmissionFailure::Rejected { status: 422, .. }));
}

#[tokio::test]
async fn prediction_server_error_without_detail_is_generic() {
    let base = spawn(predict_app()).await;
    let service = HttpPredictionService::from_config(reqwest::Client::new(), &config(&base));

    let err = service.predict(&request(80.0, "00000")).await.unwrap_err();
    assert_eq!(err.user_message(), mietpreis_core::error::GENERIC_SUBMISSION_MESSAGE);
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    let service = HttpPredictionService::new(reqwest::Client::new(), "http://127.0.0.1:1/predict");
    let err = service.predict(&request(80.0, "80331")).await.unwrap_err();
    assert!(matches!(err, SubmissionFailure::Network { .. }), "{err:?}");
}

#[tokio::test]
async fn whole_form_against_one_service() {
    let app = predict_app().route("/geo", get(|| async { geo_json() }));
    let base = spawn(app).await;
    let client = reqwest::Client::new();
    let config = config(&base);

    let mut session = FormSession::new(GeoLoader::from_config(client.clone(), &config));
    session.load_geo().await.unwrap();
    session.selector_mut().select_state("Hessen").unwrap();
    session.attributes_mut().living_space = 50.0;

    let service = HttpPredictionService::from_config(client, &config);
    let result = session.submit(&service).await.unwrap();

    assert_eq!(result.point_estimate, 750.0);
    let view = session.view();
    assert_eq!(
        view.summary.as_deref(),
        Some("Berechnet für Frankfurt am Main (60311) • 50 m²")
    );
    assert!(view.submit_enabled);
}
