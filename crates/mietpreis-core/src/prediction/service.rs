// crates/mietpreis-core/src/prediction/service.rs
use super::request::PredictionRequest;
use super::response::PredictionResult;
use crate::error::SubmissionFailure;
use async_trait::async_trait;

/// The valuation service, seen from the form.
#[async_trait(?Send)]
pub trait PredictionService {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, SubmissionFailure>;
}

/// `POST <url>` with the request as JSON.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpPredictionService {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        HttpPredictionService {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &crate::config::ServiceConfig) -> Self {
        Self::new(client, config.predict_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, SubmissionFailure> {
        log::debug!("POST {} ({}, {})", self.url, request.regio2, request.geo_plz);

        let network = |e: reqwest::Error| SubmissionFailure::Network {
            reason: e.to_string(),
        };
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(network)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network)?;

        super::response::interpret_response(status, &body)
    }
}
