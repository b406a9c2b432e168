// crates/mietpreis-core/src/config.rs
use crate::error::{Error, Result};
use std::env;

/// Environment variable holding the service base address.
pub const BASE_URL_ENV: &str = "MIETPREIS_API_BASE";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_GEO_PATH: &str = "/geo";
pub const DEFAULT_FALLBACK_GEO_PATH: &str = "/geo_data.json";
pub const DEFAULT_PREDICT_PATH: &str = "/predict";

/// Where the valuation service lives.
///
/// The base address is the only environment-derived setting; the endpoint
/// paths are fixed by the service contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub geo_path: String,
    pub fallback_geo_path: String,
    pub predict_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_path: DEFAULT_GEO_PATH.to_string(),
            fallback_geo_path: DEFAULT_FALLBACK_GEO_PATH.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Config for the given base address with the standard endpoint paths.
    ///
    /// A trailing slash is dropped; the address must be an absolute
    /// `http`/`https` URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;
        Ok(ServiceConfig {
            base_url,
            ..Self::default()
        })
    }

    /// Reads [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self> {
        match env::var(BASE_URL_ENV) {
            Ok(value) => Self::with_base_url(&value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(Error::Config(format!("{BASE_URL_ENV}: {e}"))),
        }
    }

    pub fn geo_url(&self) -> String {
        self.join(&self.geo_path)
    }

    pub fn fallback_geo_url(&self) -> String {
        self.join(&self.fallback_geo_path)
    }

    pub fn predict_url(&self) -> String {
        self.join(&self.predict_path)
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(feature = "http")]
fn validate_base_url(base_url: &str) -> Result<()> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| Error::Config(format!("invalid base URL {base_url:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "unsupported scheme {other:?} in base URL {base_url:?}"
        ))),
    }
}

#[cfg(not(feature = "http"))]
fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid base URL {base_url:?}")))
    }
}
