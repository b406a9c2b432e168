// crates/mietpreis-core/src/loader/source.rs

//! Concrete geo sources.
//!
//! Every source hands its bytes to the same parser
//! ([`GeoIndex::from_json_slice`] / [`GeoIndex::from_reader`]); there is no
//! source-specific shape.

use super::GeoSource;
use crate::error::Result;
use crate::model::GeoIndex;
use async_trait::async_trait;
use std::borrow::Cow;

#[cfg(feature = "json")]
use super::common_io;
#[cfg(feature = "json")]
use std::path::PathBuf;

/// A payload compiled into the binary or handed over by the host page.
#[derive(Debug, Clone)]
pub struct StaticSource {
    label: Cow<'static, str>,
    json: Cow<'static, str>,
}

impl StaticSource {
    pub fn new(label: impl Into<Cow<'static, str>>, json: impl Into<Cow<'static, str>>) -> Self {
        StaticSource {
            label: label.into(),
            json: json.into(),
        }
    }
}

#[async_trait(?Send)]
impl GeoSource for StaticSource {
    fn describe(&self) -> String {
        format!("static:{}", self.label)
    }

    async fn fetch(&self) -> Result<GeoIndex> {
        GeoIndex::from_json_slice(self.json.as_bytes())
    }
}

/// A local `.json` (or, with `compact`, `.json.gz`) file.
#[cfg(feature = "json")]
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

#[cfg(feature = "json")]
impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

#[cfg(feature = "json")]
#[async_trait(?Send)]
impl GeoSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<GeoIndex> {
        let reader = common_io::open_stream(&self.path)?;
        GeoIndex::from_reader(reader)
    }
}

/// `GET <url>` returning the geo payload.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        HttpSource {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl GeoSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<GeoIndex> {
        log::debug!("fetching geo index from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(crate::error::Error::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                detail: crate::common::extract_detail(&body),
            });
        }

        let bytes = response.bytes().await?;
        GeoIndex::from_json_slice(&bytes)
    }
}
