// crates/mietpreis-core/src/loader/mod.rs

//! # Geo Loader
//!
//! Acquires the [`GeoIndex`] once per session: the primary source first,
//! then exactly one fallback attempt. No retries beyond that, no refresh.
//!
//! The loader lives on a single-threaded event loop. Its status sits in a
//! `RefCell` so the view can read [`GeoLoader::status`] while a load is
//! suspended; no borrow is held across an await point.

use crate::error::{Error, GeoLoadFailure, Result};
use crate::liveness::Liveness;
use crate::model::GeoIndex;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::sync::Arc;

pub mod common_io;
mod source;

#[cfg(feature = "json")]
pub use source::FileSource;
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::StaticSource;

/// Message of the failure returned to a caller that starts a second load
/// while the first one is still running.
pub const ALREADY_LOADING_MESSAGE: &str = "Standortdaten werden bereits geladen.";

/// Somewhere a geo payload can be fetched from.
#[async_trait(?Send)]
pub trait GeoSource {
    /// Human-readable origin for logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<GeoIndex>;
}

/// Where the one-shot load currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Arc<GeoIndex>),
    Failed(GeoLoadFailure),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn index(&self) -> Option<&Arc<GeoIndex>> {
        match self {
            LoadStatus::Loaded(index) => Some(index),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GeoLoadFailure> {
        match self {
            LoadStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Primary source with a single fallback.
pub struct GeoLoader {
    primary: Box<dyn GeoSource>,
    fallback: Box<dyn GeoSource>,
    status: RefCell<LoadStatus>,
    liveness: Liveness,
}

impl std::fmt::Debug for GeoLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoLoader")
            .field("primary", &self.primary.describe())
            .field("fallback", &self.fallback.describe())
            .field("status", &self.status.borrow())
            .finish()
    }
}

impl GeoLoader {
    pub fn new(primary: impl GeoSource + 'static, fallback: impl GeoSource + 'static) -> Self {
        GeoLoader {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
            status: RefCell::new(LoadStatus::Idle),
            liveness: Liveness::new(),
        }
    }

    /// Tie the status write-back to `liveness`: a load that settles after
    /// it was revoked leaves the status untouched.
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    /// The standard pair from a [`ServiceConfig`](crate::config::ServiceConfig):
    /// `GET /geo`, falling back to `GET /geo_data.json`.
    #[cfg(feature = "http")]
    pub fn from_config(client: reqwest::Client, config: &crate::config::ServiceConfig) -> Self {
        Self::new(
            HttpSource::new(client.clone(), config.geo_url()),
            HttpSource::new(client, config.fallback_geo_url()),
        )
    }

    pub fn status(&self) -> LoadStatus {
        self.status.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().is_loading()
    }

    /// Load the index.
    ///
    /// The first call performs the work and settles the status to exactly
    /// one of `Loaded` or `Failed`. Later calls return the settled outcome
    /// without touching any source.
    pub async fn load(&self) -> std::result::Result<Arc<GeoIndex>, GeoLoadFailure> {
        {
            let mut status = self.status.borrow_mut();
            match &*status {
                LoadStatus::Loaded(index) => return Ok(Arc::clone(index)),
                LoadStatus::Failed(failure) => return Err(failure.clone()),
                LoadStatus::Loading => {
                    return Err(GeoLoadFailure {
                        message: ALREADY_LOADING_MESSAGE.to_string(),
                        primary: String::new(),
                        fallback: String::new(),
                    })
                }
                LoadStatus::Idle => {}
            }
            *status = LoadStatus::Loading;
        }

        let outcome = fetch_with_fallback(self.primary.as_ref(), self.fallback.as_ref())
            .await
            .map(Arc::new);

        if !self.liveness.is_alive() {
            debug!("geo load settled after teardown; status left as is");
            return outcome;
        }
        *self.status.borrow_mut() = match &outcome {
            Ok(index) => LoadStatus::Loaded(Arc::clone(index)),
            Err(failure) => LoadStatus::Failed(failure.clone()),
        };
        outcome
    }
}

/// The primary → fallback algorithm, without any status bookkeeping.
pub async fn fetch_with_fallback(
    primary: &dyn GeoSource,
    fallback: &dyn GeoSource,
) -> std::result::Result<GeoIndex, GeoLoadFailure> {
    let primary_err: Error = match primary.fetch().await {
        Ok(index) => {
            info!("geo index loaded from {}: {:?}", primary.describe(), index.stats());
            return Ok(index);
        }
        Err(e) => e,
    };
    warn!(
        "primary geo source {} failed ({primary_err}); trying {}",
        primary.describe(),
        fallback.describe()
    );

    match fallback.fetch().await {
        Ok(index) => {
            info!("geo index loaded from {}: {:?}", fallback.describe(), index.stats());
            Ok(index)
        }
        Err(fallback_err) => {
            warn!("fallback geo source {} failed: {fallback_err}", fallback.describe());
            Err(GeoLoadFailure::from_errors(&primary_err, &fallback_err))
        }
    }
}
