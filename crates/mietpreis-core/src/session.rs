// crates/mietpreis-core/src/session.rs

//! # Form Session
//!
//! One mounted form: the geo loader, the location selects, the property
//! fields and the submit area, all owned here and handed to the view by
//! reference. The session's [`Liveness`] guards every async write-back.

use crate::error::{GeoLoadFailure, SubmissionFailure};
use crate::liveness::Liveness;
use crate::loader::{GeoLoader, LoadStatus};
use crate::model::GeoIndex;
use crate::prediction::{
    PredictionController, PredictionResult, PredictionService, PropertyAttributes,
    SubmissionTicket, SubmissionView,
};
use crate::selection::{LocationSelection, LocationSelector};
use log::debug;
use serde::Serialize;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug)]
pub struct FormSession {
    loader: Rc<GeoLoader>,
    selector: LocationSelector,
    attributes: PropertyAttributes,
    prediction: PredictionController,
    liveness: Liveness,
}

/// Everything the view needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub geo_loading: bool,
    pub geo_error: Option<String>,
    /// The three location fields accept input.
    pub location_enabled: bool,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub postal_codes: Vec<String>,
    pub selection: LocationSelection,
    pub attributes: PropertyAttributes,
    pub submit_enabled: bool,
    pub submission: SubmissionView,
    pub summary: Option<String>,
}

impl FormSession {
    pub fn new(loader: GeoLoader) -> Self {
        let liveness = Liveness::new();
        FormSession {
            loader: Rc::new(loader.with_liveness(liveness.clone())),
            selector: LocationSelector::new(),
            attributes: PropertyAttributes::default(),
            prediction: PredictionController::with_liveness(liveness.clone()),
            liveness,
        }
    }

    pub fn loader(&self) -> Rc<GeoLoader> {
        Rc::clone(&self.loader)
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Unmount: pending loads and submissions will no longer write back.
    pub fn teardown(&self) {
        debug!("form session torn down");
        self.liveness.revoke();
    }

    pub fn geo_status(&self) -> LoadStatus {
        self.loader.status()
    }

    /// Location fields accept input only once the index is in.
    pub fn location_enabled(&self) -> bool {
        self.selector.is_ready() && !self.loader.is_loading()
    }

    pub fn selector(&self) -> &LocationSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut LocationSelector {
        &mut self.selector
    }

    pub fn attributes(&self) -> &PropertyAttributes {
        &self.attributes
    }

    /// Property fields stay editable while a submission is in flight.
    pub fn attributes_mut(&mut self) -> &mut PropertyAttributes {
        &mut self.attributes
    }

    pub fn set_attributes(&mut self, attributes: PropertyAttributes) {
        self.attributes = attributes;
    }

    pub fn prediction(&self) -> &PredictionController {
        &self.prediction
    }

    /// Write a finished geo load back, if `guard` (taken when the load
    /// started) is still alive. Returns whether anything was applied.
    pub fn apply_geo_outcome(
        &mut self,
        guard: &Liveness,
        outcome: &Result<Arc<GeoIndex>, GeoLoadFailure>,
    ) -> bool {
        if !guard.is_alive() {
            debug!("geo load finished after teardown; dropped");
            return false;
        }
        match outcome {
            Ok(index) => {
                self.selector.attach_index(Arc::clone(index));
                true
            }
            // The failure itself lives in the loader status.
            Err(_) => false,
        }
    }

    /// Run the one-shot geo load and apply it.
    pub async fn load_geo(&mut self) -> Result<(), GeoLoadFailure> {
        let loader = self.loader();
        let guard = self.liveness();
        let outcome = loader.load().await;
        self.apply_geo_outcome(&guard, &outcome);
        outcome.map(|_| ())
    }

    pub fn begin_submit(&mut self) -> Option<SubmissionTicket> {
        self.prediction
            .begin(&self.attributes, self.selector.selection())
    }

    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, SubmissionFailure>,
    ) -> bool {
        self.prediction.complete(ticket, outcome)
    }

    pub async fn submit<S>(&mut self, service: &S) -> Result<PredictionResult, SubmissionFailure>
    where
        S: PredictionService + ?Sized,
    {
        let ticket = self.begin_submit().ok_or(SubmissionFailure::InFlight)?;
        let outcome = service.predict(ticket.request()).await;
        self.finish_submit(ticket, outcome.clone());
        outcome
    }

    pub fn view(&self) -> FormView {
        let owned = |v: Vec<&str>| v.into_iter().map(str::to_owned).collect::<Vec<_>>();
        let status = self.loader.status();
        let selection = self.selector.selection().clone();
        let submission = self.prediction.view();

        FormView {
            geo_loading: status.is_loading(),
            geo_error: status.error().map(|f| f.message.clone()),
            location_enabled: self.location_enabled(),
            states: owned(self.selector.state_options()),
            cities: owned(self.selector.city_options()),
            postal_codes: owned(self.selector.postal_code_options()),
            selection,
            attributes: self.attributes.clone(),
            submit_enabled: self.prediction.can_submit(),
            submission,
            summary: self.prediction.summary().map(str::to_owned),
        }
    }
}
