// crates/mietpreis-core/src/prediction/controller.rs

//! Submission lifecycle.
//!
//! `begin` → (service call, possibly suspended) → `complete`. At most one
//! submission is in flight; the in-flight flag is cleared exactly once per
//! ticket, whatever the outcome. Starting a submission discards the previous
//! result and error. A ticket whose form was torn down is dropped without
//! touching state.

use super::attributes::PropertyAttributes;
use super::request::PredictionRequest;
use super::response::PredictionResult;
use super::service::PredictionService;
use crate::error::SubmissionFailure;
use crate::liveness::Liveness;
use crate::selection::LocationSelection;
use log::{debug, info, warn};
use serde::Serialize;

/// Proof that a submission was started. Consumed by
/// [`PredictionController::complete`].
#[derive(Debug)]
#[must_use = "a ticket must be completed to clear the in-flight flag"]
pub struct SubmissionTicket {
    id: u64,
    liveness: Liveness,
    request: PredictionRequest,
}

impl SubmissionTicket {
    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }

    pub fn is_live(&self) -> bool {
        self.liveness.is_alive()
    }
}

#[derive(Debug, Default)]
pub struct PredictionController {
    liveness: Liveness,
    next_id: u64,
    in_flight: Option<u64>,
    result: Option<PredictionResult>,
    /// Caption of `result`, taken from the request that produced it.
    summary: Option<String>,
    error: Option<SubmissionFailure>,
}

/// Renderable state of the submit area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub in_flight: bool,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
}

impl PredictionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller whose tickets follow an existing liveness token.
    pub fn with_liveness(liveness: Liveness) -> Self {
        PredictionController {
            liveness,
            ..Self::default()
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.in_flight.is_none() && self.liveness.is_alive()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// `Berechnet für …` line for the shown result. Follows the submitted
    /// values, not the fields as they are now.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn error(&self) -> Option<&SubmissionFailure> {
        self.error.as_ref()
    }

    pub fn view(&self) -> SubmissionView {
        SubmissionView {
            in_flight: self.is_in_flight(),
            result: self.result.clone(),
            error: self.error.as_ref().map(|e| e.user_message().to_string()),
        }
    }

    /// Start a submission from the current form values.
    ///
    /// `None` while another submission is in flight (or after teardown);
    /// otherwise the previous result and error are cleared and the request
    /// is built verbatim from the inputs.
    pub fn begin(
        &mut self,
        attrs: &PropertyAttributes,
        location: &LocationSelection,
    ) -> Option<SubmissionTicket> {
        if !self.can_submit() {
            debug!("submission ignored: in flight = {}", self.is_in_flight());
            return None;
        }
        self.next_id += 1;
        self.in_flight = Some(self.next_id);
        self.result = None;
        self.summary = None;
        self.error = None;

        Some(SubmissionTicket {
            id: self.next_id,
            liveness: self.liveness.clone(),
            request: PredictionRequest::build(attrs, location),
        })
    }

    /// Apply the outcome of a ticket. Returns whether state changed.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, SubmissionFailure>,
    ) -> bool {
        if !ticket.is_live() {
            debug!("submission {} resolved after teardown; dropped", ticket.id);
            return false;
        }
        if self.in_flight != Some(ticket.id) {
            debug!("submission {} is not the one in flight; dropped", ticket.id);
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                info!("estimate received: {}", result.point_estimate_text());
                self.summary = Some(ticket.request.summary_line());
                self.result = Some(result);
                self.error = None;
            }
            Err(failure) => {
                warn!("submission failed: {failure}");
                self.result = None;
                self.summary = None;
                self.error = Some(failure);
            }
        }
        true
    }

    /// `begin`, call the service, `complete`.
    pub async fn submit<S>(
        &mut self,
        service: &S,
        attrs: &PropertyAttributes,
        location: &LocationSelection,
    ) -> Result<PredictionResult, SubmissionFailure>
    where
        S: PredictionService + ?Sized,
    {
        let ticket = self.begin(attrs, location).ok_or(SubmissionFailure::InFlight)?;
        let outcome = service.predict(ticket.request()).await;
        self.complete(ticket, outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_SUBMISSION_MESSAGE;
    use crate::prediction::interpret_response;
    use async_trait::async_trait;
    use std::cell::RefCell;

    /// Answers every request with a fixed HTTP exchange and records it.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: RefCell<Vec<PredictionRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Canned {
                status,
                body,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl PredictionService for Canned {
        async fn predict(
            &self,
            request: &PredictionRequest,
        ) -> Result<PredictionResult, SubmissionFailure> {
            self.seen.borrow_mut().push(request.clone());
            interpret_response(self.status, self.body)
        }
    }

    fn munich() -> LocationSelection {
        LocationSelection::new("Bayern", "München", "80331")
    }

    #[tokio::test]
    async fn bare_estimate_renders_two_decimals() {
        let service = Canned::new(200, r#"{"prediction": 1234.5}"#);
        let mut controller = PredictionController::new();

        let result = controller
            .submit(&service, &PropertyAttributes::default(), &munich())
            .await
            .unwrap();

        assert_eq!(result.point_estimate_text(), "1234.50");
        let view = controller.view();
        assert!(!view.in_flight);
        assert_eq!(view.result.as_ref(), Some(&result));
        assert_eq!(view.error, None);
        assert_eq!(service.seen.borrow()[0].geo_plz, "80331");
    }

    #[tokio::test]
    async fn rejection_shows_detail_and_clears_result() {
        let mut controller = PredictionController::new();
        let ok = Canned::new(200, r#"{"prediction": 900}"#);
        controller
            .submit(&ok, &PropertyAttributes::default(), &munich())
            .await
            .unwrap();

        let rejecting = Canned::new(422, r#"{"detail": "Postleitzahl unbekannt"}"#);
        let err = controller
            .submit(&rejecting, &PropertyAttributes::default(), &munich())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Postleitzahl unbekannt");
        assert_eq!(controller.result(), None);
        assert_eq!(controller.view().error.as_deref(), Some("Postleitzahl unbekannt"));
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn server_error_without_detail_is_generic() {
        let service = Canned::new(500, "");
        let mut controller = PredictionController::new();
        let err = controller
            .submit(&service, &PropertyAttributes::default(), &munich())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_SUBMISSION_MESSAGE);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let mut controller = PredictionController::new();
        let attrs = PropertyAttributes::default();

        let ticket = controller.begin(&attrs, &munich()).unwrap();
        assert!(controller.is_in_flight());
        assert!(controller.begin(&attrs, &munich()).is_none());

        assert!(controller.complete(ticket, interpret_response(200, r#"{"prediction": 1}"#)));
        assert!(!controller.is_in_flight());
        assert!(controller.begin(&attrs, &munich()).is_some());
    }

    #[test]
    fn new_submission_discards_previous_result_and_error() {
        let mut controller = PredictionController::new();
        let attrs = PropertyAttributes::default();

        let ticket = controller.begin(&attrs, &munich()).unwrap();
        controller.complete(ticket, interpret_response(500, ""));
        assert!(controller.error().is_some());

        let ticket = controller.begin(&attrs, &munich()).unwrap();
        assert_eq!(controller.error(), None);
        assert_eq!(controller.result(), None);
        assert!(controller.view().in_flight);
        controller.complete(ticket, interpret_response(200, r#"{"prediction": 1}"#));
    }

    #[test]
    fn outcome_after_teardown_is_dropped() {
        let liveness = Liveness::new();
        let mut controller = PredictionController::with_liveness(liveness.clone());

        let ticket = controller.begin(&PropertyAttributes::default(), &munich()).unwrap();
        liveness.revoke();

        assert!(!controller.complete(ticket, interpret_response(200, r#"{"prediction": 1}"#)));
        assert_eq!(controller.result(), None);
        assert!(!controller.can_submit());
    }

    #[tokio::test]
    async fn suspended_submission_keeps_other_state_editable() {
        use tokio::sync::oneshot;

        let (tx, rx) = oneshot::channel::<Result<PredictionResult, SubmissionFailure>>();
        let mut controller = PredictionController::new();
        let mut attrs = PropertyAttributes::default();

        let ticket = controller.begin(&attrs, &munich()).unwrap();
        let sent_space = ticket.request().living_space;

        // The user keeps typing while the request is out.
        attrs.living_space = 120.0;
        assert!(controller.begin(&attrs, &munich()).is_none());

        tx.send(interpret_response(200, r#"{"prediction": 1500}"#)).unwrap();
        let outcome = rx.await.unwrap();
        assert!(controller.complete(ticket, outcome));

        assert_eq!(sent_space, 75.0);
        assert_eq!(controller.result().map(|r| r.point_estimate), Some(1500.0));
        assert_eq!(
            controller.summary(),
            Some("Berechnet für München (80331) • 75 m²")
        );
    }

    #[test]
    fn summary_is_cleared_with_the_result() {
        let mut controller = PredictionController::new();
        let attrs = PropertyAttributes::default();

        let ticket = controller.begin(&attrs, &munich()).unwrap();
        controller.complete(ticket, interpret_response(200, r#"{"prediction": 1}"#));
        assert!(controller.summary().is_some());

        let ticket = controller.begin(&attrs, &munich()).unwrap();
        assert_eq!(controller.summary(), None);
        controller.complete(ticket, interpret_response(500, ""));
        assert_eq!(controller.summary(), None);
    }
}
