//! mietpreis-wasm: WebAssembly bindings for mietpreis-core
//!
//! Exposes the rent-estimate form as one JS class, `RentForm`, that owns
//! the whole form state. The page renders from `view()` after every call
//! and after every settled promise.
//!
//! What it provides
//! ----------------
//! - Automatic initialization on module load (via `#[wasm_bindgen(start)]`)
//! - `new RentForm(baseUrl?)`: defaults to the page origin
//! - `RentForm.withGeoData(json, baseUrl?)`: geo data embedded in the page,
//!   `/geo_data.json` as fallback
//! - `loadGeo()`: one-shot geo load (`/geo`, then `/geo_data.json`)
//! - `selectState`, `selectCity`, `editPostalCode`, `finishPostalCodeEdit`
//!   (`editPostalCode` takes a string or a number)
//! - `setAttributes({...})`: the property fields, keyed by wire name
//! - `submit()`: `POST /predict`; resolves with the result
//! - `formOptions()`: option lists and numeric ranges for the inputs
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { RentForm, formOptions } from 'mietpreis-wasm';
//!
//! async function main() {
//!   await init();
//!   const form = new RentForm();
//!   try {
//!     await form.loadGeo();
//!   } catch (message) {
//!     showGeoError(message);
//!   }
//!   render(form.view());
//!
//!   form.editPostalCode('80331');
//!   form.setAttributes({ livingSpace: 62, noRooms: 2, balcony: true });
//!   const result = await form.submit();
//!   console.log(result.pointEstimate);
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Rejected promises carry the user-visible (German) message as a string.
//! - `free()` tears the form down; pending promises still settle but no
//!   longer write into the form.

use mietpreis_core::error::IN_FLIGHT_MESSAGE;
use mietpreis_core::loader::{HttpSource, StaticSource};
use mietpreis_core::prediction::{
    coerce_postal_code, Condition, FieldRange, FlatType, FormChoice, HeatingType,
    HttpPredictionService, InteriorQuality, PredictionService, FLOOR_RANGE, LIVING_SPACE_RANGE,
    ROOMS_RANGE, YEAR_CONSTRUCTED_RANGE,
};
use mietpreis_core::{FormSession, GeoLoader, PropertyAttributes, ServiceConfig};
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing Mietpreis WASM module...".into());
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn page_origin() -> Option<String> {
    web_sys::window().and_then(|w| w.location().origin().ok())
}

fn service_config(base_url: Option<String>) -> Result<ServiceConfig, JsValue> {
    let base = base_url
        .or_else(page_origin)
        .ok_or_else(|| js_error("no base URL and no page origin"))?;
    ServiceConfig::with_base_url(&base).map_err(js_error)
}

/* --------------------------------------------------------------------------
   Form
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct RentForm {
    session: Rc<RefCell<FormSession>>,
    service: Rc<HttpPredictionService>,
}

#[wasm_bindgen]
impl RentForm {
    /// `baseUrl` of the valuation service; the page origin when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> Result<RentForm, JsValue> {
        let config = service_config(base_url)?;
        let client = reqwest::Client::new();
        let loader = GeoLoader::from_config(client.clone(), &config);
        Ok(Self::assemble(loader, client, &config))
    }

    /// Geo data shipped with the page is the primary source, with
    /// `/geo_data.json` as fallback. `loadGeo()` still has to be called.
    #[wasm_bindgen(js_name = withGeoData)]
    pub fn with_geo_data(geo_json: String, base_url: Option<String>) -> Result<RentForm, JsValue> {
        let config = service_config(base_url)?;
        let client = reqwest::Client::new();
        let loader = GeoLoader::new(
            StaticSource::new("page", geo_json),
            HttpSource::new(client.clone(), config.fallback_geo_url()),
        );
        Ok(Self::assemble(loader, client, &config))
    }

    fn assemble(loader: GeoLoader, client: reqwest::Client, config: &ServiceConfig) -> RentForm {
        web_sys::console::log_1(&format!("Mietpreis service at {}", config.base_url).into());
        RentForm {
            session: Rc::new(RefCell::new(FormSession::new(loader))),
            service: Rc::new(HttpPredictionService::from_config(client, config)),
        }
    }

    /// Everything needed to render the form.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.borrow().view()).map_err(js_error)
    }

    /// Load the geo index. Resolves with the view; rejects with the message
    /// to show next to the disabled location fields.
    #[wasm_bindgen(js_name = loadGeo)]
    pub fn load_geo(&self) -> js_sys::Promise {
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            let (loader, guard) = {
                let s = session.borrow();
                (s.loader(), s.liveness())
            };
            let outcome = loader.load().await;
            let mut s = session.borrow_mut();
            s.apply_geo_outcome(&guard, &outcome);
            match outcome {
                Ok(_) => to_value(&s.view()).map_err(js_error),
                Err(failure) => Err(js_error(failure.message)),
            }
        })
    }

    #[wasm_bindgen(js_name = selectState)]
    pub fn select_state(&self, state: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .selector_mut()
            .select_state(state)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = selectCity)]
    pub fn select_city(&self, city: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .selector_mut()
            .select_city(city)
            .map_err(js_error)
    }

    /// Accepts the input's text or a number. Returns `"skipped"`,
    /// `"resolved"` or `"miss"`.
    #[wasm_bindgen(js_name = editPostalCode)]
    pub fn edit_postal_code(&self, value: JsValue) -> Result<JsValue, JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
        let text = coerce_postal_code(&value);
        let lookup = self
            .session
            .borrow_mut()
            .selector_mut()
            .edit_postal_code(&text)
            .map_err(js_error)?;
        to_value(&lookup).map_err(js_error)
    }

    /// Call on blur of the postal-code input.
    #[wasm_bindgen(js_name = finishPostalCodeEdit)]
    pub fn finish_postal_code_edit(&self) {
        self.session
            .borrow_mut()
            .selector_mut()
            .finish_postal_code_edit();
    }

    /// Cities of the selected state matching `query`.
    #[wasm_bindgen(js_name = searchCities)]
    pub fn search_cities(&self, query: &str) -> Result<JsValue, JsValue> {
        let session = self.session.borrow();
        let selector = session.selector();
        let hits = match (selector.index(), selector.selection().state.as_deref()) {
            (Some(index), Some(state)) => index.search_cities(state, query),
            _ => Vec::new(),
        };
        to_value(&hits).map_err(js_error)
    }

    /// Replace the property fields from a plain object keyed by wire name.
    #[wasm_bindgen(js_name = setAttributes)]
    pub fn set_attributes(&self, values: JsValue) -> Result<(), JsValue> {
        let values: serde_json::Value = serde_wasm_bindgen::from_value(values)?;
        let map = values
            .as_object()
            .ok_or_else(|| js_error("attributes must be an object"))?;
        let attrs = PropertyAttributes::from_form(map).map_err(js_error)?;
        self.session.borrow_mut().set_attributes(attrs);
        Ok(())
    }

    /// Submit the form. Resolves with the result; rejects with the message
    /// to show inline. Rejects at once while a submission is in flight.
    pub fn submit(&self) -> js_sys::Promise {
        let session = Rc::clone(&self.session);
        let service = Rc::clone(&self.service);
        future_to_promise(async move {
            let ticket = session
                .borrow_mut()
                .begin_submit()
                .ok_or_else(|| js_error(IN_FLIGHT_MESSAGE))?;
            let outcome = service.predict(ticket.request()).await;
            session.borrow_mut().finish_submit(ticket, outcome.clone());
            match outcome {
                Ok(result) => to_value(&result).map_err(js_error),
                Err(failure) => Err(js_error(failure.user_message())),
            }
        })
    }

    pub fn teardown(&self) {
        self.session.borrow().teardown();
    }
}

impl Drop for RentForm {
    fn drop(&mut self) {
        self.session.borrow().teardown();
    }
}

/* --------------------------------------------------------------------------
   Static form options
-------------------------------------------------------------------------- */

#[derive(Serialize)]
struct Choice {
    value: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormOptions {
    heating_type: Vec<Choice>,
    condition: Vec<Choice>,
    interior_qual: Vec<Choice>,
    type_of_flat: Vec<Choice>,
    living_space: FieldRange,
    no_rooms: FieldRange,
    floor: FieldRange,
    year_constructed: FieldRange,
}

fn choices<T: FormChoice>() -> Vec<Choice> {
    T::choices()
        .into_iter()
        .map(|(value, label)| Choice { value, label })
        .collect()
}

/// Option lists and numeric ranges, keyed by wire name.
#[wasm_bindgen(js_name = formOptions)]
pub fn form_options() -> Result<JsValue, JsValue> {
    let options = FormOptions {
        heating_type: choices::<HeatingType>(),
        condition: choices::<Condition>(),
        interior_qual: choices::<InteriorQuality>(),
        type_of_flat: choices::<FlatType>(),
        living_space: LIVING_SPACE_RANGE,
        no_rooms: ROOMS_RANGE,
        floor: FLOOR_RANGE,
        year_constructed: YEAR_CONSTRUCTED_RANGE,
    };
    to_value(&options).map_err(js_error)
}

/// `1234.5` → `"1234.50"`.
#[wasm_bindgen(js_name = formatAmount)]
pub fn format_amount(value: f64) -> String {
    mietpreis_core::prediction::format_amount(value)
}
