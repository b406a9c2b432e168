// crates/mietpreis-core/src/selection.rs

//! # Location Selection
//!
//! The three linked selects of the form: state → city → postal code.
//!
//! State and city changes are forward-only and always normalize the fields
//! below them to the first valid entry. The postal code is the only
//! free-typed field; a complete (five character) code resolves its state and
//! city through the index's reverse lookup.
//!
//! Every mutating operation ends with [`LocationSelector::repair`], an
//! explicit invariant check that resets a city missing from its state's list
//! and then a postal code missing from its city's list. While the user is
//! typing a postal code the typed text is left alone until
//! [`LocationSelector::finish_postal_code_edit`].

use crate::error::SelectionError;
use crate::model::GeoIndex;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Length of a complete German postal code.
pub const POSTAL_CODE_LEN: usize = 5;

/// The current values of the three location fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSelection {
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl LocationSelection {
    pub fn new(
        state: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        LocationSelection {
            state: Some(state.into()),
            city: Some(city.into()),
            postal_code: Some(postal_code.into()),
        }
    }

    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("")
    }

    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }

    pub fn postal_code(&self) -> &str {
        self.postal_code.as_deref().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.city.is_none() && self.postal_code.is_none()
    }
}

/// Lifecycle of the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectorPhase {
    /// No index yet; the selects are disabled.
    Uninitialized,
    Ready,
}

/// Outcome of [`LocationSelector::edit_postal_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostalCodeLookup {
    /// The text is not five characters long; no lookup was attempted.
    Skipped,
    /// State and city were set to the code's owner.
    Resolved,
    /// No owner in the index; state and city are unchanged.
    Miss,
}

/// What a [`LocationSelector::repair`] pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Repair {
    pub city: bool,
    pub postal_code: bool,
}

impl Repair {
    pub fn is_noop(&self) -> bool {
        !self.city && !self.postal_code
    }
}

/// State machine driving the three location fields.
#[derive(Debug, Clone, Default)]
pub struct LocationSelector {
    index: Option<Arc<GeoIndex>>,
    selection: LocationSelection,
    editing_postal_code: bool,
}

impl LocationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector that is already [`SelectorPhase::Ready`].
    pub fn with_index(index: Arc<GeoIndex>) -> Self {
        let mut selector = Self::new();
        selector.attach_index(index);
        selector
    }

    pub fn phase(&self) -> SelectorPhase {
        if self.index.is_some() {
            SelectorPhase::Ready
        } else {
            SelectorPhase::Uninitialized
        }
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&GeoIndex> {
        self.index.as_deref()
    }

    pub fn selection(&self) -> &LocationSelection {
        &self.selection
    }

    pub fn is_editing_postal_code(&self) -> bool {
        self.editing_postal_code
    }

    /// Install the loaded index.
    ///
    /// A selection whose state exists in the new index is kept and repaired;
    /// anything else is replaced by the initial selection (first state, its
    /// first city, that city's first postal code).
    pub fn attach_index(&mut self, index: Arc<GeoIndex>) {
        let keep = self
            .selection
            .state
            .as_deref()
            .is_some_and(|s| index.has_state(s));
        self.index = Some(index);

        if keep {
            self.repair();
        } else {
            self.initial_selection();
        }
    }

    fn initial_selection(&mut self) {
        let Some(index) = self.index.as_deref() else {
            return;
        };
        let state = index.first_state().map(str::to_owned);
        let city = state
            .as_deref()
            .and_then(|s| index.first_city(s))
            .map(str::to_owned);
        let postal_code = match (state.as_deref(), city.as_deref()) {
            (Some(s), Some(c)) => index.first_postal_code(s, c).map(str::to_owned),
            _ => None,
        };

        self.selection = LocationSelection {
            state,
            city,
            postal_code,
        };
        self.editing_postal_code = false;
        debug!("initial location selection: {:?}", self.selection);
    }

    /// Select a state and normalize city and postal code to its defaults.
    pub fn select_state(&mut self, state: &str) -> Result<(), SelectionError> {
        let index = self.index.as_deref().ok_or(SelectionError::NotReady)?;
        let city = index.first_city(state).map(str::to_owned);
        let postal_code = city
            .as_deref()
            .and_then(|c| index.first_postal_code(state, c))
            .map(str::to_owned);

        self.selection = LocationSelection {
            state: Some(state.to_owned()),
            city,
            postal_code,
        };
        self.editing_postal_code = false;
        debug!("state selected: {:?}", self.selection);
        self.repair();
        Ok(())
    }

    /// Select a city of the current state and normalize the postal code.
    pub fn select_city(&mut self, city: &str) -> Result<(), SelectionError> {
        let index = self.index.as_deref().ok_or(SelectionError::NotReady)?;
        let state = self
            .selection
            .state
            .as_deref()
            .ok_or(SelectionError::NoStateSelected)?;
        let postal_code = index.first_postal_code(state, city).map(str::to_owned);

        self.selection.city = Some(city.to_owned());
        self.selection.postal_code = postal_code;
        self.editing_postal_code = false;
        debug!("city selected: {:?}", self.selection);
        self.repair();
        Ok(())
    }

    /// Accept typed postal-code text.
    ///
    /// The text is always taken as the displayed value. Exactly five
    /// characters trigger a reverse lookup; a hit sets state and city, a miss
    /// leaves them as they are.
    pub fn edit_postal_code(&mut self, text: &str) -> Result<PostalCodeLookup, SelectionError> {
        let index = self.index.as_deref().ok_or(SelectionError::NotReady)?;
        self.selection.postal_code = (!text.is_empty()).then(|| text.to_owned());
        self.editing_postal_code = true;

        let lookup = if text.chars().count() != POSTAL_CODE_LEN {
            PostalCodeLookup::Skipped
        } else if let Some((state, city)) = index.locate(text) {
            self.selection.state = Some(state.to_owned());
            self.selection.city = Some(city.to_owned());
            PostalCodeLookup::Resolved
        } else {
            PostalCodeLookup::Miss
        };

        debug!("postal code edited ({lookup:?}): {:?}", self.selection);
        self.repair();
        Ok(lookup)
    }

    /// End free typing of the postal code.
    ///
    /// A typed value that is not in the current city's list is replaced by
    /// the city's first postal code.
    pub fn finish_postal_code_edit(&mut self) -> Repair {
        self.editing_postal_code = false;
        self.repair()
    }

    /// Restore the steady-state invariant.
    ///
    /// City first, then postal code; a changed city always forces the
    /// postal-code check, even while the code is being typed. Running it on a
    /// consistent selection changes nothing.
    pub fn repair(&mut self) -> Repair {
        let mut outcome = Repair::default();
        let Some(index) = self.index.as_deref() else {
            return outcome;
        };
        let Some(state) = self.selection.state.as_deref() else {
            return outcome;
        };

        let city_ok = self
            .selection
            .city
            .as_deref()
            .is_some_and(|c| index.has_city(state, c));
        if !city_ok {
            let first = index.first_city(state).map(str::to_owned);
            if first != self.selection.city {
                self.selection.city = first;
                outcome.city = true;
            }
        }

        if !self.editing_postal_code || outcome.city {
            let code_ok = match (self.selection.city.as_deref(), self.selection.postal_code.as_deref()) {
                (Some(city), Some(code)) => index.has_postal_code(state, city, code),
                _ => false,
            };
            if !code_ok {
                let first = self
                    .selection
                    .city
                    .as_deref()
                    .and_then(|c| index.first_postal_code(state, c))
                    .map(str::to_owned);
                if first != self.selection.postal_code {
                    self.selection.postal_code = first;
                    outcome.postal_code = true;
                }
            }
        }

        if !outcome.is_noop() {
            debug!("location repaired ({outcome:?}): {:?}", self.selection);
        }
        outcome
    }

    /// Whether the steady-state invariant currently holds.
    pub fn is_consistent(&self) -> bool {
        let (Some(index), Some(state)) = (self.index.as_deref(), self.selection.state.as_deref())
        else {
            return true;
        };
        let city_ok = match self.selection.city.as_deref() {
            Some(city) => index.has_city(state, city),
            None => index.first_city(state).is_none(),
        };
        let code_ok = match (self.selection.city.as_deref(), self.selection.postal_code.as_deref()) {
            (Some(city), Some(code)) => index.has_postal_code(state, city, code),
            (Some(city), None) => index.first_postal_code(state, city).is_none(),
            (None, code) => code.is_none(),
        };
        city_ok && code_ok
    }

    /* ----------------------------------------------------------------------
       Options for the three selects
    ---------------------------------------------------------------------- */

    pub fn state_options(&self) -> Vec<&str> {
        self.index
            .as_deref()
            .map(|index| index.states().collect())
            .unwrap_or_default()
    }

    pub fn city_options(&self) -> Vec<&str> {
        match (self.index.as_deref(), self.selection.state.as_deref()) {
            (Some(index), Some(state)) => index.cities(state).collect(),
            _ => Vec::new(),
        }
    }

    pub fn postal_code_options(&self) -> Vec<&str> {
        match (
            self.index.as_deref(),
            self.selection.state.as_deref(),
            self.selection.city.as_deref(),
        ) {
            (Some(index), Some(state), Some(city)) => index.postal_codes(state, city).collect(),
            _ => Vec::new(),
        }
    }
}
