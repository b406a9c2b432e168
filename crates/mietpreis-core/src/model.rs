// crates/mietpreis-core/src/model.rs
use crate::common::IndexStats;
use crate::error::{Error, Result};
use crate::raw::GeoRaw;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Read;

/// Ordered postal codes of one city.
pub type PostalCodes = BTreeSet<String>;

/// The loaded three-level lookup: state → city → postal codes.
///
/// Built once from a [`GeoRaw`] payload and immutable afterwards. States,
/// cities and postal codes iterate in lexicographic order, so the first
/// element of every derived list is also the default selection.
///
/// A postal code belongs to exactly one (state, city) pair. When a source
/// lists the same code twice, the first pair in iteration order keeps it and
/// later listings are dropped (see [`IndexStats::dropped_duplicates`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeoIndex {
    by_state: BTreeMap<String, BTreeMap<String, PostalCodes>>,
    by_postal_code: HashMap<String, (String, String)>,
    dropped_duplicates: usize,
}

/// Convert a raw payload into a [`GeoIndex`].
pub fn build_index(raw: GeoRaw) -> GeoIndex {
    let mut by_state = BTreeMap::new();
    let mut by_postal_code: HashMap<String, (String, String)> = HashMap::new();
    let mut dropped_duplicates = 0usize;

    for (state, cities_raw) in raw {
        let mut cities = BTreeMap::new();
        for (city, codes_raw) in cities_raw {
            let mut codes = PostalCodes::new();
            for code in codes_raw {
                if code.is_empty() {
                    continue;
                }
                if let Some((owner_state, owner_city)) = by_postal_code.get(&code) {
                    if owner_state != &state || owner_city != &city {
                        warn!(
                            "postal code {code} listed under {state}/{city} already belongs to {owner_state}/{owner_city}; dropping"
                        );
                        dropped_duplicates += 1;
                    }
                    continue;
                }
                by_postal_code.insert(code.clone(), (state.clone(), city.clone()));
                codes.insert(code);
            }
            cities.insert(city, codes);
        }
        by_state.insert(state, cities);
    }

    let index = GeoIndex {
        by_state,
        by_postal_code,
        dropped_duplicates,
    };
    debug!("built geo index: {:?}", index.stats());
    index
}

impl GeoIndex {
    pub fn from_raw(raw: GeoRaw) -> Self {
        build_index(raw)
    }

    /// Parse a JSON payload (`{State: {City: [PostalCode]}}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: GeoRaw = serde_json::from_str(json)?;
        Ok(build_index(raw))
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: GeoRaw = serde_json::from_slice(bytes)?;
        Ok(build_index(raw))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: GeoRaw = serde_json::from_reader(reader).map_err(Error::Json)?;
        Ok(build_index(raw))
    }

    pub fn is_empty(&self) -> bool {
        self.by_state.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let cities = self.by_state.values().map(BTreeMap::len).sum();
        IndexStats {
            states: self.by_state.len(),
            cities,
            postal_codes: self.by_postal_code.len(),
            dropped_duplicates: self.dropped_duplicates,
        }
    }

    /// All states, sorted.
    pub fn states(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_state.keys().map(String::as_str)
    }

    /// Cities of `state`, sorted. Empty for an unknown state.
    pub fn cities<'a>(&'a self, state: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.by_state
            .get(state)
            .into_iter()
            .flat_map(|cities| cities.keys().map(String::as_str))
    }

    /// Postal codes of (`state`, `city`), sorted. Empty for an unknown pair.
    pub fn postal_codes<'a>(&'a self, state: &str, city: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.by_state
            .get(state)
            .and_then(|cities| cities.get(city))
            .into_iter()
            .flat_map(|codes| codes.iter().map(String::as_str))
    }

    pub fn first_state(&self) -> Option<&str> {
        self.states().next()
    }

    pub fn first_city(&self, state: &str) -> Option<&str> {
        self.cities(state).next()
    }

    pub fn first_postal_code(&self, state: &str, city: &str) -> Option<&str> {
        self.postal_codes(state, city).next()
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.by_state.contains_key(state)
    }

    pub fn has_city(&self, state: &str, city: &str) -> bool {
        self.by_state
            .get(state)
            .is_some_and(|cities| cities.contains_key(city))
    }

    pub fn has_postal_code(&self, state: &str, city: &str, code: &str) -> bool {
        self.by_state
            .get(state)
            .and_then(|cities| cities.get(city))
            .is_some_and(|codes| codes.contains(code))
    }

    /// Reverse lookup: the (state, city) owning `code`.
    pub fn locate(&self, code: &str) -> Option<(&str, &str)> {
        self.by_postal_code
            .get(code)
            .map(|(state, city)| (state.as_str(), city.as_str()))
    }

    pub(crate) fn postal_code_entries(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.by_state.iter().flat_map(|(state, cities)| {
            cities.iter().flat_map(move |(city, codes)| {
                codes
                    .iter()
                    .map(move |code| (code.as_str(), state.as_str(), city.as_str()))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Hessen": { "Frankfurt": ["60311"] },
        "Bayern": { "Nuernberg": ["90402"], "Muenchen": ["80333", "80331"] }
    }"#;

    #[test]
    fn derived_lists_are_sorted() {
        let index = GeoIndex::from_json_str(SAMPLE).unwrap();
        assert_eq!(index.states().collect::<Vec<_>>(), ["Bayern", "Hessen"]);
        assert_eq!(
            index.cities("Bayern").collect::<Vec<_>>(),
            ["Muenchen", "Nuernberg"]
        );
        assert_eq!(
            index.postal_codes("Bayern", "Muenchen").collect::<Vec<_>>(),
            ["80331", "80333"]
        );
        assert_eq!(index.first_state(), Some("Bayern"));
        assert_eq!(index.first_city("Hessen"), Some("Frankfurt"));
        assert_eq!(index.first_postal_code("Bayern", "Muenchen"), Some("80331"));
    }

    #[test]
    fn unknown_keys_yield_empty_lists() {
        let index = GeoIndex::from_json_str(SAMPLE).unwrap();
        assert_eq!(index.cities("Saarland").count(), 0);
        assert_eq!(index.postal_codes("Bayern", "Frankfurt").count(), 0);
        assert_eq!(index.first_city("Saarland"), None);
        assert!(!index.has_city("Hessen", "Muenchen"));
    }

    #[test]
    fn reverse_lookup_finds_owner() {
        let index = GeoIndex::from_json_str(SAMPLE).unwrap();
        assert_eq!(index.locate("60311"), Some(("Hessen", "Frankfurt")));
        assert_eq!(index.locate("80333"), Some(("Bayern", "Muenchen")));
        assert_eq!(index.locate("99999"), None);
    }

    #[test]
    fn cross_listed_codes_keep_first_owner() {
        let index = GeoIndex::from_json_str(
            r#"{ "Berlin": { "Berlin": ["10115"] }, "Brandenburg": { "Potsdam": ["10115", "14467"] } }"#,
        )
        .unwrap();

        assert_eq!(index.locate("10115"), Some(("Berlin", "Berlin")));
        assert!(!index.has_postal_code("Brandenburg", "Potsdam", "10115"));
        assert_eq!(
            index.stats(),
            IndexStats {
                states: 2,
                cities: 2,
                postal_codes: 2,
                dropped_duplicates: 1,
            }
        );
    }

    #[test]
    fn duplicates_within_a_city_collapse() {
        let index =
            GeoIndex::from_json_str(r#"{ "Bremen": { "Bremen": ["28195", "28195", ""] } }"#)
                .unwrap();
        assert_eq!(index.postal_codes("Bremen", "Bremen").count(), 1);
        assert_eq!(index.stats().dropped_duplicates, 0);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        assert!(GeoIndex::from_json_str(r#"{ "Bayern": ["80331"] }"#).is_err());
        assert!(GeoIndex::from_json_str("not json").is_err());
    }

    #[test]
    fn empty_payload_builds_empty_index() {
        let index = GeoIndex::from_json_str("{}").unwrap();
        assert!(index.is_empty());
        assert_eq!(index.first_state(), None);
    }
}
