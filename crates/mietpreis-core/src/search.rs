// crates/mietpreis-core/src/search.rs
use crate::model::GeoIndex;
use crate::text::fold_umlaut_key;
use serde::Serialize;

/// A postal code together with its owning state and city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostalCodeHit<'a> {
    pub postal_code: &'a str,
    pub state: &'a str,
    pub city: &'a str,
}

impl GeoIndex {
    /// Type-to-search for the city select of one state.
    ///
    /// Accent- and case-insensitive substring match; `Muenchen`, `münchen`
    /// and `MUNCHEN` all find `München`. Prefix matches come first, each
    /// group in the sorted city order. An empty query returns every city.
    pub fn search_cities<'a>(&'a self, state: &str, query: &str) -> Vec<&'a str> {
        let q = fold_umlaut_key(query.trim());
        if q.is_empty() {
            return self.cities(state).collect();
        }

        let mut prefix = Vec::new();
        let mut infix = Vec::new();
        for city in self.cities(state) {
            let key = fold_umlaut_key(city);
            if key.starts_with(&q) {
                prefix.push(city);
            } else if key.contains(&q) {
                infix.push(city);
            }
        }
        prefix.extend(infix);
        prefix
    }

    /// Completion candidates for a partially typed postal code.
    ///
    /// Returns at most `limit` hits in ascending postal-code order. An empty
    /// prefix returns nothing.
    pub fn postal_codes_with_prefix<'a>(&'a self, prefix: &str, limit: usize) -> Vec<PostalCodeHit<'a>> {
        let prefix = prefix.trim();
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<PostalCodeHit<'a>> = self
            .postal_code_entries()
            .filter(|(code, _, _)| code.starts_with(prefix))
            .map(|(postal_code, state, city)| PostalCodeHit {
                postal_code,
                state,
                city,
            })
            .collect();
        hits.sort_by(|a, b| a.postal_code.cmp(b.postal_code));
        hits.truncate(limit);
        hits
    }
}
