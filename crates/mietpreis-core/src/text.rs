// crates/mietpreis-core/src/text.rs

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `München` -> `Munchen`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use mietpreis_core::text::fold_key;
///
/// assert_eq!(fold_key("München"), "munchen");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Folds German umlaut transcriptions (`ue`, `oe`, `ae`) so that
/// `Muenchen` and `München` compare equal.
pub(crate) fn fold_umlaut_key(s: &str) -> String {
    fold_key(s)
        .replace("ae", "a")
        .replace("oe", "o")
        .replace("ue", "u")
}
