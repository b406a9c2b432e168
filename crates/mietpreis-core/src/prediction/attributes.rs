// crates/mietpreis-core/src/prediction/attributes.rs

//! The property fields of the form.
//!
//! Categorical fields are fixed enumerations whose wire value is the label
//! the valuation service maps (`"Fernwaerme"`, `"Vollstaendig renoviert"`,
//! …). [`FormChoice::label`] gives the spelling shown in the select.
//!
//! Numeric ranges are input affordances only; nothing here rejects a value
//! outside them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// One option list of the form.
pub trait FormChoice: IntoEnumIterator + Copy {
    /// Wire value (as sent to the service).
    fn value(self) -> &'static str;

    /// Display spelling (with umlauts).
    fn label(self) -> &'static str;

    /// `(value, label)` pairs in display order.
    fn choices() -> Vec<(&'static str, &'static str)> {
        Self::iter().map(|c| (c.value(), c.label())).collect()
    }
}

// `Variant => "value" | "Label";` where the label is only given when it
// differs from the wire value.
macro_rules! form_choice {
    (@label $value:literal) => { $value };
    (@label $value:literal, $label:literal) => { $label };

    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal $(| $label:literal)?; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Default,
            Serialize,
            Deserialize,
            Display,
            EnumString,
            EnumIter,
            AsRefStr,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value $(, alias = $label)?)]
                #[strum(to_string = $value $(, serialize = $label)?)]
                $variant,
            )+
        }

        impl FormChoice for $name {
            fn value(self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => form_choice!(@label $value $(, $label)?), )+
                }
            }
        }
    };
}

form_choice! {
    /// Heizungsart.
    pub enum HeatingType {
        #[default]
        Zentralheizung => "Zentralheizung";
        Fernwaerme => "Fernwaerme" | "Fernwärme";
        GasHeizung => "Gas-Heizung";
        Etagenheizung => "Etagenheizung";
        Fussbodenheizung => "Fussbodenheizung" | "Fußbodenheizung";
        Oelheizung => "Oelheizung" | "Ölheizung";
        Waermepumpe => "Waermepumpe" | "Wärmepumpe";
        Holzpelletheizung => "Holzpelletheizung";
        Andere => "Andere";
    }
}

form_choice! {
    /// Zustand.
    pub enum Condition {
        #[default]
        Gepflegt => "Gepflegt";
        Erstbezug => "Erstbezug";
        Saniert => "Saniert";
        VollstaendigRenoviert => "Vollstaendig renoviert" | "Vollständig renoviert";
        Neuwertig => "Neuwertig";
        Modernisiert => "Modernisiert";
        ErstbezugNachSanierung => "Erstbezug nach Sanierung";
        Andere => "Andere";
    }
}

form_choice! {
    /// Ausstattungsqualität.
    pub enum InteriorQuality {
        #[default]
        Normal => "Normal";
        Gehoben => "Gehoben";
        Luxus => "Luxus";
        Einfach => "Einfach";
    }
}

form_choice! {
    /// Wohnungstyp.
    pub enum FlatType {
        #[default]
        Etagenwohnung => "Etagenwohnung";
        Dachgeschoss => "Dachgeschoss";
        Erdgeschoss => "Erdgeschoss";
        Maisonette => "Maisonette";
        Hochparterre => "Hochparterre";
        Penthouse => "Penthouse";
        Souterrain => "Souterrain";
        Andere => "Andere";
    }
}

/// Input affordance of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Wohnfläche in m².
pub const LIVING_SPACE_RANGE: FieldRange = FieldRange {
    min: 10.0,
    max: 600.0,
    default: 75.0,
    step: 1.0,
};

pub const ROOMS_RANGE: FieldRange = FieldRange {
    min: 1.0,
    max: 15.0,
    default: 3.0,
    step: 1.0,
};

pub const FLOOR_RANGE: FieldRange = FieldRange {
    min: 0.0,
    max: 40.0,
    default: 1.0,
    step: 1.0,
};

pub const YEAR_CONSTRUCTED_RANGE: FieldRange = FieldRange {
    min: 1900.0,
    max: 2025.0,
    default: 1995.0,
    step: 1.0,
};

/// Everything the form knows about the flat apart from its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyAttributes {
    pub living_space: f64,
    pub rooms: f64,
    pub floor: f64,
    pub year_constructed: f64,

    pub heating_type: HeatingType,
    pub condition: Condition,
    pub interior_quality: InteriorQuality,
    pub flat_type: FlatType,

    pub balcony: bool,
    pub lift: bool,
    pub fitted_kitchen: bool,
    pub garden: bool,
    pub cellar: bool,

    /// Listing date (`YYYY-MM-DD`); the service assumes "today" when absent.
    pub listing_date: Option<String>,
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        PropertyAttributes {
            living_space: LIVING_SPACE_RANGE.default,
            rooms: ROOMS_RANGE.default,
            floor: FLOOR_RANGE.default,
            year_constructed: YEAR_CONSTRUCTED_RANGE.default,
            heating_type: HeatingType::default(),
            condition: Condition::default(),
            interior_quality: InteriorQuality::default(),
            flat_type: FlatType::default(),
            balcony: false,
            lift: false,
            fitted_kitchen: false,
            garden: false,
            cellar: false,
            listing_date: None,
        }
    }
}

impl PropertyAttributes {
    /// Build attributes from loosely-typed form values keyed by wire name
    /// (`livingSpace`, `noRooms`, `heatingType`, `hasKitchen`, `date`, …).
    ///
    /// Missing keys keep their defaults. Numeric fields go through
    /// [`coerce_number`], so `"75"` and `75` are the same and an unparseable
    /// entry becomes NaN for the service to reject. An unknown option label
    /// is an error.
    pub fn from_form(values: &Map<String, Value>) -> Result<Self> {
        let mut attrs = PropertyAttributes::default();

        let number = |key: &str, slot: &mut f64| {
            if let Some(v) = values.get(key) {
                *slot = coerce_number(v);
            }
        };
        number("livingSpace", &mut attrs.living_space);
        number("noRooms", &mut attrs.rooms);
        number("floor", &mut attrs.floor);
        number("yearConstructed", &mut attrs.year_constructed);

        if let Some(v) = values.get("heatingType") {
            attrs.heating_type = parse_choice("heatingType", v)?;
        }
        if let Some(v) = values.get("condition") {
            attrs.condition = parse_choice("condition", v)?;
        }
        if let Some(v) = values.get("interiorQual") {
            attrs.interior_quality = parse_choice("interiorQual", v)?;
        }
        if let Some(v) = values.get("typeOfFlat") {
            attrs.flat_type = parse_choice("typeOfFlat", v)?;
        }

        let flag = |key: &str, slot: &mut bool| {
            if let Some(v) = values.get(key) {
                *slot = coerce_flag(v);
            }
        };
        flag("balcony", &mut attrs.balcony);
        flag("lift", &mut attrs.lift);
        flag("hasKitchen", &mut attrs.fitted_kitchen);
        flag("garden", &mut attrs.garden);
        flag("cellar", &mut attrs.cellar);

        attrs.listing_date = values
            .get("date")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        Ok(attrs)
    }
}

fn parse_choice<T: FromStr>(key: &str, value: &Value) -> Result<T> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::InvalidData(format!("{key}: expected a string, got {value}")))?;
    T::from_str(text.trim())
        .map_err(|_| Error::InvalidData(format!("{key}: unknown option {text:?}")))
}

/// Coerce a form value to a number.
///
/// Numbers pass through; strings are trimmed and parsed (a decimal comma is
/// accepted, an empty string is 0); booleans are 1/0; `null` is 0. Anything
/// else is NaN.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.replace(',', ".").parse().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Coerce a postal-code form value to text; a number keeps its digits.
pub fn coerce_postal_code(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(digits), _) => digits.to_string(),
            // JS numbers arrive as floats.
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 && f >= 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "on" | "1" | "ja"),
        _ => false,
    }
}
