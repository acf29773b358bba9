use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::style::{AccessoryKind, AccessorySelection, GateType, StyleOption};

pub const DEFAULT_WIDTH_MM: f64 = 3000.0;
pub const DEFAULT_HEIGHT_MM: f64 = 2125.0;
/// Smallest width the configurator offers.
pub const MIN_WIDTH_MM: f64 = 2200.0;
pub const MIN_HEIGHT_MM: f64 = 2000.0;

/// Raw value of a style field: either one label or a list of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Single(String),
    List(Vec<String>),
}

impl StyleValue {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            StyleValue::Single(v) => std::slice::from_ref(v),
            StyleValue::List(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for StyleValue {
    fn from(values: Vec<&str>) -> Self {
        StyleValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// A customer's gate configuration, the input of every pipeline run.
///
/// Style fields stay as raw labels in `options`; typed access goes through
/// [`GateSpec::style`], which resolves unknown labels to the option's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    pub gate_type: GateType,
    pub width_mm: f64,
    pub height_mm: f64,
    #[serde(default)]
    pub options: BTreeMap<String, StyleValue>,
}

impl Default for GateSpec {
    fn default() -> Self {
        Self::new(GateType::default(), DEFAULT_WIDTH_MM, DEFAULT_HEIGHT_MM)
    }
}

impl GateSpec {
    pub fn new(gate_type: GateType, width_mm: f64, height_mm: f64) -> Self {
        Self {
            gate_type,
            width_mm,
            height_mm,
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// Set a typed style field by its wire key and label.
    pub fn with_style<T: StyleOption>(self, value: T) -> Self {
        self.with_option(T::KEY, value.label())
    }

    pub fn option(&self, key: &str) -> Option<&StyleValue> {
        self.options.get(key)
    }

    /// Typed style field; missing or unknown labels give the default variant.
    pub fn style<T: StyleOption>(&self) -> T {
        self.option(T::KEY)
            .and_then(StyleValue::first)
            .map(T::from_label)
            .unwrap_or_default()
    }

    pub fn color(&self) -> Option<&str> {
        self.option("Kolor").and_then(StyleValue::first)
    }

    pub fn accessories(&self) -> AccessorySelection {
        match self.option(AccessoryKind::KEY) {
            Some(value) => AccessorySelection::from_kinds(value.values().map(AccessoryKind::from_label)),
            None => AccessorySelection::default(),
        }
    }

    pub fn width_m(&self) -> f64 {
        self.width_mm / 1000.0
    }

    pub fn height_m(&self) -> f64 {
        self.height_mm / 1000.0
    }

    pub fn below_minimum(&self) -> bool {
        self.width_mm < MIN_WIDTH_MM || self.height_mm < MIN_HEIGHT_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FillPattern, LeafCount};

    #[test]
    fn test_style_lookup_with_fallback() {
        let spec = GateSpec::default()
            .with_option("Przetłoczenia", "Kasetony")
            .with_option("Ilość skrzydeł", "trzy");
        assert_eq!(spec.style::<FillPattern>(), FillPattern::Caisson);
        assert_eq!(spec.style::<LeafCount>(), LeafCount::Start);
    }

    #[test]
    fn test_accessories_scalar_or_list() {
        let scalar = GateSpec::default().with_option("Dodatki", "Szyny");
        assert!(scalar.accessories().rails);
        let list = GateSpec::default().with_option("Dodatki", vec!["Okna", "Drzwi przejściowe", "???"]);
        let sel = list.accessories();
        assert!(sel.windows && sel.pass_door && !sel.rails);
    }

    #[test]
    fn test_units_and_minimum() {
        let spec = GateSpec::new(GateType::Roller, 2100.0, 2125.0);
        assert!((spec.width_m() - 2.1).abs() < 1e-12);
        assert!(spec.below_minimum());
        assert!(!GateSpec::default().below_minimum());
    }
}
