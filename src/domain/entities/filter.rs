use std::collections::{BTreeMap, BTreeSet};

/// Normalized value of one filter after reading the controls.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Categorical(BTreeSet<String>),
    Text(String),
    Range { min: Option<f64>, max: Option<f64> },
}

impl FilterValue {
    /// True when the filter contributes no predicate.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            FilterValue::Categorical(values) => values.is_empty(),
            FilterValue::Text(text) => text.is_empty(),
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
        }
    }
}

/// Filter values keyed by filter id (`min_id` for ranges).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterValueState {
    pub values: BTreeMap<String, FilterValue>,
}

impl FilterValueState {
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FilterValue) {
        self.values.insert(key.into(), value);
    }

    pub fn active_count(&self) -> usize {
        self.values
            .values()
            .filter(|value| !value.is_unconstrained())
            .count()
    }
}
