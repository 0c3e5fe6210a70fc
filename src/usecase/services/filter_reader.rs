use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::filter::{FilterValue, FilterValueState};
use crate::domain::entities::schema::{DatasetSchema, FilterDescriptor};
use crate::usecase::ports::ui::ControlState;

/// In-memory control state shared by every front end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub checked: BTreeMap<String, BTreeSet<String>>,
    pub inputs: BTreeMap<String, String>,
}

impl FormState {
    /// Controls as they look right after the panel is built.
    pub fn with_defaults(schema: &DatasetSchema) -> Self {
        let mut state = Self::default();
        state.reset(schema);
        state
    }

    /// Categorical controls back to their declared defaults, inputs emptied.
    pub fn reset(&mut self, schema: &DatasetSchema) {
        self.checked.clear();
        self.inputs.clear();
        for filter in &schema.filters {
            match filter {
                FilterDescriptor::Categorical { id, .. } => {
                    self.checked.insert(id.to_string(), schema.defaults_for(id));
                }
                FilterDescriptor::FreeText { id, .. } => {
                    self.inputs.insert(id.to_string(), String::new());
                }
                FilterDescriptor::Range { min_id, max_id, .. } => {
                    self.inputs.insert(min_id.to_string(), String::new());
                    self.inputs.insert(max_id.to_string(), String::new());
                }
            }
        }
    }

    pub fn set_checked(&mut self, control_id: &str, value: &str, checked: bool) {
        let values = self.checked.entry(control_id.to_string()).or_default();
        if checked {
            values.insert(value.to_string());
        } else {
            values.remove(value);
        }
    }

    pub fn is_checked(&self, control_id: &str, value: &str) -> bool {
        self.checked
            .get(control_id)
            .is_some_and(|values| values.contains(value))
    }

    pub fn set_input(&mut self, control_id: &str, text: impl Into<String>) {
        self.inputs.insert(control_id.to_string(), text.into());
    }

    pub fn input(&self, control_id: &str) -> &str {
        self.inputs.get(control_id).map(String::as_str).unwrap_or("")
    }
}

impl ControlState for FormState {
    fn checked_values(&self, control_id: &str) -> Vec<String> {
        self.checked
            .get(control_id)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn input_value(&self, control_id: &str) -> Option<String> {
        self.inputs.get(control_id).cloned()
    }
}

/// Normalizes the controls of one dataset into filter values.
pub fn read_filter_values(schema: &DatasetSchema, controls: &dyn ControlState) -> FilterValueState {
    let mut state = FilterValueState::default();

    for filter in &schema.filters {
        let value = match filter {
            FilterDescriptor::Categorical { id, .. } => FilterValue::Categorical(
                controls
                    .checked_values(id)
                    .into_iter()
                    .filter(|value| !value.is_empty())
                    .collect(),
            ),
            FilterDescriptor::FreeText { id, .. } => FilterValue::Text(
                controls
                    .input_value(id)
                    .map(|text| text.trim().to_string())
                    .unwrap_or_default(),
            ),
            FilterDescriptor::Range { min_id, max_id, .. } => FilterValue::Range {
                min: parse_bound(controls.input_value(min_id)),
                max: parse_bound(controls.input_value(max_id)),
            },
        };
        state.insert(filter.value_key(), value);
    }

    state
}

/// Blank or malformed input leaves the bound open.
fn parse_bound(raw: Option<String>) -> Option<f64> {
    raw.as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|number| number.is_finite())
}
