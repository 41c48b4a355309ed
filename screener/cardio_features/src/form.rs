use std::collections::HashMap;

use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;

use crate::encoding::CategoricalFeature;
use crate::schema::{FeatureKind, FeatureSpec, FormSchema};

/// Errors raised while filling a form or encoding it into a feature
/// vector. Encoding stops at the first offending field, reported in
/// schema order.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field `{name}`")]
    UnknownField { name: String },

    #[error("{name}: a value is required")]
    MissingValue { name: &'static str },

    #[error("{name}: unknown value `{value}`; expected one of: {}", .feature.labels().join(", "))]
    UnknownLabel {
        name: &'static str,
        value: String,
        feature: CategoricalFeature,
    },

    #[error("{name}: `{value}` is not a number")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name}: value must be finite")]
    NonFinite { name: &'static str },

    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("{name}: unsupported JSON value ({found}); use a number or a string")]
    UnsupportedValue { name: String, found: &'static str },

    #[error("invalid record JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

/// Advisory note about a filled value that encodes fine but falls
/// outside the range usually seen in screening data. Never blocks
/// encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormWarning {
    pub name: &'static str,
    pub message: String,
}

// Plausible clinical ranges; values outside them still encode.
const TYPICAL_RANGES: &[(&str, f64, f64)] = &[
    ("age", 1.0, 120.0),
    ("resting_bp", 60.0, 250.0),
    ("cholesterol", 80.0, 700.0),
    ("max_heart_rate", 60.0, 250.0),
    ("oldpeak", 0.0, 10.0),
    ("num_vessels_fluoro", 0.0, 3.0),
];

/// A partially or fully filled screening form. Values are kept as the
/// raw strings the user supplied; all interpretation happens in
/// [`PatientForm::to_feature_vector`].
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    values: HashMap<&'static str, String>,
}

impl PatientForm {
    pub fn new() -> Self {
        PatientForm::default()
    }

    /// Build a form from a JSON record string.
    pub fn from_json(text: &str) -> Result<PatientForm, FormError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Build a form from a parsed JSON record. Keys must be schema
    /// field names; values may be numbers or strings (display labels
    /// or numeric codes for categoricals). `null` leaves the field
    /// unset.
    pub fn from_json_value(value: &serde_json::Value) -> Result<PatientForm, FormError> {
        let map = value.as_object().ok_or(FormError::NotAnObject)?;
        let mut form = PatientForm::new();
        for (key, val) in map {
            let spec = FormSchema::standard()
                .spec(key)
                .ok_or_else(|| FormError::UnknownField { name: key.clone() })?;
            let raw = match val {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(_) => {
                    return Err(FormError::UnsupportedValue {
                        name: key.clone(),
                        found: "boolean",
                    })
                }
                serde_json::Value::Array(_) => {
                    return Err(FormError::UnsupportedValue {
                        name: key.clone(),
                        found: "array",
                    })
                }
                serde_json::Value::Object(_) => {
                    return Err(FormError::UnsupportedValue {
                        name: key.clone(),
                        found: "object",
                    })
                }
            };
            form.values.insert(spec.name, raw);
        }
        debug!(
            "loaded record with {} of {} fields",
            form.filled_count(),
            FormSchema::standard().len()
        );
        Ok(form)
    }

    /// Record a raw value for a field. The value is stored verbatim;
    /// a whitespace-only value counts as unset.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let spec = FormSchema::standard()
            .spec(name)
            .ok_or_else(|| FormError::UnknownField { name: name.to_string() })?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    pub fn unset(&mut self, name: &str) -> Result<(), FormError> {
        let spec = FormSchema::standard()
            .spec(name)
            .ok_or_else(|| FormError::UnknownField { name: name.to_string() })?;
        self.values.remove(spec.name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    fn filled(&self, name: &'static str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn filled_count(&self) -> usize {
        FormSchema::standard()
            .iter()
            .filter(|s| self.filled(s.name).is_some())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of fields still waiting for a value, in schema order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        FormSchema::standard()
            .iter()
            .filter(|s| self.filled(s.name).is_none())
            .map(|s| s.name)
            .collect()
    }

    /// Encode one raw value according to its field spec.
    pub fn encode_field(spec: &FeatureSpec, raw: &str) -> Result<f64, FormError> {
        let trimmed = raw.trim();
        match spec.kind {
            FeatureKind::Numeric => {
                let parsed: f64 = trimmed.parse().map_err(|_| FormError::InvalidNumber {
                    name: spec.name,
                    value: raw.to_string(),
                })?;
                if !parsed.is_finite() {
                    return Err(FormError::NonFinite { name: spec.name });
                }
                Ok(parsed)
            }
            FeatureKind::Categorical { feature } => {
                if let Some(code) = feature.code_for(trimmed) {
                    return Ok(f64::from(code));
                }
                // Records may carry the raw training code instead of
                // the display label.
                if let Ok(n) = trimmed.parse::<f64>() {
                    let in_range = n >= 0.0 && n < f64::from(feature.code_count());
                    if n.is_finite() && n.fract() == 0.0 && in_range {
                        return Ok(n);
                    }
                }
                Err(FormError::UnknownLabel {
                    name: spec.name,
                    value: raw.to_string(),
                    feature,
                })
            }
        }
    }

    /// Encode the form into the model's input vector, in schema order.
    /// Fails on the first missing or malformed field.
    pub fn to_feature_vector(&self) -> Result<Vec<f64>, FormError> {
        let schema = FormSchema::standard();
        let mut vector = Vec::with_capacity(schema.len());
        for spec in schema.iter() {
            let raw = self
                .filled(spec.name)
                .ok_or(FormError::MissingValue { name: spec.name })?;
            let encoded = Self::encode_field(spec, raw)?;
            trace!("encoded {} = {}", spec.name, encoded);
            vector.push(encoded);
        }
        debug!("encoded feature vector of length {}", vector.len());
        Ok(vector)
    }

    /// Advisory range checks over the filled numeric fields. Values
    /// that fail to parse are skipped here; encoding reports those as
    /// errors.
    pub fn warnings(&self) -> Vec<FormWarning> {
        let mut warnings = Vec::new();
        for &(name, lo, hi) in TYPICAL_RANGES {
            let spec = match FormSchema::standard().spec(name) {
                Some(spec) => spec,
                None => continue,
            };
            let raw = match self.filled(spec.name) {
                Some(raw) => raw,
                None => continue,
            };
            let value: f64 = match raw.trim().parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            if value < lo || value > hi {
                warnings.push(FormWarning {
                    name: spec.name,
                    message: format!(
                        "{} {} is outside the typical range {}..{}",
                        spec.name,
                        raw.trim(),
                        lo,
                        hi
                    ),
                });
            }
        }
        if let Some(raw) = self.filled("fasting_blood_sugar") {
            if let Ok(v) = raw.trim().parse::<f64>() {
                if v != 0.0 && v != 1.0 {
                    warnings.push(FormWarning {
                        name: "fasting_blood_sugar",
                        message: format!(
                            "fasting_blood_sugar {} is unusual; the field is the > 120 mg/dl indicator, usually 0 or 1",
                            raw.trim()
                        ),
                    });
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> PatientForm {
        let mut form = PatientForm::new();
        for (name, value) in [
            ("age", "54"),
            ("sex", "Male"),
            ("chest_pain_type", "Atypical Angina"),
            ("resting_bp", "130"),
            ("cholesterol", "246"),
            ("fasting_blood_sugar", "0"),
            ("resting_ecg", "Normal"),
            ("max_heart_rate", "150"),
            ("exercise_induced_angina", "No"),
            ("oldpeak", "1.0"),
            ("st_slope", "Flat"),
            ("num_vessels_fluoro", "0"),
            ("thallium_stress_test", "Normal"),
        ] {
            form.set(name, value).unwrap();
        }
        form
    }

    #[test]
    fn set_rejects_unknown_fields() {
        let mut form = PatientForm::new();
        assert!(matches!(
            form.set("blood_type", "A"),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut form = filled_form();
        form.set("age", "   ").unwrap();
        assert_eq!(form.missing_fields(), vec!["age"]);
        assert!(matches!(
            form.to_feature_vector(),
            Err(FormError::MissingValue { name: "age" })
        ));
    }

    #[test]
    fn complete_form_encodes_in_schema_order() {
        let vector = filled_form().to_feature_vector().unwrap();
        assert_eq!(
            vector,
            vec![54.0, 1.0, 1.0, 130.0, 246.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn first_error_follows_schema_order() {
        let mut form = filled_form();
        // Both broken; `sex` comes first in the schema.
        form.set("sex", "Robot").unwrap();
        form.set("oldpeak", "much").unwrap();
        assert!(matches!(
            form.to_feature_vector(),
            Err(FormError::UnknownLabel { name: "sex", .. })
        ));
    }

    #[test]
    fn categorical_accepts_raw_training_codes() {
        let mut form = filled_form();
        form.set("st_slope", "2").unwrap();
        let vector = form.to_feature_vector().unwrap();
        assert_eq!(vector[10], 2.0);
    }

    #[test]
    fn categorical_rejects_out_of_range_codes() {
        let mut form = filled_form();
        form.set("st_slope", "3").unwrap();
        assert!(matches!(
            form.to_feature_vector(),
            Err(FormError::UnknownLabel { name: "st_slope", .. })
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut form = filled_form();
        form.set("oldpeak", "inf").unwrap();
        assert!(matches!(
            form.to_feature_vector(),
            Err(FormError::NonFinite { name: "oldpeak" })
        ));
    }

    #[test]
    fn out_of_range_values_warn_but_still_encode() {
        let mut form = filled_form();
        form.set("cholesterol", "999").unwrap();
        let warnings = form.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].name, "cholesterol");
        assert!(form.to_feature_vector().is_ok());
    }

    #[test]
    fn unusual_blood_sugar_indicator_warns() {
        let mut form = filled_form();
        form.set("fasting_blood_sugar", "120").unwrap();
        let warnings = form.warnings();
        assert!(warnings.iter().any(|w| w.name == "fasting_blood_sugar"));
    }
}
