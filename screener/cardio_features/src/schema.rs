use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::encoding::CategoricalFeature;

/// Number of model inputs. Scalers and classifiers are validated
/// against this when artifacts are loaded.
pub const FEATURE_COUNT: usize = 13;

/// How a field's raw value becomes a number in the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Parsed as a finite float and passed through unchanged.
    Numeric,
    /// Resolved to a training code via the feature's label table.
    Categorical { feature: CategoricalFeature },
}

/// One entry of the form, in model input order.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSpec {
    /// Stable field name used in records and on the command line.
    pub name: &'static str,
    /// Human-readable prompt label.
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

impl FeatureSpec {
    const fn numeric(name: &'static str, label: &'static str) -> Self {
        FeatureSpec {
            name,
            label,
            kind: FeatureKind::Numeric,
        }
    }

    const fn categorical(
        name: &'static str,
        label: &'static str,
        feature: CategoricalFeature,
    ) -> Self {
        FeatureSpec {
            name,
            label,
            kind: FeatureKind::Categorical { feature },
        }
    }
}

/// The ordered list of form fields. Field order here IS the feature
/// vector order the model was trained on; never reorder entries.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    specs: Vec<FeatureSpec>,
}

lazy_static! {
    static ref STANDARD: FormSchema = FormSchema {
        specs: vec![
            FeatureSpec::numeric("age", "Age"),
            FeatureSpec::categorical("sex", "Sex", CategoricalFeature::Sex),
            FeatureSpec::categorical(
                "chest_pain_type",
                "Chest Pain Type",
                CategoricalFeature::ChestPainType,
            ),
            FeatureSpec::numeric("resting_bp", "Resting Blood Pressure"),
            FeatureSpec::numeric("cholesterol", "Cholesterol"),
            FeatureSpec::numeric("fasting_blood_sugar", "Fasting Blood Sugar > 120 mg/dl"),
            FeatureSpec::categorical(
                "resting_ecg",
                "Resting ECG Result",
                CategoricalFeature::RestingEcg,
            ),
            FeatureSpec::numeric("max_heart_rate", "Maximum Heart Rate"),
            FeatureSpec::categorical(
                "exercise_induced_angina",
                "Exercise Induced Angina",
                CategoricalFeature::ExerciseInducedAngina,
            ),
            FeatureSpec::numeric("oldpeak", "ST Depression (Oldpeak)"),
            FeatureSpec::categorical("st_slope", "ST Slope", CategoricalFeature::StSlope),
            FeatureSpec::numeric("num_vessels_fluoro", "Number of Vessels by Fluoroscopy"),
            FeatureSpec::categorical(
                "thallium_stress_test",
                "Thallium Stress Test",
                CategoricalFeature::ThalliumStressTest,
            ),
        ],
    };
}

impl FormSchema {
    /// The screening form every record is validated against.
    pub fn standard() -> &'static FormSchema {
        &STANDARD
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.specs.iter()
    }

    /// Look up a field by its record name.
    pub fn spec(&self, name: &str) -> Option<&FeatureSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Position of a field in the feature vector.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_schema_has_thirteen_fields_in_training_order() {
        let schema = FormSchema::standard();
        assert_eq!(schema.len(), FEATURE_COUNT);
        let names: Vec<&str> = schema.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "age",
                "sex",
                "chest_pain_type",
                "resting_bp",
                "cholesterol",
                "fasting_blood_sugar",
                "resting_ecg",
                "max_heart_rate",
                "exercise_induced_angina",
                "oldpeak",
                "st_slope",
                "num_vessels_fluoro",
                "thallium_stress_test",
            ]
        );
    }

    #[test]
    fn field_names_are_unique() {
        let schema = FormSchema::standard();
        for spec in schema.iter() {
            assert_eq!(
                schema.iter().filter(|s| s.name == spec.name).count(),
                1,
                "duplicate field {}",
                spec.name
            );
        }
    }

    #[test]
    fn position_agrees_with_iteration_order() {
        let schema = FormSchema::standard();
        for (i, spec) in schema.iter().enumerate() {
            assert_eq!(schema.position(spec.name), Some(i));
        }
        assert_eq!(schema.position("unknown"), None);
    }

    #[test]
    fn oldpeak_sits_between_angina_and_slope() {
        let schema = FormSchema::standard();
        assert_eq!(schema.position("exercise_induced_angina"), Some(8));
        assert_eq!(schema.position("oldpeak"), Some(9));
        assert_eq!(schema.position("st_slope"), Some(10));
    }

    #[test]
    fn schema_serializes_for_form_renderers() {
        let json = serde_json::to_value(FormSchema::standard()).unwrap();
        let specs = json["specs"].as_array().unwrap();
        assert_eq!(specs.len(), FEATURE_COUNT);
        assert_eq!(specs[0]["name"], "age");
        assert_eq!(specs[0]["kind"], "numeric");
        assert_eq!(specs[1]["kind"], "categorical");
        assert_eq!(specs[1]["feature"], "Sex");

        let kind: FeatureKind = serde_json::from_value(specs[1].clone()).unwrap();
        assert_eq!(
            kind,
            FeatureKind::Categorical {
                feature: CategoricalFeature::Sex
            }
        );
    }
}
