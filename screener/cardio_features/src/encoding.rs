use serde::{Deserialize, Serialize};

/// The categorical model inputs. Each carries the label table it was
/// trained with; a label's position in the table is its training code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalFeature {
    Sex,
    ChestPainType,
    RestingEcg,
    ExerciseInducedAngina,
    StSlope,
    ThalliumStressTest,
}

impl CategoricalFeature {
    pub const ALL: [CategoricalFeature; 6] = [
        CategoricalFeature::Sex,
        CategoricalFeature::ChestPainType,
        CategoricalFeature::RestingEcg,
        CategoricalFeature::ExerciseInducedAngina,
        CategoricalFeature::StSlope,
        CategoricalFeature::ThalliumStressTest,
    ];

    /// Display labels ordered by training code.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            CategoricalFeature::Sex => &["Female", "Male"],
            CategoricalFeature::ChestPainType => &[
                "Typical Angina",
                "Atypical Angina",
                "Non-anginal Pain",
                "Asymptomatic",
            ],
            CategoricalFeature::RestingEcg => &[
                "Normal",
                "ST-T wave abnormality",
                "Left ventricular hypertrophy",
            ],
            CategoricalFeature::ExerciseInducedAngina => &["No", "Yes"],
            CategoricalFeature::StSlope => &["Up", "Flat", "Down"],
            CategoricalFeature::ThalliumStressTest => {
                &["Normal", "Fixed Defect", "Reversible Defect", "Other"]
            }
        }
    }

    /// Resolve a display label to its training code.
    ///
    /// Matching trims surrounding whitespace and ignores ASCII case, so
    /// values coming from files round-trip even when hand-edited.
    pub fn code_for(&self, label: &str) -> Option<u8> {
        let wanted = label.trim();
        self.labels()
            .iter()
            .position(|l| l.eq_ignore_ascii_case(wanted))
            .map(|i| i as u8)
    }

    pub fn label_for(&self, code: u8) -> Option<&'static str> {
        self.labels().get(usize::from(code)).copied()
    }

    /// Number of valid codes (codes are dense from 0).
    pub fn code_count(&self) -> u8 {
        self.labels().len() as u8
    }
}
