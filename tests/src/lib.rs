//! Shared fixtures for the workspace-level integration tests.

/// A complete record with unremarkable findings throughout.
pub const HEALTHY_RECORD: &str = r#"{
    "age": 54, "sex": "Male", "chest_pain_type": "Atypical Angina",
    "resting_bp": 130, "cholesterol": 246, "fasting_blood_sugar": 0,
    "resting_ecg": "Normal", "max_heart_rate": 150,
    "exercise_induced_angina": "No", "oldpeak": 1.0,
    "st_slope": "Flat", "num_vessels_fluoro": 0,
    "thallium_stress_test": "Normal"
}"#;

/// A complete record stacking the high-risk findings.
pub const SEVERE_RECORD: &str = r#"{
    "age": 63, "sex": "Male", "chest_pain_type": "Asymptomatic",
    "resting_bp": 145, "cholesterol": 280, "fasting_blood_sugar": 1,
    "resting_ecg": "Left ventricular hypertrophy", "max_heart_rate": 110,
    "exercise_induced_angina": "Yes", "oldpeak": 3.5,
    "st_slope": "Down", "num_vessels_fluoro": 3,
    "thallium_stress_test": "Reversible Defect"
}"#;

/// A thirteen-column scaler artifact matching the screening schema.
pub const SCALER_JSON: &str = r#"{
    "means": [54.4, 0.68, 1.97, 131.6, 246.7, 0.15, 0.99, 149.6, 0.33, 1.04, 0.67, 0.73, 1.2],
    "stds": [9.1, 0.47, 1.03, 17.5, 51.8, 0.36, 0.99, 22.9, 0.47, 1.16, 0.62, 1.02, 0.9]
}"#;

/// A thirteen-column logistic classifier artifact.
pub const LOGISTIC_JSON: &str = r#"{
    "name": "cardio-file",
    "version": "1.0.0",
    "kind": "logistic",
    "weights": [0.35, 0.55, 0.62, 0.28, 0.22, 0.10, 0.12, -0.58, 0.48, 0.65, 0.40, 0.85, 0.70],
    "bias": -0.30
}"#;

/// A tiny tree-ensemble artifact over the thirteen columns. Splits on
/// oldpeak (column 9) and vessel count (column 11), both scaled.
pub const TREES_JSON: &str = r#"{
    "name": "cardio-trees",
    "version": "1.0.0",
    "kind": "tree_ensemble",
    "n_features": 13,
    "base_margin": -0.4,
    "trees": [
        {
            "nodes": [
                {"node": "split", "feature": 9, "threshold": 0.5, "left": 1, "right": 2},
                {"node": "leaf", "margin": -1.1},
                {"node": "leaf", "margin": 1.3}
            ]
        },
        {
            "nodes": [
                {"node": "split", "feature": 11, "threshold": 1.0, "left": 1, "right": 2},
                {"node": "leaf", "margin": -0.6},
                {"node": "leaf", "margin": 1.5}
            ]
        }
    ]
}"#;
