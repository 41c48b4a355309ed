//! Feature encoding for the cardio screener.
//!
//! The crate owns everything between raw user input and the numeric
//! vector the model consumes:
//!
//! - [`encoding`]: the label tables categorical inputs were trained
//!   with, and label <-> code lookups.
//! - [`schema`]: the ordered list of form fields. Field order is the
//!   feature vector order; the model is only valid against it.
//! - [`form`]: a string-valued form with validation, advisory range
//!   warnings, and encoding into the feature vector.
//!
//! ```
//! use cardio_features::PatientForm;
//!
//! let record = r#"{
//!     "age": 54, "sex": "Male", "chest_pain_type": "Atypical Angina",
//!     "resting_bp": 130, "cholesterol": 246, "fasting_blood_sugar": 0,
//!     "resting_ecg": "Normal", "max_heart_rate": 150,
//!     "exercise_induced_angina": "No", "oldpeak": 1.0,
//!     "st_slope": "Flat", "num_vessels_fluoro": 0,
//!     "thallium_stress_test": "Normal"
//! }"#;
//! let form = PatientForm::from_json(record)?;
//! let vector = form.to_feature_vector()?;
//! assert_eq!(vector.len(), cardio_features::FEATURE_COUNT);
//! # Ok::<(), cardio_features::FormError>(())
//! ```

pub mod encoding;
pub mod form;
pub mod schema;

pub use encoding::CategoricalFeature;
pub use form::{FormError, FormWarning, PatientForm};
pub use schema::{FeatureKind, FeatureSpec, FormSchema, FEATURE_COUNT};
