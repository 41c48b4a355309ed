use cardio_features::{FormWarning, PatientForm};
use cardio_model::Predictor;
use cardio_risk::{advice, interpret, RiskBand, DISCLAIMER};
use serde::Serialize;

/// The outcome of screening one record. Always produced: a failed
/// screening carries the error text and empty result fields instead of
/// aborting, mirroring a result-or-error dialog.
#[derive(Debug, Serialize)]
pub struct ScreeningReport {
    pub probability: Option<f64>,
    pub band: Option<RiskBand>,
    pub summary: Option<&'static str>,
    pub advice: Option<&'static str>,
    /// The encoded feature vector, echoed for auditing.
    pub features: Vec<f64>,
    pub warnings: Vec<FormWarning>,
    pub errors: Vec<String>,
    pub disclaimer: &'static str,
}

impl ScreeningReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn failure(errors: Vec<String>, warnings: Vec<FormWarning>, features: Vec<f64>) -> Self {
        ScreeningReport {
            probability: None,
            band: None,
            summary: None,
            advice: None,
            features,
            warnings,
            errors,
            disclaimer: DISCLAIMER,
        }
    }
}

/// Screen a filled form: encode it, predict, and band the probability.
pub fn screen_form(form: &PatientForm, predictor: &Predictor) -> ScreeningReport {
    let warnings = form.warnings();
    let features = match form.to_feature_vector() {
        Ok(vector) => vector,
        Err(e) => return ScreeningReport::failure(vec![e.to_string()], warnings, Vec::new()),
    };
    let probability = match predictor.predict(&features) {
        Ok(p) => p,
        Err(e) => return ScreeningReport::failure(vec![e.to_string()], warnings, features),
    };
    let band = interpret(probability);
    ScreeningReport {
        probability: Some(probability),
        band: Some(band),
        summary: Some(band.summary()),
        advice: Some(advice(band)),
        features,
        warnings,
        errors: Vec::new(),
        disclaimer: DISCLAIMER,
    }
}

/// Screen a JSON record string and return the full report.
pub fn screen_record(record: &str, predictor: &Predictor) -> ScreeningReport {
    match PatientForm::from_json(record) {
        Ok(form) => screen_form(&form, predictor),
        Err(e) => ScreeningReport::failure(vec![e.to_string()], Vec::new(), Vec::new()),
    }
}
