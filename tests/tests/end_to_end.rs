use std::fs;

use cardio::screen_record;
use cardio_features::PatientForm;
use cardio_model::Predictor;
use cardio_risk::{interpret, RiskBand};
use tests::{HEALTHY_RECORD, LOGISTIC_JSON, SCALER_JSON, SEVERE_RECORD, TREES_JSON};

#[test]
fn form_to_band_pipeline_matches_screen_record() {
    let predictor = Predictor::demo();

    let form = PatientForm::from_json(HEALTHY_RECORD).unwrap();
    let vector = form.to_feature_vector().unwrap();
    let probability = predictor.predict(&vector).unwrap();
    let band = interpret(probability);

    let report = screen_record(HEALTHY_RECORD, &predictor);
    assert_eq!(report.probability, Some(probability));
    assert_eq!(report.band, Some(band));
    assert_eq!(report.features, vector);
}

#[test]
fn unremarkable_and_severe_records_land_in_opposite_bands() {
    let predictor = Predictor::demo();
    let healthy = screen_record(HEALTHY_RECORD, &predictor);
    let severe = screen_record(SEVERE_RECORD, &predictor);
    assert_eq!(healthy.band, Some(RiskBand::Healthy));
    assert_eq!(severe.band, Some(RiskBand::High));
    assert_eq!(severe.summary, Some("High Risk"));
}

#[test]
fn band_always_agrees_with_the_reported_probability() {
    let predictor = Predictor::demo();
    for record in [HEALTHY_RECORD, SEVERE_RECORD] {
        let report = screen_record(record, &predictor);
        let probability = report.probability.unwrap();
        assert_eq!(report.band, Some(interpret(probability)));
    }
}

#[test]
fn file_artifacts_reproduce_the_built_in_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let scaler_path = dir.path().join("scaler.json");
    let model_path = dir.path().join("model.json");
    fs::write(&scaler_path, SCALER_JSON).unwrap();
    fs::write(&model_path, LOGISTIC_JSON).unwrap();

    let from_files = Predictor::from_files(&scaler_path, &model_path).unwrap();
    let built_in = Predictor::demo();
    for record in [HEALTHY_RECORD, SEVERE_RECORD] {
        let a = screen_record(record, &from_files).probability.unwrap();
        let b = screen_record(record, &built_in).probability.unwrap();
        assert_eq!(a, b, "file and built-in artifacts disagree on {record}");
    }
}

#[test]
fn tree_ensemble_artifacts_screen_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let scaler_path = dir.path().join("scaler.json");
    let model_path = dir.path().join("trees.json");
    fs::write(&scaler_path, SCALER_JSON).unwrap();
    fs::write(&model_path, TREES_JSON).unwrap();

    let predictor = Predictor::from_files(&scaler_path, &model_path).unwrap();
    assert_eq!(predictor.classifier().kind_name(), "tree_ensemble");

    let healthy = screen_record(HEALTHY_RECORD, &predictor);
    let severe = screen_record(SEVERE_RECORD, &predictor);
    assert_eq!(healthy.band, Some(RiskBand::Healthy), "{:?}", healthy.probability);
    assert_eq!(severe.band, Some(RiskBand::High), "{:?}", severe.probability);
}

#[test]
fn validation_errors_travel_all_the_way_to_the_report() {
    let record = HEALTHY_RECORD.replace("\"Flat\"", "\"sideways\"");
    let report = screen_record(&record, &Predictor::demo());
    assert!(!report.is_ok());
    assert!(report.errors[0].contains("st_slope"), "{:?}", report.errors);
    assert!(report.errors[0].contains("expected one of"), "{:?}", report.errors);
}

#[test]
fn reports_serialize_for_downstream_consumers() {
    let report = screen_record(SEVERE_RECORD, &Predictor::demo());
    let encoded = serde_json::to_string(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(json["band"], "High");
    assert_eq!(json["summary"], "High Risk");
    assert!(json["probability"].as_f64().unwrap() >= 0.7);
    assert!(json["disclaimer"].as_str().unwrap().contains("prediction tool"));
}
