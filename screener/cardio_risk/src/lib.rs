use serde::{Deserialize, Serialize};

/// Probabilities at or above this value are at least borderline risk.
pub const BORDERLINE_THRESHOLD: f64 = 0.4;

/// Probabilities at or above this value are high risk.
pub const HIGH_THRESHOLD: f64 = 0.7;

/// Shown alongside every assessment.
pub const DISCLAIMER: &str =
    "This is a prediction tool only. Consult a doctor for an accurate diagnosis.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskBand {
    Healthy,
    Borderline,
    High,
}

impl RiskBand {
    /// User-facing label for the band.
    pub fn summary(&self) -> &'static str {
        match self {
            RiskBand::Healthy => "Healthy",
            RiskBand::Borderline => "Borderline Risk",
            RiskBand::High => "High Risk",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.summary())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub probability: f64,
    pub band: RiskBand,
}

/// Map a predicted probability onto the three fixed bands.
///
/// Boundary values land in the higher band: 0.4 is borderline, 0.7 is high.
pub fn interpret(probability: f64) -> RiskBand {
    if probability >= HIGH_THRESHOLD {
        RiskBand::High
    } else if probability >= BORDERLINE_THRESHOLD {
        RiskBand::Borderline
    } else {
        RiskBand::Healthy
    }
}

pub fn assess(probability: f64) -> RiskAssessment {
    RiskAssessment {
        probability,
        band: interpret(probability),
    }
}

/// One next-step line per band.
pub fn advice(band: RiskBand) -> &'static str {
    match band {
        RiskBand::High => "Flag for clinical follow-up as soon as possible.",
        RiskBand::Borderline => "Monitor and schedule a routine check-up.",
        RiskBand::Healthy => "No elevated risk detected; continue routine care.",
    }
}
