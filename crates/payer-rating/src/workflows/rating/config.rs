use serde::{Deserialize, Serialize};

use super::domain::ParameterKind;

/// Weighting, grading and input limits applied by the rating engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub weights: ParameterWeights,
    /// Score bands in any order; a score takes the highest band it reaches, else the lowest.
    pub grade_bands: Vec<GradeBand>,
    pub default_external_score: f64,
    pub max_check_amount: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            weights: ParameterWeights::default(),
            grade_bands: GradeBand::standard(),
            default_external_score: 50.0,
            max_check_amount: 10_000_000.0,
        }
    }
}

impl RatingConfig {
    /// Returns the first problem found, if any.
    pub fn validate(&self) -> Result<(), String> {
        for kind in ParameterKind::ordered() {
            let weight = self.weights.weight(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("weight for {} must be a non-negative number", kind.key()));
            }
        }
        if self.grade_bands.is_empty() {
            return Err("at least one grade band is required".to_string());
        }
        if !(self.max_check_amount.is_finite() && self.max_check_amount > 0.0) {
            return Err("max_check_amount must be positive".to_string());
        }
        if !(0.0..=100.0).contains(&self.default_external_score) {
            return Err("default_external_score must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

/// Weight per rating parameter. The defaults sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterWeights {
    pub history_length: f64,
    pub transaction_count: f64,
    pub average_amount: f64,
    pub total_amount: f64,
    pub avg_credit_days: f64,
    pub avg_commission_rate: f64,
    pub returned_checks: f64,
    pub cancellations: f64,
    pub check_amount_ratio: f64,
    pub external_score: f64,
}

impl Default for ParameterWeights {
    fn default() -> Self {
        Self {
            history_length: 0.10,
            transaction_count: 0.10,
            average_amount: 0.08,
            total_amount: 0.07,
            avg_credit_days: 0.10,
            avg_commission_rate: 0.05,
            returned_checks: 0.15,
            cancellations: 0.10,
            check_amount_ratio: 0.10,
            external_score: 0.15,
        }
    }
}

impl ParameterWeights {
    pub fn weight(&self, kind: ParameterKind) -> f64 {
        match kind {
            ParameterKind::HistoryLength => self.history_length,
            ParameterKind::TransactionCount => self.transaction_count,
            ParameterKind::AverageAmount => self.average_amount,
            ParameterKind::TotalAmount => self.total_amount,
            ParameterKind::AvgCreditDays => self.avg_credit_days,
            ParameterKind::AvgCommissionRate => self.avg_commission_rate,
            ParameterKind::ReturnedChecks => self.returned_checks,
            ParameterKind::Cancellations => self.cancellations,
            ParameterKind::CheckAmountRatio => self.check_amount_ratio,
            ParameterKind::ExternalScore => self.external_score,
        }
    }

    /// Same weight for every parameter.
    pub fn uniform(weight: f64) -> Self {
        Self {
            history_length: weight,
            transaction_count: weight,
            average_amount: weight,
            total_amount: weight,
            avg_credit_days: weight,
            avg_commission_rate: weight,
            returned_checks: weight,
            cancellations: weight,
            check_amount_ratio: weight,
            external_score: weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min_score: u8,
    pub letter: String,
    pub label: String,
}

impl GradeBand {
    pub fn new(min_score: u8, letter: &str, label: &str) -> Self {
        Self {
            min_score,
            letter: letter.to_string(),
            label: label.to_string(),
        }
    }

    pub fn standard() -> Vec<GradeBand> {
        vec![
            GradeBand::new(90, "A+", "Excellent"),
            GradeBand::new(80, "A", "Very good"),
            GradeBand::new(70, "B", "Good"),
            GradeBand::new(60, "C", "Fair"),
            GradeBand::new(50, "D", "Weak"),
            GradeBand::new(35, "E", "Poor"),
            GradeBand::new(0, "F", "Very poor"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = ParameterWeights::default();
        let sum: f64 = ParameterKind::ordered()
            .into_iter()
            .map(|kind| weights.weight(kind))
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(RatingConfig::default().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_settings() {
        let mut config = RatingConfig::default();
        config.weights.cancellations = -0.1;
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.grade_bands.clear();
        assert!(config.validate().is_err());

        let mut config = RatingConfig::default();
        config.max_check_amount = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RatingConfig =
            serde_json::from_str(r#"{"weights": {"external_score": 0.3}, "max_check_amount": 500000}"#)
                .expect("config parses");
        assert_eq!(config.weights.external_score, 0.3);
        assert_eq!(config.weights.returned_checks, 0.15);
        assert_eq!(config.max_check_amount, 500_000.0);
        assert_eq!(config.grade_bands, GradeBand::standard());
    }
}
