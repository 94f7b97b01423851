use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::payers::{PayerAggregate, PayerId};

/// The ten rating parameters, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKind {
    HistoryLength,
    TransactionCount,
    AverageAmount,
    TotalAmount,
    AvgCreditDays,
    AvgCommissionRate,
    ReturnedChecks,
    Cancellations,
    CheckAmountRatio,
    ExternalScore,
}

impl ParameterKind {
    pub fn ordered() -> [ParameterKind; 10] {
        [
            ParameterKind::HistoryLength,
            ParameterKind::TransactionCount,
            ParameterKind::AverageAmount,
            ParameterKind::TotalAmount,
            ParameterKind::AvgCreditDays,
            ParameterKind::AvgCommissionRate,
            ParameterKind::ReturnedChecks,
            ParameterKind::Cancellations,
            ParameterKind::CheckAmountRatio,
            ParameterKind::ExternalScore,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            ParameterKind::HistoryLength => "historyLength",
            ParameterKind::TransactionCount => "transactionCount",
            ParameterKind::AverageAmount => "averageAmount",
            ParameterKind::TotalAmount => "totalAmount",
            ParameterKind::AvgCreditDays => "avgCreditDays",
            ParameterKind::AvgCommissionRate => "avgCommissionRate",
            ParameterKind::ReturnedChecks => "returnedChecks",
            ParameterKind::Cancellations => "cancellations",
            ParameterKind::CheckAmountRatio => "checkAmountRatio",
            ParameterKind::ExternalScore => "externalScore",
        }
    }
}

/// One evaluated parameter; `description` is for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingParameter {
    pub raw: f64,
    pub normalized: f64,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingParameters(BTreeMap<ParameterKind, RatingParameter>);

impl RatingParameters {
    pub(crate) fn insert(&mut self, kind: ParameterKind, parameter: RatingParameter) {
        self.0.insert(kind, parameter);
    }

    pub fn get(&self, kind: ParameterKind) -> Option<&RatingParameter> {
        self.0.get(&kind)
    }

    /// Raw value, or 0 when the parameter is absent.
    pub fn raw(&self, kind: ParameterKind) -> f64 {
        self.get(kind).map_or(0.0, |parameter| parameter.raw)
    }

    pub fn normalized(&self, kind: ParameterKind) -> f64 {
        self.get(kind).map_or(0.0, |parameter| parameter.normalized)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, &RatingParameter)> {
        self.0.iter().map(|(kind, parameter)| (*kind, parameter))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterRating {
    pub letter: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Excellent,
    Good,
    Average,
    Poor,
    Danger,
}

impl RecommendationTier {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::Excellent => "excellent",
            RecommendationTier::Good => "good",
            RecommendationTier::Average => "average",
            RecommendationTier::Poor => "poor",
            RecommendationTier::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: RecommendationTier,
    pub title: String,
    pub message: String,
    pub risks: Vec<String>,
    pub strengths: Vec<String>,
    pub conditions: Vec<String>,
}

/// Immutable outcome of one rating request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    pub calculation_id: Uuid,
    pub payer_id: PayerId,
    pub payer: PayerAggregate,
    pub check_amount: f64,
    pub parameters: RatingParameters,
    pub total_score: u8,
    pub letter_rating: LetterRating,
    pub recommendation: Recommendation,
    pub timestamp: DateTime<Utc>,
}
