//! Ten-parameter credit rating of a payer against a proposed check amount.

mod combiner;
pub mod config;
pub mod domain;
mod parameters;
mod policy;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use combiner::{combine, grade_of};
pub use config::{GradeBand, ParameterWeights, RatingConfig};
pub use domain::{
    LetterRating, ParameterKind, RatingParameter, RatingParameters, RatingResult, Recommendation,
    RecommendationTier,
};
pub use parameters::{compute_parameters, format_currency, BasicStats, ParameterContext};
pub use policy::recommend;
pub use router::rating_router;
pub use service::{ImportRequest, ImportSummary, RatingService, RatingServiceError};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::workflows::payers::PayerBook;

/// Rejections of a rating request; no result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("payer id is required")]
    InvalidPayerId,
    #[error("check amount must be a positive number, got {amount}")]
    InvalidAmount { amount: f64 },
    #[error("check amount {amount} exceeds the allowed maximum of {ceiling}")]
    AmountAboveCeiling { amount: f64, ceiling: f64 },
    #[error("no data found for payer {payer_id}")]
    PayerNotFound { payer_id: String },
    #[error("payer {payer_id} has no transactions")]
    EmptyHistory { payer_id: String },
}

/// Stateless rater applying a [`RatingConfig`] to payers from a [`PayerBook`].
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Rates `payer_id` for a check of `check_amount`, measuring history up to `as_of`.
    pub fn rate(
        &self,
        book: &PayerBook,
        payer_id: &str,
        check_amount: f64,
        as_of: NaiveDate,
    ) -> Result<RatingResult, RatingError> {
        let payer_id = payer_id.trim();
        if payer_id.is_empty() {
            return Err(RatingError::InvalidPayerId);
        }
        parameters::validate_amount(check_amount, self.config.max_check_amount)?;

        let payer = book.get(payer_id).ok_or_else(|| RatingError::PayerNotFound {
            payer_id: payer_id.to_string(),
        })?;

        let fallback_returned_checks = if payer.returned_checks.is_none() {
            book.count_raw_returned_checks(&payer.payer_id)
        } else {
            0
        };
        let context = ParameterContext {
            as_of,
            default_external_score: self.config.default_external_score,
            max_check_amount: self.config.max_check_amount,
            fallback_returned_checks,
        };

        let parameters = compute_parameters(payer, check_amount, &context)?;
        let total_score = combine(&parameters, &self.config.weights);
        let letter_rating = grade_of(total_score, &self.config.grade_bands);
        let recommendation = recommend(total_score, &parameters);

        let result = RatingResult {
            calculation_id: Uuid::new_v4(),
            payer_id: payer.payer_id.clone(),
            payer: payer.clone(),
            check_amount,
            parameters,
            total_score,
            letter_rating,
            recommendation,
            timestamp: Utc::now(),
        };

        info!(
            payer_id = %result.payer_id,
            total_score,
            letter = %result.letter_rating.letter,
            tier = result.recommendation.tier.label(),
            calculation_id = %result.calculation_id,
            "rating calculated"
        );
        Ok(result)
    }
}
