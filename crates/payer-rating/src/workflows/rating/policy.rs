use super::domain::{ParameterKind, RatingParameters, Recommendation, RecommendationTier};
use super::parameters::format_currency;

/// Maps a total score and its parameters to a recommendation tier with reasons.
pub fn recommend(total_score: u8, parameters: &RatingParameters) -> Recommendation {
    let returned_checks = parameters.raw(ParameterKind::ReturnedChecks) as u64;
    let cancellations = parameters.raw(ParameterKind::Cancellations) as u64;
    let transaction_count = parameters.raw(ParameterKind::TransactionCount) as u64;
    let external_score = parameters.raw(ParameterKind::ExternalScore);

    let mut risks = Vec::new();
    let mut strengths = Vec::new();
    let mut conditions = Vec::new();

    let (tier, title, message) = match total_score {
        80.. => {
            if external_score > 70.0 {
                strengths.push("high external score".to_string());
            }
            if transaction_count >= 10 {
                strengths.push("rich transaction history".to_string());
            }
            (
                RecommendationTier::Excellent,
                "Recommended for approval",
                format!(
                    "Low-risk payer. {transaction_count} previous transactions, {returned_checks} returned checks."
                ),
            )
        }
        65..=79 => {
            if returned_checks > 0 {
                risks.push(format!("{returned_checks} returned checks in the past"));
            }
            (
                RecommendationTier::Good,
                "Approvable under normal terms",
                format!(
                    "Good payer with low to moderate risk. Average transaction: {}.",
                    format_currency(parameters.raw(ParameterKind::AverageAmount))
                ),
            )
        }
        50..=64 => {
            conditions.push("consider additional guarantees".to_string());
            conditions.push("verify the data is up to date".to_string());
            if external_score < 50.0 {
                risks.push("low external score".to_string());
            }
            let cancellations_note = if cancellations > 0 {
                format!("{cancellations} cancellations")
            } else {
                "no cancellations".to_string()
            };
            (
                RecommendationTier::Average,
                "Further review or special conditions required",
                format!("Moderate risk, {cancellations_note}."),
            )
        }
        35..=49 => {
            risks.push("problematic history".to_string());
            conditions.push("strong guarantees required".to_string());
            conditions.push("in-depth review of the payer".to_string());
            (
                RecommendationTier::Poor,
                "Not recommended without strong guarantees",
                format!(
                    "High risk. {returned_checks} returned checks, {cancellations} cancellations."
                ),
            )
        }
        _ => {
            risks.push("extreme risk".to_string());
            risks.push("multiple problematic indicators".to_string());
            (
                RecommendationTier::Danger,
                "Do not approve",
                format!(
                    "Very high risk. Problematic record: {returned_checks} returned checks, {cancellations} cancellations."
                ),
            )
        }
    };

    Recommendation {
        tier,
        title: title.to_string(),
        message,
        risks,
        strengths,
        conditions,
    }
}
