use tracing::debug;

use super::config::{GradeBand, ParameterWeights};
use super::domain::{LetterRating, ParameterKind, RatingParameters};

/// Weighted sum of the normalized parameters, clamped to 0..=100 and rounded.
pub fn combine(parameters: &RatingParameters, weights: &ParameterWeights) -> u8 {
    let mut total = 0.0;
    for kind in ParameterKind::ordered() {
        let Some(parameter) = parameters.get(kind) else {
            continue;
        };
        let weighted = parameter.normalized * weights.weight(kind);
        debug!(
            parameter = kind.key(),
            normalized = parameter.normalized,
            weight = weights.weight(kind),
            weighted,
            "weighted parameter"
        );
        total += weighted;
    }

    if total.is_nan() {
        return 0;
    }
    total.clamp(0.0, 100.0).round() as u8
}

/// Highest band whose threshold the score reaches, in any configured order; the lowest band
/// otherwise.
pub fn grade_of(score: u8, bands: &[GradeBand]) -> LetterRating {
    let band = bands
        .iter()
        .filter(|band| score >= band.min_score)
        .max_by_key(|band| band.min_score)
        .or_else(|| bands.iter().min_by_key(|band| band.min_score));

    match band {
        Some(band) => LetterRating {
            letter: band.letter.clone(),
            label: band.label.clone(),
        },
        None => LetterRating {
            letter: "F".to_string(),
            label: "Unrated".to_string(),
        },
    }
}
