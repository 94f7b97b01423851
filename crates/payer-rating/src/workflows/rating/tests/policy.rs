use super::common::*;
use crate::workflows::rating::{
    compute_parameters, recommend, ParameterKind, RatingParameter, RatingParameters,
    RecommendationTier,
};

fn parameters_with(returned: f64, cancellations: f64, external: f64, count: f64) -> RatingParameters {
    let mut parameters =
        compute_parameters(&scenario_payer(), 1500.0, &context()).expect("parameters computed");
    for (kind, raw) in [
        (ParameterKind::ReturnedChecks, returned),
        (ParameterKind::Cancellations, cancellations),
        (ParameterKind::ExternalScore, external),
        (ParameterKind::TransactionCount, count),
    ] {
        parameters.insert(
            kind,
            RatingParameter {
                raw,
                normalized: 0.0,
                description: String::new(),
            },
        );
    }
    parameters
}

#[test]
fn tiers_split_on_score_thresholds() {
    let parameters = parameters_with(0.0, 0.0, 50.0, 2.0);
    let tier = |score| recommend(score, &parameters).tier;

    assert_eq!(tier(100), RecommendationTier::Excellent);
    assert_eq!(tier(80), RecommendationTier::Excellent);
    assert_eq!(tier(79), RecommendationTier::Good);
    assert_eq!(tier(65), RecommendationTier::Good);
    assert_eq!(tier(64), RecommendationTier::Average);
    assert_eq!(tier(50), RecommendationTier::Average);
    assert_eq!(tier(49), RecommendationTier::Poor);
    assert_eq!(tier(35), RecommendationTier::Poor);
    assert_eq!(tier(34), RecommendationTier::Danger);
    assert_eq!(tier(0), RecommendationTier::Danger);
}

#[test]
fn excellent_lists_strengths() {
    let recommendation = recommend(85, &parameters_with(0.0, 0.0, 75.0, 12.0));
    assert_eq!(
        recommendation.strengths,
        vec!["high external score", "rich transaction history"]
    );
    assert!(recommendation.message.contains("12 previous transactions"));
    assert!(recommendation.risks.is_empty());

    let recommendation = recommend(85, &parameters_with(0.0, 0.0, 70.0, 9.0));
    assert!(recommendation.strengths.is_empty());
}

#[test]
fn good_flags_returned_checks() {
    let recommendation = recommend(70, &parameters_with(2.0, 0.0, 60.0, 2.0));
    assert_eq!(recommendation.risks, vec!["2 returned checks in the past"]);
    assert!(recommendation.message.contains("₪1,500"));
}

#[test]
fn average_requires_conditions() {
    let recommendation = recommend(55, &parameters_with(0.0, 0.0, 40.0, 2.0));
    assert_eq!(
        recommendation.conditions,
        vec!["consider additional guarantees", "verify the data is up to date"]
    );
    assert_eq!(recommendation.risks, vec!["low external score"]);
    assert!(recommendation.message.contains("no cancellations"));

    let recommendation = recommend(55, &parameters_with(0.0, 3.0, 50.0, 2.0));
    assert!(recommendation.risks.is_empty());
    assert!(recommendation.message.contains("3 cancellations"));
}

#[test]
fn poor_and_danger_cite_problem_counts() {
    let poor = recommend(40, &parameters_with(1.0, 2.0, 50.0, 2.0));
    assert_eq!(poor.risks, vec!["problematic history"]);
    assert_eq!(
        poor.conditions,
        vec!["strong guarantees required", "in-depth review of the payer"]
    );
    assert!(poor.message.contains("1 returned checks, 2 cancellations"));

    let danger = recommend(10, &parameters_with(4.0, 5.0, 50.0, 2.0));
    assert_eq!(
        danger.risks,
        vec!["extreme risk", "multiple problematic indicators"]
    );
    assert!(danger.conditions.is_empty());
    assert!(danger.message.contains("4 returned checks, 5 cancellations"));
}
