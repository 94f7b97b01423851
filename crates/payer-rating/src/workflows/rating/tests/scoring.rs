use super::common::*;
use crate::config::RatingSettings;
use crate::workflows::rating::{
    combine, compute_parameters, grade_of, GradeBand, ParameterKind, ParameterWeights,
    RatingEngine, RatingError, RecommendationTier,
};

#[test]
fn scenario_rates_good_with_letter_c() {
    let result = engine()
        .rate(&scenario_book(), PAYER_ID, 1500.0, as_of())
        .expect("rating succeeds");

    assert_eq!(result.total_score, 65);
    assert_eq!(result.letter_rating.letter, "C");
    assert_eq!(result.recommendation.tier, RecommendationTier::Good);
    assert_eq!(result.payer.transaction_count(), 2);
    assert_eq!(result.check_amount, 1500.0);
    assert_eq!(result.calculation_id.get_version_num(), 4);
}

#[test]
fn total_score_is_bounded_for_adversarial_weights() {
    let parameters =
        compute_parameters(&scenario_payer(), 1500.0, &context()).expect("parameters computed");

    assert_eq!(combine(&parameters, &ParameterWeights::uniform(1_000.0)), 100);
    assert_eq!(combine(&parameters, &ParameterWeights::uniform(-3.0)), 0);
    assert_eq!(combine(&parameters, &ParameterWeights::uniform(f64::NAN)), 0);
    assert_eq!(combine(&parameters, &ParameterWeights::uniform(f64::INFINITY)), 100);
    assert_eq!(combine(&parameters, &ParameterWeights::uniform(0.0)), 0);

    let mut lopsided = ParameterWeights::uniform(0.0);
    lopsided.external_score = 1.0;
    assert_eq!(combine(&parameters, &lopsided), 80);
}

#[test]
fn grades_follow_descending_bands() {
    let bands = GradeBand::standard();
    assert_eq!(grade_of(100, &bands).letter, "A+");
    assert_eq!(grade_of(90, &bands).letter, "A+");
    assert_eq!(grade_of(89, &bands).letter, "A");
    assert_eq!(grade_of(65, &bands).letter, "C");
    assert_eq!(grade_of(35, &bands).letter, "E");
    assert_eq!(grade_of(0, &bands).letter, "F");

    let partial = vec![GradeBand::new(70, "PASS", "Pass"), GradeBand::new(40, "LOW", "Low")];
    assert_eq!(grade_of(10, &partial).letter, "LOW");
}

#[test]
fn grades_ignore_configured_band_order() {
    let settings = RatingSettings::from_json(
        r#"{"rating": {"grade_bands": [
            {"min_score": 0, "letter": "F", "label": "Fail"},
            {"min_score": 50, "letter": "C", "label": "Fair"},
            {"min_score": 90, "letter": "A", "label": "Top"}
        ]}}"#,
    )
    .expect("ascending bands are accepted");
    let bands = &settings.rating.grade_bands;

    assert_eq!(grade_of(95, bands).letter, "A");
    assert_eq!(grade_of(90, bands).letter, "A");
    assert_eq!(grade_of(65, bands).letter, "C");
    assert_eq!(grade_of(49, bands).letter, "F");

    let result = RatingEngine::new(settings.rating)
        .rate(&scenario_book(), PAYER_ID, 1500.0, as_of())
        .expect("rating succeeds");
    assert_eq!(result.letter_rating.letter, "C");
}

#[test]
fn unknown_payer_produces_no_result() {
    let err = engine()
        .rate(&scenario_book(), "000000000", 1500.0, as_of())
        .expect_err("payer unknown");
    assert_eq!(
        err,
        RatingError::PayerNotFound {
            payer_id: "000000000".to_string()
        }
    );
}

#[test]
fn request_validation_runs_before_lookup() {
    let book = scenario_book();
    assert_eq!(
        engine().rate(&book, "   ", 1500.0, as_of()),
        Err(RatingError::InvalidPayerId)
    );
    assert!(matches!(
        engine().rate(&book, "unknown", -1.0, as_of()),
        Err(RatingError::InvalidAmount { .. })
    ));
    assert!(matches!(
        engine().rate(&book, PAYER_ID, 20_000_000.0, as_of()),
        Err(RatingError::AmountAboveCeiling { .. })
    ));
}

#[test]
fn cancelled_history_lowers_the_score() {
    let book = scenario_book();
    let clean = engine().rate(&book, PAYER_ID, 500.0, as_of()).expect("rated");
    let cancelled = engine().rate(&book, "300200100", 500.0, as_of()).expect("rated");

    assert_eq!(cancelled.parameters.raw(ParameterKind::Cancellations), 1.0);
    assert_eq!(clean.parameters.raw(ParameterKind::Cancellations), 0.0);
    assert!(clean.total_score > cancelled.total_score);
}
