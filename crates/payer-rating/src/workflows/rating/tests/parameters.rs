use super::common::*;
use crate::workflows::rating::{compute_parameters, format_currency, ParameterKind, RatingError};

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn scenario_parameters_follow_the_formulas() {
    let parameters =
        compute_parameters(&scenario_payer(), 1500.0, &context()).expect("parameters computed");

    assert_eq!(parameters.len(), 10);
    approx(parameters.raw(ParameterKind::HistoryLength), 12.2);
    approx(parameters.normalized(ParameterKind::HistoryLength), 24.4);
    approx(parameters.normalized(ParameterKind::TransactionCount), 4.0);
    approx(parameters.raw(ParameterKind::AverageAmount), 1500.0);
    approx(parameters.normalized(ParameterKind::AverageAmount), 0.75);
    approx(parameters.normalized(ParameterKind::TotalAmount), 0.09);
    approx(parameters.raw(ParameterKind::AvgCreditDays), 30.0);
    approx(parameters.normalized(ParameterKind::AvgCreditDays), 100.0);
    approx(parameters.normalized(ParameterKind::AvgCommissionRate), 100.0);
    approx(parameters.normalized(ParameterKind::ReturnedChecks), 100.0);
    approx(parameters.normalized(ParameterKind::Cancellations), 100.0);
    approx(parameters.raw(ParameterKind::CheckAmountRatio), 1.0);
    approx(parameters.normalized(ParameterKind::CheckAmountRatio), 100.0);
    approx(parameters.raw(ParameterKind::ExternalScore), 80.0);

    let average = parameters
        .get(ParameterKind::AverageAmount)
        .expect("average present");
    assert_eq!(average.description, "average transaction ₪1,500");
}

#[test]
fn check_amount_ratio_peaks_at_parity() {
    let payer = payer_with(&[1000.0], 30);
    let score = |amount: f64| {
        compute_parameters(&payer, amount, &context())
            .expect("parameters computed")
            .normalized(ParameterKind::CheckAmountRatio)
    };

    approx(score(1000.0), 100.0);
    assert!(score(1200.0) > score(1600.0));
    assert!(score(1600.0) > score(2500.0));
    assert!(score(800.0) > score(400.0));
    approx(score(1200.0), 90.0);
    approx(score(800.0), 90.0);
    approx(score(5000.0), 0.0);
}

#[test]
fn normalized_values_stay_within_bounds() {
    let payer = with_external_score(payer_with(&[2_000_000.0; 60], 10), 130.0);
    let parameters = compute_parameters(&payer, 1.0, &context()).expect("parameters computed");

    for (kind, parameter) in parameters.iter() {
        assert!(
            (0.0..=100.0).contains(&parameter.normalized),
            "{} out of range: {}",
            kind.key(),
            parameter.normalized
        );
    }
    approx(parameters.raw(ParameterKind::AvgCreditDays), 10.0);
    approx(parameters.normalized(ParameterKind::AvgCreditDays), 100.0);
    approx(parameters.normalized(ParameterKind::ExternalScore), 100.0);
    approx(parameters.normalized(ParameterKind::TransactionCount), 100.0);
}

#[test]
fn missing_external_score_uses_neutral_default() {
    let parameters =
        compute_parameters(&payer_with(&[100.0], 30), 100.0, &context()).expect("computed");
    let external = parameters
        .get(ParameterKind::ExternalScore)
        .expect("external present");
    approx(external.raw, 50.0);
    assert_eq!(external.description, "no external score");
}

#[test]
fn returned_check_fallback_applies_without_merged_checks() {
    let mut context = context();
    context.fallback_returned_checks = 2;

    let parameters =
        compute_parameters(&payer_with(&[100.0], 30), 100.0, &context).expect("computed");
    approx(parameters.raw(ParameterKind::ReturnedChecks), 2.0);
    approx(parameters.normalized(ParameterKind::ReturnedChecks), 60.0);
}

#[test]
fn preconditions_are_enforced() {
    let payer = payer_with(&[100.0], 30);

    assert!(matches!(
        compute_parameters(&payer, 0.0, &context()),
        Err(RatingError::InvalidAmount { .. })
    ));
    assert!(matches!(
        compute_parameters(&payer, f64::NAN, &context()),
        Err(RatingError::InvalidAmount { .. })
    ));
    assert!(matches!(
        compute_parameters(&payer, 10_000_001.0, &context()),
        Err(RatingError::AmountAboveCeiling { .. })
    ));
    assert_eq!(
        compute_parameters(&payer_with(&[], 30), 100.0, &context()),
        Err(RatingError::EmptyHistory {
            payer_id: "42".to_string()
        })
    );
}

#[test]
fn currency_format_groups_thousands() {
    assert_eq!(format_currency(1500.0), "₪1,500");
    assert_eq!(format_currency(1234567.4), "₪1,234,567");
    assert_eq!(format_currency(999.5), "₪1,000");
    assert_eq!(format_currency(0.0), "₪0");
}
