use chrono::NaiveDate;

use super::domain::{ParameterKind, RatingParameter, RatingParameters};
use super::RatingError;
use crate::dates::history_months;
use crate::workflows::payers::PayerAggregate;

/// Inputs to parameter evaluation that do not come from the payer itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterContext {
    pub as_of: NaiveDate,
    pub default_external_score: f64,
    pub max_check_amount: f64,
    /// Returned checks found outside the payer aggregate, used when it has none attached.
    pub fallback_returned_checks: usize,
}

/// Aggregate figures every parameter is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicStats {
    pub history_months: f64,
    pub transaction_count: usize,
    pub average_amount: f64,
    pub total_amount: f64,
    pub avg_credit_days: f64,
    pub avg_commission_rate: f64,
    pub cancelled_transactions: u32,
}

impl BasicStats {
    /// Callers guarantee at least one transaction.
    pub fn of(payer: &PayerAggregate, as_of: NaiveDate) -> Self {
        let count = payer.transaction_count().max(1) as f64;
        let avg_commission_rate = if payer.total_commission > 0.0 && payer.total_amount > 0.0 {
            payer.total_commission / payer.total_amount * 100.0
        } else {
            0.0
        };

        Self {
            history_months: history_months(payer.first_transaction_date, as_of),
            transaction_count: payer.transaction_count(),
            average_amount: payer.total_amount / count,
            total_amount: payer.total_amount,
            avg_credit_days: payer.total_credit_days as f64 / count,
            avg_commission_rate,
            cancelled_transactions: payer.cancelled_transactions,
        }
    }
}

/// Evaluates the ten rating parameters for `payer` against a proposed check amount.
pub fn compute_parameters(
    payer: &PayerAggregate,
    check_amount: f64,
    context: &ParameterContext,
) -> Result<RatingParameters, RatingError> {
    validate_amount(check_amount, context.max_check_amount)?;
    if payer.transaction_count() == 0 {
        return Err(RatingError::EmptyHistory {
            payer_id: payer.payer_id.to_string(),
        });
    }

    let stats = BasicStats::of(payer, context.as_of);
    let mut parameters = RatingParameters::default();
    for kind in ParameterKind::ordered() {
        parameters.insert(kind, evaluate(kind, payer, &stats, check_amount, context));
    }
    Ok(parameters)
}

pub(crate) fn validate_amount(check_amount: f64, ceiling: f64) -> Result<(), RatingError> {
    if !check_amount.is_finite() || check_amount <= 0.0 {
        return Err(RatingError::InvalidAmount {
            amount: check_amount,
        });
    }
    if check_amount > ceiling {
        return Err(RatingError::AmountAboveCeiling {
            amount: check_amount,
            ceiling,
        });
    }
    Ok(())
}

fn evaluate(
    kind: ParameterKind,
    payer: &PayerAggregate,
    stats: &BasicStats,
    check_amount: f64,
    context: &ParameterContext,
) -> RatingParameter {
    let (raw, normalized, description) = match kind {
        ParameterKind::HistoryLength => {
            let raw = stats.history_months;
            (raw, (raw * 2.0).min(100.0), format!("{raw:.1} months of history"))
        }
        ParameterKind::TransactionCount => {
            let raw = stats.transaction_count as f64;
            (
                raw,
                (raw * 2.0).min(100.0),
                format!("{} previous transactions", stats.transaction_count),
            )
        }
        ParameterKind::AverageAmount => {
            let raw = stats.average_amount;
            (
                raw,
                (raw / 100_000.0 * 50.0).min(100.0),
                format!("average transaction {}", format_currency(raw)),
            )
        }
        ParameterKind::TotalAmount => {
            let raw = stats.total_amount;
            (
                raw,
                (raw / 1_000_000.0 * 30.0).min(100.0),
                format!("total volume {}", format_currency(raw)),
            )
        }
        ParameterKind::AvgCreditDays => {
            let raw = stats.avg_credit_days;
            (
                raw,
                (100.0 - (raw - 30.0) * 2.0).max(0.0),
                format!("{raw:.1} credit days on average"),
            )
        }
        ParameterKind::AvgCommissionRate => {
            let raw = stats.avg_commission_rate;
            (
                raw,
                (100.0 - raw * 10.0).max(0.0),
                format!("average commission {raw:.1}%"),
            )
        }
        ParameterKind::ReturnedChecks => {
            let count = payer
                .returned_checks
                .as_ref()
                .map_or(context.fallback_returned_checks, Vec::len);
            let raw = count as f64;
            let description = if count > 0 {
                format!("{count} returned checks")
            } else {
                "no returned checks".to_string()
            };
            (raw, (100.0 - raw * 20.0).max(0.0), description)
        }
        ParameterKind::Cancellations => {
            let count = stats.cancelled_transactions;
            let raw = f64::from(count);
            let description = if count > 0 {
                format!("{count} cancelled or dishonored transactions")
            } else {
                "no cancellations".to_string()
            };
            (raw, (100.0 - raw * 15.0).max(0.0), description)
        }
        ParameterKind::CheckAmountRatio => {
            let ratio = check_amount / stats.average_amount;
            let description = if ratio > 1.5 {
                format!("check is {ratio:.1}x the average transaction")
            } else if ratio < 0.5 {
                format!("check is {:.1}x smaller than the average transaction", 1.0 / ratio)
            } else {
                format!("check is close to the average transaction (ratio {ratio:.2})")
            };
            (
                ratio,
                (100.0 - (1.0 - ratio).abs() * 50.0).clamp(0.0, 100.0),
                description,
            )
        }
        ParameterKind::ExternalScore => match payer
            .external_credit_score
            .as_ref()
            .filter(|score| score.score.is_finite())
        {
            Some(score) => {
                let mut description = format!("external score {}", trim_number(score.score));
                if !score.category.is_empty() {
                    description.push_str(&format!(" (category {})", score.category));
                }
                (score.score, score.score, description)
            }
            None => (
                context.default_external_score,
                context.default_external_score,
                "no external score".to_string(),
            ),
        },
    };

    RatingParameter {
        raw,
        normalized: clamp_score(normalized),
        description,
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Whole shekels with thousands separators, e.g. `₪1,500`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "₪0".to_string();
    }
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{sign}₪{grouped}")
}
