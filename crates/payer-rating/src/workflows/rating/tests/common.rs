use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::ledger::{Table, Workbook};
use crate::workflows::payers::{
    AggregationConfig, AggregationContext, ExternalCreditScore, PayerAggregate, PayerBook,
    PayerId, Transaction,
};
use crate::workflows::rating::{ParameterContext, RatingConfig, RatingEngine, RatingService};

pub(super) const PAYER_ID: &str = "514001234";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Reference date the scenario payer is rated at.
pub(super) fn as_of() -> NaiveDate {
    date(2025, 1, 1)
}

pub(super) const TRANSACTIONS_CSV: &str = "\
Payer Name,Payer ID,Amount,Commission,Status,Deposit Date,Due Date
Acme Builders,514001234,1000,,paid,01/01/2024,31/01/2024
Acme Builders,514001234,2000,,paid,01/03/2024,31/03/2024
Globex,300200100,500,25,cancelled,05/05/2024,20/05/2024
";

pub(super) const SCORES_CSV: &str = "\
Payer ID,Company,Score,Category
514001234,Acme Builders,80,A
";

/// Two 30-day transactions of 1000 and 2000 with an external score of 80.
pub(super) fn scenario_workbook() -> Workbook {
    let transactions = Table::from_csv_reader(TRANSACTIONS_CSV.as_bytes()).expect("ledger csv");
    let scores = Table::from_csv_reader(SCORES_CSV.as_bytes()).expect("scores csv");
    Workbook::new()
        .with_table("transactions", transactions)
        .with_table("scores", scores)
}

pub(super) fn scenario_book() -> PayerBook {
    AggregationContext::new(AggregationConfig::default(), as_of())
        .process_workbook(&scenario_workbook())
        .expect("scenario imports")
}

pub(super) fn scenario_payer() -> PayerAggregate {
    scenario_book()
        .get(PAYER_ID)
        .cloned()
        .expect("scenario payer present")
}

pub(super) fn engine() -> RatingEngine {
    RatingEngine::new(RatingConfig::default())
}

pub(super) fn context() -> ParameterContext {
    ParameterContext {
        as_of: as_of(),
        default_external_score: 50.0,
        max_check_amount: 10_000_000.0,
        fallback_returned_checks: 0,
    }
}

/// Payer with `amounts.len()` transactions of the given credit days, first deposited on 2024-01-01.
pub(super) fn payer_with(amounts: &[f64], credit_days: i64) -> PayerAggregate {
    let payer_id = PayerId::from("42");
    let mut payer = PayerAggregate::new(payer_id.clone(), "Test Payer".to_string());
    for amount in amounts {
        payer.record(
            Transaction {
                payer_name: payer.name.clone(),
                payer_id: payer_id.clone(),
                amount: *amount,
                commission: 0.0,
                status: "paid".to_string(),
                deposit_date: "01/01/2024".to_string(),
                due_date: String::new(),
                actual_payment: String::new(),
                credit_days,
                discount_days: 0,
            },
            Some(date(2024, 1, 1)),
            false,
        );
    }
    payer
}

pub(super) fn with_external_score(mut payer: PayerAggregate, score: f64) -> PayerAggregate {
    payer.external_credit_score = Some(ExternalCreditScore {
        score,
        category: "B".to_string(),
        risk_level: String::new(),
    });
    payer
}

pub(super) fn service() -> Arc<RatingService> {
    let service = RatingService::new(AggregationConfig::default(), RatingConfig::default());
    service
        .import_workbook(&scenario_workbook(), as_of())
        .expect("scenario imports");
    Arc::new(service)
}

pub(super) fn empty_service() -> Arc<RatingService> {
    Arc::new(RatingService::new(
        AggregationConfig::default(),
        RatingConfig::default(),
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
