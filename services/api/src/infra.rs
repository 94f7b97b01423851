use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use payer_rating::error::AppError;
use payer_rating::workflows::rating::ImportRequest;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Reads the CSV exports from disk into an import request.
pub(crate) fn load_import_request(
    transactions: &Path,
    scores: Option<&Path>,
    returned_checks: Option<&Path>,
    today: Option<NaiveDate>,
) -> Result<ImportRequest, AppError> {
    Ok(ImportRequest {
        transactions_csv: std::fs::read_to_string(transactions)?,
        scores_csv: scores.map(std::fs::read_to_string).transpose()?,
        returned_checks_csv: returned_checks.map(std::fs::read_to_string).transpose()?,
        today,
    })
}
