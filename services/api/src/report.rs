use crate::cli::{LedgerArgs, PayersArgs, RateArgs};
use crate::infra::load_import_request;
use payer_rating::config::AppConfig;
use payer_rating::error::AppError;
use payer_rating::workflows::payers::PayerSummary;
use payer_rating::workflows::rating::{
    format_currency, ImportSummary, RatingResult, RatingService,
};
use std::fmt::Write;

pub(crate) fn run_rate(args: RateArgs) -> Result<(), AppError> {
    let RateArgs {
        ledger,
        payer_id,
        amount,
        json,
    } = args;

    let as_of = ledger.as_of;
    let (service, summary) = import_ledger(&ledger)?;
    let result = service.rate(&payer_id, amount, as_of)?;

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Rating payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_import(&summary));
        print!("{}", render_rating(&result));
    }
    Ok(())
}

pub(crate) fn run_payers(args: PayersArgs) -> Result<(), AppError> {
    let PayersArgs { ledger, search } = args;

    let (service, summary) = import_ledger(&ledger)?;
    let payers = service.payers(search.as_deref());

    print!("{}", render_import(&summary));
    print!("{}", render_payers(&payers));
    Ok(())
}

fn import_ledger(ledger: &LedgerArgs) -> Result<(RatingService, ImportSummary), AppError> {
    let config = AppConfig::load()?;
    let service = RatingService::new(config.rating.aggregation, config.rating.rating);

    let request = load_import_request(
        &ledger.transactions,
        ledger.scores.as_deref(),
        ledger.returned_checks.as_deref(),
        ledger.as_of,
    )?;
    let summary = service.import(&request)?;
    Ok((service, summary))
}

pub(crate) fn render_import(summary: &ImportSummary) -> String {
    let mut out = String::new();
    let stats = &summary.stats;
    let _ = writeln!(out, "Ledger import");
    let _ = writeln!(
        out,
        "- {} transactions from {} payers ({} rows skipped)",
        stats.total_transactions, summary.payers, stats.skipped_rows
    );
    let _ = writeln!(
        out,
        "- {} external scores | {} returned checks | {} ms",
        stats.external_scores, stats.returned_checks, stats.processing_time_ms
    );
    if !summary.warnings.is_empty() {
        let _ = writeln!(out, "Warnings:");
        for warning in &summary.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }
    out
}

pub(crate) fn render_rating(result: &RatingResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nRating for {} ({}) on a {} check",
        result.payer.name,
        result.payer_id,
        format_currency(result.check_amount)
    );
    let _ = writeln!(
        out,
        "Score {}/100 | grade {} ({})",
        result.total_score, result.letter_rating.letter, result.letter_rating.label
    );

    let _ = writeln!(out, "\nParameters");
    for (kind, parameter) in result.parameters.iter() {
        let _ = writeln!(
            out,
            "- {}: {:.1} ({})",
            kind.key(),
            parameter.normalized,
            parameter.description
        );
    }

    let recommendation = &result.recommendation;
    let _ = writeln!(
        out,
        "\nRecommendation: {} [{}]",
        recommendation.title,
        recommendation.tier.label()
    );
    let _ = writeln!(out, "{}", recommendation.message);
    for (heading, items) in [
        ("Strengths", &recommendation.strengths),
        ("Risks", &recommendation.risks),
        ("Conditions", &recommendation.conditions),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{heading}:");
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }
    let _ = writeln!(out, "\nCalculation {} at {}", result.calculation_id, result.timestamp);
    out
}

pub(crate) fn render_payers(payers: &[PayerSummary]) -> String {
    let mut out = String::new();
    if payers.is_empty() {
        let _ = writeln!(out, "\nNo payers found");
        return out;
    }

    let _ = writeln!(out, "\nPayers");
    for payer in payers {
        let score = if payer.has_external_score {
            "scored"
        } else {
            "no external score"
        };
        let _ = writeln!(
            out,
            "- {} ({}): {} transactions, {} total, {} returned checks, {}",
            payer.name,
            payer.payer_id,
            payer.transaction_count,
            format_currency(payer.total_amount),
            payer.returned_checks,
            score
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use payer_rating::workflows::payers::AggregationConfig;
    use payer_rating::workflows::rating::{ImportRequest, RatingConfig};

    const LEDGER: &str = "\
Payer Name,Payer ID,Amount,Commission,Status,Deposit Date,Due Date
Acme Builders,514001234,1000,,paid,01/01/2024,31/01/2024
Acme Builders,514001234,2000,,paid,01/03/2024,31/03/2024
,,,,,,
Nameless,,300,,paid,01/04/2024,01/05/2024
";

    fn imported() -> (RatingService, ImportSummary) {
        let service = RatingService::new(AggregationConfig::default(), RatingConfig::default());
        let summary = service
            .import(&ImportRequest {
                transactions_csv: LEDGER.to_string(),
                scores_csv: None,
                returned_checks_csv: None,
                today: NaiveDate::from_ymd_opt(2025, 1, 1),
            })
            .expect("ledger imports");
        (service, summary)
    }

    #[test]
    fn import_report_lists_counts_and_warnings() {
        let (_, summary) = imported();
        let text = render_import(&summary);

        assert!(text.contains("2 transactions from 1 payers (1 rows skipped)"));
        assert!(text.contains("Warnings:"));
        assert!(text.contains("no scores table found"));
    }

    #[test]
    fn rating_report_shows_grade_and_parameters() {
        let (service, _) = imported();
        let result = service
            .rate("514001234", 1500.0, NaiveDate::from_ymd_opt(2025, 1, 1))
            .expect("rating succeeds");
        let text = render_rating(&result);

        assert!(text.contains("Rating for Acme Builders (514001234) on a ₪1,500 check"));
        assert!(text.contains(&format!("Score {}/100", result.total_score)));
        assert!(text.contains("- checkAmountRatio: 100.0"));
        assert!(text.contains(&result.calculation_id.to_string()));
    }

    #[test]
    fn payer_listing_handles_empty_results() {
        let (service, _) = imported();
        assert!(render_payers(&service.payers(Some("globex"))).contains("No payers found"));

        let listing = render_payers(&service.payers(None));
        assert!(listing.contains("Acme Builders (514001234): 2 transactions, ₪3,000 total"));
        assert!(listing.contains("no external score"));
    }
}
