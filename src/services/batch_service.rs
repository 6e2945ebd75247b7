use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::{
    audit,
    dto::orders::{BatchError, BatchOutcome},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::{normalizer, order_service::upsert_order},
    state::AppState,
};

const COUNTRY_CODE: &str = "91";

/// Upsert every payload independently. A failing element is recorded with
/// its identifying fields and the batch moves on.
pub async fn run_batch(db: &DatabaseConnection, payloads: Vec<Value>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, payload) in payloads.into_iter().enumerate() {
        let identity = normalizer::identify(&payload);
        let result = match normalizer::normalize(payload) {
            Ok(normalized) => upsert_order(db, normalized).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(details) => outcome.results.push(details),
            Err(err) => {
                let reason = err.reason();
                tracing::warn!(
                    index,
                    order_id = identity.order_id.as_deref().unwrap_or("-"),
                    %reason,
                    "batch item failed"
                );
                outcome.errors.push(BatchError {
                    index,
                    order_id: identity.order_id,
                    customer_name: identity.customer_name,
                    contact_no: identity.contact_no,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        succeeded = outcome.results.len(),
        failed = outcome.errors.len(),
        "batch finished"
    );
    outcome
}

/// Spreadsheet rows: normalise phone numbers and `DD/MM/YYYY` dates, then
/// run them as a batch.
pub async fn bulk_insert(db: &DatabaseConnection, mut rows: Vec<Value>) -> BatchOutcome {
    rows.iter_mut().for_each(clean_bulk_row);
    run_batch(db, rows).await
}

pub async fn submit_batch(state: &AppState, payloads: Vec<Value>) -> AppResult<ApiResponse<BatchOutcome>> {
    let total = payloads.len();
    let outcome = run_batch(&state.orm, payloads).await;
    finish(state, "orders_batch", total, outcome).await
}

pub async fn submit_bulk(state: &AppState, rows: Vec<Value>) -> AppResult<ApiResponse<BatchOutcome>> {
    let total = rows.len();
    let outcome = bulk_insert(&state.orm, rows).await;
    finish(state, "orders_bulk_insert", total, outcome).await
}

async fn finish(
    state: &AppState,
    action: &str,
    total: usize,
    outcome: BatchOutcome,
) -> AppResult<ApiResponse<BatchOutcome>> {
    audit::record(
        &state.orm,
        action,
        Some("orders"),
        serde_json::json!({
            "submitted": total,
            "succeeded": outcome.results.len(),
            "failed": outcome.errors
                .iter()
                .map(|e| e.order_id.clone())
                .collect::<Vec<_>>(),
        }),
    )
    .await;

    let message = format!(
        "{} of {} orders saved",
        outcome.results.len(),
        total
    );
    Ok(ApiResponse::success(message, outcome, Some(Meta::empty())))
}

fn clean_bulk_row(row: &mut Value) {
    let Some(fields) = row.as_object_mut() else {
        return;
    };

    if let Some(contact) = fields.get_mut("contactNo") {
        let raw = match contact {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        if let Some(raw) = raw {
            *contact = Value::String(format_contact_no(&raw));
        }
    }

    if let Some(Value::String(date)) = fields.get_mut("date") {
        if let Some(iso) = reformat_date(date) {
            *date = iso;
        }
    }
}

/// Keep digits only and prefix the country code to bare ten-digit numbers
/// or anything not already starting with it.
pub fn format_contact_no(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return raw.trim().to_string();
    }
    if digits.len() == 10 || !digits.starts_with(COUNTRY_CODE) {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

/// `DD/MM/YYYY` → `YYYY-MM-DD`; other inputs are left for the normaliser.
pub fn reformat_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}
