use sea_orm::DatabaseConnection;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    audit,
    dto::{orders::BatchError, shopify::SyncOutcome},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::{normalizer, order_service::upsert_order},
    shopify::ShopifyClient,
    state::AppState,
};

/// Pull every order of the given Shopify customers and upsert those with at
/// least one line item matching the catalog.
///
/// Each customer's orders are fetched before any transaction opens. Orders
/// with no matched line are counted as skipped, not failed.
pub async fn sync_customers(
    db: &DatabaseConnection,
    client: &ShopifyClient,
    customer_ids: &[i64],
) -> SyncOutcome {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("shopify_sync", %run_id, customers = customer_ids.len());

    async move {
        let mut outcome = SyncOutcome::default();
        let mut index = 0_usize;

        for &customer_id in customer_ids {
            let orders = client.customer_orders(customer_id).await;
            tracing::debug!(customer_id, fetched = orders.len(), "customer orders fetched");

            for order in orders {
                let position = index;
                index += 1;
                let order_number = order.order_number.to_string();
                let customer_name = order.customer.as_ref().map(|c| c.full_name());
                let contact_no = order.contact_phone();

                let result = match normalizer::from_shopify(order) {
                    Ok(mut normalized) => {
                        if normalized.retain_matched_items() == 0 {
                            tracing::debug!(order_id = %order_number, "no catalog match, skipped");
                            outcome.skipped += 1;
                            continue;
                        }
                        upsert_order(db, normalized).await
                    }
                    Err(err) => Err(err),
                };

                match result {
                    Ok(details) => outcome.results.push(details),
                    Err(err) => {
                        let reason = err.reason();
                        tracing::warn!(order_id = %order_number, customer_id, %reason, "sync item failed");
                        outcome.errors.push(BatchError {
                            index: position,
                            order_id: Some(order_number),
                            customer_name,
                            contact_no,
                            reason,
                        });
                    }
                }
            }
        }

        tracing::info!(
            succeeded = outcome.results.len(),
            failed = outcome.errors.len(),
            skipped = outcome.skipped,
            "shopify sync finished"
        );
        outcome
    }
    .instrument(span)
    .await
}

pub async fn run_sync(
    state: &AppState,
    customer_ids: Option<Vec<i64>>,
) -> AppResult<ApiResponse<SyncOutcome>> {
    let customer_ids = customer_ids.unwrap_or_else(|| state.sync_customer_ids.clone());
    let outcome = sync_customers(&state.orm, &state.shopify, &customer_ids).await;

    audit::record(
        &state.orm,
        "shopify_sync",
        Some("orders"),
        serde_json::json!({
            "customers": customer_ids,
            "succeeded": outcome.results.len(),
            "failed": outcome.errors.len(),
            "skipped": outcome.skipped,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Shopify sync finished",
        outcome,
        Some(Meta::empty()),
    ))
}
