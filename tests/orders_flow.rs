mod common;

use order_sync::{
    dto::orders::OrderPatch,
    entity::{
        customers::Entity as Customers, order_items::Entity as OrderItems,
        orders::{Entity as Orders, PaymentMode},
    },
    error::AppError,
    services::{normalizer, order_service, shopify_service},
};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

// Operator submits A100, then resubmits it with a different quantity:
// one order row, the item set replaced, totals recomputed.
#[tokio::test]
async fn resubmitting_manual_order_replaces_items() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let product_id = common::seed_product(&orm, "MTSH09", dec!(299.99), true).await?;

    let first = normalizer::normalize(common::manual_order("A100", product_id, 2, "299.99"))?;
    let details = order_service::upsert_order(&orm, first).await?;

    assert_eq!(details.order.order_id, "A100");
    assert_eq!(details.order.payment_mode, PaymentMode::Cod);
    assert_eq!(details.order.order_status, "New");
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.items[0].quantity, 2);
    assert_eq!(details.items[0].total_price, dec!(599.98));
    assert_eq!(details.items[0].product_code.as_deref(), Some("MTSH09"));
    assert_eq!(details.customer.contact_no, "919876543210");

    let second = normalizer::normalize(common::manual_order("A100", product_id, 3, "299.99"))?;
    let details = order_service::upsert_order(&orm, second).await?;

    assert_eq!(details.items.len(), 1);
    assert_eq!(details.items[0].quantity, 3);
    assert_eq!(details.items[0].total_price, dec!(899.97));
    assert_eq!(Orders::find().count(&orm).await?, 1);
    assert_eq!(OrderItems::find().count(&orm).await?, 1);
    assert_eq!(Customers::find().count(&orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn identical_upserts_leave_one_row_each() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let product_id = common::seed_product(&orm, "MTRA04", dec!(599.50), true).await?;

    for _ in 0..3 {
        let normalized = normalizer::normalize(common::manual_order("A200", product_id, 1, "599.50"))?;
        order_service::upsert_order(&orm, normalized).await?;
    }

    assert_eq!(Orders::find().count(&orm).await?, 1);
    assert_eq!(OrderItems::find().count(&orm).await?, 1);
    assert_eq!(Customers::find().count(&orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn customer_is_keyed_by_phone_and_latest_name_wins() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let product_id = common::seed_product(&orm, "MTSH09", dec!(100.25), true).await?;

    let first = normalizer::normalize(common::manual_order("C1", product_id, 1, "100.25"))?;
    let a = order_service::upsert_order(&orm, first).await?;

    let mut payload = common::manual_order("C2", product_id, 1, "100.25");
    payload["customerName"] = json!("Asha R.");
    payload["city"] = json!("Mysuru");
    let b = order_service::upsert_order(&orm, normalizer::normalize(payload)?).await?;

    assert_eq!(a.customer.id, b.customer.id);
    assert_eq!(b.customer.customer_name, "Asha R.");
    assert_eq!(b.customer.city.as_deref(), Some("Mysuru"));
    assert_eq!(Customers::find().count(&orm).await?, 1);
    assert_eq!(Orders::find().count(&orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn unknown_product_rolls_back_everything() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let known = common::seed_product(&orm, "MTSH09", dec!(100.25), true).await?;

    let payload = json!({
        "orderId": "A300",
        "customerName": "New Person",
        "contactNo": "918888888888",
        "orderItems": [
            { "productId": known, "selectedColors": ["Black"], "selectedSizes": ["M"], "quantity": 1, "unitPrice": "100.25" },
            { "productCode": "NOPE01", "selectedColors": ["Black"], "selectedSizes": ["M"], "quantity": 1, "unitPrice": "100.25" }
        ]
    });
    let err = order_service::upsert_order(&orm, normalizer::normalize(payload)?)
        .await
        .expect_err("unknown product code must fail");

    assert!(matches!(err, AppError::ProductNotFound(ref code) if code == "NOPE01"));
    assert_eq!(Orders::find().count(&orm).await?, 0);
    assert_eq!(OrderItems::find().count(&orm).await?, 0);
    assert_eq!(Customers::find().count(&orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn inactive_product_code_is_not_found() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    common::seed_product(&orm, "MTJG02", dec!(899.50), false).await?;

    let payload = json!({
        "orderId": "A400",
        "customerName": "Asha Rao",
        "contactNo": "919876543210",
        "orderItems": [
            { "productCode": "mtjg02", "selectedColors": ["Olive"], "selectedSizes": ["L"], "quantity": 1, "unitPrice": "899.50" }
        ]
    });
    let err = order_service::upsert_order(&orm, normalizer::normalize(payload)?)
        .await
        .expect_err("inactive product must fail");

    assert!(matches!(err, AppError::ProductNotFound(_)));
    assert_eq!(Orders::find().count(&orm).await?, 0);
    Ok(())
}

// Shopify line items are stored at quantity 1 and the order keeps
// Shopify's own total, whatever the items add up to.
#[tokio::test]
async fn shopify_order_keeps_upstream_total() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    common::seed_product(&orm, "MTSH09", dec!(499.50), true).await?;

    let normalized = normalizer::normalize(common::shopify_order(1001, "MTSH09-BLK-XL", "499.50"))?;
    let details = order_service::upsert_order(&orm, normalized).await?;

    assert_eq!(details.order.order_id, "1001");
    assert_eq!(details.order.total_amount, dec!(1099.50));
    assert_eq!(details.order.payment_mode, PaymentMode::Cod);
    assert_eq!(details.order.order_status, "InTransit");
    assert_eq!(details.order.state.as_deref(), Some("Karnataka"));
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.items[0].quantity, 1);
    assert_eq!(details.items[0].total_price, dec!(499.50));
    assert_eq!(details.items[0].selected_colors, vec!["Black".to_string()]);
    assert_eq!(details.items[0].selected_sizes, vec!["XL".to_string()]);
    assert_eq!(details.customer.shopify_customer_id.as_deref(), Some("7001"));
    Ok(())
}

#[tokio::test]
async fn shopify_resync_keeps_operator_workflow() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    common::seed_product(&orm, "MTSH09", dec!(499.50), true).await?;
    let state = common::app_state(orm.clone(), "http://127.0.0.1:9");

    let normalized = normalizer::normalize(common::shopify_order(1002, "MTSH09-BLK-XL", "499.50"))?;
    order_service::upsert_order(&orm, normalized).await?;

    let patch = OrderPatch {
        order_packed: Some(true),
        order_confirmation: Some("Confirmed on call".into()),
        ..OrderPatch::default()
    };
    order_service::patch_order(&state, "1002", patch).await?;

    let mut payload = common::shopify_order(1002, "MTSH09-BLK-XL", "499.50");
    payload["fulfillments"] = json!([{ "status": "success", "shipment_status": "delivered" }]);
    let details = order_service::upsert_order(&orm, normalizer::normalize(payload)?).await?;

    assert_eq!(details.order.order_status, "Delivered");
    assert!(details.order.order_packed);
    assert_eq!(details.order.order_confirmation, "Confirmed on call");
    Ok(())
}

#[tokio::test]
async fn get_and_patch_unknown_order_is_not_found() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let state = common::app_state(orm, "http://127.0.0.1:9");

    assert!(matches!(
        order_service::get_order(&state, "missing").await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        order_service::patch_order(&state, "missing", OrderPatch::default()).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn submitted_order_is_audited() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let product_id = common::seed_product(&orm, "MTSH09", dec!(299.99), true).await?;
    let state = common::app_state(orm.clone(), "http://127.0.0.1:9");

    let response =
        order_service::submit_order(&state, common::manual_order("A500", product_id, 1, "299.99")).await?;
    assert_eq!(response.message, "Order saved");

    let entries = order_sync::entity::AuditLogs::find().all(&orm).await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "order_upserted");
    Ok(())
}

// One inactive code fails the whole Shopify order, as does a SKU with no
// catalog code when the order is submitted directly.
#[tokio::test]
async fn shopify_order_with_unusable_line_is_rejected_whole() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    common::seed_product(&orm, "MTSH09", dec!(499.50), true).await?;
    common::seed_product(&orm, "MTJG02", dec!(899.50), false).await?;

    let mut payload = common::shopify_order(3001, "MTSH09-BLK-XL", "499.50");
    payload["line_items"]
        .as_array_mut()
        .expect("line items")
        .push(json!({ "sku": "MTJG02-OLV-L", "title": "Joggers", "variant_title": "Olive / L", "price": "899.50" }));
    let err = order_service::upsert_order(&orm, normalizer::normalize(payload)?)
        .await
        .expect_err("inactive product must fail the order");
    assert!(matches!(err, AppError::ProductNotFound(ref code) if code == "MTJG02"));

    let mut payload = common::shopify_order(3002, "MTSH09-BLK-XL", "499.50");
    payload["line_items"]
        .as_array_mut()
        .expect("line items")
        .push(json!({ "sku": "GIFTWRAP", "title": "Gift wrap", "variant_title": null, "price": "49.50" }));
    let err = order_service::upsert_order(&orm, normalizer::normalize(payload)?)
        .await
        .expect_err("unmatched SKU must fail a direct submission");
    assert!(matches!(err, AppError::ProductNotFound(ref label) if label == "Gift wrap"));

    assert_eq!(Orders::find().count(&orm).await?, 0);
    assert_eq!(OrderItems::find().count(&orm).await?, 0);
    assert_eq!(Customers::find().count(&orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn shopify_customer_id_wins_over_changed_phone() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    common::seed_product(&orm, "MTSH09", dec!(499.50), true).await?;

    let first = common::shopify_order(3101, "MTSH09-BLK-XL", "499.50");
    let a = order_service::upsert_order(&orm, normalizer::normalize(first)?).await?;

    let mut second = common::shopify_order(3102, "MTSH09-BLK-XL", "499.50");
    second["phone"] = json!("+917777777777");
    let b = order_service::upsert_order(&orm, normalizer::normalize(second)?).await?;

    assert_eq!(a.customer.id, b.customer.id);
    assert_eq!(b.customer.contact_no, "+917777777777");
    assert_eq!(Customers::find().count(&orm).await?, 1);
    assert_eq!(Orders::find().count(&orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn webhook_rejects_operator_shaped_body() -> anyhow::Result<()> {
    let orm = common::setup_db().await?;
    let product_id = common::seed_product(&orm, "MTSH09", dec!(299.99), true).await?;
    let state = common::app_state(orm.clone(), "http://127.0.0.1:9");

    let result =
        shopify_service::receive_webhook(&state, common::manual_order("W1", product_id, 1, "299.99")).await;

    assert!(matches!(result, Err(AppError::Validation(ref m)) if m.contains("not a Shopify order")));
    assert_eq!(Orders::find().count(&orm).await?, 0);
    Ok(())
}
