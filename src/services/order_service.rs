use std::collections::HashMap;

use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;

use crate::{
    audit,
    dto::orders::{OrderDetails, OrderPatch},
    entity::{
        Selections,
        customers::Entity as Customers,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    services::{
        catalog::find_active_product,
        customer_service::{customer_from_entity, resolve_customer},
        normalizer::{self, NormalizedOrder, OrderItemInput, OrderSource, ProductRef},
    },
    state::AppState,
};

/// Columns Shopify owns; a re-sync refreshes these and leaves the operator's
/// workflow progress alone.
const SOURCE_COLUMNS: [OrderCol; 8] = [
    OrderCol::CustomerId,
    OrderCol::OrderDate,
    OrderCol::State,
    OrderCol::TotalAmount,
    OrderCol::PaymentMode,
    OrderCol::OrderStatus,
    OrderCol::Comments,
    OrderCol::UpdatedAt,
];

/// Columns only operators edit; a manual upsert replaces them too.
const WORKFLOW_COLUMNS: [OrderCol; 11] = [
    OrderCol::OrderConfirmation,
    OrderCol::ProcessOrder,
    OrderCol::OrderPacked,
    OrderCol::OrderCancelled,
    OrderCol::Delivered,
    OrderCol::IsRto,
    OrderCol::IsReturn,
    OrderCol::RtoReason,
    OrderCol::ReturnReason,
    OrderCol::CancelReason,
    OrderCol::Review,
];

#[derive(Debug)]
struct ResolvedItem {
    product_id: i32,
    selected_colors: Vec<String>,
    selected_sizes: Vec<String>,
    quantity: i32,
    unit_price: Decimal,
}

/// Create or replace one order and its line items in a single transaction.
///
/// The order row is written with `INSERT .. ON CONFLICT (order_id) DO UPDATE`
/// and its items are deleted and re-inserted, so a resubmission leaves exactly
/// the new item set. Any failure drops the transaction uncommitted.
pub async fn upsert_order(db: &DatabaseConnection, normalized: NormalizedOrder) -> AppResult<OrderDetails> {
    let NormalizedOrder { source, order } = normalized;
    let txn = db.begin().await?;

    let customer_id = resolve_customer(&txn, &order.customer).await?;
    let items = resolve_items(&txn, source, &order.items).await?;

    let now = Utc::now();
    let active = OrderActive {
        id: NotSet,
        order_id: Set(order.order_id.clone()),
        customer_id: Set(customer_id),
        order_date: Set(order.order_date),
        state: Set(order.state.clone()),
        total_amount: Set(order.total_amount),
        payment_mode: Set(order.payment_mode),
        order_confirmation: Set(order.order_confirmation.clone()),
        order_status: Set(order.order_status.clone()),
        comments: Set(order.comments.clone()),
        process_order: Set(order.flags.process_order),
        order_packed: Set(order.flags.order_packed),
        order_cancelled: Set(order.flags.order_cancelled),
        delivered: Set(order.flags.delivered),
        is_rto: Set(order.flags.is_rto),
        is_return: Set(order.flags.is_return),
        rto_reason: Set(order.rto_reason.clone()),
        return_reason: Set(order.return_reason.clone()),
        cancel_reason: Set(order.cancel_reason.clone()),
        review: Set(order.review.clone()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let mut update_columns = SOURCE_COLUMNS.to_vec();
    if source == OrderSource::Manual {
        update_columns.extend(WORKFLOW_COLUMNS);
    }

    Orders::insert(active)
        .on_conflict(
            OnConflict::column(OrderCol::OrderId)
                .update_columns(update_columns)
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let stored = Orders::find()
        .filter(OrderCol::OrderId.eq(order.order_id.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow!("order {} missing after upsert", order.order_id)))?;

    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(stored.id))
        .exec(&txn)
        .await?;

    if !items.is_empty() {
        let rows = items.into_iter().map(|item| OrderItemActive {
            id: NotSet,
            order_id: Set(stored.id),
            product_id: Set(item.product_id),
            total_price: Set(item.unit_price * Decimal::from(item.quantity)),
            selected_colors: Set(Selections(item.selected_colors)),
            selected_sizes: Set(Selections(item.selected_sizes)),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            created_at: Set(now.into()),
        });
        OrderItems::insert_many(rows).exec_without_returning(&txn).await?;
    }

    let details = load_details(&txn, stored).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = %details.order.order_id,
        source = source.as_str(),
        items = details.items.len(),
        "order upserted"
    );
    Ok(details)
}

/// Normalise one payload of either shape and upsert it.
pub async fn submit_order(state: &AppState, payload: Value) -> AppResult<ApiResponse<OrderDetails>> {
    let normalized = normalizer::normalize(payload)?;
    let source = normalized.source;
    let details = upsert_order(&state.orm, normalized).await?;

    audit::record(
        &state.orm,
        "order_upserted",
        Some("orders"),
        serde_json::json!({ "order_id": details.order.order_id, "source": source.as_str() }),
    )
    .await;

    Ok(ApiResponse::success("Order saved", details, Some(Meta::empty())))
}

pub async fn get_order(state: &AppState, order_id: &str) -> AppResult<ApiResponse<OrderDetails>> {
    let order = Orders::find()
        .filter(OrderCol::OrderId.eq(order_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let details = load_details(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", details, Some(Meta::empty())))
}

pub async fn patch_order(
    state: &AppState,
    order_id: &str,
    patch: OrderPatch,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find()
        .filter(OrderCol::OrderId.eq(order_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    if let Some(status) = patch.order_status {
        if status.trim().is_empty() {
            return Err(AppError::BadRequest("orderStatus must not be empty".into()));
        }
        active.order_status = Set(status.trim().to_string());
    }
    if let Some(confirmation) = patch.order_confirmation {
        active.order_confirmation = Set(confirmation);
    }
    if let Some(comments) = patch.comments {
        active.comments = Set(comments);
    }
    if let Some(v) = patch.process_order {
        active.process_order = Set(v);
    }
    if let Some(v) = patch.order_packed {
        active.order_packed = Set(v);
    }
    if let Some(v) = patch.order_cancelled {
        active.order_cancelled = Set(v);
    }
    if let Some(v) = patch.delivered {
        active.delivered = Set(v);
    }
    if let Some(v) = patch.is_rto {
        active.is_rto = Set(v);
    }
    if let Some(v) = patch.is_return {
        active.is_return = Set(v);
    }
    if let Some(reason) = patch.rto_reason {
        active.rto_reason = Set(Some(reason));
    }
    if let Some(reason) = patch.return_reason {
        active.return_reason = Set(Some(reason));
    }
    if let Some(reason) = patch.cancel_reason {
        active.cancel_reason = Set(Some(reason));
    }
    if let Some(review) = patch.review {
        active.review = Set(Some(review));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        "order_patched",
        Some("orders"),
        serde_json::json!({ "order_id": order.order_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

async fn resolve_items<C: ConnectionTrait>(
    conn: &C,
    source: OrderSource,
    items: &[OrderItemInput],
) -> AppResult<Vec<ResolvedItem>> {
    let mut by_code: HashMap<String, i32> = HashMap::new();
    let mut resolved = Vec::with_capacity(items.len());

    for item in items {
        let product_id = match &item.product {
            ProductRef::Id(id) => *id,
            ProductRef::Code(code) => match by_code.get(code) {
                Some(id) => *id,
                None => {
                    let product = find_active_product(conn, code).await?;
                    by_code.insert(code.clone(), product.id);
                    product.id
                }
            },
            ProductRef::Unmatched(sku) => return Err(AppError::ProductNotFound(sku.clone())),
        };

        let quantity = match source {
            OrderSource::Shopify => 1,
            OrderSource::Manual => item.quantity,
        };

        resolved.push(ResolvedItem {
            product_id,
            selected_colors: item.selected_colors.clone(),
            selected_sizes: item.selected_sizes.clone(),
            quantity,
            unit_price: item.unit_price,
        });
    }

    Ok(resolved)
}

async fn load_details<C: ConnectionTrait>(conn: &C, order: OrderModel) -> AppResult<OrderDetails> {
    let customer = Customers::find_by_id(order.customer_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(Products)
        .all(conn)
        .await?
        .into_iter()
        .map(|(item, product)| order_item_from_entity(item, product))
        .collect();

    Ok(OrderDetails {
        order: order_from_entity(order),
        customer: customer_from_entity(customer),
        items,
    })
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        order_id: model.order_id,
        customer_id: model.customer_id,
        order_date: model.order_date,
        state: model.state,
        total_amount: model.total_amount,
        payment_mode: model.payment_mode,
        order_confirmation: model.order_confirmation,
        order_status: model.order_status,
        comments: model.comments,
        process_order: model.process_order,
        order_packed: model.order_packed,
        order_cancelled: model.order_cancelled,
        delivered: model.delivered,
        is_rto: model.is_rto,
        is_return: model.is_return,
        rto_reason: model.rto_reason,
        return_reason: model.return_reason,
        cancel_reason: model.cancel_reason,
        review: model.review,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel, product: Option<ProductModel>) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        product_code: product.as_ref().map(|p| p.product_code.clone()),
        product_name: product.map(|p| p.name),
        selected_colors: model.selected_colors.0,
        selected_sizes: model.selected_sizes.0,
        quantity: model.quantity,
        unit_price: model.unit_price,
        total_price: model.total_price,
    }
}
