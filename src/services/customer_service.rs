use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::{
    dto::customers::CustomerPatch,
    entity::customers::{
        ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
        Model as CustomerModel,
    },
    error::{AppError, AppResult},
    models::Customer,
    response::{ApiResponse, Meta},
    services::normalizer::CustomerInput,
    state::AppState,
};

/// Find the customer by Shopify id, then by phone, and refresh its contact
/// fields; create it when neither key is known. Returns the customer id.
pub async fn resolve_customer<C: ConnectionTrait>(conn: &C, input: &CustomerInput) -> AppResult<i32> {
    let mut existing = None;
    if let Some(external_id) = input.shopify_customer_id.as_deref() {
        existing = Customers::find()
            .filter(CustomerCol::ShopifyCustomerId.eq(external_id))
            .one(conn)
            .await?;
    }
    if existing.is_none() {
        existing = Customers::find()
            .filter(CustomerCol::ContactNo.eq(input.contact_no.as_str()))
            .one(conn)
            .await?;
    }

    let now = Utc::now();
    match existing {
        Some(customer) => {
            let id = customer.id;
            let mut active: CustomerActive = customer.into();
            active.customer_name = Set(input.name.clone());
            active.contact_no = Set(input.contact_no.clone());
            if let Some(external_id) = &input.shopify_customer_id {
                active.shopify_customer_id = Set(Some(external_id.clone()));
            }
            active.state = Set(input.state.clone());
            if input.email.is_some() {
                active.email = Set(input.email.clone());
            }
            if input.address.is_some() {
                active.address = Set(input.address.clone());
            }
            if input.city.is_some() {
                active.city = Set(input.city.clone());
            }
            if input.country.is_some() {
                active.country = Set(input.country.clone());
            }
            active.updated_at = Set(now.into());
            active.update(conn).await?;
            tracing::debug!(customer_id = id, "customer refreshed");
            Ok(id)
        }
        None => {
            let customer = CustomerActive {
                id: NotSet,
                customer_name: Set(input.name.clone()),
                contact_no: Set(input.contact_no.clone()),
                shopify_customer_id: Set(input.shopify_customer_id.clone()),
                email: Set(input.email.clone()),
                address: Set(input.address.clone()),
                city: Set(input.city.clone()),
                country: Set(input.country.clone()),
                state: Set(input.state.clone()),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(conn)
            .await?;
            tracing::debug!(customer_id = customer.id, "customer created");
            Ok(customer.id)
        }
    }
}

pub async fn get_customer(state: &AppState, id: i32) -> AppResult<ApiResponse<Customer>> {
    let customer = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "OK",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

pub async fn update_customer(
    state: &AppState,
    id: i32,
    patch: CustomerPatch,
) -> AppResult<ApiResponse<Customer>> {
    let existing = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CustomerActive = existing.into();
    if let Some(name) = patch.customer_name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("customerName must not be empty".into()));
        }
        active.customer_name = Set(name.trim().to_string());
    }
    if let Some(contact_no) = patch.contact_no {
        if contact_no.trim().is_empty() {
            return Err(AppError::BadRequest("contactNo must not be empty".into()));
        }
        active.contact_no = Set(contact_no.trim().to_string());
    }
    if let Some(email) = patch.email {
        active.email = Set(Some(email));
    }
    if let Some(address) = patch.address {
        active.address = Set(Some(address));
    }
    if let Some(city) = patch.city {
        active.city = Set(Some(city));
    }
    if let Some(country) = patch.country {
        active.country = Set(Some(country));
    }
    if let Some(region) = patch.state {
        active.state = Set(Some(region));
    }
    active.updated_at = Set(Utc::now().into());
    let customer = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Customer updated",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

pub(crate) fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        customer_name: model.customer_name,
        contact_no: model.contact_no,
        shopify_customer_id: model.shopify_customer_id,
        email: model.email,
        address: model.address,
        city: model.city,
        country: model.country,
        state: model.state,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
