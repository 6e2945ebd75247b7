use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::{
    entity::{
        Selections,
        products::{
            ActiveModel as ProductActive, Column as ProdCol, Entity as Products,
            Model as ProductModel,
        },
    },
    error::{AppError, AppResult},
};

const SEED_COLORS: &[&str] = &["Black", "White", "Navy", "Olive"];
const SEED_SIZES: &[&str] = &["S", "M", "L", "XL", "XXL"];

/// Known catalog codes in match priority order: the first substring found in
/// a SKU decides its product, whatever else the SKU contains.
pub const SKU_PRIORITY: &[(&str, &str)] = &[
    ("MTRA04", "MTRA04"),
    ("MTSH09", "MTSH09"),
    ("MTSH07", "MTSH07"),
    ("MTTS03", "MTTS03"),
    ("MTJG02", "MTJG02"),
    ("MTHD01", "MTHD01"),
    ("MTSW05", "MTSW05"),
];

/// Map a loosely formatted SKU such as `mtra04-blk-xl` to its catalog code.
pub fn resolve_product_code(sku: &str) -> Option<&'static str> {
    let sku = sku.trim().to_ascii_uppercase();
    if sku.is_empty() {
        return None;
    }
    SKU_PRIORITY
        .iter()
        .find(|(needle, _)| sku.contains(needle))
        .map(|(_, code)| *code)
}

pub async fn find_active_product<C: ConnectionTrait>(
    conn: &C,
    product_code: &str,
) -> AppResult<ProductModel> {
    Products::find()
        .filter(ProdCol::ProductCode.eq(product_code))
        .filter(ProdCol::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::ProductNotFound(product_code.to_string()))
}

/// Insert the known catalog codes, leaving existing rows untouched.
///
/// Returns how many rows were new and how many codes the catalog holds.
pub async fn seed_catalog<C: ConnectionTrait>(conn: &C) -> AppResult<(u64, usize)> {
    let products = [
        ("MTRA04", "Raglan Tee", Decimal::new(59900, 2)),
        ("MTSH09", "Oxford Shirt", Decimal::new(129900, 2)),
        ("MTSH07", "Linen Shirt", Decimal::new(114900, 2)),
        ("MTTS03", "Track Suit", Decimal::new(249900, 2)),
        ("MTJG02", "Joggers", Decimal::new(89900, 2)),
        ("MTHD01", "Pullover Hoodie", Decimal::new(149900, 2)),
        ("MTSW05", "Crew Sweatshirt", Decimal::new(119900, 2)),
    ];

    let owned = |values: &[&str]| values.iter().map(|v| (*v).to_string()).collect::<Vec<_>>();
    let now = Utc::now();
    let rows = products.iter().map(|(code, name, price)| ProductActive {
        id: NotSet,
        product_code: Set((*code).to_string()),
        name: Set((*name).to_string()),
        base_price: Set(*price),
        available_colors: Set(Selections::from(owned(SEED_COLORS))),
        available_sizes: Set(Selections::from(owned(SEED_SIZES))),
        is_active: Set(true),
        created_at: Set(now.into()),
    });

    let inserted = Products::insert_many(rows)
        .on_conflict(OnConflict::column(ProdCol::ProductCode).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;

    tracing::info!(inserted, total = products.len(), "catalog seeded");
    Ok((inserted, products.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_code_embedded_in_sku() {
        assert_eq!(resolve_product_code("MTRA04-BLK-XL"), Some("MTRA04"));
        assert_eq!(resolve_product_code("  mtsh09/white/m "), Some("MTSH09"));
    }

    #[test]
    fn first_code_in_priority_order_wins() {
        assert_eq!(resolve_product_code("MTSH09-MTRA04-COMBO"), Some("MTRA04"));
        assert_eq!(resolve_product_code("MTHD01+MTSH07"), Some("MTSH07"));
    }

    #[test]
    fn unknown_or_blank_sku_is_unresolved() {
        assert_eq!(resolve_product_code("GIFTCARD-500"), None);
        assert_eq!(resolve_product_code(""), None);
    }
}
