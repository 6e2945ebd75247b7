use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_catalog_tables::{Customers, Products};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::OrderId).string().not_null().unique_key())
                    .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Orders::OrderDate).date().not_null())
                    .col(ColumnDef::new(Orders::State).string().null())
                    .col(ColumnDef::new(Orders::TotalAmount).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Orders::PaymentMode).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Orders::OrderConfirmation)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderStatus)
                            .string()
                            .not_null()
                            .default("New"),
                    )
                    .col(ColumnDef::new(Orders::Comments).text().not_null().default(""))
                    .col(&mut flag(Orders::ProcessOrder))
                    .col(&mut flag(Orders::OrderPacked))
                    .col(&mut flag(Orders::OrderCancelled))
                    .col(&mut flag(Orders::Delivered))
                    .col(&mut flag(Orders::IsRto))
                    .col(&mut flag(Orders::IsReturn))
                    .col(ColumnDef::new(Orders::RtoReason).text().null())
                    .col(ColumnDef::new(Orders::ReturnReason).text().null())
                    .col(ColumnDef::new(Orders::CancelReason).text().null())
                    .col(ColumnDef::new(Orders::Review).text().null())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer_id")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::ProductId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::SelectedColors).json_binary().not_null())
                    .col(ColumnDef::new(OrderItems::SelectedSizes).json_binary().not_null())
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(ColumnDef::new(OrderItems::UnitPrice).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(OrderItems::TotalPrice).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(OrderItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order_id")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_product_id")
                            .from(OrderItems::Table, OrderItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order_id")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

fn flag(column: Orders) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderId,
    CustomerId,
    OrderDate,
    State,
    TotalAmount,
    PaymentMode,
    OrderConfirmation,
    OrderStatus,
    Comments,
    ProcessOrder,
    OrderPacked,
    OrderCancelled,
    Delivered,
    IsRto,
    IsReturn,
    RtoReason,
    ReturnReason,
    CancelReason,
    Review,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    SelectedColors,
    SelectedSizes,
    Quantity,
    UnitPrice,
    TotalPrice,
    CreatedAt,
}
