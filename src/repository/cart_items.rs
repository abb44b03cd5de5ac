use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    entity::{
        Products,
        cart_items::{ActiveModel, Column, Entity as CartItems, Model},
        products,
    },
    money,
};

use super::now;

pub struct NewCartItem {
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    CartItems::find_by_id(id).one(conn).await
}

/// Items in insertion order.
pub async fn find_by_cart<C: ConnectionTrait>(
    conn: &C,
    cart_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    CartItems::find()
        .filter(Column::CartId.eq(cart_id))
        .order_by_asc(Column::Position)
        .all(conn)
        .await
}

/// Items in insertion order, each paired with its current catalog row.
pub async fn find_by_cart_with_products<C: ConnectionTrait>(
    conn: &C,
    cart_id: Uuid,
) -> Result<Vec<(Model, Option<products::Model>)>, DbErr> {
    CartItems::find()
        .filter(Column::CartId.eq(cart_id))
        .find_also_related(Products)
        .order_by_asc(Column::Position)
        .all(conn)
        .await
}

/// Position the next line appended to `cart_id` gets.
async fn next_position<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> Result<i32, DbErr> {
    let last = CartItems::find()
        .filter(Column::CartId.eq(cart_id))
        .order_by_desc(Column::Position)
        .one(conn)
        .await?;
    Ok(last.map_or(0, |item| item.position + 1))
}

/// Appends a line after the cart's current last one.
pub async fn create<C: ConnectionTrait>(conn: &C, item: NewCartItem) -> Result<Model, DbErr> {
    let position = next_position(conn, item.cart_id).await?;
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        cart_id: Set(item.cart_id),
        position: Set(position),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
        unit_price: Set(money::round(item.unit_price)),
        subtotal: Set(money::round(item.subtotal)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait>(conn: &C, item: Model) -> Result<Model, DbErr> {
    ActiveModel {
        id: Unchanged(item.id),
        cart_id: Set(item.cart_id),
        position: Unchanged(item.position),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
        unit_price: Set(money::round(item.unit_price)),
        subtotal: Set(money::round(item.subtotal)),
        created_at: Unchanged(item.created_at),
        updated_at: Set(now()),
    }
    .update(conn)
    .await
}

/// Deletes one item. `RecordNotFound` if nothing was deleted.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DbErr> {
    let result = CartItems::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotFound(format!("cart item {id}")));
    }
    Ok(())
}

pub async fn delete_by_cart<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> Result<u64, DbErr> {
    let result = CartItems::delete_many()
        .filter(Column::CartId.eq(cart_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Number of cart lines, across all carts, that reference `product_id`.
pub async fn count_by_product<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> Result<u64, DbErr> {
    CartItems::find()
        .filter(Column::ProductId.eq(product_id))
        .count(conn)
        .await
}
