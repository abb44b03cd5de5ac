use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entity::order_items::{ActiveModel, Column, Entity as OrderItems, Model};

use super::now;

/// Items in the order they were copied from the cart.
pub async fn find_by_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    OrderItems::find()
        .filter(Column::OrderId.eq(order_id))
        .order_by_asc(Column::Position)
        .all(conn)
        .await
}

/// Items for several orders in one query, grouped by order id.
pub async fn find_by_orders<C: ConnectionTrait>(
    conn: &C,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Model>>, DbErr> {
    let mut grouped: HashMap<Uuid, Vec<Model>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = OrderItems::find()
        .filter(Column::OrderId.is_in(order_ids.iter().copied()))
        .order_by_asc(Column::OrderId)
        .order_by_asc(Column::Position)
        .all(conn)
        .await?;
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row);
    }
    Ok(grouped)
}

pub struct NewOrderItem {
    pub order_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

pub async fn create<C: ConnectionTrait>(conn: &C, item: NewOrderItem) -> Result<Model, DbErr> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(item.order_id),
        position: Set(item.position),
        product_id: Set(item.product_id),
        name: Set(item.name),
        unit_price: Set(item.unit_price),
        quantity: Set(item.quantity),
        subtotal: Set(item.subtotal),
        created_at: Set(now()),
    }
    .insert(conn)
    .await
}
