use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    entity::orders::{ActiveModel, Column, Entity as Orders, Model, OrderStatus, PaymentMethod},
    money,
    response::Paginated,
    routes::params::{OrderListQuery, SortOrder},
};

use super::{now, paginate};

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Orders::find_by_id(id).one(conn).await
}

/// Newest first.
pub async fn find_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Orders::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<u64, DbErr> {
    Orders::find()
        .filter(Column::UserId.eq(user_id))
        .count(conn)
        .await
}

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Model>, DbErr> {
    Orders::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(conn)
        .await
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    query: &OrderListQuery,
) -> Result<Paginated<Model>, DbErr> {
    let mut condition = Condition::all();
    if let Some(user_id) = query.user_id {
        condition = condition.add(Column::UserId.eq(user_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(Column::Status.eq(status));
    }
    if let Some(min) = query.total_min {
        condition = condition.add(Column::Total.gte(min));
    }
    if let Some(max) = query.total_max {
        condition = condition.add(Column::Total.lte(max));
    }
    if let Some(after) = query.created_after {
        condition = condition.add(Column::CreatedAt.gte(after));
    }
    if let Some(before) = query.created_before {
        condition = condition.add(Column::CreatedAt.lte(before));
    }

    let order = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };
    let finder = Orders::find()
        .filter(condition)
        .order_by(Column::CreatedAt, order)
        .order_by_asc(Column::Id);
    paginate(conn, finder, query.pagination()).await
}

/// Inserts a PENDING order header; items are added separately.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    payment_method: PaymentMethod,
    shipping_address_id: Uuid,
    total: Decimal,
) -> Result<Model, DbErr> {
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        status: Set(OrderStatus::Pending),
        payment_method: Set(payment_method),
        shipping_address_id: Set(shipping_address_id),
        total: Set(money::round(total)),
        paid_at: Set(None),
        shipped_at: Set(None),
        cancelled_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Saves the whole header row.
pub async fn update<C: ConnectionTrait>(conn: &C, order: Model) -> Result<Model, DbErr> {
    ActiveModel {
        id: Unchanged(order.id),
        user_id: Set(order.user_id),
        status: Set(order.status),
        payment_method: Set(order.payment_method),
        shipping_address_id: Set(order.shipping_address_id),
        total: Set(money::round(order.total)),
        paid_at: Set(order.paid_at),
        shipped_at: Set(order.shipped_at),
        cancelled_at: Set(order.cancelled_at),
        created_at: Unchanged(order.created_at),
        updated_at: Set(now()),
    }
    .update(conn)
    .await
}
