use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    entity::carts::{ActiveModel, Column, Entity as Carts, Model},
    money,
    response::Paginated,
    routes::params::CartListQuery,
};

use super::{now, paginate};

pub async fn find_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<Model>, DbErr> {
    Carts::find()
        .filter(Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Carts::find_by_id(id).one(conn).await
}

/// Creates an empty cart (total 0) for `user_id`.
pub async fn create<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Model, DbErr> {
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        total: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Saves the whole row. Fails with `RecordNotUpdated` if the cart is gone.
pub async fn update<C: ConnectionTrait>(conn: &C, cart: Model) -> Result<Model, DbErr> {
    ActiveModel {
        id: Unchanged(cart.id),
        user_id: Set(cart.user_id),
        total: Set(money::round(cart.total)),
        created_at: Unchanged(cart.created_at),
        updated_at: Set(now()),
    }
    .update(conn)
    .await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    Ok(Carts::delete_by_id(id).exec(conn).await?.rows_affected)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    query: &CartListQuery,
) -> Result<Paginated<Model>, DbErr> {
    let mut condition = Condition::all();
    if let Some(user_id) = query.user_id {
        condition = condition.add(Column::UserId.eq(user_id));
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

    let finder = Carts::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt);
    paginate(conn, finder, query.pagination()).await
}
