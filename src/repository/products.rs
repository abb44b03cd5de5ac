use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, Func, LockType},
};
use uuid::Uuid;

use crate::{
    dto::products::CreateProductRequest,
    entity::products::{ActiveModel, Column, Entity as Products, Model},
    money,
    response::Paginated,
    routes::params::{ProductQuery, ProductSortBy, SortOrder, like_pattern},
};

use super::{now, paginate};

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Products::find_by_id(id).one(conn).await
}

/// Reads the product and holds a row lock until the surrounding transaction
/// ends. Backends without row locks (SQLite) serialize writers instead.
pub async fn find_by_id_for_update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<Model>, DbErr> {
    Products::find_by_id(id)
        .lock(LockType::Update)
        .one(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<Vec<Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Products::find()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: CreateProductRequest,
) -> Result<Model, DbErr> {
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        price: Set(money::round(input.price)),
        currency: Set(input.currency),
        stock: Set(input.stock),
        is_active: Set(input.is_active.unwrap_or(true)),
        category_id: Set(input.category_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Saves the whole row, stock included.
pub async fn update<C: ConnectionTrait>(conn: &C, product: Model) -> Result<Model, DbErr> {
    ActiveModel {
        id: Unchanged(product.id),
        name: Set(product.name),
        description: Set(product.description),
        price: Set(money::round(product.price)),
        currency: Set(product.currency),
        stock: Set(product.stock),
        is_active: Set(product.is_active),
        category_id: Set(product.category_id),
        created_at: Unchanged(product.created_at),
        updated_at: Set(now()),
    }
    .update(conn)
    .await
}

pub async fn count_by_category<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
) -> Result<u64, DbErr> {
    Products::find()
        .filter(Column::CategoryId.eq(category_id))
        .count(conn)
        .await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    Ok(Products::delete_by_id(id).exec(conn).await?.rows_affected)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    query: &ProductQuery,
) -> Result<Paginated<Model>, DbErr> {
    let mut condition = Condition::all();
    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(pattern) = like_pattern(query.name.as_deref()) {
        condition = condition.add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern));
    }
    if let Some(min) = query.price_min {
        condition = condition.add(Column::Price.gte(min));
    }
    if let Some(max) = query.price_max {
        condition = condition.add(Column::Price.lte(max));
    }
    if let Some(is_active) = query.is_active {
        condition = condition.add(Column::IsActive.eq(is_active));
    }

    let column = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };
    let order = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    let finder = Products::find()
        .filter(condition)
        .order_by(column, order)
        .order_by_asc(Column::Id);
    paginate(conn, finder, query.pagination()).await
}
