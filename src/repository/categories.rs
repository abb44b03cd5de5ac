use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    entity::categories::{ActiveModel, Column, Entity as Categories, Model},
    response::Paginated,
    routes::params::{CategoryQuery, like_pattern},
};

use super::{now, paginate};

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Categories::find_by_id(id).one(conn).await
}

pub async fn find_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<Model>, DbErr> {
    Categories::find()
        .filter(Column::Name.eq(name))
        .one(conn)
        .await
}

pub async fn find_children<C: ConnectionTrait>(
    conn: &C,
    parent_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Categories::find()
        .filter(Column::ParentId.eq(parent_id))
        .order_by_asc(Column::Name)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: String,
    parent_id: Option<Uuid>,
) -> Result<Model, DbErr> {
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        parent_id: Set(parent_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait>(conn: &C, category: Model) -> Result<Model, DbErr> {
    ActiveModel {
        id: Unchanged(category.id),
        name: Set(category.name),
        parent_id: Set(category.parent_id),
        created_at: Unchanged(category.created_at),
        updated_at: Set(now()),
    }
    .update(conn)
    .await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    Ok(Categories::delete_by_id(id).exec(conn).await?.rows_affected)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    query: &CategoryQuery,
) -> Result<Paginated<Model>, DbErr> {
    let mut condition = Condition::all();
    if let Some(pattern) = like_pattern(query.name.as_deref()) {
        condition = condition.add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern));
    }
    if let Some(parent_id) = query.parent_id {
        condition = condition.add(Column::ParentId.eq(parent_id));
    }
    if let Some(after) = query.created_after {
        condition = condition.add(Column::CreatedAt.gte(after));
    }
    if let Some(before) = query.created_before {
        condition = condition.add(Column::CreatedAt.lte(before));
    }

    let finder = Categories::find()
        .filter(condition)
        .order_by_asc(Column::Name);
    paginate(conn, finder, query.pagination()).await
}
