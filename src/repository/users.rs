use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    entity::{
        addresses,
        users::{ActiveModel, Column, Entity as Users, Model, Relation},
    },
    response::Paginated,
    routes::params::{UserQuery, like_pattern},
};

use super::{now, paginate};

pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub role: String,
    pub address_id: Uuid,
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Users::find_by_id(id).one(conn).await
}

/// Emails are stored lowercased, so the lookup is case-insensitive.
pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<Model>, DbErr> {
    Users::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(conn: &C, user: NewUser) -> Result<Model, DbErr> {
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(user.email.trim().to_lowercase()),
        password_hash: Set(user.password_hash),
        name: Set(user.name),
        surname: Set(user.surname),
        role: Set(user.role),
        address_id: Set(user.address_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait>(conn: &C, user: Model) -> Result<Model, DbErr> {
    ActiveModel {
        id: Unchanged(user.id),
        email: Set(user.email.trim().to_lowercase()),
        password_hash: Set(user.password_hash),
        name: Set(user.name),
        surname: Set(user.surname),
        role: Set(user.role),
        address_id: Set(user.address_id),
        created_at: Unchanged(user.created_at),
        updated_at: Set(now()),
    }
    .update(conn)
    .await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    Ok(Users::delete_by_id(id).exec(conn).await?.rows_affected)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    query: &UserQuery,
) -> Result<Paginated<Model>, DbErr> {
    let mut condition = Condition::all();
    if let Some(pattern) = like_pattern(query.email.as_deref()) {
        condition = condition.add(Expr::expr(Func::lower(Expr::col(Column::Email))).like(pattern));
    }
    if let Some(pattern) = like_pattern(query.name.as_deref()) {
        condition = condition.add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern));
    }
    if let Some(pattern) = like_pattern(query.surname.as_deref()) {
        condition =
            condition.add(Expr::expr(Func::lower(Expr::col(Column::Surname))).like(pattern));
    }

    let country = like_pattern(query.country.as_deref());
    let city = like_pattern(query.city.as_deref());
    let mut finder = Users::find();
    if country.is_some() || city.is_some() {
        finder = finder.join(JoinType::InnerJoin, Relation::Addresses.def());
        if let Some(pattern) = country {
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((
                    addresses::Entity,
                    addresses::Column::Country,
                ))))
                .like(pattern),
            );
        }
        if let Some(pattern) = city {
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((
                    addresses::Entity,
                    addresses::Column::City,
                ))))
                .like(pattern),
            );
        }
    }

    let finder = finder
        .filter(condition)
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id);
    paginate(conn, finder, query.pagination()).await
}
