//! Data access for the workflow services.
//!
//! Every function is generic over [`ConnectionTrait`], so the caller decides
//! whether it runs on the shared connection or inside a transaction. Services
//! that touch more than one table open a transaction and pass it to each call;
//! that transaction is the unit of work.

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select,
    prelude::DateTimeWithTimeZone,
};

use crate::{
    response::{Meta, Paginated},
    routes::params::Pagination,
};

pub mod addresses;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod product_images;
pub mod products;
pub mod users;

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// Counts the filtered rows, then fetches the requested page.
pub async fn paginate<C, E>(
    conn: &C,
    select: Select<E>,
    pagination: Pagination,
) -> Result<Paginated<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let (page, per_page, offset) = pagination.normalize();
    let total = select.clone().count(conn).await? as i64;
    let items = select
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(conn)
        .await?;
    Ok(Paginated {
        items,
        meta: Meta::new(page, per_page, total),
    })
}
