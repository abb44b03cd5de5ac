use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entity::product_images::{ActiveModel, Column, Entity as ProductImages, Model};

use super::now;

pub async fn find_by_product<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    ProductImages::find()
        .filter(Column::ProductId.eq(product_id))
        .order_by_asc(Column::Position)
        .all(conn)
        .await
}

/// Images of several products in one query, grouped by product id.
pub async fn find_by_products<C: ConnectionTrait>(
    conn: &C,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Model>>, DbErr> {
    let mut grouped: HashMap<Uuid, Vec<Model>> = HashMap::new();
    if product_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = ProductImages::find()
        .filter(Column::ProductId.is_in(product_ids.iter().copied()))
        .order_by_asc(Column::ProductId)
        .order_by_asc(Column::Position)
        .all(conn)
        .await?;
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row);
    }
    Ok(grouped)
}

/// Swaps the product's image list for `urls`, keeping their order.
pub async fn replace<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    urls: Vec<String>,
) -> Result<Vec<Model>, DbErr> {
    ProductImages::delete_many()
        .filter(Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;

    let mut images = Vec::with_capacity(urls.len());
    for (position, url) in urls.into_iter().enumerate() {
        let image = ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            position: Set(position as i32),
            url: Set(url),
            created_at: Set(now()),
        }
        .insert(conn)
        .await?;
        images.push(image);
    }
    Ok(images)
}
