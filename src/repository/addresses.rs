use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::addresses::AddressInput,
    entity::addresses::{ActiveModel, Entity as Addresses, Model},
};

use super::now;

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Addresses::find_by_id(id).one(conn).await
}

pub async fn create<C: ConnectionTrait>(conn: &C, input: AddressInput) -> Result<Model, DbErr> {
    let now = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        country: Set(input.country),
        city: Set(input.city),
        postcode: Set(input.postcode),
        street: Set(input.street),
        number: Set(input.number),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}
