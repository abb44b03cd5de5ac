use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

use crate::entity::{
    Addresses, AuditLogs, CartItems, Carts, Categories, OrderItems, Orders, ProductImages, Products,
    Users,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    async fn create<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
    where
        E: EntityTrait,
    {
        manager
            .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
            .await?;
        for mut index in schema.create_index_from_entity(entity) {
            manager.create_index(index.if_not_exists().to_owned()).await?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Parents before children so foreign keys resolve.
        Self::create(manager, &schema, Addresses).await?;
        Self::create(manager, &schema, Users).await?;
        Self::create(manager, &schema, Categories).await?;
        Self::create(manager, &schema, Products).await?;
        Self::create(manager, &schema, ProductImages).await?;
        Self::create(manager, &schema, Carts).await?;
        Self::create(manager, &schema, CartItems).await?;
        Self::create(manager, &schema, Orders).await?;
        Self::create(manager, &schema, OrderItems).await?;
        Self::create(manager, &schema, AuditLogs).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditLogs).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(OrderItems).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Orders).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(CartItems).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Carts).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(ProductImages).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Products).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Categories).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Users).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Addresses).if_exists().to_owned()).await?;
        Ok(())
    }
}
