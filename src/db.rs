use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// Create a SeaORM connection. Statements are logged by sea-orm's `debug-print` through `tracing`.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Every pooled connection to `sqlite::memory:` would get its own empty database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply every pending migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Carts, Orders, Products};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn migrations_create_queryable_tables() -> Result<()> {
        let conn = create_orm_conn("sqlite::memory:").await?;
        run_migrations(&conn).await?;

        assert!(Products::find().limit(1).all(&conn).await?.is_empty());
        assert!(Carts::find().limit(1).all(&conn).await?.is_empty());
        assert!(Orders::find().limit(1).all(&conn).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn migrations_are_idempotent() -> Result<()> {
        let conn = create_orm_conn("sqlite::memory:").await?;
        run_migrations(&conn).await?;
        run_migrations(&conn).await?;
        Ok(())
    }
}
