use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{addresses::AddressInput, products::CreateProductRequest},
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    repository::{
        addresses, categories, product_images, products,
        users::{self, NewUser},
    },
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "admin1234", ROLE_ADMIN).await?;
    let user_id = ensure_user(&orm, "user@example.com", "user12345", ROLE_USER).await?;
    seed_catalog(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = users::find_by_email(orm, email).await? {
        println!("User {email} already exists");
        return Ok(existing.id);
    }

    let address = addresses::create(
        orm,
        AddressInput {
            country: "Poland".into(),
            city: "Warsaw".into(),
            postcode: "00-001".into(),
            street: "Marszalkowska".into(),
            number: "1".into(),
        },
    )
    .await?;
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user = users::create(
        orm,
        NewUser {
            email: email.to_string(),
            password_hash,
            name: role.to_string(),
            surname: "Example".into(),
            role: role.to_string(),
            address_id: address.id,
        },
    )
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = [
        (
            "Apparel",
            vec![("Axum Hoodie", "Warm hoodie for Rustaceans", Decimal::new(5500, 2), 50)],
        ),
        (
            "Kitchen",
            vec![("Ferris Mug", "Coffee tastes better with Ferris", Decimal::new(1200, 2), 100)],
        ),
        (
            "Books",
            vec![
                ("E-book: Async Rust", "Learn async Rust patterns", Decimal::new(2500, 2), 75),
                ("Rust Sticker Pack", "Decorate your laptop", Decimal::new(500, 2), 200),
            ],
        ),
    ];

    for (category_name, items) in catalog {
        if categories::find_by_name(orm, category_name).await?.is_some() {
            println!("Category {category_name} already seeded");
            continue;
        }
        let category = categories::create(orm, category_name.to_string(), None).await?;
        for (name, description, price, stock) in items {
            let product = products::create(
                orm,
                CreateProductRequest {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    price,
                    currency: "USD".into(),
                    stock,
                    is_active: Some(true),
                    category_id: category.id,
                    images: Vec::new(),
                },
            )
            .await?;
            product_images::replace(orm, product.id, vec![format!("/images/{}.jpg", slug(name))])
                .await?;
        }
    }

    println!("Seeded catalog");
    Ok(())
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
