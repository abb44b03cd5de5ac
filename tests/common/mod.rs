#![allow(dead_code)]

use rust_decimal::Decimal;
use storefront_api::{
    db::{create_orm_conn, run_migrations},
    dto::{addresses::AddressInput, products::CreateProductRequest},
    entity::products,
    middleware::auth::AuthUser,
    repository::{
        addresses, categories, products as product_repo,
        users::{self, NewUser},
    },
    state::AppState,
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, JWT_SECRET, 1))
}

pub fn address_input(city: &str) -> AddressInput {
    AddressInput {
        country: "Poland".into(),
        city: city.into(),
        postcode: "00-001".into(),
        street: "Main".into(),
        number: "1".into(),
    }
}

pub async fn create_address(state: &AppState) -> anyhow::Result<Uuid> {
    let address = addresses::create(&state.orm, address_input("Warsaw")).await?;
    Ok(address.id)
}

pub async fn create_user(state: &AppState, email: &str, role: &str) -> anyhow::Result<AuthUser> {
    let address_id = create_address(state).await?;
    let user = users::create(
        &state.orm,
        NewUser {
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            name: "Test".into(),
            surname: "User".into(),
            role: role.into(),
            address_id,
        },
    )
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = categories::create(&state.orm, name.into(), None).await?;
    Ok(category.id)
}

pub async fn create_product(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: Decimal,
    stock: i32,
) -> anyhow::Result<products::Model> {
    let product = product_repo::create(
        &state.orm,
        CreateProductRequest {
            name: name.into(),
            description: None,
            price,
            currency: "USD".into(),
            stock,
            is_active: Some(true),
            category_id,
            images: Vec::new(),
        },
    )
    .await?;
    Ok(product)
}

pub async fn stock_of(state: &AppState, product_id: Uuid) -> anyhow::Result<i32> {
    let product = product_repo::find_by_id(&state.orm, product_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {product_id} missing"))?;
    Ok(product.stock)
}
