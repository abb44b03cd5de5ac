use rust_decimal::Decimal;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{AppError, AppResult, StepContext},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    money,
    repository::{cart_items, categories, product_images, products},
    response::Paginated,
    routes::params::ProductQuery,
    state::AppState,
};

fn validate(name: &str, price: Decimal, stock: i32) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("product name is required".into()));
    }
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if price > money::max_amount() {
        return Err(AppError::BadRequest(format!(
            "price must not exceed {}",
            money::max_amount()
        )));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(())
}

fn clean_image_urls(urls: Vec<String>) -> AppResult<Vec<String>> {
    urls.into_iter()
        .map(|url| {
            let url = url.trim().to_string();
            if url.is_empty() {
                return Err(AppError::BadRequest("image url must not be empty".into()));
            }
            if url.len() > 500 {
                return Err(AppError::BadRequest(
                    "image url must not exceed 500 characters".into(),
                ));
            }
            Ok(url)
        })
        .collect()
}

async fn ensure_category(state: &AppState, category_id: Uuid) -> AppResult<()> {
    categories::find_by_id(&state.orm, category_id)
        .await
        .step("get category")?
        .ok_or(AppError::NotFound("category"))?;
    Ok(())
}

pub async fn list_products(
    state: &AppState,
    query: &ProductQuery,
) -> AppResult<Paginated<Product>> {
    let page = products::search(&state.orm, query)
        .await
        .step("search products")?;
    let ids: Vec<Uuid> = page.items.iter().map(|product| product.id).collect();
    let mut images = product_images::find_by_products(&state.orm, &ids)
        .await
        .step("get product images")?;
    Ok(Paginated {
        items: page
            .items
            .into_iter()
            .map(|product| {
                let product_images = images.remove(&product.id).unwrap_or_default();
                Product::from_entity(product, product_images)
            })
            .collect(),
        meta: page.meta,
    })
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let product = products::find_by_id(&state.orm, id)
        .await
        .step("get product")?
        .ok_or(AppError::NotFound("product"))?;
    let images = product_images::find_by_product(&state.orm, product.id)
        .await
        .step("get product images")?;
    Ok(Product::from_entity(product, images))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    mut payload: CreateProductRequest,
) -> AppResult<Product> {
    ensure_admin(user)?;
    validate(&payload.name, payload.price, payload.stock)?;
    let urls = clean_image_urls(std::mem::take(&mut payload.images))?;
    ensure_category(state, payload.category_id).await?;

    let txn = state.orm.begin().await?;
    let product = products::create(&txn, payload)
        .await
        .step("create product")?;
    let images = product_images::replace(&txn, product.id, urls)
        .await
        .step("create product images")?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;
    Ok(Product::from_entity(product, images))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    ensure_admin(user)?;
    let mut product = products::find_by_id(&state.orm, id)
        .await
        .step("get product")?
        .ok_or(AppError::NotFound("product"))?;

    if let Some(name) = payload.name {
        product.name = name;
    }
    if let Some(description) = payload.description {
        product.description = Some(description);
    }
    if let Some(price) = payload.price {
        product.price = price;
    }
    if let Some(currency) = payload.currency {
        product.currency = currency;
    }
    if let Some(stock) = payload.stock {
        product.stock = stock;
    }
    if let Some(is_active) = payload.is_active {
        product.is_active = is_active;
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(state, category_id).await?;
        product.category_id = category_id;
    }
    validate(&product.name, product.price, product.stock)?;
    let urls = payload.images.map(clean_image_urls).transpose()?;

    let txn = state.orm.begin().await?;
    let product = products::update(&txn, product)
        .await
        .step("update product")?;
    let images = match urls {
        Some(urls) => product_images::replace(&txn, product.id, urls)
            .await
            .step("update product images")?,
        None => product_images::find_by_product(&txn, product.id)
            .await
            .step("get product images")?,
    };
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;
    Ok(Product::from_entity(product, images))
}

/// Products still sitting in a cart cannot be deleted. Orders keep their own
/// copy of the product data and are unaffected.
pub async fn delete_product(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;

    let in_carts = cart_items::count_by_product(&state.orm, id)
        .await
        .step("get cart items")?;
    if in_carts > 0 {
        return Err(AppError::BadRequest(
            "product is referenced by a cart".into(),
        ));
    }

    let deleted = products::delete(&state.orm, id)
        .await
        .step("delete product")?;
    if deleted == 0 {
        return Err(AppError::NotFound("product"));
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;
    Ok(())
}
