use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit,
    entity::carts,
    error::{AppError, AppResult, StepContext},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::{Cart, CartItem, Product},
    money,
    repository::{
        cart_items::{self, NewCartItem},
        carts as cart_repo, product_images, products,
    },
    response::Paginated,
    routes::params::CartListQuery,
    state::AppState,
};

/// Loads the items of `cart` (in insertion order) with their current
/// catalog entries and assembles the view.
async fn load_cart<C: ConnectionTrait>(conn: &C, cart: carts::Model) -> AppResult<Cart> {
    let rows = cart_items::find_by_cart_with_products(conn, cart.id)
        .await
        .step("get cart items")?;
    let product_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, product)| product.as_ref().map(|p| p.id))
        .collect();
    let images = product_images::find_by_products(conn, &product_ids)
        .await
        .step("get product images")?;

    let items = rows
        .into_iter()
        .map(|(item, product)| {
            let product = product.map(|p| {
                let product_images = images.get(&p.id).cloned().unwrap_or_default();
                Product::from_entity(p, product_images)
            });
            CartItem::from_entity(item, product)
        })
        .collect();
    Ok(Cart::from_entity(cart, items))
}

pub async fn get_cart(state: &AppState, user_id: Uuid) -> AppResult<Cart> {
    let cart = cart_repo::find_by_user(&state.orm, user_id)
        .await
        .step("get cart")?
        .ok_or(AppError::NotFound("cart"))?;
    load_cart(&state.orm, cart).await
}

/// Appends a new line for `product_id`. Stock is not checked until checkout,
/// and adding the same product twice yields two lines.
pub async fn add_product(
    state: &AppState,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<Cart> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity);
    }

    let txn = state.orm.begin().await?;
    let mut cart = match cart_repo::find_by_user(&txn, user_id)
        .await
        .step("get cart")?
    {
        Some(cart) => cart,
        None => cart_repo::create(&txn, user_id).await.step("create cart")?,
    };
    let product = products::find_by_id(&txn, product_id)
        .await
        .step("get product")?
        .ok_or(AppError::NotFound("product"))?;

    let subtotal = money::line_total(product.price, quantity).ok_or(AppError::AmountOutOfRange)?;
    cart.total = money::add(cart.total, subtotal).ok_or(AppError::AmountOutOfRange)?;

    cart_items::create(
        &txn,
        NewCartItem {
            cart_id: cart.id,
            product_id: product.id,
            quantity,
            unit_price: product.price,
            subtotal,
        },
    )
    .await
    .step("create cart item")?;
    let cart = cart_repo::update(&txn, cart).await.step("update cart")?;
    let view = load_cart(&txn, cart).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user_id),
        "cart_add",
        "cart_items",
        serde_json::json!({ "product_id": product_id, "quantity": quantity }),
    )
    .await;
    Ok(view)
}

/// Sets the quantity of one line. Zero removes the line.
pub async fn update_item(
    state: &AppState,
    actor: &AuthUser,
    item_id: Uuid,
    quantity: i32,
) -> AppResult<Cart> {
    let txn = state.orm.begin().await?;
    let mut item = cart_items::find_by_id(&txn, item_id)
        .await
        .step("get cart item")?
        .ok_or(AppError::NotFound("cart item"))?;
    let mut cart = cart_repo::find_by_id(&txn, item.cart_id)
        .await
        .step("get cart")?
        .ok_or(AppError::NotFound("cart"))?;
    ensure_owner_or_admin(actor, cart.user_id)?;

    if quantity < 0 {
        return Err(AppError::InvalidQuantity);
    }

    let cart = if quantity == 0 {
        cart.total = money::add(cart.total, -item.subtotal).ok_or(AppError::AmountOutOfRange)?;
        let cart = cart_repo::update(&txn, cart).await.step("update cart")?;
        cart_items::delete(&txn, item.id)
            .await
            .step("delete cart item")?;
        cart
    } else {
        let subtotal =
            money::line_total(item.unit_price, quantity).ok_or(AppError::AmountOutOfRange)?;
        cart.total = money::add(cart.total, subtotal - item.subtotal)
            .ok_or(AppError::AmountOutOfRange)?;
        item.quantity = quantity;
        item.subtotal = subtotal;
        cart_items::update(&txn, item)
            .await
            .step("update cart item")?;
        cart_repo::update(&txn, cart).await.step("update cart")?
    };

    let view = load_cart(&txn, cart).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(actor.user_id),
        "cart_update",
        "cart_items",
        serde_json::json!({ "item_id": item_id, "quantity": quantity }),
    )
    .await;
    Ok(view)
}

pub async fn remove_item(state: &AppState, actor: &AuthUser, item_id: Uuid) -> AppResult<Cart> {
    let txn = state.orm.begin().await?;
    let item = cart_items::find_by_id(&txn, item_id)
        .await
        .step("get cart item")?
        .ok_or(AppError::NotFound("cart item"))?;
    let mut cart = cart_repo::find_by_id(&txn, item.cart_id)
        .await
        .step("get cart")?
        .ok_or(AppError::NotFound("cart"))?;
    ensure_owner_or_admin(actor, cart.user_id)?;

    cart.total = money::add(cart.total, -item.subtotal).ok_or(AppError::AmountOutOfRange)?;
    let cart = cart_repo::update(&txn, cart).await.step("update cart")?;
    cart_items::delete(&txn, item.id)
        .await
        .step("delete cart item")?;

    let view = load_cart(&txn, cart).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(actor.user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "item_id": item_id }),
    )
    .await;
    Ok(view)
}

/// Empties the cart but keeps the row.
pub async fn clear_cart(state: &AppState, user_id: Uuid) -> AppResult<Cart> {
    let txn = state.orm.begin().await?;
    let mut cart = cart_repo::find_by_user(&txn, user_id)
        .await
        .step("get cart")?
        .ok_or(AppError::NotFound("cart"))?;

    cart_items::delete_by_cart(&txn, cart.id)
        .await
        .step("clear cart")?;
    cart.total = Decimal::ZERO;
    let cart = cart_repo::update(&txn, cart).await.step("update cart")?;
    let view = load_cart(&txn, cart).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user_id),
        "cart_clear",
        "carts",
        serde_json::json!({ "cart_id": view.id }),
    )
    .await;
    Ok(view)
}

pub async fn search_carts(
    state: &AppState,
    actor: &AuthUser,
    query: &CartListQuery,
) -> AppResult<Paginated<Cart>> {
    ensure_admin(actor)?;

    let page = cart_repo::search(&state.orm, query)
        .await
        .step("search carts")?;
    let mut items = Vec::with_capacity(page.items.len());
    for cart in page.items {
        items.push(load_cart(&state.orm, cart).await?);
    }
    Ok(Paginated {
        items,
        meta: page.meta,
    })
}
