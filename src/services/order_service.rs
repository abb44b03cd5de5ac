use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbErr, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::CreateOrderRequest,
    entity::orders::{self, OrderStatus},
    error::{AppError, AppResult, StepContext},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::Order,
    money,
    repository::{
        addresses, cart_items, carts, now,
        order_items::{self, NewOrderItem},
        orders as order_repo, products,
    },
    response::Paginated,
    routes::params::OrderListQuery,
    state::AppState,
};

async fn with_items<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<orders::Model>,
) -> AppResult<Vec<Order>> {
    let ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
    let mut items = order_items::find_by_orders(conn, &ids)
        .await
        .step("get order items")?;
    Ok(orders
        .into_iter()
        .map(|order| {
            let lines = items.remove(&order.id).unwrap_or_default();
            Order::from_entity(order, lines)
        })
        .collect())
}

/// Turns the user's cart into a PENDING order.
///
/// Runs as one transaction: product rows are locked while their stock is
/// checked and decremented, so a failure on any line (including
/// `InsufficientStock` on a later one) leaves every product untouched. Lines
/// keep the unit price captured when they were added to the cart, so the
/// order total always equals the cart total it replaces.
pub async fn create_from_cart(
    state: &AppState,
    user_id: Uuid,
    payload: CreateOrderRequest,
) -> AppResult<Order> {
    let CreateOrderRequest {
        payment_method,
        shipping_address_id,
    } = payload;

    let txn = state.orm.begin().await?;

    let mut cart = carts::find_by_user(&txn, user_id)
        .await
        .step("get cart")?
        .ok_or(AppError::CartEmpty)?;
    let cart_lines = cart_items::find_by_cart(&txn, cart.id)
        .await
        .step("get cart")?;
    if cart_lines.is_empty() {
        return Err(AppError::CartEmpty);
    }

    addresses::find_by_id(&txn, shipping_address_id)
        .await
        .step("get shipping address")?
        .ok_or(AppError::AddressNotFound)?;

    let mut total = Decimal::ZERO;
    let mut snapshots = Vec::with_capacity(cart_lines.len());
    for line in &cart_lines {
        let mut product = products::find_by_id_for_update(&txn, line.product_id)
            .await
            .step("get product")?
            .ok_or_else(|| AppError::Persistence {
                step: "get product",
                source: DbErr::RecordNotFound(format!("product {}", line.product_id)),
            })?;

        if product.stock < line.quantity {
            tracing::info!(
                product_id = %product.id,
                stock = product.stock,
                requested = line.quantity,
                "checkout rejected: insufficient stock"
            );
            return Err(AppError::InsufficientStock(product.name));
        }

        product.stock -= line.quantity;
        let product = products::update(&txn, product)
            .await
            .step("update product stock")?;

        let subtotal =
            money::line_total(line.unit_price, line.quantity).ok_or(AppError::AmountOutOfRange)?;
        total = money::add(total, subtotal).ok_or(AppError::AmountOutOfRange)?;
        snapshots.push((product.id, product.name, line.unit_price, line.quantity, subtotal));
    }

    let order = order_repo::create(&txn, user_id, payment_method, shipping_address_id, total)
        .await
        .step("create order")?;

    let mut items = Vec::with_capacity(snapshots.len());
    for (position, (product_id, name, unit_price, quantity, subtotal)) in
        snapshots.into_iter().enumerate()
    {
        let item = order_items::create(
            &txn,
            NewOrderItem {
                order_id: order.id,
                position: position as i32,
                product_id,
                name,
                unit_price,
                quantity,
                subtotal,
            },
        )
        .await
        .step("create order")?;
        items.push(item);
    }

    cart_items::delete_by_cart(&txn, cart.id)
        .await
        .step("clear cart")?;
    cart.total = Decimal::ZERO;
    carts::update(&txn, cart).await.step("update cart")?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user_id,
        total = %order.total,
        lines = items.len(),
        "checkout completed"
    );
    audit::record(
        &state.orm,
        Some(user_id),
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": order.total }),
    )
    .await;

    Ok(Order::from_entity(order, items))
}

/// Sets any status, without checking the transition. PAID and SHIPPED stamp
/// their timestamps.
pub async fn update_status(
    state: &AppState,
    actor: &AuthUser,
    order_id: Uuid,
    status: OrderStatus,
) -> AppResult<Order> {
    ensure_admin(actor)?;

    let txn = state.orm.begin().await?;
    let mut order = order_repo::find_by_id(&txn, order_id)
        .await
        .step("get order")?
        .ok_or(AppError::NotFound("order"))?;

    let previous = order.status;
    order.status = status;
    match status {
        OrderStatus::Paid => order.paid_at = Some(now()),
        OrderStatus::Shipped => order.shipped_at = Some(now()),
        OrderStatus::Pending | OrderStatus::Cancelled => {}
    }
    let order = order_repo::update(&txn, order).await.step("update order")?;
    let items = order_items::find_by_order(&txn, order.id)
        .await
        .step("get order items")?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, from = ?previous, to = ?status, "order status updated");
    audit::record(
        &state.orm,
        Some(actor.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": status }),
    )
    .await;

    Ok(Order::from_entity(order, items))
}

/// Cancels the order and puts its quantities back in stock. Lines whose
/// product has been deleted are skipped. Cancelling twice is a no-op.
pub async fn cancel_order(state: &AppState, actor: &AuthUser, order_id: Uuid) -> AppResult<Order> {
    let txn = state.orm.begin().await?;
    let mut order = order_repo::find_by_id(&txn, order_id)
        .await
        .step("get order")?
        .ok_or(AppError::NotFound("order"))?;
    ensure_owner_or_admin(actor, order.user_id)?;

    let items = order_items::find_by_order(&txn, order.id)
        .await
        .step("get order items")?;

    if order.status == OrderStatus::Cancelled {
        txn.commit().await?;
        return Ok(Order::from_entity(order, items));
    }

    for item in &items {
        match products::find_by_id_for_update(&txn, item.product_id)
            .await
            .step("get product")?
        {
            Some(mut product) => {
                product.stock = product.stock.checked_add(item.quantity).ok_or_else(|| {
                    AppError::BadRequest(format!("stock of {} would overflow", product.name))
                })?;
                products::update(&txn, product)
                    .await
                    .step("restore product stock")?;
                tracing::debug!(
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "stock restored"
                );
            }
            None => {
                tracing::debug!(
                    product_id = %item.product_id,
                    "product deleted, stock restore skipped"
                );
            }
        }
    }

    order.status = OrderStatus::Cancelled;
    order.cancelled_at = Some(now());
    let order = order_repo::update(&txn, order).await.step("update order")?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, "order cancelled");
    audit::record(
        &state.orm,
        Some(actor.user_id),
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    Ok(Order::from_entity(order, items))
}

pub async fn get_by_id(state: &AppState, actor: &AuthUser, order_id: Uuid) -> AppResult<Order> {
    let order = order_repo::find_by_id(&state.orm, order_id)
        .await
        .step("get order")?
        .ok_or(AppError::NotFound("order"))?;
    ensure_owner_or_admin(actor, order.user_id)?;

    let items = order_items::find_by_order(&state.orm, order.id)
        .await
        .step("get order items")?;
    Ok(Order::from_entity(order, items))
}

pub async fn get_by_user(state: &AppState, user_id: Uuid) -> AppResult<Vec<Order>> {
    let orders = order_repo::find_by_user(&state.orm, user_id)
        .await
        .step("get orders")?;
    with_items(&state.orm, orders).await
}

pub async fn get_all(state: &AppState, actor: &AuthUser) -> AppResult<Vec<Order>> {
    ensure_admin(actor)?;
    let orders = order_repo::find_all(&state.orm).await.step("get orders")?;
    with_items(&state.orm, orders).await
}

/// Non-admin callers are always restricted to their own orders.
pub async fn search(
    state: &AppState,
    actor: &AuthUser,
    mut query: OrderListQuery,
) -> AppResult<Paginated<Order>> {
    if !actor.is_admin() {
        query.user_id = Some(actor.user_id);
    }

    let page = order_repo::search(&state.orm, &query)
        .await
        .step("search orders")?;
    Ok(Paginated {
        items: with_items(&state.orm, page.items).await?,
        meta: page.meta,
    })
}
