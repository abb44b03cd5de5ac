use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, UpdateCartItemRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Cart,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath, ApiQuery},
    routes::params::CartListQuery,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_to_cart))
        .route("/items/{id}", put(update_cart_item).delete(remove_cart_item))
        .route("/search", get(search_carts))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current user's cart", body = ApiResponse<Cart>),
        (status = 404, description = "No cart yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = cart_service::get_cart(&state, user.user_id).await?;
    Ok(Json(ApiResponse::success("OK", cart, None)))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Product added; returns the cart", body = ApiResponse<Cart>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart =
        cart_service::add_product(&state, user.user_id, payload.product_id, payload.quantity)
            .await?;
    Ok(Json(ApiResponse::success("Added to cart", cart, None)))
}

#[utoipa::path(
    put,
    path = "/api/cart/items/{id}",
    params(("id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<Cart>),
        (status = 400, description = "Invalid quantity"),
        (status = 403, description = "Item belongs to another user's cart"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = cart_service::update_item(&state, &user, id, payload.quantity).await?;
    Ok(Json(ApiResponse::success("Cart updated", cart, None)))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{id}",
    params(("id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<Cart>),
        (status = 403, description = "Item belongs to another user's cart"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = cart_service::remove_item(&state, &user, id).await?;
    Ok(Json(ApiResponse::success("Removed from cart", cart, None)))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<Cart>),
        (status = 404, description = "No cart yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = cart_service::clear_cart(&state, user.user_id).await?;
    Ok(Json(ApiResponse::success("Cart cleared", cart, None)))
}

#[utoipa::path(
    get,
    path = "/api/cart/search",
    params(CartListQuery),
    responses(
        (status = 200, description = "Search carts (admin)", body = ApiResponse<CartList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn search_carts(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<CartListQuery>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let page = cart_service::search_carts(&state, &user, &query).await?;
    let data = CartList { items: page.items };
    Ok(Json(ApiResponse::success("Carts", data, Some(page.meta))))
}
