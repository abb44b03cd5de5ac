use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::addresses::AddressInput,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Address,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::address_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_address))
        .route("/{id}", get(get_address))
}

#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = AddressInput,
    responses(
        (status = 201, description = "Create address", body = ApiResponse<Address>),
        (status = 400, description = "Missing fields")
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<AddressInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Address>>)> {
    let address = address_service::create_address(&state, &user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Address created", address, None)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Get address", body = ApiResponse<Address>),
        (status = 404, description = "Address not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn get_address(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let address = address_service::get_address(&state, id).await?;
    Ok(Json(ApiResponse::success("Address", address, None)))
}
