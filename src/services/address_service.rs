use uuid::Uuid;

use crate::{
    dto::addresses::AddressInput,
    error::{AppError, AppResult, StepContext},
    middleware::auth::AuthUser,
    models::Address,
    repository::addresses,
    state::AppState,
};

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: AddressInput,
) -> AppResult<Address> {
    if !payload.is_complete() {
        return Err(AppError::BadRequest("every address field is required".into()));
    }
    let address = addresses::create(&state.orm, payload)
        .await
        .step("create address")?;
    tracing::debug!(address_id = %address.id, user_id = %user.user_id, "address created");
    Ok(address.into())
}

pub async fn get_address(state: &AppState, id: Uuid) -> AppResult<Address> {
    let address = addresses::find_by_id(&state.orm, id)
        .await
        .step("get address")?
        .ok_or(AppError::NotFound("address"))?;
    Ok(address.into())
}
