use uuid::Uuid;

use crate::{
    audit,
    dto::users::UpdateUserRequest,
    error::{AppError, AppResult, StepContext},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::User,
    repository::{orders, users},
    response::Paginated,
    routes::params::UserQuery,
    state::AppState,
};

pub async fn get_user(state: &AppState, actor: &AuthUser, id: Uuid) -> AppResult<User> {
    ensure_owner_or_admin(actor, id)?;
    let user = users::find_by_id(&state.orm, id)
        .await
        .step("get user")?
        .ok_or(AppError::NotFound("user"))?;
    Ok(user.into())
}

pub async fn search_users(
    state: &AppState,
    actor: &AuthUser,
    query: &UserQuery,
) -> AppResult<Paginated<User>> {
    ensure_admin(actor)?;
    let page = users::search(&state.orm, query)
        .await
        .step("search users")?;
    Ok(Paginated {
        items: page.items.into_iter().map(User::from).collect(),
        meta: page.meta,
    })
}

pub async fn update_user(
    state: &AppState,
    actor: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<User> {
    ensure_owner_or_admin(actor, id)?;
    let mut user = users::find_by_id(&state.orm, id)
        .await
        .step("get user")?
        .ok_or(AppError::NotFound("user"))?;

    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        user.name = name;
    }
    if let Some(surname) = payload.surname.filter(|s| !s.trim().is_empty()) {
        user.surname = surname;
    }
    let user = users::update(&state.orm, user).await.step("update user")?;

    audit::record(
        &state.orm,
        Some(actor.user_id),
        "user_update",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    Ok(user.into())
}

/// Users with order history are kept.
pub async fn delete_user(state: &AppState, actor: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(actor)?;

    let placed = orders::count_by_user(&state.orm, id)
        .await
        .step("get orders")?;
    if placed > 0 {
        return Err(AppError::BadRequest("user has orders".into()));
    }

    let deleted = users::delete(&state.orm, id).await.step("delete user")?;
    if deleted == 0 {
        return Err(AppError::NotFound("user"));
    }

    audit::record(
        &state.orm,
        Some(actor.user_id),
        "user_delete",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;
    Ok(())
}
