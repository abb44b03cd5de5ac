use uuid::Uuid;

use crate::{
    audit,
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult, StepContext},
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    repository::{categories, products},
    response::Paginated,
    routes::params::CategoryQuery,
    state::AppState,
};

async fn find(state: &AppState, id: Uuid, what: &'static str) -> AppResult<Category> {
    let category = categories::find_by_id(&state.orm, id)
        .await
        .step("get category")?
        .ok_or(AppError::NotFound(what))?;
    Ok(category.into())
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<Category> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("category name is required".into()));
    }
    if let Some(parent_id) = payload.parent_id {
        find(state, parent_id, "parent category").await?;
    }

    let category = categories::create(&state.orm, name, payload.parent_id)
        .await
        .step("create category")?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;
    Ok(category.into())
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<Category> {
    find(state, id, "category").await
}

pub async fn list_categories(
    state: &AppState,
    query: &CategoryQuery,
) -> AppResult<Paginated<Category>> {
    let page = categories::search(&state.orm, query)
        .await
        .step("search categories")?;
    Ok(Paginated {
        items: page.items.into_iter().map(Category::from).collect(),
        meta: page.meta,
    })
}

pub async fn list_subcategories(state: &AppState, id: Uuid) -> AppResult<Vec<Category>> {
    find(state, id, "category").await?;
    let children = categories::find_children(&state.orm, id)
        .await
        .step("get subcategories")?;
    Ok(children.into_iter().map(Category::from).collect())
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<Category> {
    ensure_admin(user)?;
    let mut category = categories::find_by_id(&state.orm, id)
        .await
        .step("get category")?
        .ok_or(AppError::NotFound("category"))?;

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("category name is required".into()));
        }
        category.name = name;
    }
    if let Some(parent_id) = payload.parent_id {
        if let Some(parent_id) = parent_id {
            if parent_id == id {
                return Err(AppError::BadRequest(
                    "a category cannot be its own parent".into(),
                ));
            }
            find(state, parent_id, "parent category").await?;
        }
        category.parent_id = parent_id;
    }

    let category = categories::update(&state.orm, category)
        .await
        .step("update category")?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "category_update",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;
    Ok(category.into())
}

pub async fn delete_category(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;

    let in_use = products::count_by_category(&state.orm, id)
        .await
        .step("get products")?;
    if in_use > 0 {
        return Err(AppError::BadRequest("category still has products".into()));
    }

    let deleted = categories::delete(&state.orm, id)
        .await
        .step("delete category")?;
    if deleted == 0 {
        return Err(AppError::NotFound("category"));
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;
    Ok(())
}
