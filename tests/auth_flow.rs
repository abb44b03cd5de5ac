mod common;

use storefront_api::{
    dto::{
        auth::{LoginRequest, RegisterRequest},
        users::UpdateUserRequest,
    },
    error::AppError,
    middleware::auth::decode_token,
    routes::params::UserQuery,
    services::{address_service, auth_service, user_service},
};

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: password.into(),
        name: "Ada".into(),
        surname: "Lovelace".into(),
        address: common::address_input("Krakow"),
    }
}

#[tokio::test]
async fn register_then_login_issues_a_valid_token() -> anyhow::Result<()> {
    let state = common::setup_state().await?;

    let user =
        auth_service::register_user(&state, register_request("Ada@Example.com", "analytical"))
            .await?;
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, "user");

    let address = address_service::get_address(&state, user.address_id).await?;
    assert_eq!(address.city, "Krakow");

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ADA@example.com".into(),
            password: "analytical".into(),
        },
    )
    .await?;
    let token = login
        .token
        .strip_prefix("Bearer ")
        .expect("bearer prefix");
    let auth = decode_token(token, common::JWT_SECRET)?;
    assert_eq!(auth.user_id, user.id);
    assert_eq!(auth.role, "user");
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    auth_service::register_user(&state, register_request("taken@example.com", "password1")).await?;

    assert!(matches!(
        auth_service::register_user(&state, register_request("TAKEN@example.com", "password2"))
            .await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        auth_service::register_user(&state, register_request("short@example.com", "abc")).await,
        Err(AppError::BadRequest(_))
    ));
    let mut missing_city = register_request("city@example.com", "password3");
    missing_city.address.city = " ".into();
    assert!(matches!(
        auth_service::register_user(&state, missing_city).await,
        Err(AppError::BadRequest(_))
    ));
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_credentials_is_unauthorized() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    auth_service::register_user(&state, register_request("login@example.com", "rightpass")).await?;

    for (email, password) in [
        ("login@example.com", "wrongpass"),
        ("nobody@example.com", "rightpass"),
    ] {
        let result = auth_service::login_user(
            &state,
            LoginRequest {
                email: email.into(),
                password: password.into(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
    Ok(())
}

#[tokio::test]
async fn user_management_respects_roles() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "admin@example.com", "admin").await?;
    let me = common::create_user(&state, "me@example.com", "user").await?;
    let other = common::create_user(&state, "other@example.com", "user").await?;

    assert!(matches!(
        user_service::get_user(&state, &me, other.user_id).await,
        Err(AppError::Forbidden)
    ));
    let renamed = user_service::update_user(
        &state,
        &me,
        me.user_id,
        UpdateUserRequest {
            name: Some("Grace".into()),
            surname: None,
        },
    )
    .await?;
    assert_eq!(renamed.name, "Grace");
    assert_eq!(renamed.surname, "User");

    assert!(matches!(
        user_service::search_users(&state, &me, &UserQuery::default()).await,
        Err(AppError::Forbidden)
    ));
    let by_city = user_service::search_users(
        &state,
        &admin,
        &UserQuery {
            city: Some("warsaw".into()),
            email: Some("ME@".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_city.items.len(), 1);
    assert_eq!(by_city.items[0].id, me.user_id);

    assert!(matches!(
        user_service::delete_user(&state, &me, other.user_id).await,
        Err(AppError::Forbidden)
    ));
    user_service::delete_user(&state, &admin, other.user_id).await?;
    assert!(matches!(
        user_service::get_user(&state, &admin, other.user_id).await,
        Err(AppError::NotFound("user"))
    ));
    Ok(())
}
