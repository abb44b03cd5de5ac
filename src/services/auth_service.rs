use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult, StepContext},
    middleware::auth::ROLE_USER,
    models::User,
    repository::{
        addresses,
        users::{self, NewUser},
    },
    state::{AppState, JwtSettings},
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn issue_token(jwt: &JwtSettings, user_id: Uuid, role: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(jwt.ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Creates the user's address and account with the `user` role.
pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<User> {
    let RegisterRequest {
        email,
        password,
        name,
        surname,
        address,
    } = payload;

    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    if password.len() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }
    if name.trim().is_empty() || surname.trim().is_empty() {
        return Err(AppError::BadRequest("name and surname are required".into()));
    }
    if !address.is_complete() {
        return Err(AppError::BadRequest("every address field is required".into()));
    }

    let password_hash = hash_password(&password)?;

    let txn = state.orm.begin().await?;
    if users::find_by_email(&txn, &email)
        .await
        .step("get user")?
        .is_some()
    {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }
    let address = addresses::create(&txn, address)
        .await
        .step("create address")?;
    let user = users::create(
        &txn,
        NewUser {
            email,
            password_hash,
            name,
            surname,
            role: ROLE_USER.to_string(),
            address_id: address.id,
        },
    )
    .await
    .step("create user")?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    Ok(user.into())
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { email, password } = payload;
    let user = users::find_by_email(&state.orm, &email)
        .await
        .step("get user")?
        .ok_or_else(|| AppError::Unauthorized("invalid email or password".into()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("invalid email or password".into()));
    }

    let token = issue_token(&state.jwt, user.id, &user.role)?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    Ok(LoginResponse {
        token: format!("Bearer {}", token),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_token;

    #[test]
    fn issued_token_decodes_to_same_user() {
        let jwt = JwtSettings {
            secret: "test-secret".into(),
            ttl_hours: 1,
        };
        let user_id = Uuid::new_v4();
        let token = issue_token(&jwt, user_id, "admin").unwrap();

        let user = decode_token(&token, &jwt.secret).unwrap();
        assert_eq!(user.user_id, user_id);
        assert!(user.is_admin());
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }
}
