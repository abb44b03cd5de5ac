mod common;

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use storefront_api::{routes::create_app, services::auth_service::issue_token};
use tower::ServiceExt;
use uuid::Uuid;

async fn call(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Bytes)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => request.body(Body::empty())?,
    };

    let (status, bytes) = call(app, request).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let app = create_app(state);

    let (status, body) = send(&app, Method::GET, "/api/cart", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"]["error"].as_str().is_some());

    let (status, _) = send(&app, Method::GET, "/api/orders/mine", Some("Token abc"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        send(&app, Method::GET, "/api/orders/mine", Some("Bearer not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_filters_are_bad_requests() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "filters@example.com", "user").await?;
    let token = format!("Bearer {}", issue_token(&state.jwt, user.user_id, &user.role)?);
    let app = create_app(state);

    let (status, body) =
        send(&app, Method::GET, "/api/orders?status=LOST", Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().is_some());

    let (status, body) =
        send(&app, Method::GET, "/api/products?price_min=cheap", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().is_some());

    let (status, body) =
        send(&app, Method::GET, "/api/orders?status=PENDING", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], json!(0));
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_and_ids_are_bad_requests() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "bodies@example.com", "admin").await?;
    let token = format!("Bearer {}", issue_token(&state.jwt, admin.user_id, &admin.role)?);
    let app = create_app(state);

    let uri = format!("/api/orders/{}/status", Uuid::new_v4());
    let (status, body) =
        send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "status": "LOST" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().is_some());

    let (status, body) =
        send(&app, Method::GET, "/api/products/not-a-uuid", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().is_some());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))?;
    let (status, bytes) = call(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["data"]["error"].as_str().is_some());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .body(Body::from("email=a"))?;
    let (status, bytes) = call(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["data"]["error"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn product_images_are_served_from_the_images_dir() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("storefront-images-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("mug.txt"), "mug picture")?;

    let state = common::setup_state().await?.with_images_dir(dir.clone());
    let app = create_app(state);

    let request = Request::builder().uri("/images/mug.txt").body(Body::empty())?;
    let (status, bytes) = call(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"mug picture");

    let request = Request::builder().uri("/images/missing.jpg").body(Body::empty())?;
    let (status, _) = call(&app, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn unknown_paths_get_a_json_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let app = create_app(state);

    let (status, body) = send(&app, Method::GET, "/api/nowhere", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/api/nowhere");
    Ok(())
}

#[tokio::test]
async fn register_login_and_checkout_over_http() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let category = common::create_category(&state, "Stationery").await?;
    let pen = common::create_product(&state, category, "Fountain Pen", dec!(24.50), 4).await?;
    let app = create_app(state.clone());

    let (status, registered) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": "writer@example.com",
            "password": "inkwell42",
            "name": "Jane",
            "surname": "Austen",
            "address": {
                "country": "UK",
                "city": "Bath",
                "postcode": "BA1 1AA",
                "street": "Gay Street",
                "number": "25"
            }
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let address_id = registered["data"]["address_id"].clone();

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "writer@example.com", "password": "inkwell42" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = login["data"]["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("token missing"))?
        .to_string();

    let (status, cart) = send(
        &app,
        Method::POST,
        "/api/cart/items",
        Some(&token),
        Some(json!({ "product_id": pen.id, "quantity": 2 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(1));

    let (status, order) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "payment_method": "BLIK", "shipping_address_id": address_id })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["data"]["status"], "PENDING");
    assert_eq!(order["data"]["items"][0]["name"], "Fountain Pen");

    let (status, cart) = send(&app, Method::GET, "/api/cart", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["data"]["items"], json!([]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "payment_method": "BLIK", "shipping_address_id": address_id })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(common::stock_of(&state, pen.id).await?, 2);
    Ok(())
}
