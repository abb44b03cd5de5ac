mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storefront_api::{
    error::AppError,
    models::Cart,
    repository::products as product_repo,
    routes::params::CartListQuery,
    services::cart_service,
};
use uuid::Uuid;

fn items_sum(cart: &Cart) -> Decimal {
    cart.items.iter().map(|item| item.subtotal).sum()
}

#[tokio::test]
async fn add_product_creates_cart_and_tracks_total() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "buyer@example.com", "user").await?;
    let category = common::create_category(&state, "Kitchen").await?;
    let mug = common::create_product(&state, category, "Mug", dec!(12.50), 10).await?;
    let pan = common::create_product(&state, category, "Pan", dec!(30.00), 10).await?;

    assert!(matches!(
        cart_service::get_cart(&state, user.user_id).await,
        Err(AppError::NotFound("cart"))
    ));

    let cart = cart_service::add_product(&state, user.user_id, mug.id, 2).await?;
    assert_eq!(cart.user_id, user.user_id);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].unit_price, dec!(12.50));
    assert_eq!(cart.items[0].subtotal, dec!(25.00));
    assert_eq!(cart.total, dec!(25.00));

    let cart = cart_service::add_product(&state, user.user_id, pan.id, 1).await?;
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total, dec!(55.00));
    assert_eq!(cart.total, items_sum(&cart));

    let fetched = cart_service::get_cart(&state, user.user_id).await?;
    assert_eq!(fetched.id, cart.id);
    assert_eq!(fetched.items[0].product_id, mug.id);
    assert_eq!(fetched.items[1].product_id, pan.id);
    Ok(())
}

#[tokio::test]
async fn repeated_adds_keep_separate_lines() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "dup@example.com", "user").await?;
    let category = common::create_category(&state, "Books").await?;
    let book = common::create_product(&state, category, "Book", dec!(9.99), 1).await?;

    cart_service::add_product(&state, user.user_id, book.id, 1).await?;
    let cart = cart_service::add_product(&state, user.user_id, book.id, 3).await?;

    assert_eq!(cart.items.len(), 2);
    assert!(cart.items.iter().all(|item| item.product_id == book.id));
    assert_eq!(cart.total, dec!(39.96));
    // Stock is only checked at checkout.
    assert_eq!(common::stock_of(&state, book.id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn add_product_rejects_bad_input() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "bad@example.com", "user").await?;
    let category = common::create_category(&state, "Toys").await?;
    let toy = common::create_product(&state, category, "Toy", dec!(5.00), 3).await?;

    for quantity in [0, -2] {
        assert!(matches!(
            cart_service::add_product(&state, user.user_id, toy.id, quantity).await,
            Err(AppError::InvalidQuantity)
        ));
    }
    assert!(matches!(
        cart_service::add_product(&state, user.user_id, Uuid::new_v4(), 1).await,
        Err(AppError::NotFound("product"))
    ));
    Ok(())
}

#[tokio::test]
async fn unit_price_is_captured_when_added() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "snap@example.com", "user").await?;
    let category = common::create_category(&state, "Garden").await?;
    let hose = common::create_product(&state, category, "Hose", dec!(20.00), 5).await?;

    cart_service::add_product(&state, user.user_id, hose.id, 2).await?;

    let mut repriced = hose.clone();
    repriced.price = dec!(25.00);
    product_repo::update(&state.orm, repriced).await?;

    let cart = cart_service::get_cart(&state, user.user_id).await?;
    assert_eq!(cart.items[0].unit_price, dec!(20.00));
    assert_eq!(cart.total, dec!(40.00));
    let product = cart.items[0].product.as_ref().expect("product loaded");
    assert_eq!(product.price, dec!(25.00));
    Ok(())
}

#[tokio::test]
async fn oversized_amounts_leave_the_cart_untouched() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "whale@example.com", "user").await?;
    let category = common::create_category(&state, "Art").await?;
    let print = common::create_product(&state, category, "Print", dec!(15.00), 5).await?;
    let painting =
        common::create_product(&state, category, "Painting", dec!(100000000000000000000), 1)
            .await?;
    let statue =
        common::create_product(&state, category, "Statue", dec!(6000000000.00), 1).await?;

    cart_service::add_product(&state, user.user_id, print.id, 1).await?;

    assert!(matches!(
        cart_service::add_product(&state, user.user_id, painting.id, i32::MAX).await,
        Err(AppError::AmountOutOfRange)
    ));
    assert!(matches!(
        cart_service::add_product(&state, user.user_id, statue.id, 2).await,
        Err(AppError::AmountOutOfRange)
    ));

    let cart = cart_service::get_cart(&state, user.user_id).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, dec!(15.00));

    let item_id = cart.items[0].id;
    assert!(matches!(
        cart_service::update_item(&state, &user, item_id, i32::MAX).await,
        Err(AppError::AmountOutOfRange)
    ));
    let cart = cart_service::get_cart(&state, user.user_id).await?;
    assert_eq!(cart.items[0].quantity, 1);
    assert_eq!(cart.total, dec!(15.00));
    Ok(())
}

#[tokio::test]
async fn cart_lines_keep_the_order_they_were_added_in() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "order@example.com", "user").await?;
    let category = common::create_category(&state, "Toys").await?;
    let kite = common::create_product(&state, category, "Kite", dec!(8.00), 5).await?;
    let yoyo = common::create_product(&state, category, "Yoyo", dec!(2.00), 5).await?;
    let ball = common::create_product(&state, category, "Ball", dec!(4.00), 5).await?;

    for product in [&kite, &yoyo, &ball] {
        cart_service::add_product(&state, user.user_id, product.id, 1).await?;
    }
    let cart = cart_service::get_cart(&state, user.user_id).await?;
    let ids: Vec<_> = cart.items.iter().map(|item| item.product_id).collect();
    assert_eq!(ids, [kite.id, yoyo.id, ball.id]);

    cart_service::remove_item(&state, &user, cart.items[1].id).await?;
    let cart = cart_service::add_product(&state, user.user_id, yoyo.id, 2).await?;
    let ids: Vec<_> = cart.items.iter().map(|item| item.product_id).collect();
    assert_eq!(ids, [kite.id, ball.id, yoyo.id]);
    Ok(())
}

#[tokio::test]
async fn update_item_adjusts_total_and_zero_removes() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "update@example.com", "user").await?;
    let category = common::create_category(&state, "Office").await?;
    let pen = common::create_product(&state, category, "Pen", dec!(1.50), 100).await?;
    let pad = common::create_product(&state, category, "Pad", dec!(4.00), 100).await?;

    cart_service::add_product(&state, user.user_id, pen.id, 2).await?;
    let cart = cart_service::add_product(&state, user.user_id, pad.id, 1).await?;
    let pen_line = cart.items[0].id;
    let pad_line = cart.items[1].id;

    let cart = cart_service::update_item(&state, &user, pen_line, 5).await?;
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].subtotal, dec!(7.50));
    assert_eq!(cart.total, dec!(11.50));
    assert_eq!(cart.total, items_sum(&cart));

    let cart = cart_service::update_item(&state, &user, pad_line, 0).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, dec!(7.50));

    assert!(matches!(
        cart_service::update_item(&state, &user, pen_line, -1).await,
        Err(AppError::InvalidQuantity)
    ));
    assert!(matches!(
        cart_service::update_item(&state, &user, pad_line, 3).await,
        Err(AppError::NotFound("cart item"))
    ));

    let unchanged = cart_service::get_cart(&state, user.user_id).await?;
    assert_eq!(unchanged.total, dec!(7.50));
    Ok(())
}

#[tokio::test]
async fn remove_item_and_clear_cart() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "remove@example.com", "user").await?;
    let category = common::create_category(&state, "Audio").await?;
    let cable = common::create_product(&state, category, "Cable", dec!(3.33), 50).await?;
    let plug = common::create_product(&state, category, "Plug", dec!(2.00), 50).await?;

    cart_service::add_product(&state, user.user_id, cable.id, 3).await?;
    let cart = cart_service::add_product(&state, user.user_id, plug.id, 2).await?;
    assert_eq!(cart.total, dec!(13.99));

    let cart = cart_service::remove_item(&state, &user, cart.items[0].id).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, dec!(4.00));

    assert!(matches!(
        cart_service::remove_item(&state, &user, Uuid::new_v4()).await,
        Err(AppError::NotFound("cart item"))
    ));

    let cleared = cart_service::clear_cart(&state, user.user_id).await?;
    assert_eq!(cleared.id, cart.id);
    assert!(cleared.items.is_empty());
    assert_eq!(cleared.total, Decimal::ZERO);

    let stranger = common::create_user(&state, "nocart@example.com", "user").await?;
    assert!(matches!(
        cart_service::clear_cart(&state, stranger.user_id).await,
        Err(AppError::NotFound("cart"))
    ));
    Ok(())
}

#[tokio::test]
async fn only_owner_or_admin_may_touch_items() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let owner = common::create_user(&state, "owner@example.com", "user").await?;
    let other = common::create_user(&state, "other@example.com", "user").await?;
    let admin = common::create_user(&state, "admin@example.com", "admin").await?;
    let category = common::create_category(&state, "Games").await?;
    let dice = common::create_product(&state, category, "Dice", dec!(2.50), 10).await?;

    let cart = cart_service::add_product(&state, owner.user_id, dice.id, 2).await?;
    let line = cart.items[0].id;

    assert!(matches!(
        cart_service::update_item(&state, &other, line, 9).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        cart_service::remove_item(&state, &other, line).await,
        Err(AppError::Forbidden)
    ));

    let cart = cart_service::update_item(&state, &admin, line, 4).await?;
    assert_eq!(cart.total, dec!(10.00));
    Ok(())
}

#[tokio::test]
async fn search_carts_is_admin_only_and_filters() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let alice = common::create_user(&state, "alice@example.com", "user").await?;
    let bob = common::create_user(&state, "bob@example.com", "user").await?;
    let admin = common::create_user(&state, "root@example.com", "admin").await?;
    let category = common::create_category(&state, "Sports").await?;
    let ball = common::create_product(&state, category, "Ball", dec!(15.00), 10).await?;

    cart_service::add_product(&state, alice.user_id, ball.id, 1).await?;
    cart_service::add_product(&state, bob.user_id, ball.id, 4).await?;

    assert!(matches!(
        cart_service::search_carts(&state, &alice, &CartListQuery::default()).await,
        Err(AppError::Forbidden)
    ));

    let all = cart_service::search_carts(&state, &admin, &CartListQuery::default()).await?;
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.meta.total, Some(2));

    let big = cart_service::search_carts(
        &state,
        &admin,
        &CartListQuery {
            total_min: Some(dec!(50)),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(big.items.len(), 1);
    assert_eq!(big.items[0].user_id, bob.user_id);
    assert_eq!(big.items[0].items.len(), 1);

    let only_alice = cart_service::search_carts(
        &state,
        &admin,
        &CartListQuery {
            user_id: Some(alice.user_id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(only_alice.items.len(), 1);
    assert_eq!(only_alice.items[0].total, dec!(15.00));
    Ok(())
}
