//! Integration tests for coupon validation, redemption and voiding.

mod helpers;

use http::StatusCode;
use rust_decimal_macros::dec;

use helpers::{TestApp, date, money};

#[tokio::test]
async fn test_booking_with_capped_coupon() {
    let app = TestApp::new(1).await;
    let coupon = app.seed_coupon("SUMMER10", |_| {}).await;

    // Two weekday nights: 2,000,000 before the coupon.
    let mut body = app.booking_body(date(1, 6), date(1, 8), 1);
    body["coupon_code"] = "summer10".into();
    let booking = app.book(app.customer, body).await;

    assert_eq!(money(&booking["room_price"]), dec!(2000000));
    assert_eq!(money(&booking["discount_amount"]), dec!(100000));
    assert_eq!(money(&booking["total_amount"]), dec!(1900000));
    assert_eq!(app.store.coupon(coupon.id).await.unwrap().used_count, 1);
}

#[tokio::test]
async fn test_rejected_coupon_reports_reason() {
    let app = TestApp::new(2).await;
    app.seed_coupon("ONCE", |c| c.max_uses_per_customer = Some(1))
        .await;

    let mut body = app.booking_body(date(1, 6), date(1, 8), 1);
    body["coupon_code"] = "ONCE".into();
    app.book(app.customer, body.clone()).await;

    let second = app
        .request("POST", "/api/bookings", Some(body), Some(app.customer))
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["error"]["code"], "COUPON");
    assert_eq!(second.body["error"]["details"]["reason"], "customer_limit_reached");
    assert_eq!(app.store.bookings_for_room_type(app.room_type.id).await.len(), 1);
}

#[tokio::test]
async fn test_validate_does_not_redeem() {
    let app = TestApp::new(1).await;
    let coupon = app.seed_coupon("SUMMER10", |_| {}).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let path = format!(
        "/api/bookings/{}/coupon/validate",
        booking["id"].as_str().unwrap()
    );

    let valid = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({ "code": "SUMMER10" })),
            Some(app.customer),
        )
        .await;
    assert_eq!(valid.status, StatusCode::OK, "{}", valid.body);
    assert_eq!(valid.body["data"]["is_valid"], true);
    assert_eq!(money(&valid.body["data"]["total_after_discount"]), dec!(1900000));

    let unknown = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({ "code": "NOPE" })),
            Some(app.customer),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(unknown.body["data"]["is_valid"], false);
    assert!(unknown.body["data"]["error_reason"].is_string());

    assert_eq!(app.store.coupon(coupon.id).await.unwrap().used_count, 0);
}

#[tokio::test]
async fn test_apply_and_remove_coupon() {
    let app = TestApp::new(1).await;
    let coupon = app.seed_coupon("SUMMER10", |_| {}).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let path = format!("/api/bookings/{}/coupon", booking["id"].as_str().unwrap());

    let applied = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({ "code": "SUMMER10" })),
            Some(app.customer),
        )
        .await;
    assert_eq!(applied.status, StatusCode::OK, "{}", applied.body);
    assert_eq!(money(&applied.body["data"]["total_amount"]), dec!(1900000));
    assert_eq!(app.store.coupon_usages().await.len(), 1);

    let removed = app.request("DELETE", &path, None, Some(app.customer)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(money(&removed.body["data"]["total_amount"]), dec!(2000000));
    assert!(app.store.coupon_usages().await.is_empty());
    assert_eq!(app.store.coupon(coupon.id).await.unwrap().used_count, 0);
}

#[tokio::test]
async fn test_cancellation_returns_coupon() {
    let app = TestApp::new(1).await;
    let coupon = app
        .seed_coupon("LAST", |c| c.max_total_uses = Some(1))
        .await;

    let mut body = app.booking_body(date(1, 6), date(1, 8), 1);
    body["coupon_code"] = "LAST".into();
    let booking = app.book(app.customer, body.clone()).await;

    app.request(
        "POST",
        &format!("/api/bookings/{}/cancel", booking["id"].as_str().unwrap()),
        None,
        Some(app.customer),
    )
    .await;
    assert_eq!(app.store.coupon(coupon.id).await.unwrap().used_count, 0);

    // The freed redemption is available to someone else.
    let rebooked = app.book(app.other_customer(), body).await;
    assert_eq!(money(&rebooked["discount_amount"]), dec!(100000));
}

#[tokio::test]
async fn test_coupon_outside_scope() {
    let app = TestApp::new(1).await;
    app.seed_coupon("SAIGON", |c| {
        c.applicable_to = lodging_entity::coupon::CouponScope::Location;
        c.applicable_target = Some("Ho Chi Minh City".to_string());
    })
    .await;

    let mut body = app.booking_body(date(1, 6), date(1, 8), 1);
    body["coupon_code"] = "SAIGON".into();
    let response = app
        .request("POST", "/api/bookings", Some(body), Some(app.customer))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["details"]["reason"], "not_applicable");
}
