//! Integration tests for availability, quotes and the booking lifecycle.

mod helpers;

use http::StatusCode;
use rust_decimal_macros::dec;

use helpers::{TestApp, date, money};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(1).await;
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_quote_friday_to_monday() {
    let app = TestApp::new(1).await;
    let path = format!(
        "{}/quote?check_in=2026-01-02&check_out=2026-01-05&rooms=1",
        app.room_type_path()
    );
    let response = app.request("GET", &path, None, None).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let quote = &response.body["data"];
    let nights = quote["nightly_breakdown"].as_array().unwrap();
    let prices: Vec<_> = nights.iter().map(|n| money(&n["price"])).collect();
    assert_eq!(prices, vec![dec!(1000000), dec!(1200000), dec!(1200000)]);
    assert_eq!(money(&quote["total"]), dec!(3400000));
    assert_eq!(quote["currency"], "VND");
}

#[tokio::test]
async fn test_quote_rejects_inverted_range() {
    let app = TestApp::new(1).await;
    let path = format!(
        "{}/quote?check_in=2026-01-05&check_out=2026-01-02",
        app.room_type_path()
    );
    let response = app.request("GET", &path, None, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "VALIDATION");
}

#[tokio::test]
async fn test_availability_follows_bookings() {
    let app = TestApp::new(1).await;
    let path = format!(
        "{}/availability?check_in=2026-01-10&check_out=2026-01-12",
        app.room_type_path()
    );

    let before = app.request("GET", &path, None, None).await;
    assert_eq!(before.body["data"]["available"], true);

    app.book(app.customer, app.booking_body(date(1, 10), date(1, 12), 1))
        .await;

    let after = app.request("GET", &path, None, None).await;
    assert_eq!(after.body["data"]["available"], false);

    let detailed = app
        .request("GET", &path.replace("/availability?", "/availability/detailed?"), None, None)
        .await;
    assert_eq!(detailed.body["data"]["max_rooms_available"], 0);
    assert!(!detailed.body["data"]["reasons"].as_array().unwrap().is_empty());

    let month = app
        .request(
            "GET",
            &format!("{}/availability/2026/1", app.room_type_path()),
            None,
            None,
        )
        .await;
    let dates = month.body["data"]["dates"].as_array().unwrap();
    assert_eq!(dates.len(), 29);
    assert!(!dates.iter().any(|d| d == "2026-01-10" || d == "2026-01-11"));
    assert!(dates.iter().any(|d| d == "2026-01-12"));
}

#[tokio::test]
async fn test_create_booking() {
    let app = TestApp::new(2).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 2), date(1, 5), 1))
        .await;

    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["payment_status"], "pending");
    assert_eq!(booking["nights"], 3);
    assert_eq!(money(&booking["total_amount"]), dec!(3400000));
    assert!(booking["booking_code"].as_str().unwrap().starts_with("BK260102"));
    assert_eq!(app.audit.records_for("bookings").await.len(), 1);
}

#[tokio::test]
async fn test_create_booking_requires_customer_identity() {
    let app = TestApp::new(1).await;
    let body = app.booking_body(date(1, 2), date(1, 5), 1);

    let anonymous = app.request("POST", "/api/bookings", Some(body.clone()), None).await;
    assert_eq!(anonymous.status, StatusCode::FORBIDDEN);

    let as_host = app.request("POST", "/api/bookings", Some(body), Some(app.host)).await;
    assert_eq!(as_host.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_booking_validation() {
    let app = TestApp::new(1).await;

    let mut zero_rooms = app.booking_body(date(1, 2), date(1, 5), 1);
    zero_rooms["rooms_count"] = 0.into();
    let response = app
        .request("POST", "/api/bookings", Some(zero_rooms), Some(app.customer))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let past = app.booking_body(date(1, 1).pred_opt().unwrap(), date(1, 3), 1);
    let response = app
        .request("POST", "/api/bookings", Some(past), Some(app.customer))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut crowded = app.booking_body(date(1, 2), date(1, 5), 1);
    crowded["adults"] = 3.into();
    let response = app
        .request("POST", "/api/bookings", Some(crowded), Some(app.customer))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_booking_is_unavailable() {
    let app = TestApp::new(1).await;
    app.book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(app.booking_body(date(1, 7), date(1, 9), 1)),
            Some(app.other_customer()),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"]["code"], "UNAVAILABLE");
    assert_eq!(response.body["error"]["details"]["available"], 0);

    // Checkout day equals the next check-in: no overlap.
    app.book(app.other_customer(), app.booking_body(date(1, 8), date(1, 9), 1))
        .await;
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let app = TestApp::new(1).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let path = format!("/api/bookings/{}/cancel", booking["id"].as_str().unwrap());

    let first = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({ "reason": "Change of plans" })),
            Some(app.customer),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body["data"]["status"], "cancelled");
    assert_eq!(first.body["data"]["cancellation_reason"], "Change of plans");

    let second = app.request("POST", &path, None, Some(app.customer)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"], first.body["data"]);
    assert_eq!(app.audit.records_for("bookings").await.len(), 2);

    // The rooms are free again.
    app.book(app.other_customer(), app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
}

#[tokio::test]
async fn test_check_in_too_early_and_host_only() {
    let app = TestApp::new(1).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let path = format!("/api/bookings/{}/check-in", booking["id"].as_str().unwrap());

    let by_customer = app.request("POST", &path, None, Some(app.customer)).await;
    assert_eq!(by_customer.status, StatusCode::FORBIDDEN);

    let too_early = app.request("POST", &path, None, Some(app.host)).await;
    assert_eq!(too_early.status, StatusCode::CONFLICT);
    assert_eq!(too_early.body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_lookup_and_visibility() {
    let app = TestApp::new(1).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let id = booking["id"].as_str().unwrap();
    let code = booking["booking_code"].as_str().unwrap();

    let own = app
        .request("GET", &format!("/api/bookings/{id}"), None, Some(app.customer))
        .await;
    assert_eq!(own.status, StatusCode::OK);

    let host = app
        .request("GET", &format!("/api/bookings/code/{code}"), None, Some(app.host))
        .await;
    assert_eq!(host.status, StatusCode::OK);
    assert_eq!(host.body["data"]["id"], id);

    let stranger = app
        .request("GET", &format!("/api/bookings/{id}"), None, Some(app.other_customer()))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let missing = app
        .request("GET", "/api/bookings/code/BK000000DEADBEEF", None, Some(app.admin))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let mine = app
        .request("GET", "/api/bookings?page=1&per_page=10", None, Some(app.customer))
        .await;
    assert_eq!(mine.body["data"]["total_items"], 1);

    let listed_by_admin = app
        .request(
            "GET",
            &format!("/api/customers/{}/bookings", app.customer.id),
            None,
            Some(app.admin),
        )
        .await;
    assert_eq!(listed_by_admin.body["data"]["items"][0]["id"], id);
}

#[tokio::test]
async fn test_admin_payment_and_cancellation() {
    let app = TestApp::new(1).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let id = booking["id"].as_str().unwrap();

    let by_host = app
        .request(
            "PUT",
            &format!("/api/admin/bookings/{id}/payment"),
            Some(serde_json::json!({ "payment_status": "paid" })),
            Some(app.host),
        )
        .await;
    assert_eq!(by_host.status, StatusCode::FORBIDDEN);

    let paid = app
        .request(
            "PUT",
            &format!("/api/admin/bookings/{id}/payment"),
            Some(serde_json::json!({ "payment_status": "paid" })),
            Some(app.admin),
        )
        .await;
    assert_eq!(paid.status, StatusCode::OK, "{}", paid.body);
    assert_eq!(paid.body["data"]["payment_status"], "paid");

    let missing_reason = app
        .request(
            "POST",
            &format!("/api/admin/bookings/{id}/cancel"),
            Some(serde_json::json!({ "reason": "" })),
            Some(app.admin),
        )
        .await;
    assert_eq!(missing_reason.status, StatusCode::BAD_REQUEST);

    let cancelled = app
        .request(
            "POST",
            &format!("/api/admin/bookings/{id}/cancel"),
            Some(serde_json::json!({ "reason": "Flooding", "refund_amount": "1500000" })),
            Some(app.admin),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{}", cancelled.body);
    let data = &cancelled.body["data"];
    assert_eq!(data["status"], "cancelled");
    assert_eq!(data["payment_status"], "refunded");
    assert_eq!(money(&data["refund_amount"]), dec!(1500000));
    assert_eq!(data["cancelled_by_role"], "admin");
}

#[tokio::test]
async fn test_admin_status_override() {
    let app = TestApp::new(1).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let id = booking["id"].as_str().unwrap();

    let checked_in = app
        .request(
            "PUT",
            &format!("/api/admin/bookings/{id}/status"),
            Some(serde_json::json!({ "status": "checked_in", "note": "Front desk fix" })),
            Some(app.admin),
        )
        .await;
    assert_eq!(checked_in.status, StatusCode::OK, "{}", checked_in.body);
    assert_eq!(checked_in.body["data"]["status"], "checked_in");
    assert_eq!(checked_in.body["data"]["admin_note"], "Front desk fix");
    assert!(checked_in.body["data"]["checked_in_at"].is_string());

    let bad_status = app
        .request(
            "PUT",
            &format!("/api/admin/bookings/{id}/status"),
            Some(serde_json::json!({ "status": "teleported" })),
            Some(app.admin),
        )
        .await;
    assert!(bad_status.status.is_client_error());
}

#[tokio::test]
async fn test_history_requires_admin_and_audit_log() {
    let app = TestApp::new(1).await;
    let booking = app
        .book(app.customer, app.booking_body(date(1, 6), date(1, 8), 1))
        .await;
    let path = format!(
        "/api/admin/bookings/{}/history",
        booking["id"].as_str().unwrap()
    );

    let by_customer = app.request("GET", &path, None, Some(app.customer)).await;
    assert_eq!(by_customer.status, StatusCode::FORBIDDEN);

    // The in-memory deployment has no queryable audit log.
    let by_admin = app.request("GET", &path, None, Some(app.admin)).await;
    assert_eq!(by_admin.status, StatusCode::NOT_FOUND);
}
