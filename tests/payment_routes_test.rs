mod common;

use actix_web::test;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use serial_test::serial;
use sha2::Sha256;

use common::{TestApp, TEST_GATEWAY_SECRET};

fn sign(order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_GATEWAY_SECRET.as_bytes()).unwrap();
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[actix_rt::test]
#[serial]
async fn test_callback_with_bad_signature_is_rejected() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/verify")
        .set_json(&json!({
            "booking_id": "65f000000000000000000001",
            "razorpay_order_id": "order_abc",
            "razorpay_payment_id": "pay_xyz",
            "razorpay_signature": "deadbeef"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["verified"], false);
}

#[actix_rt::test]
#[serial]
async fn test_callback_with_tampered_payment_id_is_rejected() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // Signature covers a different payment id than the callback claims
    let signature = sign("order_abc", "pay_original");

    let req = test::TestRequest::post()
        .uri("/api/payments/verify")
        .set_json(&json!({
            "booking_id": "65f000000000000000000001",
            "razorpay_order_id": "order_abc",
            "razorpay_payment_id": "pay_tampered",
            "razorpay_signature": signature
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["verified"], false);
}

#[actix_rt::test]
#[serial]
async fn test_valid_signature_with_malformed_booking_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let signature = sign("order_abc", "pay_xyz");

    let req = test::TestRequest::post()
        .uri("/api/payments/verify")
        .set_json(&json!({
            "booking_id": "not-an-object-id",
            "razorpay_order_id": "order_abc",
            "razorpay_payment_id": "pay_xyz",
            "razorpay_signature": signature
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_create_order_with_malformed_booking_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/order")
        .set_json(&json!({ "booking_id": "garbage" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_create_order_missing_booking_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/order")
        .set_json(&json!({}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_rt::test]
#[serial]
async fn test_payment_failed_with_malformed_booking_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/failed")
        .set_json(&json!({ "booking_id": "garbage", "reason": "card declined" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
