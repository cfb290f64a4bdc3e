//! Webhook receipt: signature enforcement and order reconciliation,
//! plus the API-surface endpoints (intent creation, diagnostics).

use chrono::Utc;
use serde_json::json;

use amara_core::{Order, PaymentIntentId, PaymentStatus};
use amara_integration_tests::{
    TestContext, WEBHOOK_SECRET, spawn_provider_stub, spawn_rejecting_provider_stub,
};
use amara_storefront::services::orders::OrderStore;
use amara_storefront::services::webhook::{SIGNATURE_HEADER, sign_payload};

fn pending_order(intent: &str) -> Order {
    Order::new(
        PaymentIntentId::new(intent),
        "AMA-0BADCAFE".to_string(),
        "amara@example.com".to_string(),
        21300,
        "usd".to_string(),
    )
}

fn event_body(event_type: &str, intent: &str) -> Vec<u8> {
    json!({
        "id": "evt_1",
        "type": event_type,
        "data": { "object": { "id": intent } }
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_succeeded_event_reconciles_the_order() {
    let mut ctx = TestContext::new();
    ctx.orders.insert(pending_order("pi_1"));

    let body = event_body("payment_intent.succeeded", "pi_1");
    let header = sign_payload(WEBHOOK_SECRET, Utc::now().timestamp(), &body);

    let (status, response) = ctx
        .post_raw("/api/webhook", &[(SIGNATURE_HEADER, &header)], body)
        .await;
    assert_eq!(status, 200);
    assert_eq!(response["received"], true);

    let order = ctx
        .orders
        .get(&PaymentIntentId::new("pi_1"))
        .expect("order stored");
    assert_eq!(order.status, PaymentStatus::Succeeded);

    // And the confirmation view reflects it.
    let (_, view) = ctx.get("/orders/pi_1").await;
    assert_eq!(view["status"], "succeeded");
}

#[tokio::test]
async fn test_failed_event_reconciles_the_order() {
    let mut ctx = TestContext::new();
    ctx.orders.insert(pending_order("pi_2"));

    let body = event_body("payment_intent.payment_failed", "pi_2");
    let header = sign_payload(WEBHOOK_SECRET, Utc::now().timestamp(), &body);

    let (status, _) = ctx
        .post_raw("/api/webhook", &[(SIGNATURE_HEADER, &header)], body)
        .await;
    assert_eq!(status, 200);

    let order = ctx
        .orders
        .get(&PaymentIntentId::new("pi_2"))
        .expect("order stored");
    assert_eq!(order.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn test_bad_signature_is_rejected_without_touching_orders() {
    let mut ctx = TestContext::new();
    ctx.orders.insert(pending_order("pi_3"));

    let body = event_body("payment_intent.succeeded", "pi_3");
    let header = sign_payload("whsec_wrong_secret", Utc::now().timestamp(), &body);

    let (status, response) = ctx
        .post_raw("/api/webhook", &[(SIGNATURE_HEADER, &header)], body)
        .await;
    assert_eq!(status, 400);
    assert_eq!(response["error"], "invalid signature");

    let order = ctx
        .orders
        .get(&PaymentIntentId::new("pi_3"))
        .expect("order stored");
    assert_eq!(order.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_missing_header_and_stale_timestamp_are_rejected() {
    let mut ctx = TestContext::new();

    let body = event_body("payment_intent.succeeded", "pi_4");
    let (status, _) = ctx.post_raw("/api/webhook", &[], body.clone()).await;
    assert_eq!(status, 400);

    // Signed ten minutes ago: outside the tolerance window.
    let stale = sign_payload(WEBHOOK_SECRET, Utc::now().timestamp() - 600, &body);
    let (status, _) = ctx
        .post_raw("/api/webhook", &[(SIGNATURE_HEADER, &stale)], body)
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_unknown_intent_and_foreign_events_are_acknowledged() {
    let mut ctx = TestContext::new();

    // Valid signature, but no matching order: still a 200, the provider
    // must not retry forever.
    let body = event_body("payment_intent.succeeded", "pi_unknown");
    let header = sign_payload(WEBHOOK_SECRET, Utc::now().timestamp(), &body);
    let (status, response) = ctx
        .post_raw("/api/webhook", &[(SIGNATURE_HEADER, &header)], body)
        .await;
    assert_eq!(status, 200);
    assert_eq!(response["received"], true);

    let body = event_body("charge.refunded", "ch_1");
    let header = sign_payload(WEBHOOK_SECRET, Utc::now().timestamp(), &body);
    let (status, _) = ctx
        .post_raw("/api/webhook", &[(SIGNATURE_HEADER, &header)], body)
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_create_payment_intent_passthrough() {
    let api_base = spawn_provider_stub().await;
    let mut ctx = TestContext::with_api_base(&api_base);

    let (status, body) = ctx
        .post("/api/create-payment-intent", &json!({ "amount": 21300 }))
        .await;
    assert_eq!(status, 200, "got: {body}");
    assert!(
        body["clientSecret"]
            .as_str()
            .is_some_and(|s| s.contains("secret"))
    );

    let (status, _) = ctx
        .post("/api/create-payment-intent", &json!({ "amount": 0 }))
        .await;
    assert_eq!(status, 400);
    let (status, _) = ctx
        .post("/api/create-payment-intent", &json!({ "amount": -5 }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_create_payment_intent_surfaces_provider_rejection() {
    let api_base = spawn_rejecting_provider_stub().await;
    let mut ctx = TestContext::with_api_base(&api_base);

    let (status, body) = ctx
        .post("/api/create-payment-intent", &json!({ "amount": 100 }))
        .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "Your card was declined.");
}

#[tokio::test]
async fn test_diagnostics_reports_prefixes_only() {
    let mut ctx = TestContext::new();

    let (status, body) = ctx.get("/api/diagnostics").await;
    assert_eq!(status, 200);
    assert_eq!(body["publishable_key"]["present"], true);
    assert_eq!(body["publishable_key"]["prefix"], "pk_test…");
    assert_eq!(body["secret_key"]["prefix"], "sk_test…");
    assert_eq!(body["webhook_secret"]["prefix"], "whsec_t…");
    assert_eq!(body["currency"], "usd");

    // Never the full values.
    let raw = body.to_string();
    assert!(!raw.contains("sk_test_amara_51Hxyz"));
    assert!(!raw.contains(WEBHOOK_SECRET));
}
