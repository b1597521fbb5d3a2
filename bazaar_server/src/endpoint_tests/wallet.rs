use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use bazaar_engine::{
    db_types::OrderState,
    events::Notification,
    helpers::{Network, StandardScriptExtractor},
    test_utils::{
        fixtures::{sale_contract, shirt},
        prepare_env::{drain_notifications, notification_channel},
    },
    MemoryDatabase,
    PaymentReconciler,
};
use serde_json::{json, Value};

use super::{
    helpers::{p2pkh, TestServer},
    mocks::{MockOrderStore, MockStoreError},
};
use crate::server::configure;

fn outputs(txid: &str, index: u32, value: i64, script: &str) -> TestRequest {
    let body = json!({ "txid": txid, "outputs": [{ "index": index, "value": value, "script": script }] });
    TestRequest::post().uri("/wallet/outputs").set_json(body)
}

#[actix_web::test]
async fn payments_fund_tracked_sales() {
    let mut server = TestServer::new();
    let (address, script) = p2pkh(0x11);
    server.db.insert_sale(sale_contract(&address, 100, vec![shirt("red", "M", 1)]), OrderState::Confirmed).unwrap();
    let req = TestRequest::put().uri("/inventory").set_json(json!({ "path": "shirt/red/M", "quantity": 3 }));
    assert_eq!(server.call(req).await.0, StatusCode::OK);

    let (status, body) = server.call(outputs("AA01", 0, 60, &script)).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["txid"], "aa01");
    assert_eq!(report["applied"], 1);

    let (_, body) = server.call(outputs("aa01", 0, 60, &script)).await;
    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["duplicates"], 1);
    assert_eq!(report["applied"], 0);

    let (_, body) = server.call(outputs("bb02", 1, 50, &script)).await;
    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["funded"].as_array().unwrap().len(), 1);

    let (status, body) = server.call(TestRequest::get().uri(&format!("/order/{address}"))).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["funded"], true);
    assert_eq!(order["state"], "Funded");
    assert_eq!(order["records"].as_array().unwrap().len(), 2);
    assert_eq!(server.db.inventory_level("shirt/red/M").unwrap(), Some(2));
    let notes = drain_notifications(&mut server.notifications);
    assert_eq!(notes.len(), 1);
    assert!(matches!(notes[0], Notification::OrderFunded(_)));
}

#[actix_web::test]
async fn unattributable_outputs_are_reported() {
    let server = TestServer::new();
    let (_, stranger) = p2pkh(0x22);
    let body = json!({
        "txid": "cc03",
        "outputs": [
            { "index": 0, "value": 1000, "script": "6a0401020304" },
            { "index": 1, "value": 1000, "script": stranger },
        ]
    });
    let (status, body) = server.call(TestRequest::post().uri("/wallet/outputs").set_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["skipped_no_address"], 1);
    assert_eq!(report["skipped_unmatched"], 1);
}

#[actix_web::test]
async fn scripts_must_be_hex() {
    let server = TestServer::new();
    let (status, body) = server.call(outputs("dd04", 0, 10, "not hex")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert!(err["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn negative_values_are_rejected() {
    let mut server = TestServer::new();
    let (address, script) = p2pkh(0x44);
    server.db.insert_sale(sale_contract(&address, 100, vec![shirt("red", "M", 1)]), OrderState::Confirmed).unwrap();
    let (status, body) = server.call(outputs("ff06", 2, -100, &script)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(err["error"], "Could not read request body: Output 2 has a negative value");

    let (_, body) = server.call(TestRequest::get().uri(&format!("/order/{address}"))).await;
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["funded"], false);
    assert!(order["records"].as_array().unwrap().is_empty());
    assert!(drain_notifications(&mut server.notifications).is_empty());
}

#[actix_web::test]
async fn store_outages_are_counted_not_raised() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderStore::new();
    orders.expect_find_sale_by_address().times(1).returning(|_| Err(MockStoreError("connection refused".into())));
    orders.expect_find_purchase_by_address().times(0);
    let (notifier, _rx) = notification_channel(4);
    let extractor = StandardScriptExtractor::new(Network::Mainnet);
    let reconciler = PaymentReconciler::new(orders, MemoryDatabase::new(), extractor, notifier);
    let app = App::new()
        .app_data(web::Data::new(reconciler))
        .configure(configure::<MockOrderStore, MemoryDatabase, StandardScriptExtractor>);
    let service = test::init_service(app).await;
    let (_, script) = p2pkh(0x33);
    let res = test::call_service(&service, outputs("ee05", 0, 10, &script).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let report: Value = test::read_body_json(res).await;
    assert_eq!(report["failed"], 1);
    assert_eq!(report["applied"], 0);
}
