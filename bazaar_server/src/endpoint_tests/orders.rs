use actix_web::{http::StatusCode, test::TestRequest};
use bazaar_engine::{
    db_types::{Contract, OrderKind, OrderState},
    test_utils::fixtures::{sale_contract, shirt},
};
use serde_json::{json, Value};

use super::helpers::TestServer;
use crate::data_objects::{OrderIdResponse, OrderResult};

#[actix_web::test]
async fn track_a_sale_and_fetch_it_by_address() {
    let server = TestServer::new();
    let contract = sale_contract("1Shop", 100, vec![shirt("red", "M", 1)]);
    let expected = contract.order_id().unwrap();
    let req = TestRequest::post().uri("/orders/sale").set_json(json!({ "contract": contract, "state": "Confirmed" }));
    let (status, body) = server.call(req).await;
    assert_eq!(status, StatusCode::OK);
    let res: OrderIdResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(res.order_id, expected);

    let (status, body) = server.call(TestRequest::get().uri("/order/1Shop")).await;
    assert_eq!(status, StatusCode::OK);
    let order: OrderResult = serde_json::from_str(&body).unwrap();
    assert_eq!(order.kind, OrderKind::Sale);
    assert_eq!(order.order_id, expected);
    assert_eq!(order.order.state, OrderState::Confirmed);
    assert!(!order.order.funded);
    assert!(order.order.records.is_empty());
}

#[actix_web::test]
async fn purchases_default_to_pending() {
    let server = TestServer::new();
    let contract = sale_contract("1Mine", 250, vec![]);
    let req = TestRequest::post().uri("/orders/purchase").set_json(json!({ "contract": contract }));
    let (status, _) = server.call(req).await;
    assert_eq!(status, StatusCode::OK);
    let (kind, order) = server.db.fetch_by_address("1Mine").unwrap().unwrap();
    assert_eq!(kind, OrderKind::Purchase);
    assert_eq!(order.state, OrderState::Pending);
}

#[actix_web::test]
async fn contracts_that_cannot_be_hashed_are_rejected() {
    let server = TestServer::new();
    let req = TestRequest::post().uri("/orders/sale").set_json(json!({ "contract": Contract::default() }));
    let (status, body) = server.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert!(err["error"].as_str().unwrap().starts_with("Invalid order. The order cannot be tracked."));
}

#[actix_web::test]
async fn payment_addresses_cannot_be_shared() {
    let server = TestServer::new();
    let first = json!({ "contract": sale_contract("1Same", 100, vec![]) });
    let second = json!({ "contract": sale_contract("1Same", 999, vec![]) });
    let (status, _) = server.call(TestRequest::post().uri("/orders/sale").set_json(first)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.call(TestRequest::post().uri("/orders/sale").set_json(second)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_addresses_are_not_found() {
    let server = TestServer::new();
    let (status, body) = server.call(TestRequest::get().uri("/order/1Nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No order pays into 1Nobody"}"#);
}

#[actix_web::test]
async fn set_inventory_levels() {
    let server = TestServer::new();
    let req = TestRequest::put().uri("/inventory").set_json(json!({ "path": "shirt/red/M", "quantity": 5 }));
    let (status, _) = server.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.db.inventory_level("shirt/red/M").unwrap(), Some(5));

    let req = TestRequest::put().uri("/inventory").set_json(json!({ "path": "shirt/red/M", "quantity": -1 }));
    let (status, _) = server.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.db.inventory_level("shirt/red/M").unwrap(), Some(5));
}
