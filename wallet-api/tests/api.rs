// Copyright (c) 2024 the wallet-service authors
// SPDX-License-Identifier: MIT
// Licensed under the MIT License;
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://opensource.org/licenses/MIT
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use wallet_api::{router, AppState};
use wallet_engine::{Amount, Nonce, WalletEngine};
use wallet_store::MemoryStore;

fn app() -> axum::Router {
    let engine = Arc::new(WalletEngine::new(Arc::new(MemoryStore::new()), "wallet"));
    router(AppState { engine })
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().method("GET").uri(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn scenario_1_create_wallet_then_reject_second_create_for_same_user() {
    let app = app();
    let (status, body) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "0");
    let wallet_id = body["id"].as_str().unwrap().to_owned();
    assert!(wallet_id.parse::<uuid::Uuid>().is_ok());

    let (status, _) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn scenario_2_deposit_then_replay_is_rejected_with_nonce_in_detail() {
    let app = app();
    let (_, body) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    let wallet_id = body["id"].as_str().unwrap().to_owned();

    let deposit_path = format!("/api/v1/wallets/{wallet_id}/deposit");
    let (status, _) = send(
        &app,
        put(&deposit_path, json!({ "amount": "1000", "nonce": "abcdef01" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let balance_path = format!("/api/v1/wallets/{wallet_id}/balance");
    let (_, body) = send(&app, get(&balance_path)).await;
    assert_eq!(body["balance"], "1000");

    let (status, body) = send(
        &app,
        put(&deposit_path, json!({ "amount": "1000", "nonce": "abcdef01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("abcdef01"));
}

#[tokio::test]
async fn scenario_3_transfer_between_two_wallets() {
    let app = app();
    let (_, w1) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    let (_, w2) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U2" }))).await;
    let w1_id = w1["id"].as_str().unwrap().to_owned();
    let w2_id = w2["id"].as_str().unwrap().to_owned();

    send(
        &app,
        put(
            &format!("/api/v1/wallets/{w1_id}/deposit"),
            json!({ "amount": "1000", "nonce": "abcdef01" }),
        ),
    )
    .await;

    let (status, _) = send(
        &app,
        put(
            &format!("/api/v1/wallets/{w1_id}/transfer/{w2_id}"),
            json!({ "amount": "100", "nonce": "deadbeef" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, b1) = send(&app, get(&format!("/api/v1/wallets/{w1_id}/balance"))).await;
    let (_, b2) = send(&app, get(&format!("/api/v1/wallets/{w2_id}/balance"))).await;
    assert_eq!(b1["balance"], "900");
    assert_eq!(b2["balance"], "100");
}

#[tokio::test]
async fn scenario_4_transfer_from_missing_source_is_insufficient_funds() {
    let app = app();
    let (_, w1) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    let w1_id = w1["id"].as_str().unwrap().to_owned();
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, _) = send(
        &app,
        put(
            &format!("/api/v1/wallets/{missing}/transfer/{w1_id}"),
            json!({ "amount": "10", "nonce": "deadbeef" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, b1) = send(&app, get(&format!("/api/v1/wallets/{w1_id}/balance"))).await;
    assert_eq!(b1["balance"], "0");
}

#[tokio::test]
async fn scenario_5_transfer_to_missing_target_is_not_found() {
    let app = app();
    let (_, w1) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    let w1_id = w1["id"].as_str().unwrap().to_owned();
    send(
        &app,
        put(
            &format!("/api/v1/wallets/{w1_id}/deposit"),
            json!({ "amount": "1000", "nonce": "abcdef01" }),
        ),
    )
    .await;

    let missing = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(
        &app,
        put(
            &format!("/api/v1/wallets/{w1_id}/transfer/{missing}"),
            json!({ "amount": "10", "nonce": "deadbeef" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, b1) = send(&app, get(&format!("/api/v1/wallets/{w1_id}/balance"))).await;
    assert_eq!(b1["balance"], "1000");
}

#[tokio::test]
async fn scenario_6_five_concurrent_transfers_conserve_total() {
    let engine = Arc::new(WalletEngine::new(Arc::new(MemoryStore::new()), "wallet"));
    let source = engine.create("U1").await.unwrap();
    let t1 = engine.create("U2").await.unwrap();
    let t2 = engine.create("U3").await.unwrap();
    engine
        .deposit(source, Amount::new(5).unwrap(), &Nonce::new("abcdef01").unwrap())
        .await
        .unwrap();

    let nonces = ["nonce0001", "nonce0002", "nonce0003", "nonce0004", "nonce0005"];
    let targets = [t1, t1, t2, t2, t1];

    let mut handles = Vec::new();
    for (nonce, target) in nonces.into_iter().zip(targets) {
        let engine = Arc::clone(&engine);
        let nonce = Nonce::new(nonce).unwrap();
        handles.push(tokio::spawn(async move {
            engine.transfer(source, target, Amount::new(1).unwrap(), &nonce).await
        }));
    }
    for handle in handles {
        let _ = handle.await.unwrap();
    }

    let total = engine.get_balance(source).await.unwrap()
        + engine.get_balance(t1).await.unwrap()
        + engine.get_balance(t2).await.unwrap();
    assert_eq!(total, 5);
}

#[tokio::test]
async fn boundary_invalid_amount_is_rejected_before_engine_call() {
    let app = app();
    let (_, w1) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    let w1_id = w1["id"].as_str().unwrap().to_owned();

    let (status, _) = send(
        &app,
        put(
            &format!("/api/v1/wallets/{w1_id}/deposit"),
            json!({ "amount": "0", "nonce": "abcdef01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn boundary_nonce_wrong_length_is_rejected() {
    let app = app();
    let (_, w1) = send(&app, post("/api/v1/wallets/", json!({ "user_id": "U1" }))).await;
    let w1_id = w1["id"].as_str().unwrap().to_owned();

    let (status, _) = send(
        &app,
        put(
            &format!("/api/v1/wallets/{w1_id}/deposit"),
            json!({ "amount": "10", "nonce": "short" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn balance_of_missing_wallet_is_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, get(&format!("/api/v1/wallets/{missing}/balance"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
