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

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};

use wallet_engine::{EngineError, WalletEngine};
use wallet_store::Store;

use crate::error::ApiError;
use crate::schemas::{
    parse_wallet_id, MutationRequest, WalletCreateRequest, WalletResponse,
};

/// Shared per-request state: a clone of the `Arc<WalletEngine<S>>`
/// built once at startup.
pub struct AppState<S: Store> {
    pub engine: Arc<WalletEngine<S>>,
}

impl<S: Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

/// Builds the `/api/v1` router. A thin adapter: URL → engine
/// call → response. No business logic lives here.
pub fn router<S: Store + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/v1/wallets/", post(create_wallet::<S>))
        .route("/api/v1/wallets/:id/balance", get(get_balance::<S>))
        .route("/api/v1/wallets/:id/deposit", put(deposit::<S>))
        .route(
            "/api/v1/wallets/:source/transfer/:target",
            put(transfer::<S>),
        )
        .with_state(state)
}

async fn create_wallet<S: Store>(
    State(state): State<AppState<S>>,
    Json(request): Json<WalletCreateRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let id = state.engine.create(&request.user_id).await?;
    Ok(Json(WalletResponse::new(id, 0)))
}

async fn get_balance<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<WalletResponse>, ApiError> {
    let wallet_id = parse_wallet_id(&id)?;
    let balance = state.engine.get_balance(wallet_id).await?;
    Ok(Json(WalletResponse::new(wallet_id, balance)))
}

async fn deposit<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(request): Json<MutationRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    let wallet_id = parse_wallet_id(&id)?;
    state
        .engine
        .deposit(wallet_id, request.amount, &request.nonce)
        .await
        .map_err(|err| replay_aware(err, &request.nonce))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn transfer<S: Store>(
    State(state): State<AppState<S>>,
    Path((source, target)): Path<(String, String)>,
    Json(request): Json<MutationRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    let source_id = parse_wallet_id(&source)?;
    let target_id = parse_wallet_id(&target)?;
    state
        .engine
        .transfer(source_id, target_id, request.amount, &request.nonce)
        .await
        .map_err(|err| replay_aware(err, &request.nonce))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Replays report the conflicting nonce in the error detail so a
/// caller can tell which of its own retried requests collided.
fn replay_aware(err: EngineError, nonce: &wallet_engine::Nonce) -> ApiError {
    if err == EngineError::TransactionAlreadyRegistered {
        ApiError::Conflict(format!("transaction with nonce {nonce} already registered"))
    } else {
        err.into()
    }
}
