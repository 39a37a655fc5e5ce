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

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use wallet_engine::EngineError;

/// HTTP-facing error taxonomy: one `IntoResponse` impl performs the
/// entire status-code mapping table in one place.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("internal error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, detail.clone()),
            ApiError::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail.clone()),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::WalletNotFound => ApiError::NotFound,
            EngineError::WalletAlreadyExistsForUser => {
                ApiError::Conflict("user already has a wallet".into())
            }
            EngineError::TransactionAlreadyRegistered => {
                ApiError::Conflict(format!("{err}"))
            }
            EngineError::InsufficientFunds => ApiError::Conflict(err.to_string()),
            EngineError::TransactionConflict => ApiError::Conflict(err.to_string()),
            EngineError::Invalid(detail) => ApiError::Validation(detail),
            EngineError::Unknown | EngineError::Backend(_) => {
                tracing::error!(error = %err, "unmapped engine error");
                ApiError::Internal
            }
        }
    }
}
