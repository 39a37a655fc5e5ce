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

/// Domain error taxonomy, derived by the engine from backend
/// errors by interpreting positional cancellation reasons through
/// their role rather than their index. Anything the role
/// interpretation doesn't specifically reinterpret falls through to
/// `Backend`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("wallet not found")]
    WalletNotFound,
    #[error("wallet already exists for user")]
    WalletAlreadyExistsForUser,
    #[error("transaction already registered")]
    TransactionAlreadyRegistered,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("transaction conflict, retry with the same nonce")]
    TransactionConflict,
    #[error("invalid argument: {0}")]
    Invalid(String),
    #[error("unknown backend error")]
    Unknown,
    #[error(transparent)]
    Backend(#[from] wallet_store::Error),
}
