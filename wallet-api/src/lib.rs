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

//! The HTTP surface: a thin adapter from `/api/v1` requests to
//! `wallet_engine::WalletEngine` calls, mapping domain errors to
//! status codes in one place.

pub mod client;
pub mod config;
pub mod error;
pub mod routes;
pub mod schemas;

pub use config::Config;
pub use routes::{router, AppState};

/// Initializes structured logging: `tracing` + `tracing-subscriber`
/// with an `EnvFilter` read from `log_level` (typically
/// `WALLET_LOG_LEVEL`) if set, falling back to `RUST_LOG`, then
/// `info`. Call once, before anything else, at process start.
pub fn init_logging(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
