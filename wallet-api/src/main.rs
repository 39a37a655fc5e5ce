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

use clap::Parser;

use wallet_api::{client, init_logging, router, AppState, Config};
use wallet_engine::WalletEngine;
use wallet_store::DynamoDbStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config.log_level);
    config.warn_if_ttl_unsafe();

    let dynamodb_client = client::build_client(&config).await;
    let store = Arc::new(DynamoDbStore::new(dynamodb_client, config.table_name.clone()));
    let engine = Arc::new(
        WalletEngine::new(store, config.table_name.clone())
            .with_transaction_ttl_seconds(config.transaction_ttl_seconds),
    );

    let app = router(AppState { engine });

    let addr: std::net::SocketAddr = config.socket_addr().parse()?;
    tracing::info!(%addr, "wallet-server listening");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
