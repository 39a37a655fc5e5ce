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

use clap::Parser;

use wallet_api::{client, init_logging, Config};
use wallet_store::TableAdmin;

/// One-shot entry point that creates the wallet table if it does not
/// already exist, then returns. Idempotent: a
/// pre-existing table is a warning, not an error.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config.log_level);

    let dynamodb_client = client::build_client(&config).await;
    let store = wallet_store::DynamoDbStore::new(dynamodb_client, config.table_name.clone());

    if store.table_exists().await? {
        tracing::warn!(table = %config.table_name, "table already exists, nothing to do");
        return Ok(());
    }

    tracing::info!(table = %config.table_name, "creating table");
    store
        .create_table(
            config.dynamodb_read_capacity,
            config.dynamodb_write_capacity,
            Some("ttl"),
        )
        .await?;
    tracing::info!(table = %config.table_name, "table ready");

    Ok(())
}
