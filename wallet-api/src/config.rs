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

use std::time::Duration;

use clap::Parser;

/// Process configuration, parsed from environment variables or CLI
/// flags (whichever is present; env wins only when no flag is
/// given). Shared verbatim between the server binary and the
/// `wallet-admin` provisioning command.
#[derive(Debug, Clone, Parser)]
#[command(name = "wallet-service", about = "Minimalist atomic wallet service")]
pub struct Config {
    #[arg(long, env = "WALLET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "WALLET_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "WALLET_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "WALLET_TABLE_NAME", default_value = "wallet")]
    pub table_name: String,

    /// Idempotency window for transaction records, in seconds. A
    /// startup warning fires above `TRANSACTION_TTL_SANITY_CEILING_SECONDS`.
    #[arg(long, env = "WALLET_TRANSACTION_TTL", default_value_t = 1800)]
    pub transaction_ttl_seconds: i64,

    #[arg(long, env = "AWS_REGION_NAME", default_value = "us-east-1")]
    pub aws_region: String,

    /// Overrides the DynamoDB endpoint, for local testing against
    /// e.g. DynamoDB Local. Unset in production.
    #[arg(long, env = "AWS_DYNAMODB_ENDPOINT_URL")]
    pub aws_dynamodb_endpoint_url: Option<String>,

    #[arg(long, env = "AWS_DYNAMODB_READ_CAPACITY", default_value_t = 5)]
    pub dynamodb_read_capacity: i64,

    #[arg(long, env = "AWS_DYNAMODB_WRITE_CAPACITY", default_value_t = 5)]
    pub dynamodb_write_capacity: i64,

    #[arg(long, env = "AWS_CLIENT_MAX_ATTEMPTS", default_value_t = 3)]
    pub aws_client_max_attempts: u32,

    #[arg(long, env = "AWS_CLIENT_CONNECT_TIMEOUT", default_value_t = 2000)]
    pub aws_client_connect_timeout_ms: u64,

    #[arg(long, env = "AWS_CLIENT_READ_TIMEOUT", default_value_t = 5000)]
    pub aws_client_read_timeout_ms: u64,

    #[arg(long, env = "AWS_CLIENT_MAX_POOL_CONNECTIONS", default_value_t = 64)]
    pub aws_client_max_pool_connections: u64,
}

/// Threshold above which an overlong TTL is flagged at startup rather
/// than silently accepted. Chosen as 24h: long enough that no
/// legitimate client-managed retry budget needs more, short enough
/// that a misconfigured multi-day TTL still gets flagged.
pub const TRANSACTION_TTL_SANITY_CEILING_SECONDS: i64 = 24 * 60 * 60;

impl Config {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn aws_client_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.aws_client_connect_timeout_ms)
    }

    pub fn aws_client_read_timeout(&self) -> Duration {
        Duration::from_millis(self.aws_client_read_timeout_ms)
    }

    pub fn warn_if_ttl_unsafe(&self) {
        if self.transaction_ttl_seconds > TRANSACTION_TTL_SANITY_CEILING_SECONDS {
            tracing::warn!(
                ttl_seconds = self.transaction_ttl_seconds,
                ceiling_seconds = TRANSACTION_TTL_SANITY_CEILING_SECONDS,
                "WALLET_TRANSACTION_TTL exceeds the sanity ceiling; idempotency records will \
                 outlive most client-managed retry budgets"
            );
        }
    }
}
