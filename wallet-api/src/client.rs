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

use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::{Builder, Credentials, Region};
use aws_sdk_dynamodb::Client;
use aws_smithy_runtime::client::http::hyper_014::HyperClientBuilder;
use aws_smithy_types::timeout::TimeoutConfig;

use crate::config::Config;

/// Builds the long-lived DynamoDB client from an explicit
/// configuration builder seeded from the ambient AWS config chain
/// (`aws-config`'s region/credential-provider discovery, same as the
/// source's `boto3.Session()` default), with retry count, timeouts,
/// region, endpoint, and connection-pool size then overridden from
/// `Config` so none of those five are left to ambient SDK defaults.
/// Built once at process startup and shared across every request
/// behind an `Arc`.
pub async fn build_client(config: &Config) -> Client {
    let shared_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(config.aws_client_connect_timeout())
        .read_timeout(config.aws_client_read_timeout())
        .build();

    // `AWS_CLIENT_MAX_POOL_CONNECTIONS` is a property of the
    // underlying Hyper connection pool rather than of this typed
    // config builder, the same way the source's `botocore.Config(
    // max_pool_connections=...)` reaches past the client into its
    // urllib3 pool.
    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();
    let mut hyper_builder = hyper::client::Builder::default();
    hyper_builder.pool_max_idle_per_host(config.aws_client_max_pool_connections as usize);
    let http_client = HyperClientBuilder::new()
        .hyper_builder(hyper_builder)
        .build(https_connector);

    let mut builder = Builder::from(&shared_config)
        .region(Region::new(config.aws_region.clone()))
        .retry_config(RetryConfig::standard().with_max_attempts(config.aws_client_max_attempts))
        .timeout_config(timeout_config)
        .http_client(http_client);

    if let Some(endpoint) = &config.aws_dynamodb_endpoint_url {
        builder = builder.endpoint_url(endpoint.clone());
    }

    if let (Ok(access_key), Ok(secret_key)) = (
        std::env::var("AWS_ACCESS_KEY_ID"),
        std::env::var("AWS_SECRET_ACCESS_KEY"),
    ) {
        builder = builder.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "wallet-service-static",
        ));
    }

    Client::from_conf(builder.build())
}
