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

//! Backend-agnostic storage layer for the wallet service: a `Store`
//! trait describing DynamoDB-style conditional writes and
//! transactions, an `ItemFactory` that builds well-formed write
//! operations, an `Error` mapper that turns backend-specific failures
//! into a fixed taxonomy, and two implementations of `Store` — a real
//! one over `aws-sdk-dynamodb` and an in-memory fake for tests.

pub mod dynamodb;
pub mod error;
pub mod item_factory;
pub mod memory;
pub mod store;
pub mod types;

pub use dynamodb::DynamoDbStore;
pub use error::{CancellationReason, Error};
pub use item_factory::{ItemFactory, WriteOp};
pub use memory::MemoryStore;
pub use store::{Store, TableAdmin, MAX_TRANSACTION_WRITE_BATCH_SIZE};
pub use types::{AttrValue, AttributeMap};
