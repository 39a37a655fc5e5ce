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

use crate::error::Error;
use crate::item_factory::WriteOp;
use crate::types::AttributeMap;

/// Upper limit of a single `transact_write_items` batch, enforced
/// locally before any network call.
pub const MAX_TRANSACTION_WRITE_BATCH_SIZE: usize = 25;

/// Thin, typed surface over a remote key-addressed table.
/// Every method is a suspension point: the engine holds no lock
/// across an `.await` on any of these calls.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Returns the attributes of the item with the given primary
    /// key, optionally projected to `fields`. Fails with
    /// `Error::NotFound` if no such item exists.
    async fn get(&self, pk: &str, fields: Option<&[&str]>) -> Result<AttributeMap, Error>;

    /// Creates a new item, conditionally on `pk` not yet existing.
    async fn put(&self, pk: &str, data: AttributeMap) -> Result<(), Error>;

    /// Deletes the item, conditionally on its existence.
    async fn delete(&self, pk: &str) -> Result<(), Error>;

    /// Submits an ordered batch of up to 25 operations that commit
    /// atomically: either every condition holds and every effect
    /// applies, or none does. Batches over the limit are rejected
    /// with `Error::Validation` before any network call is made.
    async fn transact_write_items(&self, ops: Vec<WriteOp>) -> Result<(), Error>;
}

/// Administrative lifecycle operations — never invoked by
/// request-serving code. Used only by the table-provisioning command
/// and by tests.
#[async_trait::async_trait]
pub trait TableAdmin: Send + Sync {
    async fn table_exists(&self) -> Result<bool, Error>;

    async fn create_table(
        &self,
        read_capacity: i64,
        write_capacity: i64,
        ttl_attribute: Option<&str>,
    ) -> Result<(), Error>;

    async fn drop_table(&self) -> Result<(), Error>;
}

pub(crate) fn check_batch_size(ops: &[WriteOp]) -> Result<(), Error> {
    if ops.len() > MAX_TRANSACTION_WRITE_BATCH_SIZE {
        return Err(Error::Validation(format!(
            "transaction batch of {} exceeds the {} item limit",
            ops.len(),
            MAX_TRANSACTION_WRITE_BATCH_SIZE
        )));
    }
    Ok(())
}
