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

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::error::{CancellationReason, Error};
use crate::item_factory::WriteOp;
use crate::store::{check_batch_size, Store, TableAdmin};
use crate::types::{AttrValue, AttributeMap};

/// In-process fake of a single DynamoDB-like table, used by the
/// engine's own test suite and by `wallet-api`'s integration tests.
/// Condition checks and writes happen under one lock, so it gives
/// the same all-or-nothing guarantee `transact_write_items` promises
/// without needing a real backend in CI.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, AttributeMap>>,
    created: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_condition(items: &HashMap<String, AttributeMap>, op: &WriteOp) -> Option<CancellationReason> {
        match op {
            WriteOp::PutIfAbsent { pk, .. } => {
                if items.contains_key(pk) {
                    Some(CancellationReason::ConditionalCheckFailed)
                } else {
                    None
                }
            }
            WriteOp::AddIfExists { pk, .. } => {
                if items.contains_key(pk) {
                    None
                } else {
                    Some(CancellationReason::ConditionalCheckFailed)
                }
            }
            WriteOp::SubtractIfAtLeast { pk, attr, amount, .. } => match items.get(pk) {
                Some(item) => match item.get(attr).and_then(AttrValue::as_int) {
                    Some(current) if current >= *amount => None,
                    _ => Some(CancellationReason::ConditionalCheckFailed),
                },
                None => Some(CancellationReason::ConditionalCheckFailed),
            },
        }
    }

    fn apply(items: &mut HashMap<String, AttributeMap>, op: &WriteOp) {
        match op {
            WriteOp::PutIfAbsent { pk, data, .. } => {
                items.insert(pk.clone(), data.clone());
            }
            WriteOp::AddIfExists { pk, attr, amount, .. } => {
                let item = items.entry(pk.clone()).or_default();
                let current = item.get(attr).and_then(AttrValue::as_int).unwrap_or(0);
                item.insert(attr.clone(), AttrValue::N(current + *amount));
            }
            WriteOp::SubtractIfAtLeast { pk, attr, amount, .. } => {
                let item = items.entry(pk.clone()).or_default();
                let current = item.get(attr).and_then(AttrValue::as_int).unwrap_or(0);
                item.insert(attr.clone(), AttrValue::N(current - *amount));
            }
        }
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, pk: &str, fields: Option<&[&str]>) -> Result<AttributeMap, Error> {
        let items = self.items.lock().await;
        let item = items.get(pk).ok_or(Error::NotFound)?;
        match fields {
            Some(fields) => Ok(item
                .iter()
                .filter(|(k, _)| fields.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
            None => Ok(item.clone()),
        }
    }

    async fn put(&self, pk: &str, data: AttributeMap) -> Result<(), Error> {
        let mut items = self.items.lock().await;
        if items.contains_key(pk) {
            return Err(Error::ConditionalCheckFailed);
        }
        items.insert(pk.to_owned(), data);
        Ok(())
    }

    async fn delete(&self, pk: &str) -> Result<(), Error> {
        let mut items = self.items.lock().await;
        if items.remove(pk).is_none() {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn transact_write_items(&self, ops: Vec<WriteOp>) -> Result<(), Error> {
        check_batch_size(&ops)?;

        let mut items = self.items.lock().await;
        let reasons: Vec<Option<CancellationReason>> =
            ops.iter().map(|op| Self::check_condition(&items, op)).collect();

        if reasons.iter().any(Option::is_some) {
            return Err(Error::MultiOpCancelled(reasons));
        }

        for op in &ops {
            Self::apply(&mut items, op);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TableAdmin for MemoryStore {
    async fn table_exists(&self) -> Result<bool, Error> {
        Ok(*self.created.lock().await)
    }

    async fn create_table(
        &self,
        _read_capacity: i64,
        _write_capacity: i64,
        _ttl_attribute: Option<&str>,
    ) -> Result<(), Error> {
        *self.created.lock().await = true;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), Error> {
        *self.created.lock().await = false;
        self.items.lock().await.clear();
        Ok(())
    }
}
