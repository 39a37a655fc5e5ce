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
use crate::types::AttributeMap;

/// One elementary transactional write operation, fully addressed:
/// the table and primary-key attribute names travel with the
/// operation rather than being reconstructed by the caller.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert a new item; fails the surrounding transaction if `pk`
    /// already exists.
    PutIfAbsent {
        table: String,
        pk_field: String,
        pk: String,
        data: AttributeMap,
    },
    /// Increment a numeric attribute on an existing item; fails if
    /// the item does not exist.
    AddIfExists {
        table: String,
        pk_field: String,
        pk: String,
        attr: String,
        amount: u64,
    },
    /// Decrement a numeric attribute on an existing item; fails
    /// unless the current value is at least `amount` (which also
    /// implies the item exists).
    SubtractIfAtLeast {
        table: String,
        pk_field: String,
        pk: String,
        attr: String,
        amount: u64,
    },
}

impl WriteOp {
    pub fn pk(&self) -> &str {
        match self {
            WriteOp::PutIfAbsent { pk, .. }
            | WriteOp::AddIfExists { pk, .. }
            | WriteOp::SubtractIfAtLeast { pk, .. } => pk,
        }
    }
}

/// Stateless builder for the three primitive ops the wallet engine
/// composes into transactional batches. Parameterized by the table
/// name and the primary-key attribute name, never by any
/// per-request state.
#[derive(Debug, Clone)]
pub struct ItemFactory {
    table_name: String,
    pk_field: String,
}

impl ItemFactory {
    pub fn new(table_name: impl Into<String>, pk_field: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            pk_field: pk_field.into(),
        }
    }

    pub fn put_if_absent(&self, pk: impl Into<String>, data: AttributeMap) -> WriteOp {
        WriteOp::PutIfAbsent {
            table: self.table_name.clone(),
            pk_field: self.pk_field.clone(),
            pk: pk.into(),
            data,
        }
    }

    pub fn add_if_exists(
        &self,
        pk: impl Into<String>,
        attr: impl Into<String>,
        amount: u64,
    ) -> Result<WriteOp, Error> {
        if amount == 0 {
            return Err(Error::Validation(
                "amount for AddIfExists must be greater than 0".into(),
            ));
        }
        Ok(WriteOp::AddIfExists {
            table: self.table_name.clone(),
            pk_field: self.pk_field.clone(),
            pk: pk.into(),
            attr: attr.into(),
            amount,
        })
    }

    pub fn subtract_if_at_least(
        &self,
        pk: impl Into<String>,
        attr: impl Into<String>,
        amount: u64,
    ) -> Result<WriteOp, Error> {
        if amount == 0 {
            return Err(Error::Validation(
                "amount for SubtractIfAtLeast must be greater than 0".into(),
            ));
        }
        Ok(WriteOp::SubtractIfAtLeast {
            table: self.table_name.clone(),
            pk_field: self.pk_field.clone(),
            pk: pk.into(),
            attr: attr.into(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_if_exists_rejects_zero() {
        let factory = ItemFactory::new("wallet", "pk");
        assert!(matches!(
            factory.add_if_exists("w#wallet", "balance", 0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn subtract_if_at_least_rejects_zero() {
        let factory = ItemFactory::new("wallet", "pk");
        assert!(matches!(
            factory.subtract_if_at_least("w#wallet", "balance", 0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn put_if_absent_carries_table_and_pk_field() {
        let factory = ItemFactory::new("wallet", "pk");
        let op = factory.put_if_absent("w#wallet", AttributeMap::new());
        match op {
            WriteOp::PutIfAbsent {
                table, pk_field, ..
            } => {
                assert_eq!(table, "wallet");
                assert_eq!(pk_field, "pk");
            }
            _ => panic!("expected PutIfAbsent"),
        }
    }
}
