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

use wallet_store::{CancellationReason, Error as StoreError, ItemFactory, Store};

use crate::error::EngineError;
use crate::keys::{create_transaction_key, nonced_transaction_key, user_key, wallet_key};
use crate::model::{Amount, Nonce, WalletId};

const DEFAULT_TRANSACTION_TTL_SECONDS: i64 = 1800;

/// The role a single slot of a transactional batch plays, used to
/// interpret a `MultiOpCancelled` reason list without coupling the
/// interpretation to wire position. The wire order sent to the store
/// is still positional — the backend requires that — but this array
/// travels alongside it so the engine addresses reasons by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotRole {
    /// The idempotency transaction record for this attempt.
    Transaction,
    /// The wallet item created by `Create`.
    WalletInit,
    /// The user-to-wallet link created by `Create`.
    UserLink,
    /// The single wallet balance mutated by `Deposit`.
    Balance,
    /// The source wallet balance debited by `Transfer`.
    Debit,
    /// The target wallet balance credited by `Transfer`.
    Credit,
}

fn reason_for(
    roles: &[SlotRole],
    reasons: &[Option<CancellationReason>],
    role: SlotRole,
) -> Option<CancellationReason> {
    roles
        .iter()
        .zip(reasons.iter())
        .find(|(slot, _)| **slot == role)
        .and_then(|(_, reason)| reason.clone())
}

fn has_reason(roles: &[SlotRole], reasons: &[Option<CancellationReason>], role: SlotRole) -> bool {
    reason_for(roles, reasons, role).is_some()
}

/// The payments core: wallet-id generation, key encoding, and
/// the three composite operations, each one call to
/// `transact_write_items`. Holds nothing but a reference to the
/// store — all safety under concurrency is delegated to the
/// backend's transactional primitives.
pub struct WalletEngine<S: Store> {
    store: Arc<S>,
    factory: ItemFactory,
    transaction_ttl_seconds: i64,
}

impl<S: Store> WalletEngine<S> {
    pub fn new(store: Arc<S>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            factory: ItemFactory::new(table_name, "pk"),
            transaction_ttl_seconds: DEFAULT_TRANSACTION_TTL_SECONDS,
        }
    }

    pub fn with_transaction_ttl_seconds(mut self, ttl: i64) -> Self {
        self.transaction_ttl_seconds = ttl;
        self
    }

    fn ttl_from_now(&self) -> i64 {
        now_unix_seconds() + self.transaction_ttl_seconds
    }

    /// Creates a new wallet for `user_id`. Fails with
    /// `WalletAlreadyExistsForUser` if the user already owns a
    /// wallet, or `TransactionAlreadyRegistered` on a reused create
    /// attempt (including the vanishingly unlikely UUID collision,
    /// since the two are deliberately not distinguished).
    pub async fn create(&self, user_id: &str) -> Result<WalletId, EngineError> {
        let wallet_id = WalletId::generate();

        let mut payload = wallet_store::AttributeMap::new();
        payload.insert("amount".into(), 0u64.into());

        let mut tx_data = wallet_store::AttributeMap::new();
        tx_data.insert("type".into(), "create".into());
        tx_data.insert("data".into(), payload.into());
        tx_data.insert("ttl".into(), self.ttl_from_now().into());

        let mut wallet_data = wallet_store::AttributeMap::new();
        wallet_data.insert("balance".into(), 0u64.into());

        let mut user_data = wallet_store::AttributeMap::new();
        user_data.insert("wallet".into(), wallet_id.to_string().into());

        let ops = vec![
            self.factory
                .put_if_absent(create_transaction_key(wallet_id), tx_data),
            self.factory.put_if_absent(wallet_key(wallet_id), wallet_data),
            self.factory.put_if_absent(user_key(user_id), user_data),
        ];
        let roles = [SlotRole::Transaction, SlotRole::WalletInit, SlotRole::UserLink];

        match self.store.transact_write_items(ops).await {
            Ok(()) => {
                tracing::info!(wallet_id = %wallet_id, %user_id, "wallet created");
                Ok(wallet_id)
            }
            Err(StoreError::MultiOpCancelled(reasons)) => {
                tracing::warn!(%user_id, "create cancelled");
                if has_reason(&roles, &reasons, SlotRole::Transaction)
                    || has_reason(&roles, &reasons, SlotRole::WalletInit)
                {
                    Err(EngineError::TransactionAlreadyRegistered)
                } else if has_reason(&roles, &reasons, SlotRole::UserLink) {
                    Err(EngineError::WalletAlreadyExistsForUser)
                } else {
                    Err(EngineError::Unknown)
                }
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Credits `amount` to `wallet_id`. `nonce` makes the
    /// operation idempotent: a replay with the same `(wallet_id,
    /// nonce)` fails with `TransactionAlreadyRegistered` rather than
    /// crediting the wallet twice.
    pub async fn deposit(
        &self,
        wallet_id: WalletId,
        amount: Amount,
        nonce: &Nonce,
    ) -> Result<(), EngineError> {
        let mut payload = wallet_store::AttributeMap::new();
        payload.insert("amount".into(), amount.get().into());

        let mut tx_data = wallet_store::AttributeMap::new();
        tx_data.insert("type".into(), "deposit".into());
        tx_data.insert("data".into(), payload.into());
        tx_data.insert("ttl".into(), self.ttl_from_now().into());

        let balance_op = self
            .factory
            .add_if_exists(wallet_key(wallet_id), "balance", amount.get())
            .map_err(|e| EngineError::Invalid(e.to_string()))?;

        let ops = vec![
            self.factory
                .put_if_absent(nonced_transaction_key(wallet_id, nonce), tx_data),
            balance_op,
        ];
        let roles = [SlotRole::Transaction, SlotRole::Balance];

        match self.store.transact_write_items(ops).await {
            Ok(()) => {
                tracing::info!(%wallet_id, %amount, %nonce, "deposit applied");
                Ok(())
            }
            Err(StoreError::MultiOpCancelled(reasons)) => {
                tracing::warn!(%wallet_id, %nonce, "deposit cancelled");
                if has_reason(&roles, &reasons, SlotRole::Transaction) {
                    Err(EngineError::TransactionAlreadyRegistered)
                } else if has_reason(&roles, &reasons, SlotRole::Balance) {
                    Err(EngineError::WalletNotFound)
                } else {
                    Err(EngineError::Unknown)
                }
            }
            Err(StoreError::TransactionConflict) => Err(EngineError::TransactionConflict),
            Err(other) => Err(other.into()),
        }
    }

    /// Moves `amount` from `source_id` to `target_id`.
    /// Rejects `source_id == target_id` locally. A missing source
    /// wallet is indistinguishable from insufficient funds and is
    /// reported as `InsufficientFunds` either way.
    pub async fn transfer(
        &self,
        source_id: WalletId,
        target_id: WalletId,
        amount: Amount,
        nonce: &Nonce,
    ) -> Result<(), EngineError> {
        if source_id == target_id {
            return Err(EngineError::Invalid("source and target wallets must differ".into()));
        }

        let mut payload = wallet_store::AttributeMap::new();
        payload.insert("amount".into(), amount.get().into());
        payload.insert("target_wallet".into(), target_id.to_string().into());

        let mut tx_data = wallet_store::AttributeMap::new();
        tx_data.insert("type".into(), "transfer".into());
        tx_data.insert("data".into(), payload.into());
        tx_data.insert("ttl".into(), self.ttl_from_now().into());

        let debit_op = self
            .factory
            .subtract_if_at_least(wallet_key(source_id), "balance", amount.get())
            .map_err(|e| EngineError::Invalid(e.to_string()))?;
        let credit_op = self
            .factory
            .add_if_exists(wallet_key(target_id), "balance", amount.get())
            .map_err(|e| EngineError::Invalid(e.to_string()))?;

        let ops = vec![
            self.factory
                .put_if_absent(nonced_transaction_key(source_id, nonce), tx_data),
            debit_op,
            credit_op,
        ];
        let roles = [SlotRole::Transaction, SlotRole::Debit, SlotRole::Credit];

        match self.store.transact_write_items(ops).await {
            Ok(()) => {
                tracing::info!(%source_id, %target_id, %amount, %nonce, "transfer applied");
                Ok(())
            }
            Err(StoreError::MultiOpCancelled(reasons)) => {
                tracing::warn!(%source_id, %target_id, %nonce, "transfer cancelled");
                if has_reason(&roles, &reasons, SlotRole::Transaction) {
                    Err(EngineError::TransactionAlreadyRegistered)
                } else if has_reason(&roles, &reasons, SlotRole::Debit) {
                    Err(EngineError::InsufficientFunds)
                } else if has_reason(&roles, &reasons, SlotRole::Credit) {
                    Err(EngineError::WalletNotFound)
                } else {
                    Err(EngineError::Unknown)
                }
            }
            Err(StoreError::TransactionConflict) => Err(EngineError::TransactionConflict),
            Err(other) => Err(other.into()),
        }
    }

    /// Reads the authoritative current balance of `wallet_id`.
    pub async fn get_balance(&self, wallet_id: WalletId) -> Result<u64, EngineError> {
        match self.store.get(&wallet_key(wallet_id), Some(&["balance"])).await {
            Ok(item) => Ok(item
                .get("balance")
                .and_then(wallet_store::AttrValue::as_int)
                .unwrap_or(0)),
            Err(StoreError::NotFound) => Err(EngineError::WalletNotFound),
            Err(other) => Err(other.into()),
        }
    }
}

fn now_unix_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
