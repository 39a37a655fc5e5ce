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

//! The wallet transaction engine: wallet-id generation, key
//! encoding, and the three composite operations `create`, `deposit`,
//! and `transfer`, plus `get_balance`. Depends only on
//! `wallet_store`'s `Store` trait, never on a concrete backend.

pub mod engine;
pub mod error;
pub mod keys;
pub mod model;

pub use engine::WalletEngine;
pub use error::EngineError;
pub use model::{Amount, Nonce, WalletId};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wallet_store::MemoryStore;

    use super::*;

    fn engine() -> WalletEngine<MemoryStore> {
        WalletEngine::new(Arc::new(MemoryStore::new()), "wallet")
    }

    #[tokio::test]
    async fn deposit_transaction_record_nests_payload_under_data() {
        use wallet_store::Store;

        let store = Arc::new(MemoryStore::new());
        let engine = WalletEngine::new(Arc::clone(&store), "wallet");
        let id = engine.create("user-1").await.unwrap();
        let nonce = Nonce::new("abcdef01").unwrap();
        engine
            .deposit(id, Amount::new(500).unwrap(), &nonce)
            .await
            .unwrap();

        let record = store
            .get(&format!("{id}_{nonce}#transaction"), None)
            .await
            .unwrap();
        assert_eq!(
            record.get("type").and_then(wallet_store::AttrValue::as_str),
            Some("deposit")
        );
        let data = record
            .get("data")
            .and_then(wallet_store::AttrValue::as_map)
            .expect("data is a nested map");
        assert_eq!(data.get("amount").and_then(wallet_store::AttrValue::as_int), Some(500));
    }

    #[tokio::test]
    async fn create_then_get_balance_is_zero() {
        let engine = engine();
        let id = engine.create("user-1").await.unwrap();
        assert_eq!(engine.get_balance(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_create_for_same_user_is_rejected() {
        let engine = engine();
        engine.create("user-1").await.unwrap();
        let err = engine.create("user-1").await.unwrap_err();
        assert_eq!(err, EngineError::WalletAlreadyExistsForUser);
    }

    #[tokio::test]
    async fn deposit_increases_balance() {
        let engine = engine();
        let id = engine.create("user-1").await.unwrap();
        let nonce = Nonce::new("abcdef01").unwrap();
        engine
            .deposit(id, Amount::new(1000).unwrap(), &nonce)
            .await
            .unwrap();
        assert_eq!(engine.get_balance(id).await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn deposit_replay_with_same_nonce_is_rejected_and_balance_unchanged() {
        let engine = engine();
        let id = engine.create("user-1").await.unwrap();
        let nonce = Nonce::new("abcdef01").unwrap();
        engine
            .deposit(id, Amount::new(1000).unwrap(), &nonce)
            .await
            .unwrap();
        let err = engine
            .deposit(id, Amount::new(1000).unwrap(), &nonce)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::TransactionAlreadyRegistered);
        assert_eq!(engine.get_balance(id).await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn deposit_to_missing_wallet_is_not_found() {
        let engine = engine();
        let missing = WalletId::generate();
        let nonce = Nonce::new("abcdef01").unwrap();
        let err = engine
            .deposit(missing, Amount::new(1000).unwrap(), &nonce)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::WalletNotFound);
    }

    #[tokio::test]
    async fn transfer_moves_balance_between_wallets() {
        let engine = engine();
        let source = engine.create("user-1").await.unwrap();
        let target = engine.create("user-2").await.unwrap();
        engine
            .deposit(source, Amount::new(1000).unwrap(), &Nonce::new("abcdef01").unwrap())
            .await
            .unwrap();

        engine
            .transfer(
                source,
                target,
                Amount::new(100).unwrap(),
                &Nonce::new("deadbeef").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(engine.get_balance(source).await.unwrap(), 900);
        assert_eq!(engine.get_balance(target).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn transfer_from_missing_source_is_insufficient_funds() {
        let engine = engine();
        let target = engine.create("user-2").await.unwrap();
        let missing = WalletId::generate();

        let err = engine
            .transfer(
                missing,
                target,
                Amount::new(10).unwrap(),
                &Nonce::new("deadbeef").unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::InsufficientFunds);
        assert_eq!(engine.get_balance(target).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn transfer_to_missing_target_is_not_found_and_source_unchanged() {
        let engine = engine();
        let source = engine.create("user-1").await.unwrap();
        engine
            .deposit(source, Amount::new(1000).unwrap(), &Nonce::new("abcdef01").unwrap())
            .await
            .unwrap();
        let missing = WalletId::generate();

        let err = engine
            .transfer(
                source,
                missing,
                Amount::new(10).unwrap(),
                &Nonce::new("deadbeef").unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::WalletNotFound);
        assert_eq!(engine.get_balance(source).await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn self_transfer_is_rejected_locally() {
        let engine = engine();
        let id = engine.create("user-1").await.unwrap();
        let err = engine
            .transfer(id, id, Amount::new(10).unwrap(), &Nonce::new("deadbeef").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Invalid(_)));
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_source_balance_unchanged() {
        let engine = engine();
        let source = engine.create("user-1").await.unwrap();
        let target = engine.create("user-2").await.unwrap();
        engine
            .deposit(source, Amount::new(5).unwrap(), &Nonce::new("abcdef01").unwrap())
            .await
            .unwrap();

        let err = engine
            .transfer(
                source,
                target,
                Amount::new(10).unwrap(),
                &Nonce::new("deadbeef").unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::InsufficientFunds);
        assert_eq!(engine.get_balance(source).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn five_concurrent_transfers_conserve_total_balance() {
        let engine = Arc::new(engine());
        let source = engine.create("user-1").await.unwrap();
        let t1 = engine.create("user-2").await.unwrap();
        let t2 = engine.create("user-3").await.unwrap();
        engine
            .deposit(source, Amount::new(5).unwrap(), &Nonce::new("abcdef01").unwrap())
            .await
            .unwrap();

        let nonces = [
            "nonce0001", "nonce0002", "nonce0003", "nonce0004", "nonce0005",
        ];
        let targets = [t1, t1, t2, t2, t1];

        let mut handles = Vec::new();
        for (nonce, target) in nonces.into_iter().zip(targets) {
            let engine = Arc::clone(&engine);
            let nonce = Nonce::new(nonce).unwrap();
            handles.push(tokio::spawn(async move {
                engine.transfer(source, target, Amount::new(1).unwrap(), &nonce).await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(EngineError::TransactionConflict) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(successes + conflicts, 5);

        let total = engine.get_balance(source).await.unwrap()
            + engine.get_balance(t1).await.unwrap()
            + engine.get_balance(t2).await.unwrap();
        assert_eq!(total, 5);
    }
}
