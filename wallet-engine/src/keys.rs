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

use crate::model::{Nonce, WalletId};

/// Key-encoding helpers implementing the on-disk contract.
/// Every suffix and separator here is load-bearing: changing one
/// changes the primary key of every item already written.
pub fn wallet_key(id: WalletId) -> String {
    format!("{id}#wallet")
}

pub fn user_key(user_id: &str) -> String {
    format!("{user_id}#user")
}

pub fn create_transaction_key(id: WalletId) -> String {
    format!("{id}#transaction")
}

pub fn nonced_transaction_key(id: WalletId, nonce: &Nonce) -> String {
    format!("{id}_{nonce}#transaction")
}
