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

use serde::{de, Deserialize, Deserializer, Serialize};

use wallet_engine::{Amount, Nonce, WalletId};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct WalletCreateRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub id: String,
    pub balance: String,
}

impl WalletResponse {
    pub fn new(id: WalletId, balance: u64) -> Self {
        Self {
            id: id.to_string(),
            balance: balance.to_string(),
        }
    }
}

/// `{amount: decimal-string, nonce: hex 8-16}`. Validated at
/// deserialization time so malformed input never reaches the engine
/// (a local precondition) — `amount`/`nonce` are rejected here
/// with the same 422 the engine's own preconditions would produce,
/// just before the engine is ever called.
#[derive(Debug, Deserialize)]
pub struct MutationRequest {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Amount,
    #[serde(deserialize_with = "deserialize_nonce")]
    pub nonce: Nonce,
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_amount(&raw).map_err(de::Error::custom)
}

fn deserialize_nonce<'de, D>(deserializer: D) -> Result<Nonce, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_nonce(&raw).map_err(de::Error::custom)
}

/// `amount` is a base-10 string matching `\d+`, length 1-20.
pub fn parse_amount(raw: &str) -> Result<Amount, String> {
    if raw.is_empty() || raw.len() > 20 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("amount must be a non-negative integer string of length 1-20, got {raw:?}"));
    }
    let value: u64 = raw
        .parse()
        .map_err(|_| format!("amount {raw:?} does not fit in 64 bits"))?;
    Amount::new(value).ok_or_else(|| "amount must be greater than 0".to_owned())
}

/// `nonce` is 8-16 characters, hex-convention but validated only on
/// length and character class.
pub fn parse_nonce(raw: &str) -> Result<Nonce, String> {
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("nonce {raw:?} must be hex characters"));
    }
    Nonce::new(raw).ok_or_else(|| format!("nonce must be 8-16 characters, got length {}", raw.len()))
}

pub fn parse_wallet_id(raw: &str) -> Result<WalletId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("{raw:?} is not a valid wallet id")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-1")]
    #[case::non_numeric("abc")]
    #[case::empty("")]
    #[case::decimal_point("10.5")]
    #[case::too_long(&"1".repeat(21))]
    fn parse_amount_rejects(#[case] raw: &str) {
        assert!(parse_amount(raw).is_err());
    }

    #[rstest]
    #[case::one("1")]
    #[case::leading_zeros("0001000")]
    #[case::max_length(&u64::MAX.to_string())]
    fn parse_amount_accepts(#[case] raw: &str) {
        assert!(parse_amount(raw).is_ok());
    }

    #[rstest]
    #[case::length_7(&"a".repeat(7))]
    #[case::length_17(&"a".repeat(17))]
    #[case::empty("")]
    #[case::non_hex("ghijklmn")]
    fn parse_nonce_rejects(#[case] raw: &str) {
        assert!(parse_nonce(raw).is_err());
    }

    #[rstest]
    #[case::length_8(&"a".repeat(8))]
    #[case::length_16(&"a".repeat(16))]
    fn parse_nonce_accepts(#[case] raw: &str) {
        assert!(parse_nonce(raw).is_ok());
    }
}
