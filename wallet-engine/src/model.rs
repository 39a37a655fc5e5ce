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

use std::fmt;

use uuid::Uuid;

/// A wallet identifier: a UUIDv4, always rendered in standard
/// lowercase 8-4-4-4-12 form (part of the on-disk key
/// contract, not just a display nicety).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletId(Uuid);

impl WalletId {
    /// Generates a fresh wallet id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for WalletId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for WalletId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// A non-negative balance quantity in minor units. Represented as an
/// unsigned integer so the non-negative-balance invariant is
/// encoded directly by the type rather than checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    /// Builds an `Amount`, rejecting zero — every engine operation
    /// that takes an amount requires it strictly positive.
    pub fn new(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied idempotency token: a string of 8–16 characters.
/// Character class is not restricted here beyond length — the
/// hex-convention is an HTTP-layer schema concern, not an engine
/// precondition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if (8..=16).contains(&value.len()) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
