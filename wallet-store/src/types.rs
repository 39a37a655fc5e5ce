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

/// A single attribute value in the store's native wire encoding.
///
/// Kept deliberately narrow: the engine only ever needs strings,
/// integers, booleans, nulls, and one level of nested map (for a
/// transaction record's opaque `data` attribute), never lists, sets
/// or binary blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    S(String),
    N(u64),
    Bool(bool),
    Null,
    M(AttributeMap),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            AttrValue::N(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&AttributeMap> {
        match self {
            AttrValue::M(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::S(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::S(value)
    }
}

/// Only non-negative values occur in practice (Unix timestamps,
/// balances); a negative `i64` clamps to zero rather than wrapping.
impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::N(value.try_into().unwrap_or(0))
    }
}

impl From<u64> for AttrValue {
    fn from(value: u64) -> Self {
        AttrValue::N(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<AttributeMap> for AttrValue {
    fn from(value: AttributeMap) -> Self {
        AttrValue::M(value)
    }
}

/// The deserialized attributes of one item, keyed by attribute name.
/// Never includes the primary-key attribute itself (mirrors the
/// contract: `Get` strips `pk` from its result).
pub type AttributeMap = HashMap<String, AttrValue>;
