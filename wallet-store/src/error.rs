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

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::CancellationReason as SdkCancellationReason;

/// The reason a single operation inside a cancelled transaction did
/// not commit. One slot is returned per submitted operation; a `None`
/// slot means that operation neither caused nor was affected by the
/// cancellation (per the DynamoDB `TransactWriteItems` contract).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellationReason {
    ConditionalCheckFailed,
    TransactionConflict,
    ValidationError,
    Other(String),
}

/// The fixed backend error taxonomy. Every `Store` method
/// funnels its failures through this type; nothing upstream ever
/// matches on a raw AWS error code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("item not found")]
    NotFound,
    #[error("conditional check failed")]
    ConditionalCheckFailed,
    #[error("transaction conflict")]
    TransactionConflict,
    #[error("validation error: {0}")]
    Validation(String),
    #[error("transaction cancelled")]
    MultiOpCancelled(Vec<Option<CancellationReason>>),
    #[error("unknown backend error")]
    Unknown,
}

fn classify_code(code: Option<&str>) -> Error {
    match code {
        Some("ConditionalCheckFailedException") => Error::ConditionalCheckFailed,
        Some("TransactionConflictException") => Error::TransactionConflict,
        Some("ResourceNotFoundException") => Error::NotFound,
        Some("ValidationException") => Error::Validation("request failed validation".into()),
        _ => Error::Unknown,
    }
}

fn classify_cancellation_reason(reason: &SdkCancellationReason) -> Option<CancellationReason> {
    match reason.code() {
        None => None,
        Some("None") => None,
        Some("ConditionalCheckFailed") => Some(CancellationReason::ConditionalCheckFailed),
        Some("TransactionConflict") => Some(CancellationReason::TransactionConflict),
        Some("ValidationError") => Some(CancellationReason::ValidationError),
        Some(other) => Some(CancellationReason::Other(other.to_owned())),
    }
}

impl Error {
    /// Classifies a `TransactWriteItems` failure: a positional list of
    /// cancellation reasons if the backend reports one, otherwise the
    /// single-operation error code taxonomy.
    pub fn from_transact_write_error(err: SdkError<TransactWriteItemsError>) -> Error {
        match err {
            SdkError::ServiceError(service_err) => match service_err.into_err() {
                TransactWriteItemsError::TransactionCanceledException(e) => {
                    let reasons = e
                        .cancellation_reasons()
                        .iter()
                        .map(classify_cancellation_reason)
                        .collect();
                    Error::MultiOpCancelled(reasons)
                }
                TransactWriteItemsError::TransactionConflictException(_) => {
                    Error::TransactionConflict
                }
                TransactWriteItemsError::ResourceNotFoundException(_) => Error::NotFound,
                other => classify_code(other.code()),
            },
            _ => Error::Unknown,
        }
    }

    pub fn from_get_item_error(err: SdkError<GetItemError>) -> Error {
        match err {
            SdkError::ServiceError(service_err) => classify_code(service_err.err().code()),
            _ => Error::Unknown,
        }
    }

    pub fn from_put_item_error(err: SdkError<PutItemError>) -> Error {
        match err {
            SdkError::ServiceError(service_err) => match service_err.into_err() {
                PutItemError::ConditionalCheckFailedException(_) => Error::ConditionalCheckFailed,
                other => classify_code(other.code()),
            },
            _ => Error::Unknown,
        }
    }

    pub fn from_delete_item_error(err: SdkError<DeleteItemError>) -> Error {
        match err {
            SdkError::ServiceError(service_err) => match service_err.into_err() {
                DeleteItemError::ConditionalCheckFailedException(_) => Error::NotFound,
                other => classify_code(other.code()),
            },
            _ => Error::Unknown,
        }
    }
}
