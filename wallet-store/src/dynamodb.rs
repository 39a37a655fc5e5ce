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
use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, Put,
    ProvisionedThroughput, ScalarAttributeType, TimeToLiveSpecification, TransactWriteItem, Update,
};
use aws_sdk_dynamodb::Client;

use crate::error::Error;
use crate::item_factory::WriteOp;
use crate::store::{check_batch_size, Store, TableAdmin};
use crate::types::{AttrValue, AttributeMap};

const PK_ATTRIBUTE_NAME: &str = "pk";

/// `Store` implementation over the AWS DynamoDB SDK. Holds a
/// long-lived, already-configured client: the client's
/// connection pool, retry count and timeouts are set up once at
/// process start (see `wallet-api`'s `Config`) and shared across all
/// requests behind an `Arc`.
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn to_av(value: &AttrValue) -> AttributeValue {
        match value {
            AttrValue::S(s) => AttributeValue::S(s.clone()),
            AttrValue::N(n) => AttributeValue::N(n.to_string()),
            AttrValue::Bool(b) => AttributeValue::Bool(*b),
            AttrValue::Null => AttributeValue::Null(true),
            AttrValue::M(m) => {
                AttributeValue::M(m.iter().map(|(k, v)| (k.clone(), Self::to_av(v))).collect())
            }
        }
    }

    fn from_av(value: &AttributeValue) -> AttrValue {
        match value {
            AttributeValue::S(s) => AttrValue::S(s.clone()),
            AttributeValue::N(n) => AttrValue::N(n.parse::<u64>().unwrap_or_default()),
            AttributeValue::Bool(b) => AttrValue::Bool(*b),
            AttributeValue::M(m) => {
                AttrValue::M(m.iter().map(|(k, v)| (k.clone(), Self::from_av(v))).collect())
            }
            _ => AttrValue::Null,
        }
    }

    fn serialize_item(&self, pk: &str, data: &AttributeMap) -> HashMap<String, AttributeValue> {
        let mut item: HashMap<String, AttributeValue> = data
            .iter()
            .map(|(k, v)| (k.clone(), Self::to_av(v)))
            .collect();
        item.insert(PK_ATTRIBUTE_NAME.to_owned(), AttributeValue::S(pk.to_owned()));
        item
    }

    fn build_transact_item(op: &WriteOp) -> TransactWriteItem {
        match op {
            WriteOp::PutIfAbsent {
                table,
                pk_field,
                pk,
                data,
            } => {
                let mut item: HashMap<String, AttributeValue> = data
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::to_av(v)))
                    .collect();
                item.insert(pk_field.clone(), AttributeValue::S(pk.clone()));

                let put = Put::builder()
                    .table_name(table)
                    .set_item(Some(item))
                    .condition_expression("attribute_not_exists(#key)")
                    .expression_attribute_names("#key", pk_field)
                    .build()
                    .expect("well-formed Put");
                TransactWriteItem::builder().put(put).build()
            }
            WriteOp::AddIfExists {
                table,
                pk_field,
                pk,
                attr,
                amount,
            } => {
                let update = Update::builder()
                    .table_name(table)
                    .key(pk_field, AttributeValue::S(pk.clone()))
                    .update_expression("SET #attr = #attr + :n")
                    .condition_expression("attribute_exists(#key)")
                    .expression_attribute_names("#key", pk_field)
                    .expression_attribute_names("#attr", attr)
                    .expression_attribute_values(":n", AttributeValue::N(amount.to_string()))
                    .build()
                    .expect("well-formed Update");
                TransactWriteItem::builder().update(update).build()
            }
            WriteOp::SubtractIfAtLeast {
                table,
                pk_field,
                pk,
                attr,
                amount,
            } => {
                let update = Update::builder()
                    .table_name(table)
                    .key(pk_field, AttributeValue::S(pk.clone()))
                    .update_expression("SET #attr = #attr - :n")
                    .condition_expression("#attr >= :n")
                    .expression_attribute_names("#attr", attr)
                    .expression_attribute_values(":n", AttributeValue::N(amount.to_string()))
                    .build()
                    .expect("well-formed Update");
                TransactWriteItem::builder().update(update).build()
            }
        }
    }
}

#[async_trait::async_trait]
impl Store for DynamoDbStore {
    async fn get(&self, pk: &str, fields: Option<&[&str]>) -> Result<AttributeMap, Error> {
        let mut request = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PK_ATTRIBUTE_NAME, AttributeValue::S(pk.to_owned()));

        if let Some(fields) = fields {
            request = request.projection_expression(fields.join(","));
        }

        let response = request.send().await.map_err(Error::from_get_item_error)?;

        let item = response.item.ok_or(Error::NotFound)?;
        Ok(item
            .iter()
            .filter(|(k, _)| k.as_str() != PK_ATTRIBUTE_NAME)
            .map(|(k, v)| (k.clone(), Self::from_av(v)))
            .collect())
    }

    async fn put(&self, pk: &str, data: AttributeMap) -> Result<(), Error> {
        let item = self.serialize_item(pk, &data);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#key)")
            .expression_attribute_names("#key", PK_ATTRIBUTE_NAME)
            .send()
            .await
            .map_err(Error::from_put_item_error)?;
        Ok(())
    }

    async fn delete(&self, pk: &str) -> Result<(), Error> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(PK_ATTRIBUTE_NAME, AttributeValue::S(pk.to_owned()))
            .condition_expression("attribute_exists(#key)")
            .expression_attribute_names("#key", PK_ATTRIBUTE_NAME)
            .send()
            .await
            .map_err(Error::from_delete_item_error)?;
        Ok(())
    }

    async fn transact_write_items(&self, ops: Vec<WriteOp>) -> Result<(), Error> {
        check_batch_size(&ops)?;

        let items: Vec<TransactWriteItem> = ops.iter().map(Self::build_transact_item).collect();

        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(Error::from_transact_write_error)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TableAdmin for DynamoDbStore {
    async fn table_exists(&self) -> Result<bool, Error> {
        let response = self
            .client
            .list_tables()
            .send()
            .await
            .map_err(|_| Error::Unknown)?;
        Ok(response
            .table_names()
            .iter()
            .any(|name| name == &self.table_name))
    }

    async fn create_table(
        &self,
        read_capacity: i64,
        write_capacity: i64,
        ttl_attribute: Option<&str>,
    ) -> Result<(), Error> {
        let key_schema = KeySchemaElement::builder()
            .attribute_name(PK_ATTRIBUTE_NAME)
            .key_type(KeyType::Hash)
            .build()
            .expect("well-formed KeySchemaElement");
        let attribute_definition = AttributeDefinition::builder()
            .attribute_name(PK_ATTRIBUTE_NAME)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .expect("well-formed AttributeDefinition");

        self.client
            .create_table()
            .table_name(&self.table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute_definition)
            .billing_mode(BillingMode::Provisioned)
            .provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(read_capacity)
                    .write_capacity_units(write_capacity)
                    .build()
                    .expect("well-formed ProvisionedThroughput"),
            )
            .send()
            .await
            .map_err(|_| Error::Unknown)?;

        tracing::info!(table = %self.table_name, "waiting for table to become active");
        self.wait_until_active().await?;
        tracing::info!(table = %self.table_name, "table created");

        if let Some(ttl_attribute) = ttl_attribute {
            self.client
                .update_time_to_live()
                .table_name(&self.table_name)
                .time_to_live_specification(
                    TimeToLiveSpecification::builder()
                        .enabled(true)
                        .attribute_name(ttl_attribute)
                        .build()
                        .expect("well-formed TimeToLiveSpecification"),
                )
                .send()
                .await
                .map_err(|_| Error::Unknown)?;
        }

        Ok(())
    }

    async fn drop_table(&self) -> Result<(), Error> {
        self.client
            .delete_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|_| Error::Unknown)?;

        tracing::info!(table = %self.table_name, "waiting for table deletion");
        self.wait_until_deleted().await?;
        tracing::info!(table = %self.table_name, "table dropped");
        Ok(())
    }
}

impl DynamoDbStore {
    /// Polls `DescribeTable` until the table reports `ACTIVE`, the
    /// same blocking contract the backend's own `table_exists`
    /// waiter provides.
    async fn wait_until_active(&self) -> Result<(), Error> {
        loop {
            let response = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await;
            if let Ok(response) = response {
                if let Some(table) = response.table() {
                    if table.table_status().map(|s| s.as_str()) == Some("ACTIVE") {
                        return Ok(());
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    async fn wait_until_deleted(&self) -> Result<(), Error> {
        loop {
            let response = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await;
            match response {
                Err(_) => return Ok(()),
                Ok(_) => tokio::time::sleep(Duration::from_millis(500)).await,
            }
        }
    }
}
