//! Lookups built from a current-object read plus record queries
//!
//! The key-message reads and the account lookup return `Result`. The brand
//! and key-message-fact lookups never fail: they fold every error into an
//! envelope with `success: false`.

use serde_json::Value;

use crate::bridge::{bridge, object_field};
use crate::client::ClmClient;
use crate::envelope::{BrandEnvelope, KeyMessageEnvelope};
use crate::error::{ClmError, Result};
use crate::host::ClmHost;
use crate::query::{QueryRequest, Record};

pub const CURRENT_KEY_MESSAGE: &str = "KeyMessage";
pub const ACCOUNT_OBJECT: &str = "Account";
pub const PRODUCT_OBJECT: &str = "Product_vod__c";
pub const ACCOUNT_KEY_MESSAGE_OBJECT: &str = "Account_Key_Message__c";
pub const KEY_MESSAGE_FACT_OBJECT: &str = "Account_Key_Message_Fact__c";

const ZOOM_ACTION: &str = "Zoom_vod";

impl<H: ClmHost> ClmClient<H> {
    async fn current_object(&self, object: &str, field: &str) -> Result<Value> {
        bridge("getDataForCurrentObject", |cb| {
            self.host().get_data_for_current_object(object, field, cb)
        })
        .await
    }

    /// CLM id of the key message being shown
    pub async fn get_clm_slide_id(&self) -> Result<String> {
        let response = self.current_object(CURRENT_KEY_MESSAGE, "CLM_ID_vod__c").await?;
        object_field(&response, CURRENT_KEY_MESSAGE, "CLM_ID_vod__c")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ClmError::HostCall {
                message: "Failed to get CLM ID".into(),
            })
    }

    /// Whether the current key message lists zoom among its disabled actions.
    /// A key message without disabled actions allows zoom.
    pub async fn is_zoom_disabled(&self) -> Result<bool> {
        let response = self
            .current_object(CURRENT_KEY_MESSAGE, "Disable_Actions_vod__c")
            .await?;
        let actions = object_field(&response, CURRENT_KEY_MESSAGE, "Disable_Actions_vod__c");
        let disabled = match actions {
            None => false,
            Some(Value::String(actions)) => actions.contains(ZOOM_ACTION),
            Some(other) => other.to_string().contains(ZOOM_ACTION),
        };
        Ok(disabled)
    }

    /// The account the call is being made on, as the viewer reports it
    pub async fn current_account(&self) -> Result<Record> {
        let response = self.current_object(ACCOUNT_OBJECT, "Id").await?;
        tracing::debug!("Current account response: {}", response);
        response
            .get(ACCOUNT_OBJECT)
            .and_then(Record::from_value)
            .ok_or_else(|| ClmError::HostCall {
                message: "response carried no Account".into(),
            })
    }

    /// Full account row for the current account, projected per `account.fields`
    pub async fn get_account(&self) -> Result<Record> {
        let current = self.current_account().await?;
        let account_id = current.require("Id")?;
        let account = &self.config().account;

        self.query(
            QueryRequest::new(ACCOUNT_OBJECT, format!("WHERE Id = '{account_id}'"))?
                .fields(account.fields.iter().cloned())
                .sort(account.sort.clone())
                .limit(1),
        )
        .await
        .first("account")
    }

    /// Brand key messages for `customer_id`, looked up by product name.
    ///
    /// `product_ids` is only checked for presence; a missing value is
    /// logged, not fatal.
    pub async fn get_brand(
        &self,
        product_name: &str,
        product_ids: Option<&str>,
        customer_id: &str,
    ) -> BrandEnvelope {
        if product_ids.is_none_or(|ids| ids.trim().is_empty()) {
            tracing::warn!("Product id is missing");
        }

        let product = match self.find_product(product_name, customer_id).await {
            Ok(product) => product,
            Err(err) => {
                tracing::warn!(product_name, "Brand lookup failed: {}", err);
                return BrandEnvelope::failure(&err);
            }
        };

        self.get_brand_info_data(product_name, &product, customer_id)
            .await
    }

    async fn find_product(&self, product_name: &str, customer_id: &str) -> Result<Record> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(ClmError::missing_input("product name"));
        }
        if customer_id.trim().is_empty() {
            return Err(ClmError::missing_input("customer id"));
        }

        self.query(
            QueryRequest::new(PRODUCT_OBJECT, format!("WHERE Name = '{product_name}'"))?
                .fields(["Id", "External_ID_vod__c"])
                .sort("Name, ASC")
                .limit(1),
        )
        .await
        .first("product")
    }

    /// Second half of [`get_brand`](Self::get_brand): the
    /// `Account_Key_Message__c` row keyed `customerId:productExternalId`.
    pub async fn get_brand_info_data(
        &self,
        brand_name: &str,
        product: &Record,
        customer_id: &str,
    ) -> BrandEnvelope {
        match self.brand_info(brand_name, product, customer_id).await {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(brand_name, "Brand info lookup failed: {}", err);
                BrandEnvelope::failure(&err)
            }
        }
    }

    async fn brand_info(
        &self,
        brand_name: &str,
        product: &Record,
        customer_id: &str,
    ) -> Result<BrandEnvelope> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(ClmError::missing_input("customer id"));
        }
        let product_id = product.require("Id")?;
        let external_id = product.require("External_ID_vod__c")?;

        let fact = self
            .query(
                QueryRequest::new(
                    ACCOUNT_KEY_MESSAGE_OBJECT,
                    format!("WHERE External_Id__c = '{customer_id}:{external_id}'"),
                )?
                .fields(["Id", "KeyMessageCodes__c", "KeyMessage__c"])
                .sort("Name, ASC")
                .limit(1),
            )
            .await
            .first("account key message")?;

        Ok(BrandEnvelope::success(brand_name, product_id, &fact))
    }

    /// Key-message fact whose internal or external id equals `id`.
    /// An absent id fails immediately without querying.
    pub async fn get_key_message_data(&self, id: Option<&str>) -> KeyMessageEnvelope {
        let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
            let err = ClmError::missing_input("External_Id__c");
            tracing::warn!("{}", err);
            return KeyMessageEnvelope::failure(&err);
        };

        match self.key_message_fact(id).await {
            Ok(fact) => KeyMessageEnvelope::success(&fact),
            Err(err) => {
                tracing::error!(id, "Key message lookup failed: {}", err);
                KeyMessageEnvelope::failure(&err)
            }
        }
    }

    async fn key_message_fact(&self, id: &str) -> Result<Record> {
        self.query(
            QueryRequest::new(
                KEY_MESSAGE_FACT_OBJECT,
                format!("WHERE Id = '{id}' or External_Id__c = '{id}'"),
            )?
            .fields(["Id", "Type__c", "Value__c", "External_Id__c"])
            .sort("Type__c, ASC")
            .limit(1),
        )
        .await
        .first("key message fact")
    }
}
