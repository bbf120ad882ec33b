//! Success/failure envelopes returned by the brand and key-message lookups
//!
//! Callers branch on `success` instead of handling errors. Domain fields are
//! always strings: filled on success, empty on failure.

use serde::Serialize;

use crate::error::ClmError;
use crate::query::Record;

pub const SUCCESS_MESSAGE: &str = "Success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandEnvelope {
    pub success: bool,
    pub product: String,
    pub product_id: String,
    pub record_id: String,
    pub key_messages: String,
    pub key_message_codes: String,
    pub message: String,
}

impl BrandEnvelope {
    /// Build from the product id and the matching `Account_Key_Message__c` row
    pub fn success(product: &str, product_id: &str, fact: &Record) -> Self {
        Self {
            success: true,
            product: product.to_string(),
            product_id: product_id.to_string(),
            record_id: fact.text("Id"),
            key_messages: fact.text("KeyMessage__c"),
            key_message_codes: fact.text("KeyMessageCodes__c"),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure(err: &ClmError) -> Self {
        Self {
            success: false,
            product: String::new(),
            product_id: String::new(),
            record_id: String::new(),
            key_messages: String::new(),
            key_message_codes: String::new(),
            message: err.to_string(),
        }
    }
}

/// One `Account_Key_Message_Fact__c` row, serialized with its CRM field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMessageEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Type__c")]
    pub fact_type: String,
    #[serde(rename = "Value__c")]
    pub value: String,
    #[serde(rename = "External_Id__c")]
    pub external_id: String,
}

impl KeyMessageEnvelope {
    pub fn success(fact: &Record) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            id: fact.text("Id"),
            fact_type: fact.text("Type__c"),
            value: fact.text("Value__c"),
            external_id: fact.text("External_Id__c"),
        }
    }

    pub fn failure(err: &ClmError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            id: String::new(),
            fact_type: String::new(),
            value: String::new(),
            external_id: String::new(),
        }
    }
}
