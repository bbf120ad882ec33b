//! Account, brand and key-message lookups against a scripted host

use clm_bridge::config::Config;
use clm_bridge::host::fake::{FakeHost, HostCall, Reply};
use clm_bridge::lookups::{
    ACCOUNT_KEY_MESSAGE_OBJECT, ACCOUNT_OBJECT, CURRENT_KEY_MESSAGE, KEY_MESSAGE_FACT_OBJECT,
    PRODUCT_OBJECT,
};
use clm_bridge::{BrandEnvelope, ClmClient, ClmError};
use serde_json::json;

fn client() -> ClmClient<FakeHost> {
    ClmClient::new(FakeHost::new())
}

#[tokio::test]
async fn test_brand_success_composes_both_queries() {
    let client = client();
    let host = client.host();
    host.respond_rows(
        PRODUCT_OBJECT,
        json!([{"Id": "p01", "External_ID_vod__c": "BRX"}]),
    );
    host.respond_rows(
        ACCOUNT_KEY_MESSAGE_OBJECT,
        json!([{"Id": "akm1", "KeyMessage__c": "KM-A;KM-B", "KeyMessageCodes__c": "A;B"}]),
    );

    let brand = client.get_brand("Brandex", Some("p01"), "C42").await;

    assert_eq!(
        brand,
        BrandEnvelope {
            success: true,
            product: "Brandex".into(),
            product_id: "p01".into(),
            record_id: "akm1".into(),
            key_messages: "KM-A;KM-B".into(),
            key_message_codes: "A;B".into(),
            message: "Success".into(),
        }
    );

    let queries = host.queries();
    assert_eq!(queries[0].filter, "WHERE Name = 'Brandex'");
    assert_eq!(queries[1].collection, ACCOUNT_KEY_MESSAGE_OBJECT);
    assert_eq!(queries[1].filter, "WHERE External_Id__c = 'C42:BRX'");
}

#[tokio::test]
async fn test_unknown_product_yields_empty_failure_envelope() {
    let client = client();
    client.host().respond_rows(PRODUCT_OBJECT, json!([]));

    let brand = client.get_brand("Nothing", Some("x"), "C42").await;

    assert!(!brand.success);
    for field in [
        &brand.product,
        &brand.product_id,
        &brand.record_id,
        &brand.key_messages,
        &brand.key_message_codes,
    ] {
        assert_eq!(field, "");
    }
    assert_eq!(brand.message, "No product record found");
    assert_eq!(client.host().queries().len(), 1);
}

#[tokio::test]
async fn test_missing_product_ids_is_not_fatal() {
    let client = client();
    let host = client.host();
    host.respond_rows(
        PRODUCT_OBJECT,
        json!([{"Id": "p01", "External_ID_vod__c": "BRX"}]),
    );
    host.respond_rows(
        ACCOUNT_KEY_MESSAGE_OBJECT,
        json!([{"Id": "akm1", "KeyMessage__c": "KM-A", "KeyMessageCodes__c": "A"}]),
    );

    let brand = client.get_brand("Brandex", None, "C42").await;
    assert!(brand.success);
}

#[tokio::test]
async fn test_brand_without_customer_skips_queries() {
    let client = client();
    let brand = client.get_brand("Brandex", Some("p01"), " ").await;

    assert!(!brand.success);
    assert_eq!(brand.message, "customer id is missing");
    assert!(client.host().calls().is_empty());
}

#[tokio::test]
async fn test_brand_fact_query_failure_becomes_envelope() {
    let client = client();
    let host = client.host();
    host.respond_rows(
        PRODUCT_OBJECT,
        json!([{"Id": "p01", "External_ID_vod__c": "BRX"}]),
    );
    host.fail_query(ACCOUNT_KEY_MESSAGE_OBJECT, None);

    let brand = client.get_brand("Brandex", Some("p01"), "C42").await;
    assert!(!brand.success);
    assert_eq!(brand.product_id, "");
    assert_eq!(brand.message, "No account key message record found");
}

#[tokio::test]
async fn test_key_message_without_id_issues_no_query() {
    let client = client();

    for id in [None, Some(""), Some("  ")] {
        let envelope = client.get_key_message_data(id).await;
        assert!(!envelope.success);
        assert_eq!(envelope.message, "External_Id__c is missing");
        assert_eq!(envelope.value, "");
    }

    assert!(client.host().calls().is_empty());
}

#[tokio::test]
async fn test_key_message_matches_either_identifier() {
    let client = client();
    client.host().respond_rows(
        KEY_MESSAGE_FACT_OBJECT,
        json!([{"Id": "f1", "Type__c": "Priority", "Value__c": "High", "External_Id__c": "C1:KM1"}]),
    );

    let envelope = client.get_key_message_data(Some("C1:KM1")).await;

    assert!(envelope.success);
    assert_eq!(envelope.message, "Success");
    assert_eq!(envelope.value, "High");

    let queries = client.host().queries();
    assert_eq!(
        queries[0].filter,
        "WHERE Id = 'C1:KM1' or External_Id__c = 'C1:KM1'"
    );
    assert_eq!(queries[0].sort, vec!["Type__c, ASC"]);
}

#[tokio::test]
async fn test_key_message_no_rows_is_failure_envelope() {
    let client = client();
    let envelope = client.get_key_message_data(Some("nope")).await;
    assert!(!envelope.success);
    assert_eq!(envelope.message, "No key message fact record found");
    assert_eq!(envelope.id, "");
}

#[tokio::test]
async fn test_account_uses_current_account_id() {
    let client = client();
    let host = client.host();
    host.respond_current(ACCOUNT_OBJECT, json!({"Id": "001XYZ"}));
    host.respond_rows(
        ACCOUNT_OBJECT,
        json!([{"Id": "001XYZ", "Name": "Dr. Rivera", "Fax": null}]),
    );

    let account = client.get_account().await.unwrap();
    assert_eq!(account.get("Name"), Some("Dr. Rivera"));
    assert_eq!(account.get("Fax"), None);

    let queries = host.queries();
    assert_eq!(queries[0].filter, "WHERE Id = '001XYZ'");
    assert_eq!(queries[0].fields, Config::default().account.fields);
    assert_eq!(queries[0].sort, vec!["Name, ASC"]);
}

#[tokio::test]
async fn test_account_honours_configured_fields() {
    let mut config = Config::default();
    config.account.fields = vec!["Id".into(), "Specialty__c".into()];
    let client = ClmClient::with_config(FakeHost::new(), config);
    client
        .host()
        .respond_current(ACCOUNT_OBJECT, json!({"Id": "001XYZ"}));
    client
        .host()
        .respond_rows(ACCOUNT_OBJECT, json!([{"Id": "001XYZ"}]));

    client.get_account().await.unwrap();
    assert_eq!(client.host().queries()[0].fields, vec!["Id", "Specialty__c"]);
}

#[tokio::test]
async fn test_account_without_current_object_fails_before_querying() {
    let client = client();
    client.host().reply_to_current(
        ACCOUNT_OBJECT,
        Reply::Respond(json!({"success": false})),
    );

    let err = client.get_account().await.unwrap_err();
    assert_eq!(
        err,
        ClmError::HostCall {
            message: "Error getting data".into()
        }
    );
    assert!(client.host().queries().is_empty());
}

#[tokio::test]
async fn test_clm_slide_id_reads_current_key_message() {
    let client = client();
    client
        .host()
        .respond_current(CURRENT_KEY_MESSAGE, json!({"CLM_ID_vod__c": "HOME_01"}));

    assert_eq!(client.get_clm_slide_id().await.unwrap(), "HOME_01");
    assert_eq!(
        client.host().calls(),
        vec![HostCall::GetDataForCurrentObject {
            object: "KeyMessage".into(),
            field: "CLM_ID_vod__c".into(),
        }]
    );
}

#[tokio::test]
async fn test_clm_slide_id_missing_value_fails() {
    let client = client();
    client
        .host()
        .respond_current(CURRENT_KEY_MESSAGE, json!({}));

    let err = client.get_clm_slide_id().await.unwrap_err();
    assert_eq!(err.to_string(), "Host call failed: Failed to get CLM ID");
}

#[tokio::test]
async fn test_zoom_disabled_flag() {
    let client = client();
    let host = client.host();
    host.respond_current(
        CURRENT_KEY_MESSAGE,
        json!({"Disable_Actions_vod__c": "Swipe_vod;Zoom_vod"}),
    );
    host.respond_current(
        CURRENT_KEY_MESSAGE,
        json!({"Disable_Actions_vod__c": "Swipe_vod"}),
    );
    host.respond_current(CURRENT_KEY_MESSAGE, json!({"Disable_Actions_vod__c": null}));

    assert!(client.is_zoom_disabled().await.unwrap());
    assert!(!client.is_zoom_disabled().await.unwrap());
    assert!(!client.is_zoom_disabled().await.unwrap());
}
