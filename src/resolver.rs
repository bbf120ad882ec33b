//! Resolution of a vault document id into a slide to navigate to
//!
//! The chain is strictly sequential, each step keyed by the previous one:
//! presentation by document id, then its first slide in display order, then
//! that slide's key-message media file. An explicit media file skips the
//! last two steps.

use serde_json::Value;

use crate::bridge::{bridge, object_field};
use crate::client::ClmClient;
use crate::error::{ClmError, Result};
use crate::host::ClmHost;
use crate::navigation::NavigationTarget;
use crate::query::QueryRequest;

pub const PRESENTATION_OBJECT: &str = "Clm_Presentation_vod__c";
pub const PRESENTATION_SLIDE_OBJECT: &str = "Clm_Presentation_Slide_vod__c";
pub const KEY_MESSAGE_OBJECT: &str = "Key_Message_vod__c";
pub const MEDIA_FILE_FIELD: &str = "Media_File_Name_vod__c";

impl<H: ClmHost> ClmClient<H> {
    /// Navigate to the presentation behind `document_id`.
    ///
    /// Opens `media_file_name` when given, the presentation's first slide
    /// otherwise. Failures are logged and the current slide stays put.
    pub async fn go_to_dsp(&self, document_id: &str, media_file_name: Option<&str>) {
        match self.resolve_dsp(document_id, media_file_name).await {
            Ok(target) => self.navigate(&target),
            Err(err) => tracing::error!(document_id, "Could not open presentation: {}", err),
        }
    }

    /// Work out where [`go_to_dsp`](Self::go_to_dsp) would navigate, without navigating.
    pub async fn resolve_dsp(
        &self,
        document_id: &str,
        media_file_name: Option<&str>,
    ) -> Result<NavigationTarget> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(ClmError::missing_input("vault document id"));
        }
        let suffix = &self.config().navigation.archive_suffix;

        let presentation = self
            .query(
                QueryRequest::new(
                    PRESENTATION_OBJECT,
                    format!("WHERE Vault_Doc_Id_vod__c = {document_id}"),
                )?
                .fields(["Presentation_Id_vod__c", "Id"])
                .sort("Vault_Doc_Id_vod__c, ASC")
                .limit(1),
            )
            .await
            .first("presentation")?;
        // a null presentation id navigates within the current presentation
        let presentation_id = presentation.get("Presentation_Id_vod__c");

        if let Some(media) = media_file_name.map(str::trim).filter(|m| !m.is_empty()) {
            return NavigationTarget::new(media, presentation_id, suffix);
        }

        let presentation_record_id = presentation.require("Id")?;
        let first_slide = self
            .query(
                QueryRequest::new(
                    PRESENTATION_SLIDE_OBJECT,
                    format!(
                        "WHERE Clm_Presentation_vod__c = '{presentation_record_id}' \
                         AND Display_Order_vod__c = 1"
                    ),
                )?
                .fields([KEY_MESSAGE_OBJECT])
                .sort("Key_Message_vod__c, ASC")
                .limit(1),
            )
            .await
            .first("key message")?;
        let key_message_id = first_slide.require(KEY_MESSAGE_OBJECT)?;

        let media = self.key_message_media_file(key_message_id).await?;
        NavigationTarget::new(&media, presentation_id, suffix)
    }

    /// Media archive name of one key message, fetched by record id
    async fn key_message_media_file(&self, key_message_id: &str) -> Result<String> {
        let response = bridge("getDataForObject", |cb| {
            self.host()
                .get_data_for_object(KEY_MESSAGE_OBJECT, key_message_id, MEDIA_FILE_FIELD, cb)
        })
        .await?;

        object_field(&response, KEY_MESSAGE_OBJECT, MEDIA_FILE_FIELD)
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(String::from)
            .ok_or_else(|| ClmError::not_found("media file"))
    }
}
