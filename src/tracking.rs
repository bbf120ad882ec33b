//! Clickstream recording for the CLM call reports

use serde::{Deserialize, Serialize};

use crate::bridge::interpret;
use crate::client::ClmClient;
use crate::host::{ClmHost, HostCallback};

/// What the UI reports about an interaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackedAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// Record submitted to the clickstream collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickstreamEvent {
    #[serde(rename = "Track_Element_Id_vod__c")]
    pub element_id: String,
    #[serde(rename = "Track_Element_Type_vod__c")]
    pub element_type: String,
    #[serde(rename = "Track_Element_Description_vod__c")]
    pub element_description: String,
}

impl From<&TrackedAction> for ClickstreamEvent {
    fn from(action: &TrackedAction) -> Self {
        Self {
            element_id: action.id.clone(),
            element_type: action.kind.clone(),
            element_description: action.description.clone(),
        }
    }
}

impl<H: ClmHost> ClmClient<H> {
    /// Submit a clickstream record and return immediately.
    ///
    /// Every call emits one info-level diagnostic for the action, whether or
    /// not tracking is enabled. The host's answer is only logged. Returns the
    /// submitted event, or `None` when nothing was submitted (tracking
    /// disabled).
    pub fn track_action(&self, action: &TrackedAction) -> Option<ClickstreamEvent> {
        let event = ClickstreamEvent::from(action);
        let tracking = &self.config().tracking;

        tracing::info!(
            element_id = %event.element_id,
            element_type = %event.element_type,
            element_description = %event.element_description,
            "Creating clickstream record"
        );

        if !tracking.enabled {
            tracing::debug!(
                element_id = %event.element_id,
                "Tracking disabled, clickstream not sent"
            );
            return None;
        }

        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("Could not encode clickstream record: {}", err);
                return None;
            }
        };

        let collection = tracking.collection.clone();
        let callback = HostCallback::detached("createRecord", move |response| {
            match interpret(response) {
                Ok(created) => {
                    tracing::debug!(%collection, "Clickstream record created: {}", created)
                }
                Err(err) => {
                    tracing::warn!(%collection, "Clickstream record not created: {}", err)
                }
            }
        });
        self.host()
            .create_record(&tracking.collection, &payload, callback);

        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_deserializes_from_ui_shape() {
        let action: TrackedAction =
            serde_json::from_value(json!({"id": "e1", "type": "tap", "description": "btn"}))
                .unwrap();
        assert_eq!(action.kind, "tap");
    }

    #[test]
    fn event_serializes_with_crm_field_names() {
        let action = TrackedAction {
            id: "e1".into(),
            kind: "tap".into(),
            description: "btn".into(),
        };
        let value = serde_json::to_value(ClickstreamEvent::from(&action)).unwrap();
        assert_eq!(
            value,
            json!({
                "Track_Element_Id_vod__c": "e1",
                "Track_Element_Type_vod__c": "tap",
                "Track_Element_Description_vod__c": "btn"
            })
        );
    }
}
