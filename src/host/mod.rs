//! The viewer host API consumed by this crate
//!
//! Every record-access call on the host is callback-taking: the host is
//! handed a [`HostCallback`] and completes it once with a JSON payload.
//! Navigation calls are fire-and-forget and take no callback.

use serde_json::Value;
use std::fmt;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::query::QueryRequest;

pub mod fake;
#[cfg(feature = "wasm")]
pub mod wasm;

/// Capability set of the embedding viewer.
///
/// Implemented by:
/// - `fake::FakeHost` - scripted in-memory host for tests and previews
/// - `wasm::ViewerHost` - the viewer's JavaScript API (feature `wasm`)
pub trait ClmHost: Send + Sync {
    /// Advance one slide in the presentation's display order
    fn next_slide(&self);

    /// Go back one slide in the presentation's display order
    fn prev_slide(&self);

    /// Jump to a slide archive, optionally in another presentation
    fn goto_slide(&self, slide: &str, presentation: Option<&str>);

    /// Run a structured record query. Completes with
    /// `{ "success": true, "<collection>": [rows] }` or a failure payload.
    fn query_record(&self, request: &QueryRequest, callback: HostCallback);

    /// Read one field of the object currently in context (account, key message, ...).
    /// Completes with `{ "success": true, "<object>": { "<field>": value } }`.
    fn get_data_for_current_object(&self, object: &str, field: &str, callback: HostCallback);

    /// Read one field of a specific record by id.
    fn get_data_for_object(&self, object: &str, id: &str, field: &str, callback: HostCallback);

    /// Create a record in `object` from a flat field map.
    fn create_record(&self, object: &str, payload: &Value, callback: HostCallback);
}

enum Completion {
    Waiter(oneshot::Sender<Value>),
    Handler(Box<dyn FnOnce(Value) + Send>),
}

/// Single-use completion handle passed to the host.
///
/// The host must call [`HostCallback::complete`] exactly once. A second
/// completion is a host bug: it is logged at error level and the payload is
/// discarded. Dropping the handle without completing it fails the awaiting
/// bridge call; keeping it forever without completing leaves that call
/// pending forever (there is no timeout).
pub struct HostCallback {
    operation: String,
    completion: Mutex<Option<Completion>>,
}

impl HostCallback {
    /// Callback that wakes an awaiting bridge call
    pub(crate) fn channel(operation: impl Into<String>) -> (Self, oneshot::Receiver<Value>) {
        let (tx, rx) = oneshot::channel();
        let callback = Self {
            operation: operation.into(),
            completion: Mutex::new(Some(Completion::Waiter(tx))),
        };
        (callback, rx)
    }

    /// Callback that runs `handler` on completion; nobody awaits it
    pub fn detached(
        operation: impl Into<String>,
        handler: impl FnOnce(Value) + Send + 'static,
    ) -> Self {
        Self {
            operation: operation.into(),
            completion: Mutex::new(Some(Completion::Handler(Box::new(handler)))),
        }
    }

    /// Name of the host operation this callback belongs to
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Deliver the host response. Returns false if the callback had already
    /// been completed.
    pub fn complete(&self, response: Value) -> bool {
        let completion = match self.completion.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match completion {
            Some(Completion::Waiter(tx)) => {
                if tx.send(response).is_err() {
                    tracing::debug!(
                        operation = %self.operation,
                        "caller stopped waiting; host response discarded"
                    );
                }
                true
            }
            Some(Completion::Handler(handler)) => {
                handler(response);
                true
            }
            None => {
                tracing::error!(
                    operation = %self.operation,
                    "host completed callback more than once; second response ignored"
                );
                false
            }
        }
    }
}

impl fmt::Debug for HostCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self
            .completion
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false);
        f.debug_struct("HostCallback")
            .field("operation", &self.operation)
            .field("pending", &pending)
            .finish()
    }
}
