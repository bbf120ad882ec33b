//! Turns one callback-taking host call into an awaitable result

use serde_json::Value;

use crate::error::{ClmError, Result};
use crate::host::HostCallback;

/// Issue a host call and wait for its single completion.
///
/// `issue` receives the callback to hand to the host. The returned future
/// resolves with the full response when it carries `"success": true`, and
/// fails with [`ClmError::HostCall`] otherwise. There is no timeout: if the
/// host keeps the callback and never completes it, this never resolves.
pub async fn bridge<F>(operation: &str, issue: F) -> Result<Value>
where
    F: FnOnce(HostCallback),
{
    let (callback, pending) = HostCallback::channel(operation);
    issue(callback);

    let response = pending.await.map_err(|_| ClmError::HostCall {
        message: format!("host dropped the {operation} callback"),
    })?;

    interpret(response)
}

/// Apply the host's success flag to a raw response.
///
/// A missing or non-boolean `success` counts as failure. The failure message
/// is the host's `message` when present and non-empty, the default otherwise.
pub fn interpret(response: Value) -> Result<Value> {
    if response.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(response);
    }
    Err(ClmError::host_call(
        response.get("message").and_then(Value::as_str),
    ))
}

/// Pull `response[object][field]` out of a current-object / by-id lookup
pub fn object_field<'a>(response: &'a Value, object: &str, field: &str) -> Option<&'a Value> {
    response
        .get(object)
        .and_then(|o| o.get(field))
        .filter(|v| !v.is_null())
}
