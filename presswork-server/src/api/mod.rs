//! HTTP API handlers
//!
//! Every response carries the `{success, data?, message?}` envelope;
//! failures are mapped to it by the common error type.

pub mod blogs;
pub mod careers;
pub mod comments;
pub mod contacts;
pub mod health;
pub mod subscribers;

use axum::Json;
use presswork_common::{ids, Error, Result};
use serde::Serialize;
use serde_json::{json, Value};

pub(crate) fn data_response<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

pub(crate) fn message_response(message: &str) -> Json<Value> {
    Json(json!({ "success": true, "message": message }))
}

pub(crate) fn data_message_response<T: Serialize>(message: &str, data: T) -> Json<Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}

/// Reject malformed path ids before any lookup
pub(crate) fn require_object_id(id: &str, what: &str) -> Result<()> {
    if ids::is_valid(id) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Invalid {} id", what)))
    }
}
