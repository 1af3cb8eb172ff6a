//! Newsletter subscriber endpoints

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use presswork_common::db::models::{Subscriber, SubscriberStatus};
use presswork_common::{ids, normalize, Error, Result};
use serde_json::Value;

use super::{data_message_response, data_response, message_response, require_object_id};
use crate::db::subscribers;
use crate::upload;
use crate::AppState;

fn email_from_body(fields: &serde_json::Map<String, Value>) -> Result<String> {
    let email = fields
        .get("email")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidInput("Email is required".to_string()))?
        .to_lowercase();

    if !normalize::is_valid_email(&email) {
        return Err(Error::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }

    Ok(email)
}

/// POST /api/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    req: Request,
) -> Result<impl IntoResponse> {
    let fields = upload::read_json_object(req).await?;
    let email = email_from_body(&fields)?;

    // Advisory check; the UNIQUE index on email is the backstop
    if subscribers::find_by_email(&state.db, &email).await?.is_some() {
        return Err(Error::InvalidInput("Email already subscribed".to_string()));
    }

    let subscriber = Subscriber {
        id: ids::generate(),
        email,
        status: SubscriberStatus::Active,
        subscribed_at: Utc::now(),
    };

    subscribers::insert(&state.db, &subscriber).await?;

    Ok((
        StatusCode::CREATED,
        data_message_response("Successfully subscribed to newsletter", subscriber),
    ))
}

/// POST /api/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>> {
    let fields = upload::read_json_object(req).await?;
    let email = email_from_body(&fields)?;

    if !subscribers::set_status(&state.db, &email, SubscriberStatus::Unsubscribed).await? {
        return Err(Error::NotFound("Subscriber not found".to_string()));
    }

    Ok(message_response("Successfully unsubscribed"))
}

/// GET /api/subscribers
pub async fn list_subscribers(State(state): State<AppState>) -> Result<Json<Value>> {
    let subscribers = subscribers::list(&state.db).await?;
    Ok(data_response(subscribers))
}

/// DELETE /api/subscribers/:id
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "subscriber")?;

    if !subscribers::delete(&state.db, &id).await? {
        return Err(Error::NotFound("Subscriber not found".to_string()));
    }

    Ok(message_response("Subscriber deleted successfully"))
}
