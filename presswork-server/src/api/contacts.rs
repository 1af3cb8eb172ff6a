//! Contact submission endpoints

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use presswork_common::db::models::{ContactStatus, ContactSubmission};
use presswork_common::{defaults, ids, normalize, Error, Result};
use serde_json::Value;

use super::{data_message_response, data_response, message_response, require_object_id};
use crate::db::contacts;
use crate::email;
use crate::upload::{self, FormPayload};
use crate::AppState;

/// Validate an optional enumerated bucket field; empty strings count as
/// absent (forms submit them for unselected options)
fn bucket_field(payload: &FormPayload, key: &str, allowed: &[&str]) -> Result<Option<String>> {
    match payload.text(key) {
        None => Ok(None),
        Some(value) if allowed.contains(&value.as_str()) => Ok(Some(value)),
        Some(value) => Err(Error::InvalidInput(format!(
            "Invalid {} value: {}",
            key, value
        ))),
    }
}

/// POST /api/contact
///
/// Create a contact submission and fire the admin notification email
/// (failure logged, never propagated).
pub async fn create_contact(
    State(state): State<AppState>,
    req: Request,
) -> Result<impl IntoResponse> {
    let payload = FormPayload::from_fields(upload::read_json_object(req).await?);

    let name = payload
        .text("name")
        .ok_or_else(|| Error::InvalidInput("Name is required".to_string()))?;
    let email_addr = payload
        .text("email")
        .ok_or_else(|| Error::InvalidInput("Email is required".to_string()))?
        .to_lowercase();
    if !normalize::is_valid_email(&email_addr) {
        return Err(Error::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }
    let subject = payload
        .text("subject")
        .ok_or_else(|| Error::InvalidInput("Subject is required".to_string()))?;
    let message = payload
        .text("message")
        .ok_or_else(|| Error::InvalidInput("Message is required".to_string()))?;

    let budget = bucket_field(&payload, "budget", defaults::BUDGET_BUCKETS)?;
    let timeline = bucket_field(&payload, "timeline", defaults::TIMELINE_BUCKETS)?;

    let now = Utc::now();
    let contact = ContactSubmission {
        id: ids::generate(),
        name,
        email: email_addr,
        company: payload.text("company"),
        phone: payload.text("phone"),
        subject,
        message,
        budget,
        timeline,
        status: ContactStatus::New,
        created_at: now,
        updated_at: now,
    };

    contacts::insert(&state.db, &contact).await?;

    email::notify_contact(state.mailer.clone(), contact.clone());

    Ok((
        StatusCode::CREATED,
        data_message_response("Contact form submitted successfully", contact),
    ))
}

/// GET /api/contact
pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Value>> {
    let submissions = contacts::list(&state.db).await?;
    Ok(data_response(submissions))
}

/// GET /api/contact/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "contact")?;

    let submission = contacts::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound("Contact not found".to_string()))?;

    Ok(data_response(submission))
}

/// PATCH /api/contact/:id
///
/// Update the submission status only.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> Result<Json<Value>> {
    require_object_id(&id, "contact")?;

    let fields = upload::read_json_object(req).await?;
    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(ContactStatus::parse)
        .ok_or_else(|| {
            Error::InvalidInput("Status must be one of: new, read, replied, archived".to_string())
        })?;

    let submission = contacts::update_status(&state.db, &id, status)
        .await?
        .ok_or_else(|| Error::NotFound("Contact not found".to_string()))?;

    Ok(data_response(submission))
}

/// DELETE /api/contact/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "contact")?;

    if !contacts::delete(&state.db, &id).await? {
        return Err(Error::NotFound("Contact not found".to_string()));
    }

    Ok(message_response("Contact deleted successfully"))
}
