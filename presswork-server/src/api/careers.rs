//! Career application endpoints

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use presswork_common::db::models::{CareerApplication, CareerStatus, ResumeMeta};
use presswork_common::{ids, normalize, Error, Result};
use serde_json::Value;

use super::{data_response, message_response, require_object_id};
use crate::db::careers;
use crate::email;
use crate::upload::{self, FileRule, FormPayload};
use crate::AppState;

fn required_field(payload: &FormPayload, key: &str, label: &str) -> Result<String> {
    payload
        .text(key)
        .ok_or_else(|| Error::InvalidInput(format!("{} is required", label)))
}

/// POST /api/career
///
/// Create a job application (multipart; `resume` file required). Fires
/// applicant and admin notification emails; email failure never fails the
/// request.
pub async fn create_career(
    State(state): State<AppState>,
    req: Request,
) -> Result<impl IntoResponse> {
    let payload = upload::read_request_payload(req, &state.uploads_dir, FileRule::Resume).await?;

    let resume = payload
        .resume
        .as_ref()
        .ok_or_else(|| Error::InvalidInput("Resume file is required".to_string()))?;

    let name = required_field(&payload, "name", "Name")?;
    let email_addr = required_field(&payload, "email", "Email")?.to_lowercase();
    if !normalize::is_valid_email(&email_addr) {
        return Err(Error::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }
    let phone = required_field(&payload, "phone", "Phone number")?;
    let position = required_field(&payload, "position", "Position")?;
    let experience = required_field(&payload, "experience", "Experience")?;
    let current_company = required_field(&payload, "currentCompany", "Current company")?;
    let expected_salary = required_field(&payload, "expectedSalary", "Expected salary")?;
    let notice_period = required_field(&payload, "noticePeriod", "Notice period")?;

    let now = Utc::now();
    let career = CareerApplication {
        id: ids::generate(),
        name,
        email: email_addr,
        phone,
        position,
        experience,
        current_company,
        expected_salary,
        notice_period,
        cover_letter: payload.text("coverLetter"),
        resume: ResumeMeta {
            content_type: resume.content_type.clone(),
            filename: resume.filename.clone(),
        },
        status: CareerStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    careers::insert(&state.db, &career, &resume.data).await?;

    email::notify_career(state.mailer.clone(), career.clone());

    Ok((StatusCode::CREATED, data_response(career)))
}

/// GET /api/career
pub async fn list_careers(State(state): State<AppState>) -> Result<Json<Value>> {
    let applications = careers::list(&state.db).await?;
    Ok(data_response(applications))
}

/// GET /api/career/:id
pub async fn get_career(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "career application")?;

    let application = careers::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound("Career application not found".to_string()))?;

    Ok(data_response(application))
}

/// GET /api/career/:id/resume
///
/// Stream the stored resume blob as an attachment.
pub async fn download_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    require_object_id(&id, "career application")?;

    let (data, content_type, filename) = careers::fetch_resume(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound("Career application not found".to_string()))?;

    if data.is_empty() {
        return Err(Error::NotFound("Resume not found".to_string()));
    }

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, data).into_response())
}

/// PATCH /api/career/:id
///
/// Update the application status only.
pub async fn update_career(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> Result<Json<Value>> {
    require_object_id(&id, "career application")?;

    let fields = upload::read_json_object(req).await?;
    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(CareerStatus::parse)
        .ok_or_else(|| {
            Error::InvalidInput(
                "Status must be one of: pending, reviewed, shortlisted, rejected".to_string(),
            )
        })?;

    let application = careers::update_status(&state.db, &id, status)
        .await?
        .ok_or_else(|| Error::NotFound("Career application not found".to_string()))?;

    Ok(data_response(application))
}

/// DELETE /api/career/:id
pub async fn delete_career(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "career application")?;

    if !careers::delete(&state.db, &id).await? {
        return Err(Error::NotFound("Career application not found".to_string()));
    }

    Ok(message_response("Career application deleted successfully"))
}
