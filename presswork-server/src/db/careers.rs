//! Career application queries
//!
//! The resume blob is stored inline but never fetched by the list/detail
//! queries; only the download endpoint reads the bytes.

use presswork_common::db::models::{CareerApplication, CareerStatus, ResumeMeta};
use presswork_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_ts, ts};

const META_COLUMNS: &str = "id, name, email, phone, position, experience, current_company, \
     expected_salary, notice_period, cover_letter, resume_content_type, \
     resume_filename, status, created_at, updated_at";

fn career_from_row(row: &SqliteRow) -> Result<CareerApplication> {
    let status_text: String = row.try_get("status")?;

    Ok(CareerApplication {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        position: row.try_get("position")?,
        experience: row.try_get("experience")?,
        current_company: row.try_get("current_company")?,
        expected_salary: row.try_get("expected_salary")?,
        notice_period: row.try_get("notice_period")?,
        cover_letter: row.try_get("cover_letter")?,
        resume: ResumeMeta {
            content_type: row.try_get("resume_content_type")?,
            filename: row.try_get("resume_filename")?,
        },
        status: CareerStatus::parse(&status_text)
            .ok_or_else(|| Error::Internal(format!("Unknown career status {:?}", status_text)))?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn insert(
    pool: &SqlitePool,
    career: &CareerApplication,
    resume_data: &[u8],
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO careers (
            id, name, email, phone, position, experience, current_company,
            expected_salary, notice_period, cover_letter, resume_data,
            resume_content_type, resume_filename, status, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&career.id)
    .bind(&career.name)
    .bind(&career.email)
    .bind(&career.phone)
    .bind(&career.position)
    .bind(&career.experience)
    .bind(&career.current_company)
    .bind(&career.expected_salary)
    .bind(&career.notice_period)
    .bind(&career.cover_letter)
    .bind(resume_data)
    .bind(&career.resume.content_type)
    .bind(&career.resume.filename)
    .bind(career.status.as_str())
    .bind(ts(&career.created_at))
    .bind(ts(&career.updated_at))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<CareerApplication>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM careers ORDER BY created_at DESC",
        META_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    rows.iter().map(career_from_row).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<CareerApplication>> {
    let row = sqlx::query(&format!("SELECT {} FROM careers WHERE id = ?", META_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(career_from_row).transpose()
}

/// Resume bytes with content type and filename for the download endpoint
pub async fn fetch_resume(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<(Vec<u8>, String, String)>> {
    let row = sqlx::query(
        "SELECT resume_data, resume_content_type, resume_filename FROM careers WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        Ok((
            r.try_get::<Vec<u8>, _>("resume_data")?,
            r.try_get("resume_content_type")?,
            r.try_get("resume_filename")?,
        ))
    })
    .transpose()
}

pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: CareerStatus,
) -> Result<Option<CareerApplication>> {
    sqlx::query("UPDATE careers SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(ts(&chrono::Utc::now()))
        .bind(id)
        .execute(pool)
        .await?;
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM careers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
