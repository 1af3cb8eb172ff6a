//! Contact submission queries

use presswork_common::db::models::{ContactStatus, ContactSubmission};
use presswork_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_ts, ts};

fn contact_from_row(row: &SqliteRow) -> Result<ContactSubmission> {
    let status_text: String = row.try_get("status")?;

    Ok(ContactSubmission {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        company: row.try_get("company")?,
        phone: row.try_get("phone")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        budget: row.try_get("budget")?,
        timeline: row.try_get("timeline")?,
        status: ContactStatus::parse(&status_text)
            .ok_or_else(|| Error::Internal(format!("Unknown contact status {:?}", status_text)))?,
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn insert(pool: &SqlitePool, contact: &ContactSubmission) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO contacts (
            id, name, email, company, phone, subject, message, budget,
            timeline, status, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&contact.id)
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.company)
    .bind(&contact.phone)
    .bind(&contact.subject)
    .bind(&contact.message)
    .bind(&contact.budget)
    .bind(&contact.timeline)
    .bind(contact.status.as_str())
    .bind(ts(&contact.created_at))
    .bind(ts(&contact.updated_at))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<ContactSubmission>> {
    let rows = sqlx::query("SELECT * FROM contacts ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    rows.iter().map(contact_from_row).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<ContactSubmission>> {
    let row = sqlx::query("SELECT * FROM contacts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(contact_from_row).transpose()
}

pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: ContactStatus,
) -> Result<Option<ContactSubmission>> {
    sqlx::query("UPDATE contacts SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(ts(&chrono::Utc::now()))
        .bind(id)
        .execute(pool)
        .await?;
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
