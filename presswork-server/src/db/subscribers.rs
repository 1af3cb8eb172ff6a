//! Newsletter subscriber queries

use presswork_common::db::models::{Subscriber, SubscriberStatus};
use presswork_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_ts, ts};

fn subscriber_from_row(row: &SqliteRow) -> Result<Subscriber> {
    let status_text: String = row.try_get("status")?;

    Ok(Subscriber {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        status: SubscriberStatus::parse(&status_text).ok_or_else(|| {
            Error::Internal(format!("Unknown subscriber status {:?}", status_text))
        })?,
        subscribed_at: parse_ts(&row.try_get::<String, _>("subscribed_at")?)?,
    })
}

/// Insert a subscriber; the UNIQUE index on email backstops the duplicate
/// check in the handler
pub async fn insert(pool: &SqlitePool, subscriber: &Subscriber) -> Result<()> {
    sqlx::query("INSERT INTO subscribers (id, email, status, subscribed_at) VALUES (?, ?, ?, ?)")
        .bind(&subscriber.id)
        .bind(&subscriber.email)
        .bind(subscriber.status.as_str())
        .bind(ts(&subscriber.subscribed_at))
        .execute(pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.message().contains("subscribers.email") {
                    return Error::Conflict("Email already subscribed".to_string());
                }
            }
            Error::Database(err)
        })?;
    Ok(())
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Subscriber>> {
    let row = sqlx::query("SELECT * FROM subscribers WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(subscriber_from_row).transpose()
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Subscriber>> {
    let rows = sqlx::query("SELECT * FROM subscribers ORDER BY subscribed_at DESC")
        .fetch_all(pool)
        .await?;
    rows.iter().map(subscriber_from_row).collect()
}

pub async fn set_status(
    pool: &SqlitePool,
    email: &str,
    status: SubscriberStatus,
) -> Result<bool> {
    let result = sqlx::query("UPDATE subscribers SET status = ? WHERE email = ?")
        .bind(status.as_str())
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM subscribers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
