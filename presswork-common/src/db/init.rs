//! Database initialization
//!
//! Creates the database file on first run and brings the schema up
//! idempotently. All statements are safe to re-run on an existing database.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Connection options apply to every pooled connection; foreign keys are
    // required for comment/vote cascade deletes, WAL allows concurrent
    // readers with one writer
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_blogs_table(&pool).await?;
    create_comments_table(&pool).await?;
    create_comment_votes_table(&pool).await?;
    create_careers_table(&pool).await?;
    create_contacts_table(&pool).await?;
    create_subscribers_table(&pool).await?;

    Ok(pool)
}

async fn create_blogs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blogs (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            excerpt TEXT NOT NULL,
            content TEXT NOT NULL,
            sections TEXT NOT NULL DEFAULT '[]',
            image TEXT NOT NULL,
            category TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            author_name TEXT NOT NULL,
            author_email TEXT NOT NULL,
            author_image TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            featured INTEGER NOT NULL DEFAULT 0,
            read_time TEXT NOT NULL DEFAULT '1 min read',
            views INTEGER NOT NULL DEFAULT 0,
            likes INTEGER NOT NULL DEFAULT 0,
            published_at TEXT,
            meta_title TEXT NOT NULL DEFAULT '',
            meta_description TEXT NOT NULL DEFAULT '',
            keywords TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blogs_status_category ON blogs(status, category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blogs_published_at ON blogs(published_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_comments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            blog_id TEXT NOT NULL REFERENCES blogs(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            comment TEXT NOT NULL,
            avatar TEXT,
            author_id TEXT,
            approved INTEGER NOT NULL DEFAULT 1,
            like_count INTEGER NOT NULL DEFAULT 0,
            dislike_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_blog ON comments(blog_id, created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// One row per (comment, voter). The UNIQUE index is the storage-level
/// backstop for the mutual-exclusion invariant: a voter holds at most one
/// vote per comment regardless of interleaved requests.
async fn create_comment_votes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comment_votes (
            comment_id TEXT NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
            voter_id TEXT NOT NULL,
            vote TEXT NOT NULL CHECK (vote IN ('like', 'dislike')),
            created_at TEXT NOT NULL,
            UNIQUE (comment_id, voter_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_careers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS careers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            position TEXT NOT NULL,
            experience TEXT NOT NULL,
            current_company TEXT NOT NULL,
            expected_salary TEXT NOT NULL,
            notice_period TEXT NOT NULL,
            cover_letter TEXT,
            resume_data BLOB NOT NULL,
            resume_content_type TEXT NOT NULL,
            resume_filename TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_contacts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            company TEXT,
            phone TEXT,
            subject TEXT NOT NULL,
            message TEXT NOT NULL,
            budget TEXT,
            timeline TEXT,
            status TEXT NOT NULL DEFAULT 'new',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_subscribers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subscribers (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'active',
            subscribed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("presswork.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        // Re-running against the existing file is a no-op
        drop(pool);
        init_database(&db_path).await.unwrap();
    }

    #[tokio::test]
    async fn test_schema_tables_exist() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("presswork.db")).await.unwrap();

        for table in [
            "blogs",
            "comments",
            "comment_votes",
            "careers",
            "contacts",
            "subscribers",
        ] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }
}
