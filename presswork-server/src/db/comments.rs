//! Comment queries and vote application
//!
//! Comments are owned by their parent post (cascade delete). Voter
//! membership lives in comment_votes with a UNIQUE (comment_id, voter_id)
//! index; counter columns are adjusted in the same transaction as
//! membership so counts always equal set sizes.

use presswork_common::db::models::Comment;
use presswork_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::collections::HashMap;

use crate::votes::{MembershipChange, VoteKind, VotePlan};

use super::{parse_ts, ts};

fn comment_from_row(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        blog_id: row.try_get("blog_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        comment: row.try_get("comment")?,
        avatar: row.try_get("avatar")?,
        author_id: row.try_get("author_id")?,
        approved: row.try_get::<i64, _>("approved")? != 0,
        like_count: row.try_get("like_count")?,
        dislike_count: row.try_get("dislike_count")?,
        liked_by: Vec::new(),
        disliked_by: Vec::new(),
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
    })
}

/// Attach voter id sets to comments in one query
async fn load_votes(pool: &SqlitePool, comments: &mut [Comment]) -> Result<()> {
    if comments.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT comment_id, voter_id, vote FROM comment_votes WHERE comment_id IN (",
    );
    let mut ids = qb.separated(", ");
    for comment in comments.iter() {
        ids.push_bind(comment.id.clone());
    }
    qb.push(")");

    let rows = qb.build().fetch_all(pool).await?;

    let mut by_comment: HashMap<String, (Vec<String>, Vec<String>)> = HashMap::new();
    for row in &rows {
        let comment_id: String = row.try_get("comment_id")?;
        let voter_id: String = row.try_get("voter_id")?;
        let vote: String = row.try_get("vote")?;
        let entry = by_comment.entry(comment_id).or_default();
        match VoteKind::parse(&vote) {
            Some(VoteKind::Like) => entry.0.push(voter_id),
            Some(VoteKind::Dislike) => entry.1.push(voter_id),
            None => {}
        }
    }

    for comment in comments.iter_mut() {
        if let Some((liked, disliked)) = by_comment.remove(&comment.id) {
            comment.liked_by = liked;
            comment.disliked_by = disliked;
        }
    }

    Ok(())
}

pub async fn insert(pool: &SqlitePool, comment: &Comment) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO comments (
            id, blog_id, name, email, comment, avatar, author_id, approved,
            like_count, dislike_count, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&comment.id)
    .bind(&comment.blog_id)
    .bind(&comment.name)
    .bind(&comment.email)
    .bind(&comment.comment)
    .bind(&comment.avatar)
    .bind(&comment.author_id)
    .bind(comment.approved as i64)
    .bind(comment.like_count)
    .bind(comment.dislike_count)
    .bind(ts(&comment.created_at))
    .execute(pool)
    .await?;
    Ok(())
}

/// Approved comments of a post, newest first. Ordering is a read-time
/// concern; writes are append-only.
pub async fn list_approved(pool: &SqlitePool, blog_id: &str) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        "SELECT * FROM comments WHERE blog_id = ? AND approved = 1 ORDER BY created_at DESC",
    )
    .bind(blog_id)
    .fetch_all(pool)
    .await?;

    let mut comments: Vec<Comment> = rows
        .iter()
        .map(comment_from_row)
        .collect::<Result<Vec<_>>>()?;
    load_votes(pool, &mut comments).await?;
    Ok(comments)
}

/// Comment lookup scoped to its parent post
pub async fn find(
    pool: &SqlitePool,
    blog_id: &str,
    comment_id: &str,
) -> Result<Option<Comment>> {
    let row = sqlx::query("SELECT * FROM comments WHERE id = ? AND blog_id = ?")
        .bind(comment_id)
        .bind(blog_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let mut comments = vec![comment_from_row(&row)?];
            load_votes(pool, &mut comments).await?;
            Ok(comments.pop())
        }
        None => Ok(None),
    }
}

/// Current vote of one voter on one comment
pub async fn get_vote(
    pool: &SqlitePool,
    comment_id: &str,
    voter_id: &str,
) -> Result<Option<VoteKind>> {
    let vote: Option<String> = sqlx::query_scalar(
        "SELECT vote FROM comment_votes WHERE comment_id = ? AND voter_id = ?",
    )
    .bind(comment_id)
    .bind(voter_id)
    .fetch_optional(pool)
    .await?;

    Ok(vote.as_deref().and_then(VoteKind::parse))
}

/// Current counters without applying any mutation
pub async fn counters(pool: &SqlitePool, comment_id: &str) -> Result<(i64, i64)> {
    let row = sqlx::query("SELECT like_count, dislike_count FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_one(pool)
        .await?;
    Ok((row.try_get("like_count")?, row.try_get("dislike_count")?))
}

/// Apply a reconciled vote plan as one transaction: membership row change
/// plus counter deltas. Returns the resulting counters.
pub async fn apply_vote_plan(
    pool: &SqlitePool,
    comment_id: &str,
    voter_id: &str,
    plan: &VotePlan,
) -> Result<(i64, i64)> {
    let mut tx = pool.begin().await?;

    match plan.membership {
        MembershipChange::Keep => {}
        MembershipChange::Set(kind) => {
            sqlx::query(
                r#"
                INSERT INTO comment_votes (comment_id, voter_id, vote, created_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (comment_id, voter_id) DO UPDATE SET vote = excluded.vote
                "#,
            )
            .bind(comment_id)
            .bind(voter_id)
            .bind(kind.as_str())
            .bind(ts(&chrono::Utc::now()))
            .execute(&mut *tx)
            .await?;
        }
        MembershipChange::Clear => {
            sqlx::query("DELETE FROM comment_votes WHERE comment_id = ? AND voter_id = ?")
                .bind(comment_id)
                .bind(voter_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    if plan.like_delta != 0 || plan.dislike_delta != 0 {
        // MAX guards keep the counters non-negative even if a stale read
        // planned against state another request already changed
        sqlx::query(
            "UPDATE comments SET like_count = MAX(0, like_count + ?), \
             dislike_count = MAX(0, dislike_count + ?) WHERE id = ?",
        )
        .bind(plan.like_delta)
        .bind(plan.dislike_delta)
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;
    }

    let row = sqlx::query("SELECT like_count, dislike_count FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Comment not found".to_string()))?;
    let counts = (row.try_get("like_count")?, row.try_get("dislike_count")?);

    tx.commit().await?;
    Ok(counts)
}
