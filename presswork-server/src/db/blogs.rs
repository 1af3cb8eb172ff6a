//! Blog post queries

use presswork_common::db::models::{Author, BlogPost, BlogStatus, Section, Seo};
use presswork_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::{parse_ts, ts};

/// Filters applied to the published listing
#[derive(Debug, Default, Clone)]
pub struct BlogFilter {
    /// Exact category match ("All" is stripped by the handler)
    pub category: Option<String>,
    /// Only featured posts
    pub featured: bool,
    /// Case-insensitive substring of the author name
    pub author: Option<String>,
    /// Substring search across title, excerpt, and content
    pub search: Option<String>,
}

/// Field changes applied by the update path. None = leave column untouched.
#[derive(Debug, Default, Clone)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub read_time: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<Author>,
    pub sections: Option<Vec<Section>>,
    pub seo: Option<Seo>,
    pub status: Option<BlogStatus>,
    pub featured: Option<bool>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl BlogUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.read_time.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.tags.is_none()
            && self.author.is_none()
            && self.sections.is_none()
            && self.seo.is_none()
            && self.status.is_none()
            && self.featured.is_none()
            && self.published_at.is_none()
    }
}

/// Derive the "N min read" label from content length (~200 words per minute)
pub fn read_time_for(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(200).max(1);
    format!("{} min read", minutes)
}

fn json_column<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Internal(format!("JSON encode: {}", e)))
}

fn blog_from_row(row: &SqliteRow) -> Result<BlogPost> {
    let sections: Vec<Section> =
        serde_json::from_str(&row.try_get::<String, _>("sections")?).unwrap_or_default();
    let tags: Vec<String> =
        serde_json::from_str(&row.try_get::<String, _>("tags")?).unwrap_or_default();
    let keywords: Vec<String> =
        serde_json::from_str(&row.try_get::<String, _>("keywords")?).unwrap_or_default();

    let status_text: String = row.try_get("status")?;
    let published_at = row
        .try_get::<Option<String>, _>("published_at")?
        .map(|s| parse_ts(&s))
        .transpose()?;

    Ok(BlogPost {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
        sections,
        image: row.try_get("image")?,
        category: row.try_get("category")?,
        tags,
        author: Author {
            name: row.try_get("author_name")?,
            email: row.try_get("author_email")?,
            image: row.try_get("author_image")?,
        },
        status: BlogStatus::parse(&status_text)
            .ok_or_else(|| Error::Internal(format!("Unknown blog status {:?}", status_text)))?,
        featured: row.try_get::<i64, _>("featured")? != 0,
        read_time: row.try_get("read_time")?,
        views: row.try_get("views")?,
        likes: row.try_get("likes")?,
        published_at,
        seo: Seo {
            meta_title: row.try_get("meta_title")?,
            meta_description: row.try_get("meta_description")?,
            keywords,
        },
        created_at: parse_ts(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_ts(&row.try_get::<String, _>("updated_at")?)?,
    })
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &BlogFilter) {
    qb.push(" WHERE status = 'published'");

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if filter.featured {
        qb.push(" AND featured = 1");
    }
    if let Some(author) = &filter.author {
        qb.push(" AND LOWER(author_name) LIKE ")
            .push_bind(format!("%{}%", author.to_lowercase()));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR excerpt LIKE ")
            .push_bind(pattern.clone())
            .push(" OR content LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Page of published posts, newest publication first
pub async fn list(
    pool: &SqlitePool,
    filter: &BlogFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<BlogPost>> {
    let mut qb = QueryBuilder::new("SELECT * FROM blogs");
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY published_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(blog_from_row).collect()
}

pub async fn count(pool: &SqlitePool, filter: &BlogFilter) -> Result<i64> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM blogs");
    push_filters(&mut qb, filter);

    let row = qb.build().fetch_one(pool).await?;
    Ok(row.try_get(0)?)
}

/// Map a slug UNIQUE violation to a conflict; the index is the actual
/// uniqueness authority, the probe loop upstream is advisory
fn map_slug_conflict(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.message().contains("blogs.slug") {
            return Error::Conflict("A post with this slug already exists".to_string());
        }
    }
    Error::Database(err)
}

pub async fn insert(pool: &SqlitePool, post: &BlogPost) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO blogs (
            id, slug, title, excerpt, content, sections, image, category,
            tags, author_name, author_email, author_image, status, featured,
            read_time, views, likes, published_at, meta_title,
            meta_description, keywords, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.id)
    .bind(&post.slug)
    .bind(&post.title)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(json_column(&post.sections)?)
    .bind(&post.image)
    .bind(&post.category)
    .bind(json_column(&post.tags)?)
    .bind(&post.author.name)
    .bind(&post.author.email)
    .bind(&post.author.image)
    .bind(post.status.as_str())
    .bind(post.featured as i64)
    .bind(&post.read_time)
    .bind(post.views)
    .bind(post.likes)
    .bind(post.published_at.as_ref().map(ts))
    .bind(&post.seo.meta_title)
    .bind(&post.seo.meta_description)
    .bind(json_column(&post.seo.keywords)?)
    .bind(ts(&post.created_at))
    .bind(ts(&post.updated_at))
    .execute(pool)
    .await
    .map_err(map_slug_conflict)?;

    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<BlogPost>> {
    let row = sqlx::query("SELECT * FROM blogs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(blog_from_row).transpose()
}

/// Published-only lookup used by the public detail endpoint
pub async fn find_published_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<BlogPost>> {
    let row = sqlx::query("SELECT * FROM blogs WHERE slug = ? AND status = 'published'")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(blog_from_row).transpose()
}

pub async fn slug_exists(
    pool: &SqlitePool,
    slug: &str,
    exclude_id: Option<&str>,
) -> Result<bool> {
    let count: i64 = match exclude_id {
        Some(id) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE slug = ? AND id != ?")
                .bind(slug)
                .bind(id)
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE slug = ?")
                .bind(slug)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count > 0)
}

pub async fn apply_update(
    pool: &SqlitePool,
    id: &str,
    changes: &BlogUpdate,
) -> Result<Option<BlogPost>> {
    if !changes.is_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE blogs SET ");
        let mut assignments = qb.separated(", ");

        if let Some(title) = &changes.title {
            assignments.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(slug) = &changes.slug {
            assignments.push("slug = ").push_bind_unseparated(slug.clone());
        }
        if let Some(excerpt) = &changes.excerpt {
            assignments
                .push("excerpt = ")
                .push_bind_unseparated(excerpt.clone());
        }
        if let Some(content) = &changes.content {
            assignments
                .push("content = ")
                .push_bind_unseparated(content.clone());
        }
        if let Some(read_time) = &changes.read_time {
            assignments
                .push("read_time = ")
                .push_bind_unseparated(read_time.clone());
        }
        if let Some(category) = &changes.category {
            assignments
                .push("category = ")
                .push_bind_unseparated(category.clone());
        }
        if let Some(image) = &changes.image {
            assignments.push("image = ").push_bind_unseparated(image.clone());
        }
        if let Some(tags) = &changes.tags {
            assignments
                .push("tags = ")
                .push_bind_unseparated(json_column(tags)?);
        }
        if let Some(author) = &changes.author {
            assignments
                .push("author_name = ")
                .push_bind_unseparated(author.name.clone());
            assignments
                .push("author_email = ")
                .push_bind_unseparated(author.email.clone());
            assignments
                .push("author_image = ")
                .push_bind_unseparated(author.image.clone());
        }
        if let Some(sections) = &changes.sections {
            assignments
                .push("sections = ")
                .push_bind_unseparated(json_column(sections)?);
        }
        if let Some(seo) = &changes.seo {
            assignments
                .push("meta_title = ")
                .push_bind_unseparated(seo.meta_title.clone());
            assignments
                .push("meta_description = ")
                .push_bind_unseparated(seo.meta_description.clone());
            assignments
                .push("keywords = ")
                .push_bind_unseparated(json_column(&seo.keywords)?);
        }
        if let Some(status) = &changes.status {
            assignments
                .push("status = ")
                .push_bind_unseparated(status.as_str());
        }
        if let Some(featured) = changes.featured {
            assignments
                .push("featured = ")
                .push_bind_unseparated(featured as i64);
        }
        if let Some(published_at) = &changes.published_at {
            assignments
                .push("published_at = ")
                .push_bind_unseparated(ts(published_at));
        }
        assignments
            .push("updated_at = ")
            .push_bind_unseparated(ts(&chrono::Utc::now()));

        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(pool).await.map_err(map_slug_conflict)?;
    }

    find_by_id(pool, id).await
}

/// Hard delete; returns false when no row matched
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Unconditional atomic view increment; concurrent requests accumulate
pub async fn increment_views(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("UPDATE blogs SET views = views + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Unconditional atomic like increment, returning the new count
pub async fn increment_likes(pool: &SqlitePool, id: &str) -> Result<Option<i64>> {
    let row = sqlx::query("UPDATE blogs SET likes = likes + 1 WHERE id = ? RETURNING likes")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(|r| r.try_get(0)).transpose().map_err(Error::from)
}

pub async fn distinct_categories(pool: &SqlitePool) -> Result<Vec<String>> {
    let categories = sqlx::query_scalar(
        "SELECT DISTINCT category FROM blogs WHERE status = 'published' ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn featured(pool: &SqlitePool, limit: i64) -> Result<Vec<BlogPost>> {
    let rows = sqlx::query(
        "SELECT * FROM blogs WHERE status = 'published' AND featured = 1 \
         ORDER BY published_at DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.iter().map(blog_from_row).collect()
}

/// Aggregate counts over published posts
pub struct BlogStats {
    pub total_blogs: i64,
    pub total_views: i64,
    pub category_counts: Vec<(String, i64)>,
}

pub async fn stats(pool: &SqlitePool) -> Result<BlogStats> {
    let total_blogs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE status = 'published'")
            .fetch_one(pool)
            .await?;

    let total_views: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(views), 0) FROM blogs WHERE status = 'published'")
            .fetch_one(pool)
            .await?;

    let category_counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT category, COUNT(*) AS count FROM blogs WHERE status = 'published' \
         GROUP BY category ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(BlogStats {
        total_blogs,
        total_views,
        category_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_time_rounds_up() {
        assert_eq!(read_time_for(""), "1 min read");
        assert_eq!(read_time_for("word"), "1 min read");

        let two_hundred_one = vec!["word"; 201].join(" ");
        assert_eq!(read_time_for(&two_hundred_one), "2 min read");

        let six_hundred = vec!["word"; 600].join(" ");
        assert_eq!(read_time_for(&six_hundred), "3 min read");
    }
}
