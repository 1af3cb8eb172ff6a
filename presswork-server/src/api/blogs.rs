//! Blog post endpoints: listing, detail, CRUD, likes, aggregates

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use presswork_common::db::models::{BlogPost, BlogStatus};
use presswork_common::{defaults, ids, normalize, Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{data_message_response, data_response, message_response, require_object_id};
use crate::db::blogs::{self, BlogFilter, BlogUpdate};
use crate::upload::{self, FileRule, FormPayload};
use crate::{pagination, slug, AppState};

/// Query parameters for the published listing
#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
    /// "true" enables the featured filter; anything else is ignored
    pub featured: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}

/// GET /api/blogs
///
/// Paginated published posts, newest publication first.
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Value>> {
    let (page, limit, offset) = pagination::sanitize(query.page, query.limit);

    let filter = BlogFilter {
        // "All" is a sentinel for no category filter
        category: query
            .category
            .filter(|c| !c.is_empty() && c.as_str() != "All"),
        featured: query.featured.as_deref() == Some("true"),
        author: query.author.filter(|a| !a.is_empty()),
        search: query.search.filter(|s| !s.is_empty()),
    };

    let posts = blogs::list(&state.db, &filter, limit, offset).await?;
    let total = blogs::count(&state.db, &filter).await?;

    Ok(Json(json!({
        "success": true,
        "data": posts,
        "pagination": pagination::page_meta(total, page, limit),
    })))
}

/// GET /api/blogs/categories
pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Value>> {
    let categories = blogs::distinct_categories(&state.db).await?;
    Ok(data_response(categories))
}

/// GET /api/blogs/featured
pub async fn get_featured_blogs(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Value>> {
    let limit = query.limit.unwrap_or(3).clamp(1, pagination::MAX_PAGE_SIZE);
    let posts = blogs::featured(&state.db, limit).await?;
    Ok(data_response(posts))
}

/// GET /api/blogs/stats
pub async fn get_blog_stats(State(state): State<AppState>) -> Result<Json<Value>> {
    let stats = blogs::stats(&state.db).await?;
    let category_stats: Vec<Value> = stats
        .category_counts
        .iter()
        .map(|(category, count)| json!({ "category": category, "count": count }))
        .collect();

    Ok(data_response(json!({
        "totalBlogs": stats.total_blogs,
        "totalViews": stats.total_views,
        "categoryStats": category_stats,
    })))
}

/// GET /api/blogs/:slug
///
/// Published-only detail lookup; bumps the view counter as a side effect.
/// The response carries the document as fetched, before the increment.
pub async fn get_blog_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let post = blogs::find_published_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| Error::NotFound("Blog post not found".to_string()))?;

    blogs::increment_views(&state.db, &post.id).await?;

    Ok(data_response(post))
}

fn validate_title(title: &str) -> Result<()> {
    if title.chars().count() > defaults::MAX_TITLE_LEN {
        return Err(Error::InvalidInput(format!(
            "Title must be {} characters or fewer",
            defaults::MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn validate_excerpt(excerpt: &str) -> Result<()> {
    if excerpt.chars().count() > defaults::MAX_EXCERPT_LEN {
        return Err(Error::InvalidInput(format!(
            "Excerpt must be {} characters or fewer",
            defaults::MAX_EXCERPT_LEN
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.chars().count() > defaults::MAX_CONTENT_LEN {
        return Err(Error::InvalidInput(format!(
            "Content must be {} characters or fewer",
            defaults::MAX_CONTENT_LEN
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if !defaults::is_known_category(category) {
        return Err(Error::InvalidInput(format!(
            "Unknown category: {}",
            category
        )));
    }
    Ok(())
}

fn parse_status(payload: &FormPayload) -> Result<Option<BlogStatus>> {
    match payload.text("status") {
        Some(s) => BlogStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid status: {}", s))),
        None => Ok(None),
    }
}

/// POST /api/blogs
///
/// Create a post from a JSON body or multipart form (optional `image` file).
pub async fn create_blog(
    State(state): State<AppState>,
    req: Request,
) -> Result<impl IntoResponse> {
    let payload =
        upload::read_request_payload(req, &state.uploads_dir, FileRule::BlogImage).await?;

    let title = payload.text("title").unwrap_or_default();
    let excerpt = payload.text("excerpt").unwrap_or_default();
    let content = payload.text("content").unwrap_or_default();

    if title.is_empty() || excerpt.is_empty() || content.is_empty() {
        return Err(Error::InvalidInput(
            "Title, excerpt, and content are required".to_string(),
        ));
    }
    validate_title(&title)?;
    validate_excerpt(&excerpt)?;
    validate_content(&content)?;

    let category = payload
        .text("category")
        .ok_or_else(|| Error::InvalidInput("Category is required".to_string()))?;
    validate_category(&category)?;

    let status = parse_status(&payload)?.unwrap_or(BlogStatus::Published);
    let featured = normalize::normalize_bool(payload.get("featured")).unwrap_or(false);
    let tags = normalize::normalize_string_array(payload.get("tags"));
    let author = normalize::normalize_author(payload.get("author"));
    // Create path degrades malformed sections/seo to defaults
    let sections = normalize::normalize_sections(payload.get("sections")).unwrap_or_default();
    let seo = normalize::normalize_seo(payload.get("seo")).unwrap_or_default();

    let image = payload
        .file_path
        .clone()
        .or_else(|| payload.text("image"))
        .unwrap_or_else(|| defaults::DEFAULT_POST_IMAGE.to_string());

    let slug = slug::generate_unique_slug(&state.db, &title, None).await?;

    let now = Utc::now();
    let post = BlogPost {
        id: ids::generate(),
        slug,
        read_time: blogs::read_time_for(&content),
        title,
        excerpt,
        content,
        sections,
        image,
        category,
        tags,
        author,
        status,
        featured,
        views: 0,
        likes: 0,
        // Set exactly once, on the first transition into published
        published_at: (status == BlogStatus::Published).then_some(now),
        seo,
        created_at: now,
        updated_at: now,
    };

    blogs::insert(&state.db, &post).await?;

    Ok((
        StatusCode::CREATED,
        data_message_response("Blog post created successfully", post),
    ))
}

/// PUT /api/blogs/:id
///
/// Partial update; only fields present in the payload are touched. The slug
/// is regenerated only when the title actually changes.
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> Result<Json<Value>> {
    require_object_id(&id, "blog post")?;

    let payload =
        upload::read_request_payload(req, &state.uploads_dir, FileRule::BlogImage).await?;

    let existing = blogs::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound("Blog post not found".to_string()))?;

    let mut changes = BlogUpdate::default();

    if let Some(title) = payload.text("title") {
        validate_title(&title)?;
        if title != existing.title {
            changes.slug = Some(slug::generate_unique_slug(&state.db, &title, Some(&id)).await?);
            changes.title = Some(title);
        }
    }

    if let Some(excerpt) = payload.text("excerpt") {
        validate_excerpt(&excerpt)?;
        changes.excerpt = Some(excerpt);
    }

    if let Some(content) = payload.text("content") {
        validate_content(&content)?;
        changes.read_time = Some(blogs::read_time_for(&content));
        changes.content = Some(content);
    }

    if let Some(category) = payload.text("category") {
        validate_category(&category)?;
        changes.category = Some(category);
    }

    // tags and seo are applied even when they normalize to empty, so
    // clients can explicitly clear them; other fields are dropped instead
    if payload.has("tags") {
        changes.tags = Some(normalize::normalize_string_array(payload.get("tags")));
    }
    if let Some(value) = payload.get("seo") {
        changes.seo = normalize::normalize_seo(Some(value));
    }
    if let Some(value) = payload.get("author") {
        if !value.is_null() {
            changes.author = Some(normalize::normalize_author(Some(value)));
        }
    }
    // The one strict parse on the update path: a malformed sections field
    // is reported, not defaulted
    if let Some(value) = payload.get("sections") {
        if !value.is_null() {
            changes.sections = Some(normalize::normalize_sections(Some(value))?);
        }
    }

    if let Some(status) = parse_status(&payload)? {
        if status == BlogStatus::Published && existing.published_at.is_none() {
            changes.published_at = Some(Utc::now());
        }
        changes.status = Some(status);
    }

    if let Some(featured) = normalize::normalize_bool(payload.get("featured")) {
        changes.featured = Some(featured);
    }

    if let Some(path) = payload.file_path.clone() {
        changes.image = Some(path);
    } else if let Some(url) = payload.text("image") {
        changes.image = Some(url);
    }

    let updated = blogs::apply_update(&state.db, &id, &changes)
        .await?
        .ok_or_else(|| Error::NotFound("Blog post not found".to_string()))?;

    Ok(data_message_response("Blog post updated successfully", updated))
}

/// DELETE /api/blogs/:id
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "blog post")?;

    if !blogs::delete(&state.db, &id).await? {
        return Err(Error::NotFound("Blog post not found".to_string()));
    }

    Ok(message_response("Blog post deleted successfully"))
}

/// POST /api/blogs/:id/like
///
/// Unconditional like increment: no voter tracking, repeatable by design
/// (distinct from comment voting).
pub async fn like_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_object_id(&id, "blog post")?;

    let likes = blogs::increment_likes(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound("Blog post not found".to_string()))?;

    Ok(data_message_response(
        "Blog liked successfully",
        json!({ "likes": likes }),
    ))
}
