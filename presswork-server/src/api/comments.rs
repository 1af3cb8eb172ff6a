//! Comment endpoints: creation, approved listing, and voting

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use presswork_common::db::models::Comment;
use presswork_common::{defaults, ids, normalize, Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{data_message_response, data_response, require_object_id};
use crate::db::{blogs, comments};
use crate::upload::{self, FileRule};
use crate::votes::{plan_vote, VoteAction, VoteKind};
use crate::AppState;

/// GET /api/blogs/:slug/comments
///
/// Approved comments of a published post, newest first.
pub async fn get_comments_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let post = blogs::find_published_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| Error::NotFound("Blog post not found".to_string()))?;

    let comments = comments::list_approved(&state.db, &post.id).await?;
    Ok(data_response(comments))
}

/// POST /api/blogs/:id/comments
///
/// Add a comment (JSON or multipart with an optional `avatar` image).
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> Result<impl IntoResponse> {
    require_object_id(&id, "blog post")?;

    let post = blogs::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| Error::NotFound("Blog post not found".to_string()))?;

    let payload = upload::read_request_payload(req, &state.uploads_dir, FileRule::Avatar).await?;

    let (name, email, body) = match (
        payload.text("name"),
        payload.text("email"),
        payload.text("comment"),
    ) {
        (Some(name), Some(email), Some(body)) => (name, email, body),
        _ => {
            return Err(Error::InvalidInput(
                "Name, email, and comment are required".to_string(),
            ))
        }
    };

    let email = email.to_lowercase();
    if !normalize::is_valid_email(&email) {
        return Err(Error::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }
    if body.chars().count() > defaults::MAX_COMMENT_LEN {
        return Err(Error::InvalidInput(format!(
            "Comment must be {} characters or fewer",
            defaults::MAX_COMMENT_LEN
        )));
    }

    let comment = Comment {
        id: ids::generate(),
        blog_id: post.id,
        name,
        email,
        comment: body,
        avatar: payload.file_path.clone(),
        author_id: payload.text("authorId"),
        approved: true,
        like_count: 0,
        dislike_count: 0,
        liked_by: Vec::new(),
        disliked_by: Vec::new(),
        created_at: Utc::now(),
    };

    comments::insert(&state.db, &comment).await?;

    Ok((
        StatusCode::CREATED,
        data_message_response("Comment added successfully", comment),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    action: VoteAction,
    voter_id: String,
}

/// POST /api/blogs/:blogId/comments/:commentId/vote
///
/// Reconcile a like/dislike action for one voter. Repeating an action is a
/// no-op and returns the current counters without writing.
pub async fn vote_on_comment(
    State(state): State<AppState>,
    Path((blog_id, comment_id)): Path<(String, String)>,
    req: Request,
) -> Result<Json<Value>> {
    require_object_id(&blog_id, "blog post")?;
    require_object_id(&comment_id, "comment")?;

    let fields = upload::read_json_object(req).await?;
    let vote_req: VoteRequest = serde_json::from_value(Value::Object(fields))
        .map_err(|_| Error::InvalidInput("A valid action and voterId are required".to_string()))?;

    let voter_id = vote_req.voter_id.trim().to_string();
    if voter_id.is_empty() {
        return Err(Error::InvalidInput("voterId is required".to_string()));
    }

    let comment = comments::find(&state.db, &blog_id, &comment_id)
        .await?
        .ok_or_else(|| Error::NotFound("Comment not found".to_string()))?;

    let current = comments::get_vote(&state.db, &comment.id, &voter_id).await?;
    let plan = plan_vote(vote_req.action, current);

    let (like_count, dislike_count) = if plan.is_noop() {
        comments::counters(&state.db, &comment.id).await?
    } else {
        comments::apply_vote_plan(&state.db, &comment.id, &voter_id, &plan).await?
    };

    Ok(data_response(json!({
        "likeCount": like_count,
        "dislikeCount": dislike_count,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    user_id: String,
}

/// POST /api/blogs/:blogId/comments/:commentId/like
///
/// Toggle endpoint: flips between not-liked and liked by dispatching
/// Like/Unlike through the same reconciler as the vote endpoint, so the two
/// can never diverge.
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    Path((blog_id, comment_id)): Path<(String, String)>,
    req: Request,
) -> Result<Json<Value>> {
    require_object_id(&blog_id, "blog post")?;
    require_object_id(&comment_id, "comment")?;

    let fields = upload::read_json_object(req).await?;
    let toggle: ToggleRequest = serde_json::from_value(Value::Object(fields))
        .map_err(|_| Error::InvalidInput("userId is required".to_string()))?;

    let user_id = toggle.user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(Error::InvalidInput("userId is required".to_string()));
    }

    let comment = comments::find(&state.db, &blog_id, &comment_id)
        .await?
        .ok_or_else(|| Error::NotFound("Comment not found".to_string()))?;

    let current = comments::get_vote(&state.db, &comment.id, &user_id).await?;
    let action = if current == Some(VoteKind::Like) {
        VoteAction::Unlike
    } else {
        VoteAction::Like
    };
    let plan = plan_vote(action, current);

    let (like_count, dislike_count) =
        comments::apply_vote_plan(&state.db, &comment.id, &user_id, &plan).await?;

    Ok(data_response(json!({
        "liked": action == VoteAction::Like,
        "likeCount": like_count,
        "dislikeCount": dislike_count,
    })))
}
