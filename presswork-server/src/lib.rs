//! presswork-server library - Content backend HTTP service
//!
//! Serves the public blog (posts, comments, voting), career and contact
//! intake, newsletter subscriptions, and the uploaded-file tree.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod email;
pub mod pagination;
pub mod slug;
pub mod upload;
pub mod votes;

/// Body cap: the largest accepted upload (10MB blog image) plus form fields
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Root of the statically-served uploads tree
    pub uploads_dir: PathBuf,
    /// Email notifier; None when SMTP is not configured
    pub mailer: Option<Arc<email::Mailer>>,
}

impl AppState {
    pub fn new(db: SqlitePool, uploads_dir: PathBuf, mailer: Option<Arc<email::Mailer>>) -> Self {
        Self {
            db,
            uploads_dir,
            mailer,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/blogs",
            get(api::blogs::list_blogs).post(api::blogs::create_blog),
        )
        .route("/api/blogs/categories", get(api::blogs::get_categories))
        .route("/api/blogs/featured", get(api::blogs::get_featured_blogs))
        .route("/api/blogs/stats", get(api::blogs::get_blog_stats))
        .route(
            "/api/blogs/:id",
            get(api::blogs::get_blog_by_slug)
                .put(api::blogs::update_blog)
                .delete(api::blogs::delete_blog),
        )
        .route("/api/blogs/:id/like", post(api::blogs::like_blog))
        .route(
            "/api/blogs/:id/comments",
            get(api::comments::get_comments_by_slug).post(api::comments::add_comment),
        )
        .route(
            "/api/blogs/:id/comments/:comment_id/vote",
            post(api::comments::vote_on_comment),
        )
        .route(
            "/api/blogs/:id/comments/:comment_id/like",
            post(api::comments::toggle_comment_like),
        )
        .route(
            "/api/career",
            post(api::careers::create_career).get(api::careers::list_careers),
        )
        .route(
            "/api/career/:id",
            get(api::careers::get_career)
                .patch(api::careers::update_career)
                .delete(api::careers::delete_career),
        )
        .route("/api/career/:id/resume", get(api::careers::download_resume))
        .route(
            "/api/contact",
            post(api::contacts::create_contact).get(api::contacts::list_contacts),
        )
        .route(
            "/api/contact/:id",
            get(api::contacts::get_contact)
                .patch(api::contacts::update_contact)
                .delete(api::contacts::delete_contact),
        )
        .route("/api/subscribe", post(api::subscribers::subscribe))
        .route("/api/unsubscribe", post(api::subscribers::unsubscribe))
        .route("/api/subscribers", get(api::subscribers::list_subscribers))
        .route(
            "/api/subscribers/:id",
            delete(api::subscribers::delete_subscriber),
        );

    Router::new()
        .merge(api)
        .merge(api::health::health_routes())
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
