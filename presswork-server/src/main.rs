//! presswork-server - Content backend for the public site
//!
//! Serves blog posts with comments and voting, career and contact intake
//! with email notification, uploaded images, and the newsletter list.

use anyhow::Result;
use clap::Parser;
use presswork_common::config;
use presswork_server::{build_router, email::Mailer, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "presswork-server", about = "Presswork content backend")]
struct Args {
    /// Data folder holding the database and uploads tree
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(long, env = "PRESSWORK_PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting presswork-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let data_dir = config::resolve_data_dir(args.data_dir.as_deref());
    info!("Data folder: {}", data_dir.display());

    let db_path = config::database_path(&data_dir);
    let pool = match presswork_common::db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            // Persistence failure at boot is fatal
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    // Ensure the uploads tree exists before serving it statically
    let uploads_dir = config::uploads_dir(&data_dir);
    std::fs::create_dir_all(uploads_dir.join("blog-images"))?;

    let mailer = match config::SmtpSettings::from_env() {
        Some(settings) => match Mailer::from_settings(&settings) {
            Ok(mailer) => {
                info!("✓ Email notifications enabled via {}", settings.host);
                Some(Arc::new(mailer))
            }
            Err(e) => {
                error!("Invalid SMTP configuration, notifications disabled: {}", e);
                None
            }
        },
        None => {
            info!("EMAIL_USER/EMAIL_PASS not set, email notifications disabled");
            None
        }
    };

    let state = AppState::new(pool, uploads_dir, mailer);
    let app = build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("presswork-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
