// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video-Client smoke check
//!
//! Restores the stored session (logging in from `VIDEO_EMAIL` /
//! `VIDEO_PASSWORD` if there is none) and lists the dashboard.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use video_client::{config::ClientConfig, session::SessionState, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(base_url = %config.api_base_url, "Starting Video-Client");

    let ctx = AppContext::with_file_store(config).context("Failed to build client")?;

    match ctx.api.health().await {
        Ok(health) => tracing::info!(status = %health.status, "Backend reachable"),
        Err(e) => tracing::warn!(error = %e, "Backend health check failed"),
    }

    if let SessionState::Absent = ctx.session.restore().await {
        let email = std::env::var("VIDEO_EMAIL").ok();
        let password = std::env::var("VIDEO_PASSWORD").ok();
        match (email, password) {
            (Some(email), Some(password)) => {
                ctx.session.login(&email, &password).await?;
            }
            _ => {
                tracing::info!("Not logged in; set VIDEO_EMAIL and VIDEO_PASSWORD to log in");
                return Ok(());
            }
        }
    }

    if let Some(user) = ctx.session.current_user() {
        tracing::info!(user_id = %user.id, name = %user.name, "Logged in");
    }

    let dashboard = ctx.api.get_dashboard().await?;
    tracing::info!(count = dashboard.count, "Dashboard loaded");
    for video in &dashboard.videos {
        tracing::info!(video_id = %video.id, title = %video.title, "Video");
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,video_client=debug"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
