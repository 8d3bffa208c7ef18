//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::PageRenderer;
use crate::api::configure_routes;
use crate::api::middleware::SessionMiddleware;
use crate::storage::SessionRegistry;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();

    // 模板在启动时解析一次，出错直接退出
    let renderer = web::Data::new(PageRenderer::new().context("Failed to load page templates")?);
    let registry = Arc::new(SessionRegistry::new(&config.session));
    let session_config = config.session.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);
    info!(
        "Sessions idle out after {}s (max {})",
        config.session.idle_timeout_secs, config.session.max_sessions
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(registry.clone(), &session_config))
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .app_data(renderer.clone())
            .app_data(web::PayloadConfig::new(64 * 1024))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped");
    Ok(())
}
