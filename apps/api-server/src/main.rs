//! # Folio API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod mail;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);

    config
        .generation
        .validate()
        .context("invalid generation settings")?;

    tracing::info!(host = %config.host, port = config.port, "Starting Folio API Server");

    let state = AppState::new(&config).await;

    #[cfg(feature = "scheduler")]
    let mut scheduler = start_scheduler(&config, &state).await?;

    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(server_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("HTTP server error")?;

    #[cfg(feature = "scheduler")]
    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    Ok(())
}

#[cfg(feature = "scheduler")]
async fn start_scheduler(
    config: &AppConfig,
    state: &AppState,
) -> anyhow::Result<Option<background::Scheduler>> {
    if !config.scheduler.enabled {
        tracing::info!("Scheduler disabled");
        return Ok(None);
    }
    let Some(generator) = state.generator.clone() else {
        tracing::warn!("Scheduler enabled but content generation is not configured");
        return Ok(None);
    };

    let scheduler = background::Scheduler::new(config.scheduler.clone()).await?;
    background::schedule_generation(&scheduler, generator)
        .await
        .context("invalid GENERATION_CRON")?;
    scheduler.start().await?;
    Ok(Some(scheduler))
}
