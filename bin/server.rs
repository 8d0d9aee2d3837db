// Club Directory - Web Server
// REST API with Axum over the in-memory club registry

use anyhow::{Context, Result};
use clap::Parser;
use club_directory::api::{app, ApiState};
use club_directory::{
    telemetry, ClubRegistry, Config, HttpIntakeClient, RegistrationSubmitter, RegistryMutator,
    StaticCredentials,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "club-server", version, about = "College club directory API server")]
struct Args {
    #[command(flatten)]
    config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let Args { config } = Args::parse();

    let registry = ClubRegistry::new();
    let intake = HttpIntakeClient::new(&config.intake_url, config.intake_timeout())
        .context("failed to build intake client")?;

    let state = ApiState::new(
        RegistryMutator::new(registry.clone(), config.latency()),
        Arc::new(StaticCredentials::new()),
        RegistrationSubmitter::new(registry.clone(), Arc::new(intake)),
    );

    let router = app(state, &config.assets_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind))?;

    info!(
        addr = %config.bind,
        clubs = registry.count(),
        intake = %config.intake_url,
        assets = %config.assets_dir.display(),
        "🚀 club server listening"
    );

    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
