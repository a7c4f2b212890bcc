use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use admissions_prompt_relay::completion::OpenAiClient;
use admissions_prompt_relay::config::{Cli, Config};
use admissions_prompt_relay::routes::ROUTES;
use admissions_prompt_relay::server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    // Parse CLI arguments (falling back to environment variables).
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "admissions_prompt_relay=debug,tower_http=debug"
    } else {
        "admissions_prompt_relay=info,tower_http=info"
    };

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }

    info!("admissions-prompt-relay v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_cli(&cli)?;

    info!(
        model = %config.openai.model,
        base_url = %config.openai.base_url,
        temperature = config.openai.temperature,
        "Configuration loaded"
    );

    let client = OpenAiClient::from_config(&config);
    let state = Arc::new(AppState::new(Arc::new(client))?);

    let app = build_router(state);

    for route in ROUTES {
        info!(method = ?route.method, path = route.path, "Route registered");
    }

    let listen_addr = config.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
