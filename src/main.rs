// src/main.rs
// Vizzy Chat - HTTP server entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use vizzy::{
    config::VizzyConfig,
    engine::{Engine, EngineLimits},
    image::ImageGateway,
    llm::OpenRouterClient,
    web,
};

#[derive(Parser)]
#[command(name = "vizzy")]
#[command(about = "Conversational image generation backend")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VIZZY_LOG_LEVEL", default_value = "info", global = true)]
    log_level: Level,

    /// Address to bind
    #[arg(long, env = "VIZZY_HOST", default_value = "0.0.0.0", global = true)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "VIZZY_PORT", default_value = "8000", global = true)]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
}

async fn run_server(host: &str, port: u16) -> Result<()> {
    let config = VizzyConfig::from_env()?;

    let api_key = config
        .keys
        .openrouter
        .clone()
        .context("OPENROUTER_API_KEY is required for the language model")?;

    let llm = Arc::new(OpenRouterClient::new(
        api_key,
        config.llm_url.clone(),
        config.llm_model.clone(),
        config.llm_timeout(),
    ));
    let images = ImageGateway::from_config(&config);
    info!(
        llm_model = %config.llm_model,
        image_providers = ?images.provider_names(),
        max_images = config.max_images,
        "Engine configured"
    );

    let engine = Engine::new(llm, images, EngineLimits::from(&config));
    let app = web::create_router(web::AppState::new(engine));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Vizzy Chat listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed arguments
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Serve) | None => run_server(&cli.host, cli.port).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_serves() {
        let cli = Cli::try_parse_from(["vizzy"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.host.is_empty());
    }

    #[test]
    fn test_bind_flags_apply_with_and_without_subcommand() {
        let cli = Cli::try_parse_from(["vizzy", "--host", "127.0.0.1", "-p", "9000"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!((cli.host.as_str(), cli.port), ("127.0.0.1", 9000));

        let cli = Cli::try_parse_from(["vizzy", "serve", "--port", "9001"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.port, 9001);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["vizzy", "--port", "http"]).is_err());
    }
}
