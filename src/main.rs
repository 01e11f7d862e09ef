//! Log Query Contract Server
//! HTTP ingress that validates and normalizes query requests

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use clap::{Arg, Command};
use log_query_contract::config::Config;
use log_query_contract::handlers::create_router;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("contract_server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("SIEM Team")
        .about("Validation ingress for log search, alert search and stats requests")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (defaults to environment variables)"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Server host"),
        )
        .arg(
            Arg::new("validate-config")
                .long("validate-config")
                .help("Validate configuration and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::from_env().context("Failed to load configuration from environment")?,
    };

    // Override with command line arguments
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }

    config.validate().context("Configuration validation failed")?;

    init_tracing(&config);

    if matches.get_flag("validate-config") {
        info!("Configuration is valid");
        return Ok(());
    }

    let mut app = create_router()
        .layer(DefaultBodyLimit::max(config.server.max_request_size))
        .layer(TraceLayer::new_for_http());
    if config.server.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Starting log query contract server on {}", addr);
    info!("Health Check: http://{}/healthz", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(config.logging.env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(config.logging.with_target))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
