pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod schema;
pub mod services;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use state::SharedState;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command() {
        Commands::Init => {
            let path = cli.init_path();
            if Config::create_default_if_missing(&path)? {
                println!("✓ Config file created at {}", path.display());
            } else {
                println!("Config file already exists at {}", path.display());
            }
            Ok(())
        }

        Commands::CheckConfig => {
            config.validate()?;
            println!("✓ Config is valid");
            println!("  database: {}", config.general.database_url);
            println!(
                "  listen:   {}:{}",
                config.server.bind_address, config.server.port
            );
            println!(
                "  ai:       {}",
                if config.ai.is_usable() {
                    "configured"
                } else {
                    "disabled"
                }
            );
            Ok(())
        }

        Commands::Serve => {
            config.validate()?;
            let prometheus_handle = init_metrics(&config)?;
            init_tracing(&config)?;
            match cli.config_source() {
                Some(path) => info!("Loaded config from: {}", path.display()),
                None => info!("No config file found, using defaults"),
            }
            serve(config, prometheus_handle).await
        }
    }
}

fn init_metrics(config: &Config) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    use metrics_exporter_prometheus::PrometheusBuilder;
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    Ok(Some(handle))
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer());

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        if !config.observability.loki_labels.contains_key("app") {
            builder = builder.label("app", "lifedesk")?;
        }
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key.as_str(), value.as_str())?;
        }
        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    if config.observability.metrics_enabled {
        info!("Prometheus metrics recorder initialized");
    }

    Ok(())
}

async fn serve(config: Config, prometheus_handle: Option<PrometheusHandle>) -> anyhow::Result<()> {
    info!("Lifedesk v{} starting...", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let shared = Arc::new(SharedState::new(config).await?);
    let app = api::router(api::create_app_state(shared, prometheus_handle));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
