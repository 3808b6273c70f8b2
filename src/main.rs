use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use travel_gateway::backend::Backends;
use travel_gateway::config::{self, ConfigError, GatewayConfig};
use travel_gateway::http::HttpServer;
use travel_gateway::lifecycle::{self, Shutdown};
use travel_gateway::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "travel-gateway", version)]
#[command(about = "HTTP/SSE/WebSocket gateway for the flight and hotel gRPC services", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener address, overrides `listener.bind_address`
    #[arg(long, env = "GATEWAY_BIND")]
    bind: Option<String>,

    /// Flight service `host:port`, overrides `backends.flights`
    #[arg(long, env = "FLIGHTS_ADDR")]
    flights_addr: Option<String>,

    /// Hotel service `host:port`, overrides `backends.hotels`
    #[arg(long, env = "HOTELS_ADDR")]
    hotels_addr: Option<String>,
}

impl Cli {
    fn load(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => GatewayConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(addr) = self.flights_addr {
            config.backends.flights = addr;
        }
        if let Some(addr) = self.hotels_addr {
            config.backends.hotels = addr;
        }
        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().load()?;
    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "travel-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        flights = %config.backends.flights,
        hotels = %config.backends.hotels,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let backends = Backends::connect(&config.backends)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, backends);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
