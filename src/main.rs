use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use shipquote::application::engine::QuoteEngine;
use shipquote::config::AppConfig;
use shipquote::domain::shipment::ShipmentDetails;
use shipquote::domain::transaction::ShippingTransaction;
use shipquote::infrastructure::clock::SystemClock;
use shipquote::infrastructure::gateway::SimulatedGateway;
use shipquote::infrastructure::in_memory::InMemoryShipmentStore;
use shipquote::interfaces::csv::quote_writer::QuoteWriter;
use shipquote::interfaces::http::{AppState, router};
use shipquote::telemetry;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Disable artificial gateway and pricing delays
        #[arg(long)]
        no_latency: bool,

        /// Seed for the simulated payment gateway
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Price a shipment (JSON file) and print the rate table as CSV
    Quote { input: PathBuf },
    /// Run the business rules against a transaction (JSON file)
    Validate { input: PathBuf },
}

fn offline_engine() -> QuoteEngine {
    QuoteEngine::new(
        Box::new(SimulatedGateway::new(false)),
        Box::new(InMemoryShipmentStore::new()),
        Box::new(SystemClock),
    )
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).into_diagnostic()?;
    serde_json::from_reader(io::BufReader::new(file)).into_diagnostic()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            no_latency,
            seed,
        } => {
            let mut config = AppConfig::from_env().into_diagnostic()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if no_latency {
                config.simulate_latency = false;
            }
            if seed.is_some() {
                config.rng_seed = seed;
            }

            let addr = config.socket_addr().into_diagnostic()?;
            let app = router(AppState::from_config(&config));
            let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
            tracing::info!(%addr, latency = config.simulate_latency, "listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .into_diagnostic()?;
        }
        Command::Quote { input } => {
            let mut shipment: ShipmentDetails = read_json(&input)?;
            shipment.normalize_legacy();
            let response = offline_engine().quote(&shipment).await.into_diagnostic()?;

            let stdout = io::stdout();
            let mut writer = QuoteWriter::new(stdout.lock());
            writer
                .write_options(response.quotes.all())
                .into_diagnostic()?;
            for hint in &response.metrics.recommendations {
                eprintln!("note: {hint}");
            }
        }
        Command::Validate { input } => {
            let mut tx: ShippingTransaction = read_json(&input)?;
            tx.normalize_legacy();
            let result = offline_engine().validate(&tx).into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&result).into_diagnostic()?
            );
            if !result.is_valid {
                return Err(miette!(
                    "{} business rule(s) failed",
                    result.errors.len()
                ));
            }
        }
    }

    Ok(())
}
