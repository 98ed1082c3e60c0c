use std::{io, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use axum::{
    extract::Extension,
    routing::{get, post},
    serve, Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use verde_io::LoadOutcome;

mod routes;

use routes::{calculate, capacity_overview, index, AppState};

#[derive(Parser)]
#[command(author, version, about = "Panel de energía renovable sobre HTTP", long_about = None)]
struct Opt {
    /// Directory holding the source CSV datasets
    #[arg(long, default_value = "data")]
    data: PathBuf,
    /// Address to bind the HTTP server
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let opts = Opt::parse();
    let (registry, report) = verde_io::load_registry(&opts.data, verde_io::DEFAULT_SOURCES);
    for entry in &report.entries {
        match entry.outcome {
            LoadOutcome::Loaded => info!(
                "Datos cargados: {} ({} filas)",
                entry.dataset,
                entry.rows.unwrap_or(0)
            ),
            LoadOutcome::Missing => warn!("Archivo no encontrado: {}", entry.path),
            LoadOutcome::Failed => warn!(
                "Error al cargar {}: {}",
                entry.dataset,
                entry.message.as_deref().unwrap_or("desconocido")
            ),
        }
    }
    info!(
        "{} de {} conjuntos de datos cargados",
        report.loaded_count(),
        report.entries.len()
    );

    let state = Arc::new(AppState { registry });
    let app = Router::new()
        .route("/", get(index))
        .route("/calculate", post(calculate))
        .route("/capacidad", get(capacity_overview))
        .layer(Extension(state));

    info!("Escuchando en {}", opts.addr);
    let listener = TcpListener::bind(opts.addr).await?;
    serve(listener, app).await?;

    Ok(())
}
