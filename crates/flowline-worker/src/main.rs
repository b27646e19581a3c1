use anyhow::Result;
use flowline_worker::{WorkerConnection, WorkerProperties};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowline_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("flowline-worker starting...");

    let properties = WorkerProperties::from_env()?;
    let connection = WorkerConnection::connect(properties).await?;

    tracing::info!(
        endpoint = %connection.properties().endpoint,
        codec_steps = connection.payload_codec().len(),
        "Worker ready, waiting for shutdown signal..."
    );
    tokio::signal::ctrl_c().await?;

    tracing::info!("Worker shutdown complete");
    Ok(())
}
