use anyhow::Context;
use clap::Parser;
use patient_registry_core::RecordStore;
use patient_registry_server::{router, telemetry, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init(config.log_filter());

    let store = RecordStore::new(&config.data_file);
    if config.init && store.init()? {
        tracing::info!(path = %store.path().display(), "Created empty patient store");
    }
    if !store.path().exists() {
        tracing::warn!(
            path = %store.path().display(),
            "Patient store does not exist; requests will fail until it is created (see --init)"
        );
    }

    let app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, data_file = %config.data_file.display(), "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
