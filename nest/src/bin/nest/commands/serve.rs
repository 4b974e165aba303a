use anyhow::{Context, Result};
use nest::{
    api::{AppState, create_router},
    config::NestConfig,
};
use tokio::net::TcpListener;

use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Serving",
    commands: &[
        "nest serve                                         # Listen on HOST:PORT (localhost:5000)",
        "PORT=8080 nest --config prod.toml serve            # Override the port",
    ],
}];

pub async fn handle_serve(config: &NestConfig, output: &OutputManager) -> Result<()> {
    let store = config.open_store().await?;
    let backend = store.backend_name();
    let frontend_url = config.frontend_url();
    if frontend_url.is_none() {
        output.verbose("FRONTEND_URL not set; CORS headers disabled");
    }

    let app = create_router(AppState::new(store), frontend_url.as_deref());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    output.success(&format!("Listening on http://{address} ({backend} store)"));
    log::info!("listening at {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    output.info("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {err}");
    }
}
