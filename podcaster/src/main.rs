use clap::Parser;
use podcaster::{Config, build_app, init_logging};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let config = Config::parse();

    let app = build_app(&config)?;
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server is running on port {}", addr.port());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
