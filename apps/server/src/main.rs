use findash_server::{
    api::app_router, build_state, config::Config, init_tracing, shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config);
    tracing::info!(
        project = %config.project_name,
        version = %config.version,
        debug = config.debug,
        log_level = %config.log_level,
        "Starting application"
    );

    let state = build_state(&config);
    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
