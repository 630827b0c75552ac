use face_profiler::config::{ServerConfig, usage};
use face_profiler::directory::repository::ContactRepository;
use face_profiler::rpc::handlers::router;
use face_profiler::rpc::service::ContactService;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("face_profiler");

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", usage(program));
        return Ok(());
    }

    let config = ServerConfig::from_args(args.get(1..).unwrap_or(&[]), |key| {
        std::env::var(key).ok()
    })?;
    tracing::info!(
        "Starting contact directory on {} (search pacing {:?})",
        config.bind_addr,
        config.search_pacing
    );

    // 1. Directory and request handling:
    let service = ContactService::new(ContactRepository::new(), config.search_pacing);

    // 2. Spawn stats reporter:
    let stats_service = service.clone();
    let stats_interval = config.stats_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(stats_interval);

        loop {
            interval.tick().await;
            let stats = stats_service.repository().stats().await;
            tracing::info!(
                "Directory stats: {} contacts, {} phone numbers, {} active search streams",
                stats.contacts,
                stats.phone_numbers,
                stats_service.streams().active_count()
            );
        }
    });

    // 3. Serve RPC endpoints until Ctrl+C:
    let app = router(service.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("RPC server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(service))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C after cancelling every live search stream, so long-running
/// streams do not hold the graceful shutdown open.
async fn shutdown_signal(service: Arc<ContactService>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
    service.streams().cancel_all();
}
