use product_api::{
    app::products::{open_store, seed},
    build_router,
    config::Config,
    infrastructure::logger::Logger,
    AppState,
};
use rand::{rngs::StdRng, SeedableRng};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // 初始化日志，guard 需要存活到进程结束
    let _log_guard = Logger::init(&config.logging)?;

    info!("Starting product API...");

    let store = open_store(&config.database).await?;

    // 在接收请求之前写入示例数据
    if config.seed.enabled {
        let mut rng = StdRng::from_entropy();
        seed::init_data(store.as_ref(), &mut rng).await?;
    }

    let app = build_router(AppState::new(store), &config.http);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Product API running on http://{}", addr);
    info!("📖 API endpoints:");
    info!("   GET    /health                            - Health check");
    info!("   GET    /v1/products                       - List products (?department=&limit=&offset=)");
    info!("   GET    /v1/products/:productNumber        - Get product");
    info!("   POST   /v1/products                       - Create product");
    info!("   PUT    /v1/products                       - Replace product");
    info!("   PATCH  /v1/products/:productNumber        - Patch product");
    info!("   DELETE /v1/products/:productNumber        - Delete product");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
