use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xo_server::{router, ServerConfig, ServerHandle};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("xo_server=debug".parse()?))
        .init();

    let config = ServerConfig::from_env()?;
    info!("XO 对战服务端启动中...");

    let (handle, _event_loop) = ServerHandle::spawn();

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("XO 对战服务端已启动，监听 {}", config.bind_addr());

    axum::serve(listener, router(handle))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务端已关闭");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到退出信号，正在关闭...");
    }
}
