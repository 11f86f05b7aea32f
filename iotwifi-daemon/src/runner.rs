use iotwifi_core::{WifiConfig, WifiControl, WpaCliBackend, web_server};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// --- 选择后端实现 ---
#[cfg(not(feature = "backend_mock"))]
fn get_backend(config: Arc<WifiConfig>) -> Arc<dyn WifiControl> {
    tracing::info!(
        station = %config.station.interface,
        ap = %config.access_point.interface,
        "📡 Using wpa_cli / hostapd_cli backend"
    );
    Arc::new(WpaCliBackend::new(iotwifi_core::ProcessRunner::new(), config))
}

#[cfg(feature = "backend_mock")]
fn get_backend(config: Arc<WifiConfig>) -> Arc<dyn WifiControl> {
    tracing::info!("🤖 Using simulated control tools (backend_mock)");
    Arc::new(WpaCliBackend::new(
        iotwifi_core::backends::mock::MockRunner::simulated(),
        config,
    ))
}

/// 构建后端并运行 Web 服务，直到 `shutdown` 被取消
pub async fn run(config: WifiConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr;
    let backend = get_backend(Arc::new(config));

    // 退出时同时中止正在进行的连接尝试
    let server_shutdown = {
        let backend = backend.clone();
        let token = shutdown.clone();
        async move {
            token.cancelled().await;
            backend.cancel_connect();
        }
    };

    web_server::run_server(backend, bind_addr, server_shutdown).await?;
    Ok(())
}
