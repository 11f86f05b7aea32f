mod runner;

use anyhow::Context;
use iotwifi_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, load_config_from_path};
use iotwifi_core::WifiConfig;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn load_config(path: &Path) -> anyhow::Result<WifiConfig> {
    load_config_from_path(path).with_context(|| format!("Failed to load config {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 初始化日志（这是入口点的职责）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. 加载配置
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_config(&path)?;

    // 3. Ctrl-C 时优雅退出
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("🛑 Ctrl-C received, shutting down.");
                    shutdown.cancel();
                }
                Err(e) => tracing::warn!("Unable to listen for Ctrl-C: {}", e),
            }
        });
    }

    // 4. 调用库的核心逻辑
    runner::run(config, shutdown).await.context("iotwifi failed")?;

    tracing::info!("🛑 Shut down.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bad_config_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connect]\npoll_attempts = 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        let top = err.to_string();
        assert!(top.starts_with("Failed to load config"), "{top}");
        assert!(top.contains(&file.path().display().to_string()));
        // 根因仍在错误链里
        assert!(err.chain().any(|e| e.to_string().contains("poll_attempts")));
    }

    #[test]
    fn missing_config_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("none.toml")).is_ok());
    }
}
