use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 默认配置文件位置，可以用 `IOTWIFI_CONFIG` 覆盖
pub const DEFAULT_CONFIG_PATH: &str = "/etc/iotwifi/iotwifi.toml";
pub const CONFIG_PATH_ENV: &str = "IOTWIFI_CONFIG";

/// 顶层应用配置
#[derive(Debug, Clone)]
pub struct WifiConfig {
    pub station: ToolConfig,
    pub access_point: ToolConfig,
    pub connect: ConnectConfig,
    pub bind_addr: SocketAddr,
}

/// 一个控制行工具以及它操作的接口
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub tool: String,
    pub interface: String,
}

/// 连接轮询与扫描等待
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    pub scan_settle: Duration,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            poll_attempts: 5,
            poll_interval: Duration::from_secs(3),
            scan_settle: Duration::from_secs(1),
        }
    }
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            station: ToolConfig {
                tool: "wpa_cli".into(),
                interface: "wlan0".into(),
            },
            access_point: ToolConfig {
                tool: "hostapd_cli".into(),
                interface: "uap0".into(),
            },
            connect: ConnectConfig::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

// ============= TOML 文件结构 =============

/// 用于解析 TOML 的临时结构，所有字段都可省略
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct WifiConfigFile {
    station: ToolToml,
    access_point: ToolToml,
    connect: ConnectToml,
    server: ServerToml,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ToolToml {
    tool: Option<String>,
    interface: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConnectToml {
    poll_attempts: Option<u32>,
    poll_interval_ms: Option<u64>,
    scan_settle_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ServerToml {
    bind_addr: Option<String>,
}

impl ToolToml {
    fn merge_into(self, base: ToolConfig) -> ToolConfig {
        ToolConfig {
            tool: self.tool.unwrap_or(base.tool),
            interface: self.interface.unwrap_or(base.interface),
        }
    }
}

impl TryFrom<WifiConfigFile> for WifiConfig {
    type Error = Error;

    fn try_from(t: WifiConfigFile) -> Result<Self> {
        let defaults = WifiConfig::default();

        let bind_addr = match t.server.bind_addr {
            Some(addr) => SocketAddr::from_str(&addr)
                .map_err(|e| Error::Config(format!("invalid bind_addr '{}': {}", addr, e)))?,
            None => defaults.bind_addr,
        };

        let poll_attempts = t.connect.poll_attempts.unwrap_or(defaults.connect.poll_attempts);
        if poll_attempts == 0 {
            return Err(Error::Config("poll_attempts must be at least 1".into()));
        }

        Ok(WifiConfig {
            station: t.station.merge_into(defaults.station),
            access_point: t.access_point.merge_into(defaults.access_point),
            connect: ConnectConfig {
                poll_attempts,
                poll_interval: t
                    .connect
                    .poll_interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.connect.poll_interval),
                scan_settle: t
                    .connect
                    .scan_settle_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.connect.scan_settle),
            },
            bind_addr,
        })
    }
}

// ============= 配置加载函数 =============

/// 从 TOML 字符串加载配置
pub fn load_config_from_toml_str(s: &str) -> Result<WifiConfig> {
    let parsed: WifiConfigFile = toml::from_str(s)?;
    WifiConfig::try_from(parsed)
}

/// 从文件加载配置；文件不存在时使用默认值
pub fn load_config_from_path(path: &Path) -> Result<WifiConfig> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(WifiConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config = load_config_from_toml_str(&content)?;
    tracing::info!(path = %path.display(), "Loaded config");
    Ok(config)
}
