use crate::structs::{
    ApStatusMap, ConfiguredNetwork, ConnectionResult, NetworkCredentials, ScanResults, StatusMap,
};
use async_trait::async_trait;

/// 执行控制行工具（wpa_cli / hostapd_cli）的能力。
///
/// Returns the captured standard output. A tool that cannot be spawned or
/// exits non-zero is an [`crate::Error::CommandFailed`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> crate::Result<String>;
}

/// 供 Web 层调用的无线控制能力
#[async_trait]
pub trait WifiControl: Send + Sync {
    /// 触发一次扫描并返回按 SSID 索引的结果
    async fn scan_networks(&self) -> crate::Result<ScanResults>;

    /// 加入网络。协议跑完但未关联成功时返回 `Ok`，state 为 `FAIL`。
    async fn connect_network(&self, creds: &NetworkCredentials) -> crate::Result<ConnectionResult>;

    /// 中止正在进行的连接尝试；没有进行中的尝试时返回 false
    fn cancel_connect(&self) -> bool;

    /// wpa_supplicant 当前状态
    async fn status(&self) -> crate::Result<StatusMap>;

    /// hostapd 状态以及已连接的客户端
    async fn ap_status(&self) -> crate::Result<ApStatusMap>;

    /// wpa_supplicant 中已保存的网络
    async fn configured_networks(&self) -> crate::Result<Vec<ConfiguredNetwork>>;
}
