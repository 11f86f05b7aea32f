//! 后端：通过 wpa_cli 管理站点连接，通过 hostapd_cli 读取 AP 状态
//!
//! `commands` holds the scan and join sequences, `status` the read-only
//! queries.

mod commands;
mod status;

use crate::config::WifiConfig;
use crate::structs::{
    ApStatusMap, ConfiguredNetwork, ConnectionResult, NetworkCredentials, ScanResults, StatusMap,
};
use crate::traits::{CommandRunner, WifiControl};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// wpa_cli / hostapd_cli 后端
pub struct WpaCliBackend<R> {
    runner: R,
    config: Arc<WifiConfig>,
    // 同一时间只允许一次连接尝试：它们共享 wpa_supplicant 的网络列表
    connect_lock: tokio::sync::Mutex<()>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl<R: CommandRunner> WpaCliBackend<R> {
    pub fn new(runner: R, config: Arc<WifiConfig>) -> Self {
        Self {
            runner,
            config,
            connect_lock: tokio::sync::Mutex::new(()),
            in_flight: Mutex::new(None),
        }
    }

    pub fn config(&self) -> Arc<WifiConfig> {
        self.config.clone()
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// 发送一条 wpa_cli 命令，自动加上 `-i <interface>`
    async fn wpa_cmd(&self, args: &[&str]) -> Result<String> {
        let station = &self.config.station;
        self.runner
            .run(&station.tool, &with_interface(&station.interface, args))
            .await
    }

    /// 发送一条 hostapd_cli 命令
    async fn hostapd_cmd(&self, args: &[&str]) -> Result<String> {
        let ap = &self.config.access_point;
        self.runner.run(&ap.tool, &with_interface(&ap.interface, args)).await
    }

    fn set_in_flight(&self, token: Option<CancellationToken>) {
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

fn with_interface(interface: &str, args: &[&str]) -> Vec<String> {
    let mut full = Vec::with_capacity(args.len() + 2);
    full.push("-i".to_string());
    full.push(interface.to_string());
    full.extend(args.iter().map(|a| a.to_string()));
    full
}

#[async_trait]
impl<R: CommandRunner> WifiControl for WpaCliBackend<R> {
    async fn scan_networks(&self) -> Result<ScanResults> {
        WpaCliBackend::scan_networks(self).await
    }

    async fn connect_network(&self, creds: &NetworkCredentials) -> Result<ConnectionResult> {
        self.connect_network_until(creds, CancellationToken::new()).await
    }

    fn cancel_connect(&self) -> bool {
        let token = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match token {
            Some(token) => {
                tracing::info!("Cancelling in-flight connection attempt");
                token.cancel();
                true
            }
            None => false,
        }
    }

    async fn status(&self) -> Result<StatusMap> {
        WpaCliBackend::status(self).await
    }

    async fn ap_status(&self) -> Result<ApStatusMap> {
        WpaCliBackend::ap_status(self).await
    }

    async fn configured_networks(&self) -> Result<Vec<ConfiguredNetwork>> {
        WpaCliBackend::configured_networks(self).await
    }
}
