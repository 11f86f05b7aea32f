use super::WpaCliBackend;
use crate::parsing::{extract_wpa_state, parse_scan_results};
use crate::structs::{ConnectionResult, NetworkCredentials, ScanResults};
use crate::traits::CommandRunner;
use crate::{Error, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// wpa_supplicant 关联成功时报告的状态
const STATE_COMPLETED: &str = "COMPLETED";
/// `scan` 命令被接受时的回复
const SCAN_ACK: &str = "OK";

/// 等待 `dur`，期间若被取消则返回 `Error::Cancelled`
async fn wait_or_cancel(cancel: &CancellationToken, dur: Duration) -> Result<()> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        () = tokio::time::sleep(dur) => Ok(()),
    }
}

/// Clears the backend's in-flight token when the attempt ends, including when
/// the future is dropped halfway.
struct InFlightGuard<'a, R: CommandRunner> {
    backend: &'a WpaCliBackend<R>,
}

impl<R: CommandRunner> Drop for InFlightGuard<'_, R> {
    fn drop(&mut self) {
        self.backend.set_in_flight(None);
    }
}

impl<R: CommandRunner> WpaCliBackend<R> {
    /// 触发扫描并返回结果
    ///
    /// If the daemon does not acknowledge the scan with `OK` the result is
    /// empty and `scan_results` is never asked for.
    pub async fn scan_networks(&self) -> Result<ScanResults> {
        tracing::debug!("Sending scan command...");
        let ack = self.wpa_cmd(&["scan"]).await?;
        let ack = ack.trim();
        if ack != SCAN_ACK {
            tracing::warn!(reply = %ack, "Scan not accepted, returning no networks");
            return Ok(ScanResults::new());
        }

        // 扫描是异步完成的，等一会儿再取结果
        tokio::time::sleep(self.config.connect.scan_settle).await;

        let raw = self.wpa_cmd(&["scan_results"]).await?;
        let networks = parse_scan_results(&raw);
        tracing::info!(count = networks.len(), "Scan complete");
        Ok(networks)
    }

    /// 连接到指定网络，`cancel` 被触发时中止轮询
    ///
    /// Attempts are serialised: a second caller waits until the first one has
    /// finished. While an attempt runs its token is also reachable through
    /// `WifiControl::cancel_connect`.
    pub async fn connect_network_until(
        &self,
        creds: &NetworkCredentials,
        cancel: CancellationToken,
    ) -> Result<ConnectionResult> {
        creds.validate()?;

        let _lock = self.connect_lock.lock().await;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.set_in_flight(Some(cancel.clone()));
        let _guard = InFlightGuard { backend: self };

        self.join_network(creds, &cancel).await
    }

    /// 执行一步连接命令；命令返回时若已被取消则不再继续
    async fn join_step(&self, cancel: &CancellationToken, args: &[&str]) -> Result<String> {
        let out = self.wpa_cmd(args).await?;
        if cancel.is_cancelled() {
            tracing::info!(step = args.first().copied().unwrap_or(""), "Connect cancelled");
            return Err(Error::Cancelled);
        }
        Ok(out)
    }

    async fn join_network(
        &self,
        creds: &NetworkCredentials,
        cancel: &CancellationToken,
    ) -> Result<ConnectionResult> {
        // 1. 添加网络
        let net = self.join_step(cancel, &["add_network"]).await?;
        let net = net.trim().to_string();
        tracing::info!(network = %net, "WPA add network got");

        // 2. 设置 SSID（wpa_supplicant 要求字符串加引号）
        let ssid_arg = format!("\"{}\"", creds.ssid);
        let reply = self.join_step(cancel, &["set_network", &net, "ssid", &ssid_arg]).await?;
        tracing::debug!(reply = %reply.trim(), "WPA set ssid got");

        // 3. 设置密码
        let psk_arg = creds.psk_arg();
        let reply = self.join_step(cancel, &["set_network", &net, "psk", &psk_arg]).await?;
        tracing::debug!(reply = %reply.trim(), raw_key = creds.is_raw_psk(), "WPA set psk got");

        // 4. 启用网络
        let reply = self.join_step(cancel, &["enable_network", &net]).await?;
        tracing::debug!(reply = %reply.trim(), "WPA enable got");

        // 5. 轮询 status 直到 COMPLETED
        let connect = &self.config.connect;
        tracing::info!(ssid = %creds.ssid, attempts = connect.poll_attempts, "Connecting... Polling status.");
        for attempt in 1..=connect.poll_attempts {
            let status = self.join_step(cancel, &["status"]).await?;
            let state = extract_wpa_state(&status);
            tracing::debug!(attempt, state = state.unwrap_or("<none>"), "WPA state");

            if state == Some(STATE_COMPLETED) {
                let reply = self.wpa_cmd(&["save_config"]).await?;
                tracing::info!(ssid = %creds.ssid, reply = %reply.trim(), "Connection successful, config saved");
                return Ok(ConnectionResult::completed(&creds.ssid));
            }

            if attempt < connect.poll_attempts {
                wait_or_cancel(cancel, connect.poll_interval).await?;
            }
        }

        tracing::warn!(ssid = %creds.ssid, attempts = connect.poll_attempts, "Network did not reach COMPLETED");
        Ok(ConnectionResult::failed(&creds.ssid))
    }
}
