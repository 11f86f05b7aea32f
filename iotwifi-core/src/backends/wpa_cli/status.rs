use super::WpaCliBackend;
use crate::parsing::{parse_key_values, parse_list_networks, parse_station_list, strip_indexed_keys};
use crate::structs::{ApStatusMap, ConfiguredNetwork, StatusMap};
use crate::traits::CommandRunner;
use crate::Result;

/// AP 状态中存放客户端列表的 key
pub const CLIENTS_KEY: &str = "clients";

impl<R: CommandRunner> WpaCliBackend<R> {
    /// wpa_supplicant 的当前状态
    pub async fn status(&self) -> Result<StatusMap> {
        let raw = self.wpa_cmd(&["status"]).await?;
        Ok(parse_key_values(&raw))
    }

    /// hostapd 的状态，加上当前连接的客户端列表
    pub async fn ap_status(&self) -> Result<ApStatusMap> {
        let raw = self.hostapd_cmd(&["status"]).await?;
        let mut status: ApStatusMap = parse_key_values(&strip_indexed_keys(&raw))
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();

        let stations = self.hostapd_cmd(&["list_sta"]).await?;
        let clients = parse_station_list(&stations);
        tracing::debug!(clients = clients.len(), "AP stations listed");
        status.insert(CLIENTS_KEY.to_string(), serde_json::Value::from(clients));

        Ok(status)
    }

    pub async fn configured_networks(&self) -> Result<Vec<ConfiguredNetwork>> {
        let raw = self.wpa_cmd(&["list_networks"]).await?;
        Ok(parse_list_networks(&raw))
    }
}
