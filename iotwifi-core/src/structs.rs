use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// 站点状态：守护进程原样报告的 `key=value` 字段
pub type StatusMap = BTreeMap<String, String>;

/// AP 状态：hostapd 字段加上 `clients` 列表
pub type ApStatusMap = BTreeMap<String, serde_json::Value>;

/// 一次扫描的结果，按 SSID 索引（同名网络只保留最后一条）
pub type ScanResults = BTreeMap<String, ScannedNetwork>;

/// 扫描到的单个 Wi-Fi 网络，字段保持 `scan_results` 中的原始文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedNetwork {
    pub bssid: String,
    pub frequency: String,
    pub signal_level: String,
    pub flags: String,
    pub ssid: String,
}

/// `list_networks` 中已保存的一条网络配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredNetwork {
    pub network_id: String,
    pub ssid: String,
    pub bssid: String,
    pub flags: String,
}

/// /connect 的请求体
#[derive(Clone, Deserialize)]
pub struct NetworkCredentials {
    pub ssid: String,
    pub psk: String,
}

impl NetworkCredentials {
    pub fn new(ssid: impl Into<String>, psk: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            psk: psk.into(),
        }
    }

    /// Checks SSID length and WPA-PSK passphrase rules before anything is
    /// sent to the daemon: 8..=63 printable ASCII, or a 64 hex digit raw key.
    pub fn validate(&self) -> crate::Result<()> {
        if self.ssid.is_empty() {
            return Err(crate::Error::InvalidCredentials("ssid must not be empty".into()));
        }
        if self.ssid.len() > 32 {
            return Err(crate::Error::InvalidCredentials(format!(
                "ssid is {} bytes, at most 32 allowed",
                self.ssid.len()
            )));
        }

        let psk = self.psk.as_str();
        let passphrase =
            (8..=63).contains(&psk.len()) && psk.bytes().all(|b| (0x20..=0x7e).contains(&b));
        if !self.is_raw_psk() && !passphrase {
            return Err(crate::Error::InvalidCredentials(
                "psk must be 8-63 printable ASCII characters or 64 hex digits".into(),
            ));
        }
        Ok(())
    }

    /// 64 位十六进制即为预先计算好的 PSK，而不是口令
    pub fn is_raw_psk(&self) -> bool {
        self.psk.len() == 64 && self.psk.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// The `psk` value for `set_network`. A passphrase goes in quotes; a raw
    /// key must be sent bare or wpa_supplicant reads it as a 64 char
    /// passphrase and refuses it.
    pub(crate) fn psk_arg(&self) -> String {
        if self.is_raw_psk() {
            self.psk.clone()
        } else {
            format!("\"{}\"", self.psk)
        }
    }
}

// 不要把密码写进日志
impl fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field("psk", &"********")
            .finish()
    }
}

/// Supplicant state as seen by the connection supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Completed,
    Fail,
    /// Any other `wpa_state` value, kept verbatim.
    Other(String),
}

impl ConnectionState {
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionState::Completed => "COMPLETED",
            ConnectionState::Fail => "FAIL",
            ConnectionState::Other(s) => s,
        }
    }
}

impl From<&str> for ConnectionState {
    fn from(s: &str) -> Self {
        match s {
            "COMPLETED" => ConnectionState::Completed,
            "FAIL" => ConnectionState::Fail,
            other => ConnectionState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConnectionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of a join attempt that ran the whole protocol.
///
/// `ip` is left empty here; address assignment belongs to whoever runs DHCP.
/// `message` is only filled in when `state` is [`ConnectionState::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionResult {
    pub ssid: String,
    pub state: ConnectionState,
    pub ip: String,
    pub message: String,
}

impl ConnectionResult {
    pub fn completed(ssid: &str) -> Self {
        Self {
            ssid: ssid.to_string(),
            state: ConnectionState::Completed,
            ip: String::new(),
            message: String::new(),
        }
    }

    pub fn failed(ssid: &str) -> Self {
        Self {
            ssid: String::new(),
            state: ConnectionState::Fail,
            ip: String::new(),
            message: format!("Unable to connect to {}", ssid),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == ConnectionState::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passphrase_rules() {
        assert!(NetworkCredentials::new("home", "password123").validate().is_ok());
        assert!(NetworkCredentials::new("home", "a".repeat(63)).validate().is_ok());
        assert!(NetworkCredentials::new("home", "ab".repeat(32)).validate().is_ok());

        for bad in ["short", "", "pass\tword"] {
            let err = NetworkCredentials::new("home", bad).validate().unwrap_err();
            assert!(matches!(err, crate::Error::InvalidCredentials(_)), "{bad:?}");
        }
        // 64 字符但不是十六进制
        assert!(NetworkCredentials::new("home", "z".repeat(64)).validate().is_err());
    }

    #[test]
    fn raw_key_is_sent_unquoted() {
        let raw = NetworkCredentials::new("home", "ab".repeat(32));
        assert!(raw.is_raw_psk());
        assert!(raw.validate().is_ok());
        assert_eq!(raw.psk_arg(), "ab".repeat(32));

        let phrase = NetworkCredentials::new("home", "password123");
        assert!(!phrase.is_raw_psk());
        assert_eq!(phrase.psk_arg(), "\"password123\"");

        // 63 位十六进制仍是口令
        let hexish = NetworkCredentials::new("home", "a".repeat(63));
        assert!(!hexish.is_raw_psk());
        assert_eq!(hexish.psk_arg(), format!("\"{}\"", "a".repeat(63)));
    }

    #[test]
    fn ssid_rules() {
        assert!(NetworkCredentials::new("", "password123").validate().is_err());
        assert!(NetworkCredentials::new("x".repeat(33), "password123").validate().is_err());
        assert!(NetworkCredentials::new("My Home Net", "password123").validate().is_ok());
    }

    #[test]
    fn debug_hides_psk() {
        let creds = NetworkCredentials::new("home", "supersecret");
        let out = format!("{:?}", creds);
        assert!(out.contains("home"));
        assert!(!out.contains("supersecret"));
    }

    #[test]
    fn state_serializes_as_raw_string() {
        let result = ConnectionResult::completed("home");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["state"], "COMPLETED");
        assert_eq!(json["ssid"], "home");

        assert_eq!(ConnectionState::from("SCANNING"), ConnectionState::Other("SCANNING".into()));
        assert_eq!(ConnectionState::from("SCANNING").to_string(), "SCANNING");
    }

    #[test]
    fn failed_result_carries_message() {
        let result = ConnectionResult::failed("cafe");
        assert_eq!(result.state, ConnectionState::Fail);
        assert_eq!(result.message, "Unable to connect to cafe");
        assert!(!result.is_completed());
    }
}
