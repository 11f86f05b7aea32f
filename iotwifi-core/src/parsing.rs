//! Parsers for the text printed by `wpa_cli` and `hostapd_cli`.
//!
//! Nothing in here fails: lines that do not fit the expected shape are
//! dropped and missing fields simply do not show up in the output.

use crate::structs::{ConfiguredNetwork, ScanResults, ScannedNetwork, StatusMap};

/// `wpa_cli scan_results` 中标记 P2P 设备的 flag
const P2P_MARKER: &str = "[P2P]";

/// 解析 `key=value` 形式的状态输出。按第一个 `=` 切分，重复的 key 以最后一次为准。
pub fn parse_key_values(output: &str) -> StatusMap {
    let mut map = StatusMap::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.to_string(), value.to_string());
        }
    }
    map
}

/// 去掉 hostapd 按接口编号的 key 后缀，例如 `ssid[0]=x` -> `ssid=x`
pub fn strip_indexed_keys(output: &str) -> String {
    let mut out = String::with_capacity(output.len());
    for line in output.lines() {
        match line.split_once('=') {
            Some((key, value)) => {
                out.push_str(strip_index_suffix(key));
                out.push('=');
                out.push_str(value);
            }
            None => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

fn strip_index_suffix(key: &str) -> &str {
    if let Some(body) = key.strip_suffix(']') {
        if let Some((name, index)) = body.rsplit_once('[') {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                return name;
            }
        }
    }
    key
}

/// 从 `status` 输出中取出 `wpa_state` 的值（大小写敏感）
pub fn extract_wpa_state(output: &str) -> Option<&str> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("wpa_state="))
        .map(|v| v.trim_end_matches('\r'))
}

/// 解析 SCAN_RESULTS 的输出
/// 格式: bssid / frequency / signal level / flags / ssid
///
/// The SSID is everything after the fourth column, so names with spaces
/// survive. Rows are keyed by SSID; a later row with the same SSID replaces
/// an earlier one.
pub fn parse_scan_results(output: &str) -> ScanResults {
    let mut networks = ScanResults::new();
    for line in output.lines().skip(1) {
        if line.contains(P2P_MARKER) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            continue;
        }

        let ssid = fields[4..].join(" ");
        networks.insert(
            ssid.clone(),
            ScannedNetwork {
                bssid: fields[0].to_string(),
                frequency: fields[1].to_string(),
                signal_level: fields[2].to_string(),
                flags: fields[3].to_string(),
                ssid,
            },
        );
    }
    networks
}

/// 解析 `list_sta` 输出：每行一个客户端 MAC
pub fn parse_station_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析 LIST_NETWORKS 的输出
/// 格式: network id / ssid / bssid / flags （以 tab 分隔）
pub fn parse_list_networks(output: &str) -> Vec<ConfiguredNetwork> {
    let mut networks = Vec::new();
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            continue;
        }
        networks.push(ConfiguredNetwork {
            network_id: parts[0].trim().to_string(),
            ssid: parts[1].to_string(),
            bssid: parts[2].to_string(),
            flags: parts.get(3).map(|f| f.trim().to_string()).unwrap_or_default(),
        });
    }
    networks
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_OUTPUT: &str = "\
bssid=aa:bb:cc:dd:ee:ff
freq=2437
ssid=HomeNetwork
id=0
mode=station
pairwise_cipher=CCMP
key_mgmt=WPA2-PSK
wpa_state=COMPLETED
ip_address=192.168.1.23
address=b8:27:eb:00:11:22
uuid=1b2c3d4e-aaaa-bbbb-cccc-b827eb001122
";

    #[test]
    fn key_values_from_status() {
        let map = parse_key_values(STATUS_OUTPUT);
        assert_eq!(map["wpa_state"], "COMPLETED");
        assert_eq!(map["ssid"], "HomeNetwork");
        assert_eq!(map["ip_address"], "192.168.1.23");
        assert_eq!(map.len(), 11);
    }

    #[test]
    fn duplicate_keys_last_wins_and_bare_lines_ignored() {
        let map = parse_key_values("state=ENABLED\nSelected interface 'uap0'\nstate=DISABLED\n\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map["state"], "DISABLED");
        assert!(!map.keys().any(|k| k.contains("Selected")));
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let map = parse_key_values("passphrase=a=b=c\n");
        assert_eq!(map["passphrase"], "a=b=c");
    }

    #[test]
    fn indexed_ap_keys_are_flattened() {
        let raw = "state=ENABLED\nbss[0]=uap0\nbssid[0]=b8:27:eb:00:11:23\nssid[0]=iot-wifi-cfg-3\nnum_sta[0]=1\n";
        let map = parse_key_values(&strip_indexed_keys(raw));
        assert_eq!(map["bss"], "uap0");
        assert_eq!(map["bssid"], "b8:27:eb:00:11:23");
        assert_eq!(map["ssid"], "iot-wifi-cfg-3");
        assert_eq!(map["num_sta"], "1");
        assert!(!map.contains_key("ssid[0]"));
    }

    #[test]
    fn non_numeric_brackets_are_left_alone() {
        assert_eq!(strip_index_suffix("ssid[x]"), "ssid[x]");
        assert_eq!(strip_index_suffix("ssid[]"), "ssid[]");
        assert_eq!(strip_index_suffix("bss[12]"), "bss");
        assert_eq!(strip_index_suffix("plain"), "plain");
    }

    #[test]
    fn wpa_state_lookup() {
        assert_eq!(extract_wpa_state(STATUS_OUTPUT), Some("COMPLETED"));
        assert_eq!(extract_wpa_state("wpa_state=SCANNING"), Some("SCANNING"));
        assert_eq!(extract_wpa_state("WPA_STATE=COMPLETED\n"), None);
        assert_eq!(extract_wpa_state("p2p_wpa_state=COMPLETED\n"), None);
        assert_eq!(extract_wpa_state(""), None);
    }

    #[test]
    fn scan_results_filter_and_ssid_reconstruction() {
        let raw = "bssid / frequency / signal level / flags / ssid\n\
                   02:00:00:00:01:00\t2412\t-40\t[WPA2-PSK-CCMP][ESS][P2P]\tDIRECT-xy-Printer\n\
                   11:22:33:44:55:66\t2437\t-71\n\
                   aa:bb:cc:dd:ee:ff\t5180\t-52\t[WPA2-PSK-CCMP][ESS]\tMy Home  Network\n";
        let networks = parse_scan_results(raw);
        assert_eq!(networks.len(), 1);

        let net = &networks["My Home Network"];
        assert_eq!(net.bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(net.frequency, "5180");
        assert_eq!(net.signal_level, "-52");
        assert_eq!(net.flags, "[WPA2-PSK-CCMP][ESS]");
        assert_eq!(net.ssid, "My Home Network");
    }

    #[test]
    fn same_ssid_collapses_to_last_row() {
        let raw = "bssid / frequency / signal level / flags / ssid\n\
                   aa:aa:aa:aa:aa:01\t2412\t-60\t[WPA2-PSK-CCMP][ESS]\tOffice\n\
                   aa:aa:aa:aa:aa:02\t5745\t-48\t[WPA2-PSK-CCMP][ESS]\tOffice\n";
        let networks = parse_scan_results(raw);
        assert_eq!(networks.len(), 1);
        assert_eq!(
            networks["Office"],
            ScannedNetwork {
                bssid: "aa:aa:aa:aa:aa:02".into(),
                frequency: "5745".into(),
                signal_level: "-48".into(),
                flags: "[WPA2-PSK-CCMP][ESS]".into(),
                ssid: "Office".into(),
            }
        );
    }

    #[test]
    fn header_only_scan_is_empty() {
        assert!(parse_scan_results("bssid / frequency / signal level / flags / ssid\n").is_empty());
        assert!(parse_scan_results("").is_empty());
    }

    #[test]
    fn station_list_drops_blank_lines() {
        let clients = parse_station_list("b8:27:eb:aa:bb:01\n\n  \nb8:27:eb:aa:bb:02\n");
        assert_eq!(clients, vec!["b8:27:eb:aa:bb:01", "b8:27:eb:aa:bb:02"]);
        assert!(parse_station_list("").is_empty());
    }

    #[test]
    fn list_networks_rows() {
        let raw = "network id / ssid / bssid / flags\n\
                   0\tHomeNetwork\tany\t[CURRENT]\n\
                   1\tCafe Guest\tany\n\
                   garbage\n";
        let networks = parse_list_networks(raw);
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].network_id, "0");
        assert_eq!(networks[0].flags, "[CURRENT]");
        assert_eq!(networks[1].ssid, "Cafe Guest");
        assert_eq!(networks[1].flags, "");
    }
}
