use crate::traits::CommandRunner;
use crate::Result;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// One recorded call to the mock runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// 跳过 `-i <interface>` 后的第一个参数，例如 `status`、`set_network`
    pub fn subcommand(&self) -> &str {
        let idx = if self.args.first().map(String::as_str) == Some("-i") { 2 } else { 0 };
        self.args.get(idx).map(String::as_str).unwrap_or("")
    }
}

type Responder = dyn Fn(&Invocation) -> Result<String> + Send + Sync;

/// A scripted command runner for tests and local development.
/// It never touches the OS; every call is recorded and answered by the
/// responder closure.
pub struct MockRunner {
    responder: Box<Responder>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Invocation) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 模拟一个已经能连上网络的 wpa_supplicant 和一个带两个客户端的 hostapd
    pub fn simulated() -> Self {
        Self::new(|call| {
            let reply = match (call.program.as_str(), call.subcommand()) {
                (_, "scan") => "OK\n",
                (_, "scan_results") => SIMULATED_SCAN_RESULTS,
                (_, "add_network") => "0\n",
                (_, "list_networks") => SIMULATED_LIST_NETWORKS,
                ("hostapd_cli", "status") => SIMULATED_AP_STATUS,
                ("hostapd_cli", "list_sta") => "02:00:00:aa:bb:01\n02:00:00:aa:bb:02\n",
                (_, "status") => SIMULATED_STA_STATUS,
                _ => "OK\n",
            };
            Ok(reply.to_string())
        })
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.subcommand().to_string())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let call = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        };
        tracing::debug!(program, args = ?args, "🤖 [MockRunner] command");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());
        (self.responder)(&call)
    }
}

const SIMULATED_SCAN_RESULTS: &str = "\
bssid / frequency / signal level / flags / ssid
02:00:00:00:00:01\t2437\t-38\t[WPA2-PSK-CCMP][ESS]\tMyHomeWiFi
02:00:00:00:00:02\t2412\t-61\t[ESS]\tCafeGuest
02:00:00:00:00:03\t5180\t-72\t[WPA2-PSK-CCMP][ESS]\tNeighbor's Network
02:00:00:00:00:04\t2462\t-55\t[WPA-PSK-TKIP][WPA2-PSK-CCMP][ESS]\txfinitywifi
";

const SIMULATED_LIST_NETWORKS: &str = "\
network id / ssid / bssid / flags
0\tMyHomeWiFi\tany\t[CURRENT]
";

const SIMULATED_STA_STATUS: &str = "\
bssid=02:00:00:00:00:01
freq=2437
ssid=MyHomeWiFi
id=0
mode=station
pairwise_cipher=CCMP
group_cipher=CCMP
key_mgmt=WPA2-PSK
wpa_state=COMPLETED
address=02:00:00:00:10:00
";

const SIMULATED_AP_STATUS: &str = "\
state=ENABLED
phy=phy0
freq=2437
channel=6
bss[0]=uap0
bssid[0]=02:00:00:00:20:00
ssid[0]=iotwifi-setup
num_sta[0]=2
";
