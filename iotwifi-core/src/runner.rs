use crate::traits::CommandRunner;
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{error, trace};

/// Runs control tools as real child processes.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

/// `wpa_cli -i wlan0 set_network 0 ssid` -> `wpa_cli set_network`，用于日志和错误信息
pub(crate) fn describe(program: &str, args: &[String]) -> String {
    let mut rest = args.iter().map(String::as_str);
    let sub = match args.first().map(String::as_str) {
        Some("-i") => rest.nth(2),
        _ => rest.next(),
    };
    match sub {
        Some(sub) => format!("{} {}", program, sub),
        None => program.to_string(),
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let ctx = describe(program, args);
        trace!(command = %ctx, "spawning");

        match Command::new(program).args(args).output().await {
            Ok(out) => {
                if !out.status.success() {
                    let err = String::from_utf8_lossy(&out.stderr);
                    error!(context = %ctx, stderr = %err, "command failed");
                    return Err(Error::CommandFailed(format!("{} failed: {}", ctx, err.trim())));
                }
                Ok(String::from_utf8_lossy(&out.stdout).into_owned())
            }
            Err(e) => {
                error!(context = %ctx, error = %e, "failed to spawn command");
                Err(Error::CommandFailed(format!("{} spawn failed: {}", ctx, e)))
            }
        }
    }
}
