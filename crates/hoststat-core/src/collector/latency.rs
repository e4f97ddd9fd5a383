//! Round-trip latency probes using the system `ping` binary.
//!
//! Raw ICMP sockets need privileges the daemon should not have; the setuid
//! `ping` already has them.

use std::process::ExitStatus;

use tokio::process::Command;
use tracing::debug;

use crate::collector::source::LatencyReading;

/// Echo requests sent per probe.
const PING_COUNT: &str = "2";
/// Deadline in seconds for the whole probe.
const PING_DEADLINE_SECS: &str = "3";

/// The three fixed endpoints the dashboard charts.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyTargets {
    pub google: String,
    pub cloudflare: String,
    pub discord: String,
}

impl Default for LatencyTargets {
    fn default() -> Self {
        Self {
            google: "8.8.8.8".to_string(),
            cloudflare: "1.1.1.1".to_string(),
            discord: "discord.com".to_string(),
        }
    }
}

impl LatencyTargets {
    /// Probes all three targets concurrently.
    pub async fn measure(&self) -> LatencyReading {
        let (google_ms, cloudflare_ms, discord_ms) = tokio::join!(
            ping(&self.google),
            ping(&self.cloudflare),
            ping(&self.discord)
        );

        LatencyReading {
            google_ms,
            cloudflare_ms,
            discord_ms,
        }
    }
}

/// Average round-trip time to `host` in milliseconds, or `None` if no
/// echo came back or `ping` could not run.
pub async fn ping(host: &str) -> Option<f64> {
    let output = Command::new("ping")
        .args(["-n", "-c", PING_COUNT, "-w", PING_DEADLINE_SECS, host])
        .kill_on_drop(true)
        .output()
        .await;

    match output {
        Ok(out) => avg_from_output(host, out.status, &out.stdout),
        Err(e) => {
            debug!(host, error = %e, "failed to run ping");
            None
        }
    }
}

/// Reads the average from a finished `ping`.
///
/// iputils exits 1 when any echo is lost but still prints the summary of the
/// replies it got, so the exit status alone does not decide.
fn avg_from_output(host: &str, status: ExitStatus, stdout: &[u8]) -> Option<f64> {
    let avg = parse_ping_avg(&String::from_utf8_lossy(stdout));
    match (avg, status.success()) {
        (Some(_), true) => {}
        (Some(_), false) => debug!(host, %status, "ping lost some echoes"),
        (None, true) => debug!(host, "ping output had no rtt summary"),
        (None, false) => debug!(host, %status, "ping got no reply"),
    }
    avg
}

/// Extracts the average from the summary line of `ping` output.
///
/// Handles both iputils (`rtt min/avg/max/mdev = 9.1/9.8/10.5/0.7 ms`) and
/// busybox (`round-trip min/avg/max = 9.1/9.8/10.5 ms`).
pub fn parse_ping_avg(output: &str) -> Option<f64> {
    let line = output.lines().find(|l| l.contains("min/avg/max"))?;
    let (_, values) = line.split_once('=')?;
    values.trim().split('/').nth(1)?.trim().parse().ok()
}
