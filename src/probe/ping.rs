//! ICMP echo probe delegated to the system ping binary
//!
//! Ping prints its summary differently per OS family, so the latency parser
//! is chosen at runtime from [`PingPlatform`].

use super::{ProbeStrategy, ToolAdapter};
use crate::{
    models::{ProbeConfig, ProbeResult},
    types::StrategyKind,
};
use async_trait::async_trait;
use std::sync::Arc;

const PROGRAM: &str = "ping";
const SUCCESS_DETAIL: &str = "Ping succeeded";

/// OS family whose ping output format we understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingPlatform {
    /// `ping -n`, summary line `Minimum = 1ms, Maximum = 3ms, Average = 2ms`
    Windows,
    /// `ping -c`, summary line `rtt min/avg/max/mdev = 1.0/2.5/3.0/0.1 ms`
    Unix,
}

impl PingPlatform {
    /// Platform of the running process
    pub fn current() -> Self {
        Self::detect_from(std::env::consts::OS)
    }

    pub fn detect_from(os: &str) -> Self {
        if os.eq_ignore_ascii_case("windows") {
            PingPlatform::Windows
        } else {
            PingPlatform::Unix
        }
    }

    pub fn count_flag(&self) -> &'static str {
        match self {
            PingPlatform::Windows => "-n",
            PingPlatform::Unix => "-c",
        }
    }

    /// Extract the average round-trip time in milliseconds, if present
    pub fn parse_average(&self, output: &str) -> Option<f64> {
        match self {
            PingPlatform::Windows => parse_windows_average(output),
            PingPlatform::Unix => parse_unix_average(output),
        }
    }
}

fn parse_windows_average(output: &str) -> Option<f64> {
    let line = output.lines().find(|line| line.contains("Average"))?;
    let (_, value) = line.rsplit_once("Average = ")?;
    value.replace("ms", "").trim().parse().ok()
}

fn parse_unix_average(output: &str) -> Option<f64> {
    let line = output
        .lines()
        .find(|line| line.contains("avg") || line.contains("mdev"))?;
    if !line.contains('/') {
        return None;
    }
    line.split('/').nth(4)?.trim().parse().ok()
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// Sends a fixed number of echo requests and reports the average round trip
pub struct PingProbe {
    adapter: Arc<dyn ToolAdapter>,
    platform: PingPlatform,
}

impl PingProbe {
    pub fn new(adapter: Arc<dyn ToolAdapter>, platform: PingPlatform) -> Self {
        Self { adapter, platform }
    }

    pub fn build_args(&self, host: &str) -> Vec<String> {
        vec![
            self.platform.count_flag().to_string(),
            crate::defaults::PING_ECHO_COUNT.to_string(),
            host.to_string(),
        ]
    }
}

#[async_trait]
impl ProbeStrategy for PingProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ping
    }

    async fn probe(&self, host: &str, _config: &ProbeConfig) -> ProbeResult {
        let output = match self.adapter.run(PROGRAM, &self.build_args(host)).await {
            Ok(output) => output,
            Err(e) => return ProbeResult::failed(host, e.detail()),
        };

        let merged = output.combined();

        if !output.success() {
            let detail = last_line(&merged)
                .map(str::to_string)
                .unwrap_or_else(|| output.exit_description(PROGRAM));
            return ProbeResult::failed(host, detail);
        }

        // A missing summary line does not make the host unreachable
        match self.platform.parse_average(&merged) {
            Some(avg) if avg.is_finite() => {
                ProbeResult::reachable(host, avg, Some(SUCCESS_DETAIL.to_string()))
            }
            _ => ProbeResult::reachable_without_latency(host, SUCCESS_DETAIL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::adapter::testing::ScriptedAdapter;
    use crate::probe::ToolOutput;
    use crate::types::ProbeStatus;

    const LINUX_OUTPUT: &str = "PING aka.ms (23.52.73.22) 56(84) bytes of data.
64 bytes from 23.52.73.22: icmp_seq=1 ttl=57 time=11.2 ms
64 bytes from 23.52.73.22: icmp_seq=2 ttl=57 time=12.4 ms

--- aka.ms ping statistics ---
2 packets transmitted, 2 received, 0% packet loss, time 1001ms
rtt min/avg/max/mdev = 11.211/11.805/12.400/0.594 ms
";

    const MACOS_OUTPUT: &str = "PING aka.ms (23.52.73.22): 56 data bytes
64 bytes from 23.52.73.22: icmp_seq=0 ttl=57 time=9.871 ms

--- aka.ms ping statistics ---
2 packets transmitted, 2 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 9.871/10.250/10.629/0.379 ms
";

    const WINDOWS_OUTPUT: &str = "Pinging aka.ms [23.52.73.22] with 32 bytes of data:
Reply from 23.52.73.22: bytes=32 time=14ms TTL=57
Reply from 23.52.73.22: bytes=32 time=16ms TTL=57

Ping statistics for 23.52.73.22:
    Packets: Sent = 2, Received = 2, Lost = 0 (0% loss),
Approximate round trip times in milli-seconds:
    Minimum = 14ms, Maximum = 16ms, Average = 15ms
";

    fn probe_with(output: ToolOutput, platform: PingPlatform) -> (Arc<ScriptedAdapter>, PingProbe) {
        let adapter = Arc::new(ScriptedAdapter::replying(output));
        let probe = PingProbe::new(adapter.clone(), platform);
        (adapter, probe)
    }

    #[test]
    fn test_platform_detection() {
        assert_eq!(PingPlatform::detect_from("windows"), PingPlatform::Windows);
        assert_eq!(PingPlatform::detect_from("linux"), PingPlatform::Unix);
        assert_eq!(PingPlatform::detect_from("macos"), PingPlatform::Unix);
        assert_eq!(PingPlatform::detect_from("freebsd"), PingPlatform::Unix);
    }

    #[test]
    fn test_parse_unix_averages() {
        assert_eq!(PingPlatform::Unix.parse_average(LINUX_OUTPUT), Some(11.805));
        assert_eq!(PingPlatform::Unix.parse_average(MACOS_OUTPUT), Some(10.25));
        assert_eq!(
            PingPlatform::Unix.parse_average("rtt min/avg/max/mdev = 1.0/2.5/3.0/0.1 ms"),
            Some(2.5)
        );
    }

    #[test]
    fn test_parse_windows_average() {
        assert_eq!(PingPlatform::Windows.parse_average(WINDOWS_OUTPUT), Some(15.0));
    }

    #[test]
    fn test_parse_missing_or_malformed_line() {
        assert_eq!(PingPlatform::Unix.parse_average("no summary here"), None);
        assert_eq!(PingPlatform::Unix.parse_average("avg unavailable"), None);
        assert_eq!(PingPlatform::Windows.parse_average("Average could not be computed"), None);
        assert_eq!(PingPlatform::Windows.parse_average("Average = n/a"), None);
    }

    #[tokio::test]
    async fn test_parsed_average_is_reachable() {
        let (adapter, probe) = probe_with(ToolOutput::new(Some(0), LINUX_OUTPUT, ""), PingPlatform::Unix);

        let result = probe.probe("aka.ms", &ProbeConfig::new(StrategyKind::Ping)).await;

        assert_eq!(result.status, ProbeStatus::Reachable);
        assert_eq!(result.latency_ms, Some(11.805));
        assert_eq!(result.detail.as_deref(), Some("Ping succeeded"));

        let (program, args) = adapter.last_call();
        assert_eq!(program, "ping");
        assert_eq!(args, vec!["-c".to_string(), "2".to_string(), "aka.ms".to_string()]);
    }

    #[tokio::test]
    async fn test_windows_uses_count_flag_n() {
        let (adapter, probe) = probe_with(ToolOutput::new(Some(0), WINDOWS_OUTPUT, ""), PingPlatform::Windows);

        let result = probe.probe("aka.ms", &ProbeConfig::new(StrategyKind::Ping)).await;

        assert_eq!(result.latency_ms, Some(15.0));
        assert_eq!(adapter.last_call().1[0], "-n");
    }

    #[tokio::test]
    async fn test_missing_summary_still_reachable() {
        let (_, probe) = probe_with(
            ToolOutput::new(Some(0), "64 bytes from 1.2.3.4: icmp_seq=1 ttl=57 time=11.2 ms\n", ""),
            PingPlatform::Unix,
        );

        let result = probe.probe("aka.ms", &ProbeConfig::new(StrategyKind::Ping)).await;

        assert_eq!(result.status, ProbeStatus::Reachable);
        assert!(result.latency_ms.is_none());
        assert_eq!(result.detail.as_deref(), Some("Ping succeeded"));
    }

    #[tokio::test]
    async fn test_failure_reports_last_line() {
        let output = ToolOutput::new(
            Some(1),
            "PING bad.example.com (10.0.0.1) 56(84) bytes of data.\n\n--- bad.example.com ping statistics ---\n2 packets transmitted, 0 received, 100% packet loss, time 1015ms\n\n",
            "",
        );
        let (_, probe) = probe_with(output, PingPlatform::Unix);

        let result = probe.probe("bad.example.com", &ProbeConfig::new(StrategyKind::Ping)).await;

        assert_eq!(result.status, ProbeStatus::Failed);
        assert!(result.latency_ms.is_none());
        assert_eq!(
            result.detail.as_deref(),
            Some("2 packets transmitted, 0 received, 100% packet loss, time 1015ms")
        );
    }

    #[tokio::test]
    async fn test_failure_prefers_stderr_tail() {
        let output = ToolOutput::new(Some(2), "", "ping: bad.example.com: Name or service not known\n");
        let (_, probe) = probe_with(output, PingPlatform::Unix);

        let result = probe.probe("bad.example.com", &ProbeConfig::new(StrategyKind::Ping)).await;

        assert_eq!(result.detail.as_deref(), Some("ping: bad.example.com: Name or service not known"));
    }

    #[tokio::test]
    async fn test_silent_failure_reports_exit_status() {
        let (_, probe) = probe_with(ToolOutput::new(Some(1), "", ""), PingPlatform::Unix);
        let result = probe.probe("bad.example.com", &ProbeConfig::new(StrategyKind::Ping)).await;
        assert_eq!(result.detail.as_deref(), Some("ping exited with status 1"));
    }

    #[tokio::test]
    async fn test_adapter_error_is_failure() {
        let adapter = Arc::new(ScriptedAdapter::failing("ping did not finish within 30s"));
        let probe = PingProbe::new(adapter, PingPlatform::Unix);

        let result = probe.probe("aka.ms", &ProbeConfig::new(StrategyKind::Ping)).await;

        assert_eq!(result.status, ProbeStatus::Failed);
        assert_eq!(result.detail.as_deref(), Some("ping did not finish within 30s"));
    }
}
