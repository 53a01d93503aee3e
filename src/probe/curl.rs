//! HTTPS probe delegated to curl

use super::{ProbeStrategy, ToolAdapter};
use crate::{
    models::{
        result::{format_ms, round_ms},
        ProbeConfig, ProbeResult,
    },
    types::StrategyKind,
};
use async_trait::async_trait;
use std::sync::Arc;

const PROGRAM: &str = "curl";

/// Issues a request to `https://{host}:{port}` and reports curl's total time
pub struct CurlProbe {
    adapter: Arc<dyn ToolAdapter>,
}

impl CurlProbe {
    pub fn new(adapter: Arc<dyn ToolAdapter>) -> Self {
        Self { adapter }
    }

    fn null_device() -> &'static str {
        null_device_for(std::env::consts::OS)
    }

    /// Build the argument list for one host
    pub fn build_args(host: &str, config: &ProbeConfig) -> Vec<String> {
        let mut args = vec![
            "--connect-timeout".to_string(),
            config.timeout_secs().to_string(),
            "-s".to_string(),
            "-S".to_string(),
            "-o".to_string(),
            Self::null_device().to_string(),
            "-w".to_string(),
            "%{time_total}".to_string(),
            format!("https://{}:{}", host, config.port),
        ];

        if let Some(proxy) = &config.proxy {
            args.push("-x".to_string());
            args.push(proxy.clone());
        }

        for (key, value) in &config.headers {
            args.push("-H".to_string());
            args.push(format!("{}: {}", key, value));
        }

        args
    }

    /// Turn curl's `%{time_total}` output into a result
    fn interpret_total_time(host: &str, stdout: &str) -> ProbeResult {
        let text = stdout.trim();
        match text.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
                let latency = round_ms(seconds * 1000.0);
                ProbeResult::reachable(host, latency, Some(format!("{} ms", format_ms(latency))))
            }
            _ => ProbeResult::failed(host, format!("unexpected tool output: {}", text)),
        }
    }
}

#[async_trait]
impl ProbeStrategy for CurlProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Tool
    }

    async fn probe(&self, host: &str, config: &ProbeConfig) -> ProbeResult {
        let args = Self::build_args(host, config);

        let output = match self.adapter.run(PROGRAM, &args).await {
            Ok(output) => output,
            Err(e) => return ProbeResult::failed(host, e.detail()),
        };

        if output.success() {
            return Self::interpret_total_time(host, &output.stdout);
        }

        let captured = output.combined();
        let captured = captured.trim();
        if captured.is_empty() {
            ProbeResult::failed(host, output.exit_description(PROGRAM))
        } else {
            ProbeResult::failed(host, captured)
        }
    }
}

/// Discard target for the response body on `os`
fn null_device_for(os: &str) -> &'static str {
    if os.eq_ignore_ascii_case("windows") {
        "NUL"
    } else {
        "/dev/null"
    }
}
