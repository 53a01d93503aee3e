//! Raw TCP connect probe

use super::ProbeStrategy;
use crate::{
    models::{result::round_ms, ProbeConfig, ProbeResult},
    types::StrategyKind,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

/// Measures the time to establish a TCP connection to `(host, port)`
#[derive(Debug, Clone, Default)]
pub struct SocketProbe;

impl SocketProbe {
    pub fn new() -> Self {
        Self
    }
}

fn timeout_detail(timeout: Duration) -> String {
    format!("connection timed out after {}s", timeout.as_secs_f64())
}

#[async_trait]
impl ProbeStrategy for SocketProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Socket
    }

    async fn probe(&self, host: &str, config: &ProbeConfig) -> ProbeResult {
        let start = Instant::now();
        // DNS resolution counts against the connect timeout
        let attempt = tokio::time::timeout(config.timeout, TcpStream::connect((host, config.port))).await;

        match attempt {
            Ok(Ok(stream)) => {
                let elapsed = start.elapsed().as_secs_f64() * 1000.0;
                drop(stream);
                ProbeResult::reachable(host, round_ms(elapsed), None)
            }
            Ok(Err(e)) => ProbeResult::failed(host, e.to_string()),
            Err(_) => ProbeResult::failed(host, timeout_detail(config.timeout)),
        }
    }
}
