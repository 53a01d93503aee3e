//! Probing strategies
//!
//! Every strategy answers the same question for one host: is it reachable
//! on the configured port, and how long did it take? Strategies never
//! return errors; every failure is folded into a [`ProbeResult`] with
//! `Failed` status and a human-readable detail.

pub mod adapter;
pub mod curl;
pub mod ping;
pub mod socket;

pub use adapter::{ProcessToolAdapter, ToolAdapter, ToolOutput};
pub use curl::CurlProbe;
pub use ping::{PingPlatform, PingProbe};
pub use socket::SocketProbe;

use crate::{
    models::{ProbeConfig, ProbeResult},
    types::StrategyKind,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Check-one-host capability shared by all probing mechanisms
#[async_trait]
pub trait ProbeStrategy: Send + Sync {
    /// Which mechanism this is, for reporting only
    fn kind(&self) -> StrategyKind;

    /// Probe a single host. Must not panic or propagate errors.
    async fn probe(&self, host: &str, config: &ProbeConfig) -> ProbeResult;
}

/// Factory for the strategy selected for a run
pub struct StrategyFactory;

impl StrategyFactory {
    /// Create a strategy backed by real sockets and system processes
    pub fn create(kind: StrategyKind) -> Arc<dyn ProbeStrategy> {
        Self::create_with_adapter(kind, Arc::new(ProcessToolAdapter::default()))
    }

    /// Create a strategy with an injected tool adapter
    pub fn create_with_adapter(kind: StrategyKind, adapter: Arc<dyn ToolAdapter>) -> Arc<dyn ProbeStrategy> {
        match kind {
            StrategyKind::Socket => Arc::new(SocketProbe::new()),
            StrategyKind::Tool => Arc::new(CurlProbe::new(adapter)),
            StrategyKind::Ping => Arc::new(PingProbe::new(adapter, PingPlatform::current())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creates_requested_kind() {
        for kind in [StrategyKind::Socket, StrategyKind::Tool, StrategyKind::Ping] {
            assert_eq!(StrategyFactory::create(kind).kind(), kind);
        }
    }
}
