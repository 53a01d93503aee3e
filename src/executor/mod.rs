//! Probe execution engine
//!
//! This module contains:
//! - The run request and pending run session handed in by the caller
//! - The probe scheduler that fans a host list out over one strategy
//! - The completed run returned once every host has a result

use crate::{
    logging::ProbeLogger,
    models::{Config, ProbeConfig, ProbeResult, RunLabels, ZoneStat},
    probe::{ProbeStrategy, StrategyFactory},
    stats::{RunSummary, ZoneAggregator},
    types::{ConcurrencyPolicy, StrategyKind},
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Everything needed to start one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Hosts to probe, each exactly once
    pub hosts: Vec<String>,
    pub probe_config: ProbeConfig,
    pub labels: RunLabels,
}

impl RunRequest {
    pub fn new(hosts: Vec<String>, probe_config: ProbeConfig) -> Self {
        Self {
            hosts,
            probe_config,
            labels: RunLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: RunLabels) -> Self {
        self.labels = labels;
        self
    }
}

impl From<&Config> for RunRequest {
    fn from(config: &Config) -> Self {
        Self::new(config.hosts.clone(), config.probe_config()).with_labels(config.labels())
    }
}

/// A run that has been requested but not yet executed.
///
/// Executing a session consumes it, so a given session can only ever run
/// once. Callers that want another run create another session.
#[derive(Debug)]
pub struct RunSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    request: RunRequest,
}

impl RunSession {
    pub fn new(request: RunRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            request,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn request(&self) -> &RunRequest {
        &self.request
    }
}

/// Output of a finished run; owned solely by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedRun {
    pub session_id: Uuid,
    pub labels: RunLabels,
    pub strategy: StrategyKind,
    pub port: u16,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// One result per requested host, in request order
    pub results: Vec<ProbeResult>,
    pub zone_stats: Vec<ZoneStat>,
    pub summary: RunSummary,
}

impl CompletedRun {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> std::time::Duration {
        (self.completed_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| !r.is_reachable())
    }
}

/// Runs one strategy over a batch of hosts under the configured concurrency policy
pub struct ProbeScheduler {
    strategy: Arc<dyn ProbeStrategy>,
    logger: Arc<ProbeLogger>,
}

impl ProbeScheduler {
    pub fn new(strategy: Arc<dyn ProbeStrategy>) -> Self {
        Self {
            strategy,
            logger: Arc::new(ProbeLogger::quiet()),
        }
    }

    /// Scheduler using the stock implementation of `kind`
    pub fn for_strategy(kind: StrategyKind) -> Self {
        Self::new(StrategyFactory::create(kind))
    }

    pub fn with_logger(mut self, logger: ProbeLogger) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Execute a pending session and return the completed run.
    ///
    /// Returns only after every host has produced a result. Individual
    /// probe failures are recorded in the results; nothing here fails.
    pub async fn execute(&self, session: RunSession) -> CompletedRun {
        let RunSession { id, request, .. } = session;
        let started_at = Utc::now();
        let clock = Instant::now();

        let correlation_id = self
            .logger
            .log_run_started(
                &id.to_string(),
                self.strategy.kind(),
                request.hosts.len(),
                request.probe_config.port,
            )
            .await;

        let results = self
            .probe_all(&request.hosts, &request.probe_config, &correlation_id)
            .await;

        self.logger
            .log_run_finished(&correlation_id, &results, clock.elapsed())
            .await;

        let zone_stats = ZoneAggregator::aggregate(&results);
        let summary = RunSummary::from_results(&results, &zone_stats);

        CompletedRun {
            session_id: id,
            labels: request.labels,
            strategy: self.strategy.kind(),
            port: request.probe_config.port,
            started_at,
            completed_at: Utc::now(),
            results,
            zone_stats,
            summary,
        }
    }

    /// Probe every host once; the output has exactly one entry per input host
    pub async fn probe_all(
        &self,
        hosts: &[String],
        config: &ProbeConfig,
        correlation_id: &str,
    ) -> Vec<ProbeResult> {
        let config = Arc::new(config.clone());
        let limiter = match config.concurrency {
            ConcurrencyPolicy::Bounded(_) => Some(Arc::new(Semaphore::new(
                config.concurrency.slots_for(hosts.len()),
            ))),
            ConcurrencyPolicy::Unbounded => None,
        };

        let tasks: Vec<_> = hosts
            .iter()
            .map(|host| {
                let strategy = Arc::clone(&self.strategy);
                let logger = Arc::clone(&self.logger);
                let config = Arc::clone(&config);
                let limiter = limiter.clone();
                let host = host.clone();
                let correlation_id = correlation_id.to_string();

                tokio::spawn(async move {
                    // Held until the probe finishes; the semaphore is never closed
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };

                    let result = strategy.probe(&host, &config).await;
                    logger.log_probe_result(&result, &correlation_id).await;
                    result
                })
            })
            .collect();

        join_all(tasks)
            .await
            .into_iter()
            .zip(hosts)
            .map(|(joined, host)| match joined {
                Ok(result) => result,
                Err(e) => ProbeResult::failed(host.as_str(), format!("probe task aborted: {}", e)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProbeStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Strategy that sleeps and records how many probes overlap
    struct MockStrategy {
        kind: StrategyKind,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl MockStrategy {
        fn new(kind: StrategyKind, delay: Duration) -> Self {
            Self {
                kind,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
                delay,
            }
        }
    }

    #[async_trait]
    impl ProbeStrategy for MockStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        async fn probe(&self, host: &str, _config: &ProbeConfig) -> ProbeResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if host.starts_with("panic.") {
                panic!("strategy blew up for {}", host);
            }
            if host.starts_with("bad.") {
                ProbeResult::failed(host, "connection timed out after 5s")
            } else {
                ProbeResult::reachable(host, 20.0, None)
            }
        }
    }

    fn hosts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("host{}.example.com", i)).collect()
    }

    #[tokio::test]
    async fn test_every_host_gets_exactly_one_result() {
        let strategy = Arc::new(MockStrategy::new(StrategyKind::Socket, Duration::from_millis(5)));
        let scheduler = ProbeScheduler::new(strategy.clone());
        let input = hosts(25);

        let results = scheduler
            .probe_all(&input, &ProbeConfig::new(StrategyKind::Socket), "test")
            .await;

        assert_eq!(results.len(), input.len());
        let returned: Vec<&str> = results.iter().map(|r| r.host.as_str()).collect();
        let expected: Vec<&str> = input.iter().map(String::as_str).collect();
        assert_eq!(returned, expected);
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 25);
    }

    #[tokio::test]
    async fn test_empty_host_list() {
        let scheduler = ProbeScheduler::new(Arc::new(MockStrategy::new(StrategyKind::Socket, Duration::ZERO)));
        let results = scheduler
            .probe_all(&[], &ProbeConfig::new(StrategyKind::Socket), "test")
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_bounded_policy_caps_in_flight_probes() {
        let strategy = Arc::new(MockStrategy::new(StrategyKind::Tool, Duration::from_millis(50)));
        let scheduler = ProbeScheduler::new(strategy.clone());
        let config = ProbeConfig::new(StrategyKind::Tool).with_concurrency(ConcurrencyPolicy::Bounded(10));

        let results = scheduler.probe_all(&hosts(11), &config, "test").await;

        assert_eq!(results.len(), 11);
        let peak = strategy.peak.load(Ordering::SeqCst);
        assert!(peak <= 10, "peak concurrency {} exceeded the limit", peak);
        assert!(peak > 1, "probes never overlapped");
    }

    #[tokio::test]
    async fn test_limit_of_one_serializes_probes() {
        let strategy = Arc::new(MockStrategy::new(StrategyKind::Ping, Duration::from_millis(5)));
        let scheduler = ProbeScheduler::new(strategy.clone());
        let config = ProbeConfig::new(StrategyKind::Ping).with_concurrency(ConcurrencyPolicy::Bounded(1));

        scheduler.probe_all(&hosts(5), &config, "test").await;

        assert_eq!(strategy.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unbounded_policy_launches_all_hosts() {
        let strategy = Arc::new(MockStrategy::new(StrategyKind::Socket, Duration::from_millis(100)));
        let scheduler = ProbeScheduler::new(strategy.clone());
        let config = ProbeConfig::new(StrategyKind::Socket);
        assert_eq!(config.concurrency, ConcurrencyPolicy::Unbounded);

        scheduler.probe_all(&hosts(11), &config, "test").await;

        assert_eq!(strategy.peak.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_failing_host_does_not_affect_others() {
        let strategy = Arc::new(MockStrategy::new(StrategyKind::Socket, Duration::from_millis(5)));
        let scheduler = ProbeScheduler::new(strategy);
        let input = vec![
            "good.example.com".to_string(),
            "panic.example.com".to_string(),
            "bad.example.com".to_string(),
            "also-good.example.org".to_string(),
        ];

        let results = scheduler
            .probe_all(&input, &ProbeConfig::new(StrategyKind::Socket), "test")
            .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].status, ProbeStatus::Reachable);
        assert_eq!(results[1].status, ProbeStatus::Failed);
        assert_eq!(results[1].host, "panic.example.com");
        assert!(results[1].detail.as_deref().unwrap().starts_with("probe task aborted"));
        assert_eq!(results[2].status, ProbeStatus::Failed);
        assert_eq!(results[3].status, ProbeStatus::Reachable);
        assert!(results.iter().filter(|r| !r.is_reachable()).all(|r| r.latency_ms.is_none()));
    }

    #[tokio::test]
    async fn test_execute_consumes_session_and_aggregates() {
        let strategy = Arc::new(MockStrategy::new(StrategyKind::Socket, Duration::from_millis(1)));
        let scheduler = ProbeScheduler::new(strategy);
        let request = RunRequest::new(
            vec!["good.example.com".to_string(), "bad.example.com".to_string()],
            ProbeConfig::new(StrategyKind::Socket),
        )
        .with_labels(RunLabels {
            user: Some("alice".to_string()),
            company: Some("Contoso".to_string()),
        });
        let session = RunSession::new(request);
        let session_id = session.id();

        let run = scheduler.execute(session).await;

        assert_eq!(run.session_id, session_id);
        assert_eq!(run.strategy, StrategyKind::Socket);
        assert_eq!(run.port, 443);
        assert_eq!(run.labels.company.as_deref(), Some("Contoso"));
        assert_eq!(run.results.len(), 2);
        assert_eq!(run.zone_stats.len(), 1);
        assert_eq!(run.zone_stats[0].zone, "example.com");
        assert_eq!(run.zone_stats[0].mean, 20.0);
        assert_eq!(run.summary.reachable, 1);
        assert_eq!(run.summary.failed, 1);
        assert!(run.completed_at >= run.started_at);
        assert!(!run.all_failed());
    }

    #[tokio::test]
    async fn test_all_failed_run_still_completes() {
        let scheduler = ProbeScheduler::new(Arc::new(MockStrategy::new(StrategyKind::Socket, Duration::ZERO)));
        let request = RunRequest::new(
            vec!["bad.one.com".to_string(), "bad.two.com".to_string()],
            ProbeConfig::new(StrategyKind::Socket),
        );

        let run = scheduler.execute(RunSession::new(request)).await;

        assert_eq!(run.results.len(), 2);
        assert!(run.zone_stats.is_empty());
        assert!(run.all_failed());
    }

    #[test]
    fn test_request_from_config() {
        let mut config = Config::default();
        config.strategy = StrategyKind::Ping;
        config.user = Some("bob".to_string());

        let request = RunRequest::from(&config);

        assert_eq!(request.hosts.len(), 11);
        assert_eq!(request.probe_config.strategy, StrategyKind::Ping);
        assert_eq!(request.probe_config.concurrency, ConcurrencyPolicy::Bounded(10));
        assert_eq!(request.labels.user.as_deref(), Some("bob"));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let request = RunRequest::new(vec!["aka.ms".to_string()], ProbeConfig::default());
        let a = RunSession::new(request.clone());
        let b = RunSession::new(request);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.request().hosts, vec!["aka.ms".to_string()]);
    }
}
