//! End-to-end runs through the library API with the socket strategy

use async_trait::async_trait;
use connectivity_tester::{
    error::install_panic_hook, models::RunLabels, ConcurrencyPolicy, ProbeConfig, ProbeResult,
    ProbeScheduler, ProbeStatus, ProbeStrategy, RunRequest, RunSession, StrategyKind,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Strategy that panics for one host and succeeds for the rest
struct FaultyStrategy;

#[async_trait]
impl ProbeStrategy for FaultyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Tool
    }

    async fn probe(&self, host: &str, _config: &ProbeConfig) -> ProbeResult {
        if host == "broken.example.com" {
            panic!("parser bug for {}", host);
        }
        ProbeResult::reachable(host, 12.5, Some("12.5 ms".to_string()))
    }
}

async fn listening_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

#[tokio::test]
async fn test_socket_run_against_local_listener() {
    let (_listener, port) = listening_port().await;

    let config = ProbeConfig::new(StrategyKind::Socket)
        .with_port(port)
        .with_timeout(Duration::from_secs(2));
    let request = RunRequest::new(vec!["127.0.0.1".to_string(), "bad.invalid".to_string()], config)
        .with_labels(RunLabels {
            user: Some("jdoe".to_string()),
            company: Some("Contoso".to_string()),
        });

    let session = RunSession::new(request);
    let session_id = session.id();
    let run = ProbeScheduler::for_strategy(StrategyKind::Socket).execute(session).await;

    assert_eq!(run.session_id, session_id);
    assert_eq!(run.strategy, StrategyKind::Socket);
    assert_eq!(run.port, port);
    assert_eq!(run.labels.company.as_deref(), Some("Contoso"));

    assert_eq!(run.results.len(), 2);
    assert_eq!(run.results[0].host, "127.0.0.1");
    assert_eq!(run.results[0].status, ProbeStatus::Reachable);
    assert!(run.results[0].latency_ms.is_some());
    assert_eq!(run.results[1].status, ProbeStatus::Failed);
    assert!(run.results[1].latency_ms.is_none());
    assert!(run.results[1].detail.is_some());

    assert_eq!(run.zone_stats.len(), 1);
    assert_eq!(run.zone_stats[0].zone, "0.1");
    assert_eq!(run.summary.reachable, 1);
    assert_eq!(run.summary.failed, 1);
    assert!(run.completed_at >= run.started_at);
}

#[tokio::test]
async fn test_unbounded_socket_run_covers_every_host() {
    let (_listener, port) = listening_port().await;

    // .invalid names never resolve; their failures must not stall the batch
    let mut hosts = vec!["127.0.0.1".to_string()];
    for i in 0..20 {
        hosts.push(format!("host{}.invalid", i));
    }

    let config = ProbeConfig::new(StrategyKind::Socket)
        .with_port(port)
        .with_timeout(Duration::from_secs(2))
        .with_concurrency(ConcurrencyPolicy::Unbounded);

    let run = ProbeScheduler::for_strategy(StrategyKind::Socket)
        .execute(RunSession::new(RunRequest::new(hosts.clone(), config)))
        .await;

    let probed: Vec<&str> = run.results.iter().map(|r| r.host.as_str()).collect();
    let expected: Vec<&str> = hosts.iter().map(String::as_str).collect();
    assert_eq!(probed, expected);
    assert_eq!(run.summary.reachable, 1);
    assert_eq!(run.summary.failed, 20);
    assert!(!run.all_failed());
}

#[tokio::test]
async fn test_panicking_task_with_application_hook_fails_one_host() {
    install_panic_hook();

    let hosts = vec![
        "ok.example.com".to_string(),
        "broken.example.com".to_string(),
        "also-ok.example.com".to_string(),
    ];
    let config = ProbeConfig::new(StrategyKind::Tool).with_concurrency(ConcurrencyPolicy::Bounded(2));
    let run = ProbeScheduler::new(Arc::new(FaultyStrategy))
        .execute(RunSession::new(RunRequest::new(hosts, config)))
        .await;

    assert_eq!(run.results.len(), 3);
    assert_eq!(run.results[0].status, ProbeStatus::Reachable);
    assert_eq!(run.results[1].status, ProbeStatus::Failed);
    assert!(run.results[1].latency_ms.is_none());
    assert!(run.results[1].detail.as_deref().unwrap().starts_with("probe task aborted"));
    assert_eq!(run.results[2].status, ProbeStatus::Reachable);
    assert_eq!(run.summary.reachable, 2);
}
