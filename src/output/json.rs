//! Machine-readable run report

use crate::{
    error::{ErrorContext, Result},
    executor::CompletedRun,
    models::{ProbeResult, ZoneStat},
    stats::RunSummary,
    types::StrategyKind,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Everything a finished run produced, in a stable serialized shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub tool_version: String,
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub strategy: StrategyKind,
    pub port: u16,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub summary: RunSummary,
    pub results: Vec<ProbeResult>,
    pub zone_stats: Vec<ZoneStat>,
}

impl RunReport {
    pub fn from_run(run: &CompletedRun) -> Self {
        Self {
            tool_version: crate::VERSION.to_string(),
            session_id: run.session_id,
            user: run.labels.user.clone(),
            company: run.labels.company.clone(),
            strategy: run.strategy,
            port: run.port,
            started_at: run.started_at,
            completed_at: run.completed_at,
            duration_ms: run.duration().as_millis() as u64,
            summary: run.summary.clone(),
            results: run.results.clone(),
            zone_stats: run.zone_stats.clone(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run report")
    }

    /// Write the report to `path`, replacing any existing file
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}

impl From<&CompletedRun> for RunReport {
    fn from(run: &CompletedRun) -> Self {
        Self::from_run(run)
    }
}
