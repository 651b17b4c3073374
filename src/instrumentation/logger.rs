use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::recommend::{Reply, ReplySource};

/// One line of `requests.jsonl`, written per recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLog {
    pub id: String,
    pub timestamp: String,
    pub category: Category,
    pub input: String,
    pub source: ReplySource,
    pub structured: bool,
    pub title: Option<String>,
    pub latency_ms: u64,
}

impl RequestLog {
    pub fn new(category: Category, input: &str, reply: &Reply) -> Self {
        let recommendation = reply.recommendation();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            category,
            input: input.to_string(),
            source: reply.source,
            structured: recommendation.is_some(),
            title: recommendation.map(|r| r.title),
            latency_ms: reply.latency_ms,
        }
    }

    pub fn summary(&self) -> String {
        let source = match self.source {
            ReplySource::Api => "api",
            ReplySource::Fallback => "fallback",
        };
        format!(
            "Source: {} | Structured: {} | Latency: {:.1}s",
            source,
            if self.structured { "yes" } else { "no" },
            self.latency_ms as f64 / 1000.0,
        )
    }
}

#[derive(Debug, Clone)]
pub struct RequestLogger {
    dir: PathBuf,
}

impl RequestLogger {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create logs directory")?;
        Ok(Self { dir })
    }

    pub fn write(&self, log: &RequestLog) -> Result<()> {
        let path = self.dir.join("requests.jsonl");
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open log file")?;

        let json = serde_json::to_string(log).context("Failed to serialize request log")?;
        writeln!(file, "{}", json).context("Failed to write log")?;

        Ok(())
    }
}
