//! Run history and high score ranking
//!
//! Every finished run produces a `RunSummary`. The history keeps the latest
//! runs in the order they finished; the ranking is derived from it on demand.
//! Storage is the host's business, this module only converts to and from JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::MAX_RUN_HISTORY;
use crate::error::Result;

/// Entries shown in the ranked view
pub const RANKED_ENTRIES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    /// Highest phase reached, 1-based
    pub phase: u32,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl RunSummary {
    pub fn new(score: u64, phase: u32, at: DateTime<Utc>) -> Self {
        Self {
            score,
            phase,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parsed timestamp, `None` if the stored string is not RFC 3339
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Recent runs, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct RunHistory {
    pub entries: Vec<RunSummary>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a run, dropping the oldest beyond the cap
    pub fn record(&mut self, summary: RunSummary) {
        log::info!(
            "Recording run: score {} phase {}",
            summary.score,
            summary.phase
        );
        self.entries.push(summary);
        if self.entries.len() > MAX_RUN_HISTORY {
            let excess = self.entries.len() - MAX_RUN_HISTORY;
            self.entries.drain(..excess);
        }
    }

    /// Best runs by score, highest first. Ties keep the earlier run first.
    pub fn ranked(&self, limit: usize) -> Vec<&RunSummary> {
        let mut ranked: Vec<&RunSummary> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(limit);
        ranked
    }

    pub fn high_score(&self) -> u64 {
        self.entries.iter().map(|e| e.score).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut history: RunHistory = serde_json::from_str(json)?;
        if history.entries.len() > MAX_RUN_HISTORY {
            let excess = history.entries.len() - MAX_RUN_HISTORY;
            history.entries.drain(..excess);
        }
        log::info!("Loaded {} past runs", history.entries.len());
        Ok(history)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("Failed to serialize run history: {e}");
            String::new()
        })
    }
}

/// Month, day and time of a run, `MM/DD HH:MM` in UTC
pub fn format_date(summary: &RunSummary) -> String {
    match summary.finished_at() {
        Some(at) => at.format("%m/%d %H:%M").to_string(),
        None => "--/-- --:--".to_string(),
    }
}

/// One line of the ranked view: rank, score, phase and date in padded columns
pub fn history_row(rank: usize, summary: &RunSummary) -> String {
    format!(
        "{:<2} {:<7} {:<5} {}",
        rank,
        summary.score,
        summary.phase,
        format_date(summary)
    )
}
