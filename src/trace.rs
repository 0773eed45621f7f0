//! Request-scoped debug trace.
//!
//! Every entry is also logged at debug level; the rendered block is shown
//! under search results when `--debug` is given.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::shard::ConnectionStats;

/// One timed step.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    /// Time since the trace started
    pub elapsed: Duration,
    pub message: String,
}

/// Timed step log of one search.
#[derive(Debug, Clone)]
pub struct DebugTrace {
    start: Instant,
    entries: Vec<TraceEntry>,
}

impl Default for DebugTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTrace {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        self.entries.push(TraceEntry {
            elapsed: self.start.elapsed(),
            message,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Time from start to the last entry.
    pub fn total(&self) -> Duration {
        self.entries
            .last()
            .map_or(Duration::ZERO, |entry| entry.elapsed)
    }

    /// Renders the entries with the time since the previous one.
    pub fn render(&self, connections: &ConnectionStats) -> String {
        let mut out = String::new();
        let mut previous = Duration::ZERO;
        for entry in &self.entries {
            let delta = entry.elapsed.saturating_sub(previous);
            previous = entry.elapsed;
            let _ = writeln!(out, "[+{:>8.2}ms] {}", delta.as_secs_f64() * 1000.0, entry.message);
        }
        let _ = writeln!(
            out,
            "Total backend time: {:.2}s",
            self.total().as_secs_f64()
        );
        let _ = writeln!(
            out,
            "Connections: {} opened, {} max concurrent",
            connections.opened, connections.max_concurrent
        );
        out
    }
}
