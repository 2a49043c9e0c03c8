//! Load-generator bookkeeping for `chain-fetch`.
//!
//! Tallies response statuses and which secret answered each request, and
//! produces a snapshot of the current window on demand.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;

use crate::relay::ERROR_SECRET;

/// Running tallies across all requests.
#[derive(Debug, Default)]
pub struct Stats {
    ok: u64,
    failed: u64,
    window_start: u64,
    secrets: BTreeSet<String>,
    window: BTreeMap<String, u64>,
    history: Vec<BTreeMap<String, u64>>,
}

/// Summary of one checkpoint window.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub total: u64,
    pub window_start: u64,
    pub ok: u64,
    pub failed: u64,
    pub secrets: Vec<String>,
    /// Share of the window per secret, in percent, in `secrets` order.
    pub shares: Vec<(String, f64)>,
}

#[derive(Debug, Deserialize)]
struct SecretOnly {
    service_secret: Option<String>,
}

/// Secret carried by a structured relay response, or the error sentinel.
pub fn secret_of(body: &[u8]) -> String {
    serde_json::from_slice::<SecretOnly>(body)
        .ok()
        .and_then(|b| b.service_secret)
        .unwrap_or_else(|| ERROR_SECRET.to_string())
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: u16, secret: &str) {
        self.secrets.insert(secret.to_string());
        *self.window.entry(secret.to_string()).or_default() += 1;
        if status == 200 {
            self.ok += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.ok + self.failed
    }

    /// Close the current window and summarize it.
    pub fn checkpoint(&mut self) -> Snapshot {
        let total = self.total();
        let size = total - self.window_start;
        let secrets: Vec<String> = self.secrets.iter().cloned().collect();
        let shares = secrets
            .iter()
            .map(|s| {
                let count = self.window.get(s).copied().unwrap_or(0);
                let pct = if size == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / size as f64
                };
                (s.clone(), pct)
            })
            .collect();

        let snapshot = Snapshot {
            total,
            window_start: self.window_start,
            ok: self.ok,
            failed: self.failed,
            secrets,
            shares,
        };

        self.window_start = total;
        self.history.push(std::mem::take(&mut self.window));
        snapshot
    }

    /// Number of closed windows.
    pub fn windows(&self) -> usize {
        self.history.len()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fetch Checkpoint Stats")?;
        writeln!(f)?;
        writeln!(f, "Total Request: {} ({} ok, {} failed)", self.total, self.ok, self.failed)?;
        writeln!(f, "Current Sample: {} ~ {}", self.window_start, self.total)?;
        writeln!(f)?;
        writeln!(f, "Secrets Seen: {}", self.secrets.join(","))?;
        writeln!(f, "-----------------------------")?;
        for (secret, pct) in &self.shares {
            writeln!(f, "\t{secret} {pct:.1} %")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_of() {
        assert_eq!(secret_of(br#"{"service_secret":"s","service_log":[]}"#), "s");
        assert_eq!(secret_of(b"{}"), ERROR_SECRET);
        assert_eq!(secret_of(b"<html>"), ERROR_SECRET);
    }

    #[test]
    fn test_window_shares() {
        let mut stats = Stats::new();
        stats.record(200, "a");
        stats.record(200, "a");
        stats.record(200, "b");
        stats.record(500, "error");

        let first = stats.checkpoint();
        assert_eq!(first.total, 4);
        assert_eq!((first.ok, first.failed), (3, 1));
        assert_eq!(first.window_start, 0);
        assert_eq!(
            first.shares,
            vec![
                ("a".to_string(), 50.0),
                ("b".to_string(), 25.0),
                ("error".to_string(), 25.0),
            ]
        );

        stats.record(200, "b");
        stats.record(200, "b");
        let second = stats.checkpoint();
        assert_eq!(second.window_start, 4);
        assert_eq!(second.total, 6);
        // Secrets seen earlier stay listed with a zero share.
        assert_eq!(second.shares[0], ("a".to_string(), 0.0));
        assert_eq!(second.shares[1], ("b".to_string(), 100.0));
        assert_eq!(stats.windows(), 2);
    }

    #[test]
    fn test_empty_window() {
        let snapshot = Stats::new().checkpoint();
        assert_eq!(snapshot.total, 0);
        assert!(snapshot.shares.is_empty());
        assert!(snapshot.to_string().contains("Current Sample: 0 ~ 0"));
    }
}
