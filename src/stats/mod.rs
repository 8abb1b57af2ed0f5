//! Result aggregation for a finished run
//!
//! A [`RunSummary`] is derived from the attempt results by a single fold.
//! Averages consider successful attempts only and are omitted entirely when
//! nothing succeeded.

use crate::{models::AttemptResult, size::to_mib};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Totals for one (test, host) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSummary {
    pub test_name: String,
    pub host: String,
    pub attempts: usize,
    pub successes: usize,
    #[serde(rename = "avg_duration_ms", serialize_with = "millis")]
    pub avg_duration: Option<Duration>,
    pub avg_throughput_mib_s: Option<f64>,
    pub total_bytes: u64,
}

/// Aggregate view over every attempt of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage of attempts that succeeded, 0 when nothing ran
    pub success_rate: f64,
    pub failure_rate: f64,
    #[serde(rename = "avg_duration_ms", serialize_with = "millis")]
    pub avg_duration: Option<Duration>,
    /// Total successful bytes over total successful time, in MiB/s
    pub avg_throughput_mib_s: Option<f64>,
    /// Bytes moved by successful attempts
    pub total_bytes: u64,
    /// Per (test, host) totals in first-seen order
    pub breakdown: Vec<PairSummary>,
    /// Failure counts keyed by error kind
    pub failure_kinds: BTreeMap<String, usize>,
}

#[derive(Debug, Default, Clone)]
struct Totals {
    attempts: usize,
    successes: usize,
    duration: Duration,
    bytes: u64,
}

impl Totals {
    fn add(&mut self, result: &AttemptResult) {
        self.attempts += 1;
        if result.success {
            self.successes += 1;
            self.duration += result.duration;
            self.bytes += result.bytes;
        }
    }

    fn avg_duration(&self) -> Option<Duration> {
        if self.successes == 0 {
            return None;
        }
        u32::try_from(self.successes).ok().map(|n| self.duration / n)
    }

    fn throughput(&self) -> Option<f64> {
        let secs = self.duration.as_secs_f64();
        if self.successes == 0 || secs <= 0.0 {
            None
        } else {
            Some(to_mib(self.bytes) / secs)
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn millis<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&(d.as_secs_f64() * 1000.0)),
        None => serializer.serialize_none(),
    }
}

impl RunSummary {
    /// Fold every attempt result into a summary
    pub fn from_results(results: &[AttemptResult]) -> Self {
        let mut overall = Totals::default();
        let mut pairs: Vec<((String, String), Totals)> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();
        let mut failure_kinds = BTreeMap::new();

        for result in results {
            overall.add(result);

            let key = (result.test_name.clone(), result.host.clone());
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                pairs.push((key, Totals::default()));
                pairs.len() - 1
            });
            pairs[slot].1.add(result);

            if let Some(kind) = result.error_kind() {
                *failure_kinds.entry(kind.to_string()).or_insert(0) += 1;
            }
        }

        let breakdown = pairs
            .into_iter()
            .map(|((test_name, host), totals)| PairSummary {
                test_name,
                host,
                attempts: totals.attempts,
                successes: totals.successes,
                avg_duration: totals.avg_duration(),
                avg_throughput_mib_s: totals.throughput(),
                total_bytes: totals.bytes,
            })
            .collect();

        let failures = overall.attempts - overall.successes;
        Self {
            total: overall.attempts,
            successes: overall.successes,
            failures,
            success_rate: percentage(overall.successes, overall.attempts),
            failure_rate: percentage(failures, overall.attempts),
            avg_duration: overall.avg_duration(),
            avg_throughput_mib_s: overall.throughput(),
            total_bytes: overall.bytes,
            breakdown,
            failure_kinds,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    /// Total successful data in MiB
    pub fn total_mib(&self) -> f64 {
        to_mib(self.total_bytes)
    }
}
