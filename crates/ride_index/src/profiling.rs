//! Per-operation call counts and timing for a scheduler.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

/// Mutating scheduler operations tracked by [`OperationMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OperationKind {
    Insert,
    Cancel,
    CancelRange,
    Update,
    UpdateTrip,
    ServeNext,
}

/// Timing metrics for one operation kind.
#[derive(Debug, Clone, Default)]
pub struct OperationTiming {
    /// Total time spent in this operation (cumulative).
    pub total_duration: Duration,
    pub call_count: u64,
    /// Calls that returned an error or had no ride to serve.
    pub rejected_count: u64,
    pub min_duration: Duration,
    pub max_duration: Duration,
}

impl OperationTiming {
    pub fn record(&mut self, duration: Duration, accepted: bool) {
        self.total_duration += duration;
        self.call_count += 1;
        if !accepted {
            self.rejected_count += 1;
        }
        if duration < self.min_duration || self.min_duration == Duration::ZERO {
            self.min_duration = duration;
        }
        if duration > self.max_duration {
            self.max_duration = duration;
        }
    }

    pub fn avg_duration(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            let avg_nanos = self.total_duration.as_nanos() / self.call_count as u128;
            Duration::from_nanos(avg_nanos as u64)
        }
    }
}

/// Flattened, serializable view of one [`OperationTiming`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSummary {
    pub kind: OperationKind,
    pub calls: u64,
    pub rejected: u64,
    pub total_ms: f64,
    pub avg_us: f64,
    pub max_us: f64,
}

#[derive(Debug, Default)]
pub struct OperationMetrics {
    timings: HashMap<OperationKind, OperationTiming>,
}

impl OperationMetrics {
    pub fn record(&mut self, kind: OperationKind, duration: Duration, accepted: bool) {
        self.timings
            .entry(kind)
            .or_default()
            .record(duration, accepted);
    }

    pub fn get(&self, kind: OperationKind) -> Option<&OperationTiming> {
        self.timings.get(&kind)
    }

    pub fn all(&self) -> &HashMap<OperationKind, OperationTiming> {
        &self.timings
    }

    pub fn total_calls(&self) -> u64 {
        self.timings.values().map(|timing| timing.call_count).sum()
    }

    /// One summary per recorded kind, in [`OperationKind`] order.
    pub fn summaries(&self) -> Vec<OperationSummary> {
        let mut summaries: Vec<_> = self
            .timings
            .iter()
            .map(|(&kind, timing)| OperationSummary {
                kind,
                calls: timing.call_count,
                rejected: timing.rejected_count,
                total_ms: timing.total_duration.as_secs_f64() * 1000.0,
                avg_us: timing.avg_duration().as_secs_f64() * 1_000_000.0,
                max_us: timing.max_duration.as_secs_f64() * 1_000_000.0,
            })
            .collect();
        summaries.sort_by_key(|summary| summary.kind);
        summaries
    }

    pub fn print_summary(&self) {
        println!("\n=== Operation Summary ===");
        for summary in self.summaries() {
            println!(
                "{:12} | calls: {:8} | rejected: {:6} | total: {:8.2}ms | avg: {:6.2}μs | max: {:6.2}μs",
                format!("{:?}", summary.kind),
                summary.calls,
                summary.rejected,
                summary.total_ms,
                summary.avg_us,
                summary.max_us,
            );
        }
    }
}
