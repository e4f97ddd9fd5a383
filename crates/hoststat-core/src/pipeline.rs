//! One sampling cycle: gather, normalize, validate, persist.

use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::collector::MetricSource;
use crate::gate::{Gate, validate};
use crate::normalize::normalize;
use crate::storage::Store;

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Both rows written.
    Persisted,
    /// Some field was unmeasured; nothing written.
    Skipped { missing: Vec<&'static str> },
    /// The source could not produce readings; nothing written.
    GatherFailed,
    /// A store write failed. The series row may or may not exist; the
    /// totals row was not touched after a failed append.
    WriteFailed,
}

/// Notices when cycles keep getting skipped for the same fields.
///
/// A host without swap or without the configured interface never produces a
/// complete sample. The skip itself is logged at DEBUG; this raises one WARN
/// once the same fields are missing twice in a row, and re-arms after a
/// persisted cycle or a different set of missing fields.
#[derive(Debug, Default)]
pub struct SkipStreak {
    state: Mutex<Streak>,
}

#[derive(Debug, Default)]
struct Streak {
    missing: Vec<&'static str>,
    warned: bool,
}

impl SkipStreak {
    /// Records a cycle outcome. Returns true if it raised the warning.
    pub fn observe(&self, outcome: &CycleOutcome) -> bool {
        let mut streak = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match outcome {
            CycleOutcome::Persisted => {
                *streak = Streak::default();
                false
            }
            CycleOutcome::Skipped { missing } if streak.missing == *missing => {
                if streak.warned {
                    return false;
                }
                streak.warned = true;
                warn!(
                    missing = ?missing,
                    "fields unmeasured in consecutive cycles, no samples are being saved"
                );
                true
            }
            CycleOutcome::Skipped { missing } => {
                streak.missing = missing.clone();
                streak.warned = false;
                false
            }
            CycleOutcome::GatherFailed | CycleOutcome::WriteFailed => false,
        }
    }
}

/// Runs a single cycle to completion.
///
/// Never returns an error: every failure is logged here and the cycle is
/// abandoned, so the next tick starts clean.
pub async fn run_cycle<S: MetricSource>(source: &S, store: &Store) -> CycleOutcome {
    let start = Instant::now();

    let raw = match source.gather().await {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, "failed to gather metrics");
            return CycleOutcome::GatherFailed;
        }
    };

    let (graph, stat) = normalize(&raw);
    let (graph_row, stat_row) = match validate(&graph, &stat) {
        Gate::Proceed(graph_row, stat_row) => (graph_row, stat_row),
        Gate::Skip { missing } => {
            debug!(
                captured_at = %raw.captured_at.to_rfc3339(),
                missing = ?missing,
                "skipping incomplete sample"
            );
            return CycleOutcome::Skipped { missing };
        }
    };

    if let Err(e) = store.append_sample(&graph_row).await {
        error!(error = %e, "failed to insert sample");
        return CycleOutcome::WriteFailed;
    }
    if let Err(e) = store.replace_snapshot(&stat_row).await {
        error!(error = %e, "failed to update totals");
        return CycleOutcome::WriteFailed;
    }

    info!(
        captured_at = %raw.captured_at.to_rfc3339(),
        duration_ms = start.elapsed().as_millis() as u64,
        "saved sample"
    );
    CycleOutcome::Persisted
}
