//! Wall-clock aligned tick loop.
//!
//! Ticks land on fixed offsets of the minute (`:00` and `:30` for the default
//! period) instead of a repeating delay, so the cadence never drifts with
//! cycle duration. Cycles are spawned, not awaited: a slow cycle can overlap
//! the next tick.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::collector::MetricSource;
use crate::pipeline::{CycleOutcome, SkipStreak, run_cycle};
use crate::readiness::ReadyGate;
use crate::storage::Store;

/// Seconds between ticks. Always a divisor of 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPeriod(u32);

impl TickPeriod {
    pub const DEFAULT: TickPeriod = TickPeriod(30);

    pub fn from_secs(secs: u32) -> Result<Self, String> {
        if secs == 0 || 60 % secs != 0 {
            return Err(format!("{} does not divide 60", secs));
        }
        Ok(TickPeriod(secs))
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

/// The first instant strictly after `now` whose seconds-of-minute is a
/// multiple of `period`, with zero sub-second part.
pub fn next_tick(now: DateTime<Utc>, period: TickPeriod) -> DateTime<Utc> {
    let period = i64::from(period.as_secs());
    let into_period = now.timestamp().rem_euclid(period);
    now + TimeDelta::seconds(period - into_period)
        - TimeDelta::nanoseconds(i64::from(now.timestamp_subsec_nanos()))
}

/// Drives sampling cycles on every tick once the store is ready.
pub struct Scheduler<S> {
    source: Arc<S>,
    store: Store,
    ready: ReadyGate,
    period: TickPeriod,
    skips: Arc<SkipStreak>,
}

impl<S: MetricSource + 'static> Scheduler<S> {
    pub fn new(source: S, store: Store, ready: ReadyGate, period: TickPeriod) -> Self {
        Self {
            source: Arc::new(source),
            store,
            ready,
            period,
            skips: Arc::new(SkipStreak::default()),
        }
    }

    /// Ticks forever. Cancel by dropping the future.
    pub async fn run(&self) {
        info!(period_secs = self.period.as_secs(), "scheduler started");
        loop {
            let now = Utc::now();
            let wait = (next_tick(now, self.period) - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;
            let _ = self.tick();
        }
    }

    /// Handles one tick: nothing while NOT_READY, otherwise one spawned cycle.
    pub fn tick(&self) -> Option<JoinHandle<CycleOutcome>> {
        if !self.ready.is_ready() {
            debug!("store not ready, skipping tick");
            return None;
        }

        let source = Arc::clone(&self.source);
        let store = self.store.clone();
        let period = self.period.as_duration();
        let skips = Arc::clone(&self.skips);
        Some(tokio::spawn(async move {
            let start = Instant::now();
            let outcome = run_cycle(source.as_ref(), &store).await;
            let elapsed = start.elapsed();
            if elapsed > period {
                warn!(
                    duration_ms = elapsed.as_millis() as u64,
                    period_secs = period.as_secs(),
                    "cycle outran tick period"
                );
            }
            skips.observe(&outcome);
            outcome
        }))
    }
}
