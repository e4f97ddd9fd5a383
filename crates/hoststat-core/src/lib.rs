//! hoststat-core: host telemetry sampling for the dashboard database.
//!
//! Provides:
//! - `collector`: procfs, volume and latency readings behind `MetricSource`
//! - `normalize`: unit conversion and rounding into dashboard records
//! - `gate`: all-or-nothing validation of a cycle's records
//! - `storage`: the `graph` series table and the single-row `stat` table
//! - `readiness`: NOT_READY/READY startup lifecycle
//! - `pipeline`: one gather → normalize → gate → persist cycle
//! - `scheduler`: wall-clock aligned tick loop
//! - `sample`: record types shared by the stages above

pub mod collector;
pub mod gate;
pub mod normalize;
pub mod pipeline;
pub mod readiness;
pub mod sample;
pub mod scheduler;
pub mod storage;
