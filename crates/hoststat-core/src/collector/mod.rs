//! Host telemetry collection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  HostCollector (MetricSource)                │
//! │  ┌────────────────────┐ ┌───────────────┐ ┌───────────────┐  │
//! │  │  SystemCollector   │ │ volume_usage  │ │ LatencyTargets│  │
//! │  │  - /proc/cpuinfo   │ │ (sysinfo)     │ │ (ping × 3)    │  │
//! │  │  - /proc/stat      │ └───────────────┘ └───────────────┘  │
//! │  │  - /proc/meminfo   │                                      │
//! │  │  - /proc/diskstats │                                      │
//! │  │  - /proc/net/dev   │                                      │
//! │  └─────────┬──────────┘                                      │
//! │     ┌──────▼──────┐                                          │
//! │     │  FileSystem │ (trait)                                  │
//! │     └──────┬──────┘                                          │
//! └────────────┼─────────────────────────────────────────────────┘
//!       ┌──────┴──────┐
//!  ┌────▼────┐   ┌────▼────┐
//!  │ RealFs  │   │ MockFs  │
//!  └─────────┘   └─────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use hoststat_core::collector::{HostCollector, HostConfig, MetricSource, RealFs};
//!
//! let collector = HostCollector::new(RealFs::new(), HostConfig::default());
//! let readings = collector.gather().await?;
//! ```

mod host;
pub mod latency;
pub mod mock;
pub mod procfs;
mod source;
pub mod traits;
pub mod volume;

pub use host::{HostCollector, HostConfig};
pub use latency::LatencyTargets;
pub use mock::MockFs;
pub use source::{
    CollectError, CpuReading, LatencyReading, MemoryReading, MetricSource, RawReadings,
    TransferReading, VolumeReading,
};
pub use traits::{FileSystem, RealFs};
