//! The contract between the sampling pipeline and whatever reads the host.
//!
//! A source returns one [`RawReadings`] per call. Readings that could not be
//! measured this time (first rate sample, probe timeout, missing interface)
//! are `None`; only a failure to read the host at all is an error.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::collector::procfs::parser::ParseError;

/// Error type for a failed gather.
#[derive(Debug)]
pub enum CollectError {
    /// I/O error reading a host file.
    Io(std::io::Error),
    /// A host file had an unexpected format.
    Parse(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            CollectError::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e.message)
    }
}

/// CPU facts and load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuReading {
    pub clock_ghz: Option<f64>,
    pub cores: Option<i64>,
    /// Busy share since the previous gather, in percent.
    pub load_pct: Option<f64>,
    pub process_count: Option<i64>,
    pub uptime_secs: Option<f64>,
}

/// Physical memory and swap, in bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryReading {
    pub total: Option<u64>,
    pub used: Option<u64>,
    pub swap_total: Option<u64>,
    pub swap_used: Option<u64>,
}

/// Space on the primary volume, in bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeReading {
    pub size: Option<u64>,
    pub used: Option<u64>,
    pub used_pct: Option<f64>,
}

/// Cumulative byte counters and per-second rates of a transfer pair
/// (disk read/write or network receive/transmit).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferReading {
    pub in_total: Option<u64>,
    pub out_total: Option<u64>,
    pub in_per_sec: Option<f64>,
    pub out_per_sec: Option<f64>,
}

/// Round-trip times of the three latency probes, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyReading {
    pub google_ms: Option<f64>,
    pub cloudflare_ms: Option<f64>,
    pub discord_ms: Option<f64>,
}

/// Everything one gather produces, unconverted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReadings {
    pub captured_at: DateTime<Utc>,
    pub cpu: CpuReading,
    pub memory: MemoryReading,
    pub volume: VolumeReading,
    /// `in` is bytes read, `out` is bytes written.
    pub disk: TransferReading,
    /// `in` is bytes received, `out` is bytes transmitted.
    pub network: TransferReading,
    pub latency: LatencyReading,
}

impl RawReadings {
    /// Readings with nothing measured yet.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            cpu: CpuReading::default(),
            memory: MemoryReading::default(),
            volume: VolumeReading::default(),
            disk: TransferReading::default(),
            network: TransferReading::default(),
            latency: LatencyReading::default(),
        }
    }
}

/// Something that can read the host's current telemetry.
///
/// Implementations must tolerate overlapping calls: a slow gather may still
/// be running when the next tick starts another.
pub trait MetricSource: Send + Sync {
    fn gather(&self) -> impl Future<Output = Result<RawReadings, CollectError>> + Send;
}
