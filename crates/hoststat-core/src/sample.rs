//! The two record shapes derived from every sampling cycle.
//!
//! [`GraphSample`] and [`StatSnapshot`] come out of the normalizer and may
//! still hold unmeasured (`None`) fields. [`GraphRow`] and [`StatRow`] only
//! exist once the validity gate has seen every field present; the store
//! accepts nothing else.

use chrono::{DateTime, Utc};

/// One point of the time series, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSample {
    pub captured_at: DateTime<Utc>,
    /// %
    pub cpu_load_pct: Option<f64>,
    pub cpu_process_count: Option<i64>,
    /// MB
    pub ram_used_mb: Option<i64>,
    /// %
    pub ram_used_pct: Option<f64>,
    /// MB
    pub swap_used_mb: Option<i64>,
    /// %
    pub swap_used_pct: Option<f64>,
    /// MB/s
    pub disk_read_mbps: Option<f64>,
    /// MB/s
    pub disk_write_mbps: Option<f64>,
    /// Mb/s
    pub download_mbps: Option<f64>,
    /// Mb/s
    pub upload_mbps: Option<f64>,
    /// ms
    pub ping_google_ms: Option<f64>,
    /// ms
    pub ping_cloudflare_ms: Option<f64>,
    /// ms
    pub ping_discord_ms: Option<f64>,
}

/// Current totals and static facts, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSnapshot {
    pub captured_at: DateTime<Utc>,
    /// GHz
    pub cpu_clock_ghz: Option<f64>,
    pub cpu_cores: Option<i64>,
    /// seconds
    pub uptime_sec: Option<f64>,
    /// MB
    pub ram_total_mb: Option<i64>,
    /// MB
    pub swap_total_mb: Option<i64>,
    /// GB
    pub disk_size_gb: Option<f64>,
    /// GB
    pub disk_read_total_gb: Option<i64>,
    /// GB
    pub disk_write_total_gb: Option<i64>,
    /// GB
    pub disk_used_gb: Option<f64>,
    /// %
    pub disk_used_pct: Option<f64>,
    /// Gb
    pub download_total_gb: Option<i64>,
    /// Gb
    pub upload_total_gb: Option<i64>,
}

/// A validated series row. Field order is the `graph` column order.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRow {
    pub cpu_load: f64,
    pub cpu_process_count: i64,
    pub ram_used: i64,
    pub ram_used_percentage: f64,
    pub swap_used: i64,
    pub swap_used_percentage: f64,
    pub disk_read_speed: f64,
    pub disk_write_speed: f64,
    pub download_speed: f64,
    pub upload_speed: f64,
    pub ping_google: f64,
    pub ping_cloudflare: f64,
    pub ping_discord: f64,
}

/// A validated totals row. Field order is the `stat` column order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub cpu_clock: f64,
    pub cpu_cores: i64,
    pub uptime: f64,
    pub ram_total: i64,
    pub swap_total: i64,
    pub disk_size: f64,
    pub disk_read_total: i64,
    pub disk_write_total: i64,
    pub disk_used: f64,
    pub disk_used_percentage: f64,
    pub download_total: i64,
    pub upload_total: i64,
}

impl GraphSample {
    /// Column names of the fields that are still unmeasured.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("cpuLoad", self.cpu_load_pct.is_none()),
            ("cpuProcessCount", self.cpu_process_count.is_none()),
            ("ramUsed", self.ram_used_mb.is_none()),
            ("ramUsedPercentage", self.ram_used_pct.is_none()),
            ("swapUsed", self.swap_used_mb.is_none()),
            ("swapUsedPercentage", self.swap_used_pct.is_none()),
            ("diskReadSpeed", self.disk_read_mbps.is_none()),
            ("diskWriteSpeed", self.disk_write_mbps.is_none()),
            ("downloadSpeed", self.download_mbps.is_none()),
            ("uploadSpeed", self.upload_mbps.is_none()),
            ("pingGoogle", self.ping_google_ms.is_none()),
            ("pingCloudflare", self.ping_cloudflare_ms.is_none()),
            ("pingDiscord", self.ping_discord_ms.is_none()),
        ];
        fields
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }

    /// The row to write, if every field was measured.
    pub fn to_row(&self) -> Option<GraphRow> {
        Some(GraphRow {
            cpu_load: self.cpu_load_pct?,
            cpu_process_count: self.cpu_process_count?,
            ram_used: self.ram_used_mb?,
            ram_used_percentage: self.ram_used_pct?,
            swap_used: self.swap_used_mb?,
            swap_used_percentage: self.swap_used_pct?,
            disk_read_speed: self.disk_read_mbps?,
            disk_write_speed: self.disk_write_mbps?,
            download_speed: self.download_mbps?,
            upload_speed: self.upload_mbps?,
            ping_google: self.ping_google_ms?,
            ping_cloudflare: self.ping_cloudflare_ms?,
            ping_discord: self.ping_discord_ms?,
        })
    }
}

impl StatSnapshot {
    /// Column names of the fields that are still unmeasured.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("cpuClock", self.cpu_clock_ghz.is_none()),
            ("cpuCores", self.cpu_cores.is_none()),
            ("uptime", self.uptime_sec.is_none()),
            ("ramTotal", self.ram_total_mb.is_none()),
            ("swapTotal", self.swap_total_mb.is_none()),
            ("diskSize", self.disk_size_gb.is_none()),
            ("diskReadTotal", self.disk_read_total_gb.is_none()),
            ("diskWriteTotal", self.disk_write_total_gb.is_none()),
            ("diskUsed", self.disk_used_gb.is_none()),
            ("diskUsedPercentage", self.disk_used_pct.is_none()),
            ("downloadTotal", self.download_total_gb.is_none()),
            ("uploadTotal", self.upload_total_gb.is_none()),
        ];
        fields
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }

    /// The row to write, if every field was measured.
    pub fn to_row(&self) -> Option<StatRow> {
        Some(StatRow {
            cpu_clock: self.cpu_clock_ghz?,
            cpu_cores: self.cpu_cores?,
            uptime: self.uptime_sec?,
            ram_total: self.ram_total_mb?,
            swap_total: self.swap_total_mb?,
            disk_size: self.disk_size_gb?,
            disk_read_total: self.disk_read_total_gb?,
            disk_write_total: self.disk_write_total_gb?,
            disk_used: self.disk_used_gb?,
            disk_used_percentage: self.disk_used_pct?,
            download_total: self.download_total_gb?,
            upload_total: self.upload_total_gb?,
        })
    }
}
