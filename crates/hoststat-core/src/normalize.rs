//! Unit conversion and rounding of raw readings into dashboard records.
//!
//! Memory is reported in MB, volume size in GB with one decimal, disk totals
//! in whole GB but disk rates in MB/s, and network figures in bits (Gb / Mb/s).
//! The dashboard reads these columns as-is, so the mixed units stay.

use crate::collector::RawReadings;
use crate::sample::{GraphSample, StatSnapshot};

const MEGABYTE: f64 = 1024.0 * 1024.0;
const GIGABYTE: f64 = 1024.0 * 1024.0 * 1024.0;
const BITS_PER_BYTE: f64 = 8.0;

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounds half away from zero to an integer.
pub fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

/// `used / total` in percent with one decimal; `None` when there is no total.
fn percentage(used: Option<u64>, total: Option<u64>) -> Option<f64> {
    let (used, total) = (used?, total?);
    (total > 0).then(|| round_to(used as f64 / total as f64 * 100.0, 1))
}

fn whole_megabytes(bytes: u64) -> i64 {
    round_whole(bytes as f64 / MEGABYTE)
}

fn whole_gigabytes(bytes: u64) -> i64 {
    round_whole(bytes as f64 / GIGABYTE)
}

fn whole_gigabits(bytes: u64) -> i64 {
    round_whole(bytes as f64 / GIGABYTE * BITS_PER_BYTE)
}

fn tenth_gigabytes(bytes: u64) -> f64 {
    round_to(bytes as f64 / GIGABYTE, 1)
}

fn megabytes_per_sec(bytes_per_sec: f64) -> f64 {
    round_to(bytes_per_sec / MEGABYTE, 1)
}

fn megabits_per_sec(bytes_per_sec: f64) -> f64 {
    round_to(bytes_per_sec / MEGABYTE * BITS_PER_BYTE, 1)
}

fn tenth(value: f64) -> f64 {
    round_to(value, 1)
}

/// Converts one gather into its series point and its totals snapshot.
///
/// Pure: unmeasured readings stay `None`, nothing else can fail.
pub fn normalize(raw: &RawReadings) -> (GraphSample, StatSnapshot) {
    let graph = GraphSample {
        captured_at: raw.captured_at,
        cpu_load_pct: raw.cpu.load_pct.map(tenth),
        cpu_process_count: raw.cpu.process_count,
        ram_used_mb: raw.memory.used.map(whole_megabytes),
        ram_used_pct: percentage(raw.memory.used, raw.memory.total),
        swap_used_mb: raw.memory.swap_used.map(whole_megabytes),
        swap_used_pct: percentage(raw.memory.swap_used, raw.memory.swap_total),
        disk_read_mbps: raw.disk.in_per_sec.map(megabytes_per_sec),
        disk_write_mbps: raw.disk.out_per_sec.map(megabytes_per_sec),
        download_mbps: raw.network.in_per_sec.map(megabits_per_sec),
        upload_mbps: raw.network.out_per_sec.map(megabits_per_sec),
        ping_google_ms: raw.latency.google_ms.map(tenth),
        ping_cloudflare_ms: raw.latency.cloudflare_ms.map(tenth),
        ping_discord_ms: raw.latency.discord_ms.map(tenth),
    };

    let stat = StatSnapshot {
        captured_at: raw.captured_at,
        cpu_clock_ghz: raw.cpu.clock_ghz,
        cpu_cores: raw.cpu.cores,
        uptime_sec: raw.cpu.uptime_secs,
        ram_total_mb: raw.memory.total.map(whole_megabytes),
        swap_total_mb: raw.memory.swap_total.map(whole_megabytes),
        disk_size_gb: raw.volume.size.map(tenth_gigabytes),
        disk_read_total_gb: raw.disk.in_total.map(whole_gigabytes),
        disk_write_total_gb: raw.disk.out_total.map(whole_gigabytes),
        disk_used_gb: raw.volume.used.map(tenth_gigabytes),
        disk_used_pct: raw.volume.used_pct.map(tenth),
        download_total_gb: raw.network.in_total.map(whole_gigabits),
        upload_total_gb: raw.network.out_total.map(whole_gigabits),
    };

    (graph, stat)
}
