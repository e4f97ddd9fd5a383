//! System collector for gathering global system metrics from `/proc/`.

use crate::collector::procfs::parser::{
    CpuInfo, CpuTimes, MemInfo, NetDevStats, is_whole_disk, parse_cpu_times, parse_cpuinfo,
    parse_diskstats, parse_meminfo, parse_net_dev, parse_uptime,
};
use crate::collector::source::CollectError;
use crate::collector::traits::FileSystem;
use std::path::Path;

/// Bytes per sector in `/proc/diskstats`, regardless of the device's real sector size.
const DISKSTATS_SECTOR_BYTES: u64 = 512;

/// Cumulative bytes moved by all whole disks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskTotals {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

/// Collects system-wide metrics from `/proc/`.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn fs(&self) -> &F {
        &self.fs
    }

    fn read(&self, relative: &str) -> Result<String, CollectError> {
        let path = format!("{}/{}", self.proc_path, relative);
        Ok(self.fs.read_to_string(Path::new(&path))?)
    }

    /// Collects core count and clock from `/proc/cpuinfo`.
    pub fn collect_cpuinfo(&self) -> Result<CpuInfo, CollectError> {
        Ok(parse_cpuinfo(&self.read("cpuinfo")?)?)
    }

    /// Collects aggregate CPU time counters from `/proc/stat`.
    pub fn collect_cpu_times(&self) -> Result<CpuTimes, CollectError> {
        Ok(parse_cpu_times(&self.read("stat")?)?)
    }

    /// Counts live processes (numeric entries under `/proc`).
    pub fn collect_process_count(&self) -> Result<usize, CollectError> {
        let entries = self.fs.read_dir(Path::new(&self.proc_path))?;
        Ok(entries
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
            .count())
    }

    /// Collects seconds since boot from `/proc/uptime`.
    pub fn collect_uptime(&self) -> Result<f64, CollectError> {
        Ok(parse_uptime(&self.read("uptime")?)?)
    }

    /// Collects memory information from `/proc/meminfo`.
    pub fn collect_meminfo(&self) -> Result<MemInfo, CollectError> {
        Ok(parse_meminfo(&self.read("meminfo")?)?)
    }

    /// Sums sector counters of whole disks from `/proc/diskstats`.
    ///
    /// Partitions and pseudo devices are skipped so traffic is not counted twice.
    pub fn collect_disk_totals(&self) -> Result<DiskTotals, CollectError> {
        let disks = parse_diskstats(&self.read("diskstats")?)?;

        Ok(disks
            .iter()
            .filter(|d| is_whole_disk(&d.device))
            .fold(DiskTotals::default(), |acc, d| DiskTotals {
                read_bytes: acc.read_bytes + d.read_sectors * DISKSTATS_SECTOR_BYTES,
                written_bytes: acc.written_bytes + d.write_sectors * DISKSTATS_SECTOR_BYTES,
            }))
    }

    /// Collects counters of one interface from `/proc/net/dev`.
    ///
    /// Returns `Ok(None)` when the interface does not exist.
    pub fn collect_net_dev(&self, interface: &str) -> Result<Option<NetDevStats>, CollectError> {
        let devices = parse_net_dev(&self.read("net/dev")?)?;
        Ok(devices.into_iter().find(|d| d.interface == interface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_collect_cpuinfo() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");

        let info = collector.collect_cpuinfo().unwrap();

        assert_eq!(info.cores, 4);
        assert_eq!(info.mhz, Some(2400.0));
    }

    #[test]
    fn test_collect_cpu_times() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");

        let times = collector.collect_cpu_times().unwrap();

        assert_eq!(times.total(), 94800);
        assert_eq!(times.idle_total(), 81000);
    }

    #[test]
    fn test_collect_process_count() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");

        // pids 1, 42, 1337; files and the net/ directory are not processes
        assert_eq!(collector.collect_process_count().unwrap(), 3);
    }

    #[test]
    fn test_collect_uptime() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");
        assert_eq!(collector.collect_uptime().unwrap(), 12345.67);
    }

    #[test]
    fn test_collect_meminfo() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");

        let info = collector.collect_meminfo().unwrap();

        assert_eq!(info.mem_total, 8388608);
        assert_eq!(info.mem_free, 4194304);
        assert_eq!(info.swap_total, 2097152);
        assert_eq!(info.swap_free, 1048576);
    }

    #[test]
    fn test_collect_disk_totals_skips_partitions_and_loop() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");

        let totals = collector.collect_disk_totals().unwrap();

        // sda + nvme0n1, 2097152 sectors read and 1048576 written each
        assert_eq!(totals.read_bytes, 2 * 2097152 * 512);
        assert_eq!(totals.written_bytes, 2 * 1048576 * 512);
    }

    #[test]
    fn test_collect_net_dev() {
        let collector = SystemCollector::new(MockFs::typical_host(), "/proc");

        let eth0 = collector.collect_net_dev("eth0").unwrap().unwrap();
        assert_eq!(eth0.rx_bytes, 1073741824);
        assert_eq!(eth0.tx_bytes, 536870912);

        assert!(collector.collect_net_dev("wlan0").unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let fs = MockFs::typical_host();
        fs.remove_file("/proc/meminfo");
        let collector = SystemCollector::new(fs, "/proc");

        assert!(matches!(
            collector.collect_meminfo(),
            Err(CollectError::Io(_))
        ));
    }
}
