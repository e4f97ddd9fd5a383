//! Production [`MetricSource`]: `/proc`, the primary volume and latency probes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use crate::collector::latency::LatencyTargets;
use crate::collector::procfs::parser::CpuTimes;
use crate::collector::procfs::{DiskTotals, SystemCollector};
use crate::collector::source::{
    CollectError, CpuReading, MetricSource, MemoryReading, RawReadings, TransferReading,
};
use crate::collector::traits::FileSystem;
use crate::collector::volume::volume_usage;

/// What the host collector needs to know beyond the filesystem.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Base path to proc filesystem (usually "/proc").
    pub proc_path: String,
    /// Network interface whose traffic is reported.
    pub interface: String,
    /// Mount point of the volume whose space is reported.
    pub volume_mount: PathBuf,
    pub latency_targets: LatencyTargets,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            proc_path: "/proc".to_string(),
            interface: "eth0".to_string(),
            volume_mount: PathBuf::from("/"),
            latency_targets: LatencyTargets::default(),
        }
    }
}

/// Counter values remembered between gathers to derive rates.
#[derive(Debug, Clone, Copy)]
struct CounterSample {
    at: Instant,
    cpu: CpuTimes,
    disk: DiskTotals,
    /// Received and transmitted bytes, if the interface existed.
    net: Option<(u64, u64)>,
}

/// Reads the live host.
///
/// The procfs and volume reads are blocking syscalls and run on the blocking
/// pool, so a stuck mount stalls only its own cycle.
pub struct HostCollector<F: FileSystem> {
    inner: Arc<HostReader<F>>,
}

struct HostReader<F: FileSystem> {
    system: SystemCollector<F>,
    config: HostConfig,
    previous: Mutex<Option<CounterSample>>,
}

impl<F: FileSystem> HostCollector<F> {
    pub fn new(fs: F, config: HostConfig) -> Self {
        Self {
            inner: Arc::new(HostReader {
                system: SystemCollector::new(fs, config.proc_path.clone()),
                config,
                previous: Mutex::new(None),
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn read_host_at(&self, now: Instant) -> Result<RawReadings, CollectError> {
        self.inner.read_host_at(now)
    }

    #[cfg(test)]
    fn system_fs(&self) -> &F {
        self.inner.system.fs()
    }
}

impl<F: FileSystem> HostReader<F> {
    /// Reads everything except latency, deriving rates against the previous call.
    ///
    /// Rates are `None` on the first call and whenever a counter went backwards.
    fn read_host_at(&self, now: Instant) -> Result<RawReadings, CollectError> {
        let cpuinfo = self.system.collect_cpuinfo()?;
        let cpu_times = self.system.collect_cpu_times()?;
        let process_count = self.system.collect_process_count()?;
        let uptime = self.system.collect_uptime()?;
        let mem = self.system.collect_meminfo()?;
        let disk = self.system.collect_disk_totals()?;
        let net = self.system.collect_net_dev(&self.config.interface)?;

        if net.is_none() {
            debug!(interface = %self.config.interface, "network interface not found");
        }

        let current = CounterSample {
            at: now,
            cpu: cpu_times,
            disk,
            net: net.map(|n| (n.rx_bytes, n.tx_bytes)),
        };
        let previous = self.swap_previous(current);

        // Without a previous sample the load covers the time since boot.
        let load_pct = cpu_load_pct(
            previous.map(|p| p.cpu).unwrap_or_default(),
            current.cpu,
        );
        let elapsed = previous.and_then(|p| now.checked_duration_since(p.at));

        let disk_reading = TransferReading {
            in_total: Some(disk.read_bytes),
            out_total: Some(disk.written_bytes),
            in_per_sec: previous.and_then(|p| {
                per_second(disk.read_bytes, p.disk.read_bytes, elapsed?)
            }),
            out_per_sec: previous.and_then(|p| {
                per_second(disk.written_bytes, p.disk.written_bytes, elapsed?)
            }),
        };

        let previous_net = previous.and_then(|p| p.net);
        let network_reading = match current.net {
            Some((rx, tx)) => TransferReading {
                in_total: Some(rx),
                out_total: Some(tx),
                in_per_sec: previous_net.and_then(|(prx, _)| per_second(rx, prx, elapsed?)),
                out_per_sec: previous_net.and_then(|(_, ptx)| per_second(tx, ptx, elapsed?)),
            },
            None => TransferReading::default(),
        };

        let mut readings = RawReadings::empty(Utc::now());
        readings.cpu = CpuReading {
            clock_ghz: cpuinfo.clock_ghz().map(|ghz| (ghz * 100.0).round() / 100.0),
            cores: Some(i64::from(cpuinfo.cores)),
            load_pct,
            process_count: i64::try_from(process_count).ok(),
            uptime_secs: Some(uptime),
        };
        readings.memory = MemoryReading {
            total: Some(mem.mem_total * 1024),
            used: Some(mem.mem_total.saturating_sub(mem.mem_free) * 1024),
            swap_total: Some(mem.swap_total * 1024),
            swap_used: Some(mem.swap_total.saturating_sub(mem.swap_free) * 1024),
        };
        readings.volume = volume_usage(&self.config.volume_mount);
        readings.disk = disk_reading;
        readings.network = network_reading;

        Ok(readings)
    }

    fn swap_previous(&self, current: CounterSample) -> Option<CounterSample> {
        let mut guard = self.previous.lock().unwrap_or_else(|e| e.into_inner());
        guard.replace(current)
    }
}

impl<F: FileSystem + 'static> MetricSource for HostCollector<F> {
    async fn gather(&self) -> Result<RawReadings, CollectError> {
        let reader = Arc::clone(&self.inner);
        let now = Instant::now();
        let (host, latency) = tokio::join!(
            tokio::task::spawn_blocking(move || reader.read_host_at(now)),
            self.inner.config.latency_targets.measure()
        );

        let mut readings = host.map_err(|e| CollectError::Io(std::io::Error::other(e)))??;
        readings.latency = latency;
        Ok(readings)
    }
}

/// Busy share of CPU time between two samples, in percent.
fn cpu_load_pct(prev: CpuTimes, curr: CpuTimes) -> Option<f64> {
    let total = curr.total().checked_sub(prev.total())?;
    let idle = curr.idle_total().checked_sub(prev.idle_total())?;
    if total == 0 {
        return None;
    }
    Some(total.saturating_sub(idle) as f64 / total as f64 * 100.0)
}

/// Counter delta per second, `None` on counter regression (device reset).
fn per_second(curr: u64, prev: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    (curr >= prev && secs > 0.0).then(|| (curr - prev) as f64 / secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::mock::scenarios::TYPICAL_NET_DEV;
    use std::io;
    use std::path::Path;

    fn collector() -> HostCollector<MockFs> {
        HostCollector::new(MockFs::typical_host(), HostConfig::default())
    }

    #[test]
    fn test_first_read_has_totals_but_no_rates() {
        let host = collector();
        let readings = host.read_host_at(Instant::now()).unwrap();

        assert_eq!(readings.cpu.cores, Some(4));
        assert_eq!(readings.cpu.clock_ghz, Some(2.4));
        assert_eq!(readings.cpu.process_count, Some(3));
        assert_eq!(readings.cpu.uptime_secs, Some(12345.67));
        // 13800 busy of 94800 jiffies since boot
        let load = readings.cpu.load_pct.unwrap();
        assert!((load - 14.557).abs() < 0.01);

        assert_eq!(readings.memory.total, Some(8 * 1024 * 1024 * 1024));
        assert_eq!(readings.memory.used, Some(4 * 1024 * 1024 * 1024));
        assert_eq!(readings.memory.swap_total, Some(2 * 1024 * 1024 * 1024));
        assert_eq!(readings.memory.swap_used, Some(1024 * 1024 * 1024));

        assert_eq!(readings.disk.in_total, Some(2 * 1024 * 1024 * 1024));
        assert_eq!(readings.disk.out_total, Some(1024 * 1024 * 1024));
        assert_eq!(readings.disk.in_per_sec, None);
        assert_eq!(readings.disk.out_per_sec, None);

        assert_eq!(readings.network.in_total, Some(1073741824));
        assert_eq!(readings.network.out_total, Some(536870912));
        assert_eq!(readings.network.in_per_sec, None);
        assert_eq!(readings.network.out_per_sec, None);
    }

    #[test]
    fn test_second_read_derives_rates() {
        let fs = MockFs::typical_host();
        let host = HostCollector::new(fs, HostConfig::default());
        let t0 = Instant::now();
        host.read_host_at(t0).unwrap();

        // 10 seconds later: 1 MiB more received, 2048 sectors more read on sda,
        // 100 busy + 300 idle jiffies.
        host.system_fs().add_file(
            "/proc/net/dev",
            TYPICAL_NET_DEV.replace("1073741824", "1074790400"),
        );
        host.system_fs().add_file(
            "/proc/diskstats",
            "   8       0 sda 12345 100 2099200 5000 6789 50 1048576 3000 0 4000 8000 0 0 0 0\n\
             259       0 nvme0n1 50000 200 2097152 10000 30000 150 1048576 8000 5 15000 18000 0 0 0 0\n",
        );
        host.system_fs().add_file(
            "/proc/stat",
            "cpu  10100 500 3000 80300 1000 200 100 0 0 0\n",
        );

        let readings = host.read_host_at(t0 + Duration::from_secs(10)).unwrap();

        assert_eq!(readings.network.in_per_sec, Some(104857.6));
        assert_eq!(readings.network.out_per_sec, Some(0.0));
        assert_eq!(readings.disk.in_per_sec, Some(2048.0 * 512.0 / 10.0));
        assert_eq!(readings.disk.out_per_sec, Some(0.0));
        assert_eq!(readings.cpu.load_pct, Some(25.0));
    }

    #[test]
    fn test_counter_regression_yields_no_rate() {
        let host = collector();
        let t0 = Instant::now();
        host.read_host_at(t0).unwrap();

        host.system_fs().add_file(
            "/proc/net/dev",
            TYPICAL_NET_DEV.replace("1073741824", "1000"),
        );
        let readings = host.read_host_at(t0 + Duration::from_secs(30)).unwrap();

        assert_eq!(readings.network.in_total, Some(1000));
        assert_eq!(readings.network.in_per_sec, None);
        assert_eq!(readings.network.out_per_sec, Some(0.0));
    }

    #[test]
    fn test_missing_interface_reads_nothing() {
        let config = HostConfig {
            interface: "wlan0".to_string(),
            ..HostConfig::default()
        };
        let host = HostCollector::new(MockFs::typical_host(), config);

        let readings = host.read_host_at(Instant::now()).unwrap();
        assert_eq!(readings.network, TransferReading::default());
    }

    #[test]
    fn test_clock_ignores_frequency_scaling() {
        let host = collector();
        let cpuinfo = host
            .system_fs()
            .read_to_string(Path::new("/proc/cpuinfo"))
            .unwrap()
            .replace("cpu MHz\t\t: 2400.000", "cpu MHz\t\t: 800.000");
        host.system_fs().add_file("/proc/cpuinfo", cpuinfo);

        let readings = host.read_host_at(Instant::now()).unwrap();
        assert_eq!(readings.cpu.clock_ghz, Some(2.4));
    }

    /// Answers like `MockFs`, but every read takes `delay`.
    struct SlowFs {
        inner: MockFs,
        delay: Duration,
    }

    impl FileSystem for SlowFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            std::thread::sleep(self.delay);
            self.inner.read_to_string(path)
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
            std::thread::sleep(self.delay);
            self.inner.read_dir(path)
        }
    }

    #[tokio::test]
    async fn test_slow_proc_does_not_stall_runtime() {
        let fs = SlowFs {
            inner: MockFs::typical_host(),
            delay: Duration::from_millis(200),
        };
        let config = HostConfig {
            latency_targets: LatencyTargets {
                google: "127.0.0.1".to_string(),
                cloudflare: "127.0.0.1".to_string(),
                discord: "127.0.0.1".to_string(),
            },
            ..HostConfig::default()
        };
        let host = HostCollector::new(fs, config);

        let start = Instant::now();
        let gather = host.gather();
        tokio::pin!(gather);
        let timer_fired_first = tokio::select! {
            _ = &mut gather => false,
            _ = tokio::time::sleep(Duration::from_millis(10)) => true,
        };

        assert!(timer_fired_first);
        assert!(start.elapsed() < Duration::from_millis(500));

        let readings = gather.await.unwrap();
        assert_eq!(readings.cpu.cores, Some(4));
        assert_eq!(readings.network.in_total, Some(1073741824));
    }

    #[test]
    fn test_unreadable_proc_fails_gather() {
        let host = collector();
        host.system_fs().remove_file("/proc/stat");

        assert!(host.read_host_at(Instant::now()).is_err());
    }

    #[test]
    fn test_cpu_load_pct() {
        let prev = CpuTimes {
            user: 100,
            idle: 100,
            ..CpuTimes::default()
        };
        let curr = CpuTimes {
            user: 150,
            idle: 150,
            ..CpuTimes::default()
        };
        assert_eq!(cpu_load_pct(prev, curr), Some(50.0));
        assert_eq!(cpu_load_pct(curr, curr), None);
        assert_eq!(cpu_load_pct(curr, prev), None);
    }

    #[test]
    fn test_per_second() {
        assert_eq!(per_second(300, 100, Duration::from_secs(2)), Some(100.0));
        assert_eq!(per_second(100, 300, Duration::from_secs(2)), None);
        assert_eq!(per_second(300, 100, Duration::ZERO), None);
    }
}
