//! Pre-built `/proc` states for testing.

use super::filesystem::MockFs;

/// `/proc/diskstats` for [`MockFs::typical_host`]: two whole disks with one
/// partition each, plus a loop device that must be ignored.
pub const TYPICAL_DISKSTATS: &str = "\
   7       0 loop0 500 0 4000 10 0 0 0 0 0 10 10 0 0 0 0
   8       0 sda 12345 100 2097152 5000 6789 50 1048576 3000 0 4000 8000 0 0 0 0
   8       1 sda1 10000 80 2000000 4000 5000 40 1000000 2500 0 3500 6500 0 0 0 0
 259       0 nvme0n1 50000 200 2097152 10000 30000 150 1048576 8000 5 15000 18000 0 0 0 0
 259       1 nvme0n1p1 49000 190 2000000 9000 29000 140 1000000 7000 0 14000 17000 0 0 0 0
";

/// `/proc/net/dev` for [`MockFs::typical_host`].
pub const TYPICAL_NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 12345678     9876    0    0    0     0          0         0 12345678     9876    0    0    0     0       0          0
  eth0: 1073741824   654321    5   10    0     0          0       100 536870912   456789    2    5    0     0       0          0
";

impl MockFs {
    /// A four-core host with 8 GiB RAM (half used), 2 GiB swap (half used),
    /// three processes, two disks and an `eth0` interface.
    pub fn typical_host() -> Self {
        let fs = Self::new();

        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
model name\t: Intel(R) Xeon(R) CPU @ 2.40GHz
cpu MHz\t\t: 2400.000
cpu cores\t: 4

processor\t: 1
model name\t: Intel(R) Xeon(R) CPU @ 2.40GHz
cpu MHz\t\t: 2399.812

processor\t: 2
model name\t: Intel(R) Xeon(R) CPU @ 2.40GHz
cpu MHz\t\t: 2401.113

processor\t: 3
model name\t: Intel(R) Xeon(R) CPU @ 2.40GHz
cpu MHz\t\t: 2400.500
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );
        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:        8388608 kB
MemFree:         4194304 kB
MemAvailable:    6000000 kB
Buffers:          512000 kB
Cached:          1024000 kB
SwapCached:            0 kB
SwapTotal:       2097152 kB
SwapFree:        1048576 kB
",
        );
        fs.add_file("/proc/diskstats", TYPICAL_DISKSTATS);
        fs.add_file("/proc/net/dev", TYPICAL_NET_DEV);
        fs.add_processes([1, 42, 1337]);

        fs
    }
}
