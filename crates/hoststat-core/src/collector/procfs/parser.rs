//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parsed data from `/proc/meminfo`. All values in kB.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// Parses `/proc/meminfo` content.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut info = MemInfo::default();
    let mut seen_total = false;

    let parse_kb = |line: &str| -> u64 {
        line.split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    for line in content.lines() {
        if line.starts_with("MemTotal:") {
            info.mem_total = parse_kb(line);
            seen_total = true;
        } else if line.starts_with("MemFree:") {
            info.mem_free = parse_kb(line);
        } else if line.starts_with("SwapTotal:") {
            info.swap_total = parse_kb(line);
        } else if line.starts_with("SwapFree:") {
            info.swap_free = parse_kb(line);
        }
    }

    if !seen_total {
        return Err(ParseError::new("MemTotal missing from meminfo"));
    }

    Ok(info)
}

/// Aggregate CPU time counters (jiffies) from the `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Jiffies spent idle or waiting for I/O.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    /// All accounted jiffies. Guest time is already folded into `user`.
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

/// Parses the aggregate `cpu` line of `/proc/stat`.
pub fn parse_cpu_times(content: &str) -> Result<CpuTimes, ParseError> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ParseError::new("aggregate cpu line missing from stat"))?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(ParseError::new("truncated cpu line"));
    }

    let get_val = |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

    Ok(CpuTimes {
        user: get_val(1),
        nice: get_val(2),
        system: get_val(3),
        idle: get_val(4),
        iowait: get_val(5),
        irq: get_val(6),
        softirq: get_val(7),
        steal: get_val(8),
    })
}

/// Static CPU facts from `/proc/cpuinfo`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuInfo {
    /// Number of logical processors.
    pub cores: u32,
    /// Current clock of the first processor in MHz. Follows frequency scaling.
    pub mhz: Option<f64>,
    /// Rated clock in GHz from the `@ 2.40GHz` suffix of the model name.
    pub rated_ghz: Option<f64>,
}

impl CpuInfo {
    /// Nominal clock in GHz: the rated clock when the model name carries
    /// one, otherwise the current clock.
    pub fn clock_ghz(&self) -> Option<f64> {
        self.rated_ghz.or(self.mhz.map(|mhz| mhz / 1000.0))
    }
}

/// Extracts `2.40` from `Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz`.
fn rated_ghz(model_name: &str) -> Option<f64> {
    let (_, clock) = model_name.rsplit_once('@')?;
    clock.trim().strip_suffix("GHz")?.trim().parse().ok()
}

/// Parses `/proc/cpuinfo` content.
///
/// Some architectures (and most VMs on ARM) omit `cpu MHz`; that is not an error.
pub fn parse_cpuinfo(content: &str) -> Result<CpuInfo, ParseError> {
    let mut info = CpuInfo::default();

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "processor" => info.cores += 1,
            "cpu MHz" if info.mhz.is_none() => {
                info.mhz = value.trim().parse().ok();
            }
            "model name" if info.rated_ghz.is_none() => {
                info.rated_ghz = rated_ghz(value);
            }
            _ => {}
        }
    }

    if info.cores == 0 {
        return Err(ParseError::new("no processor entries in cpuinfo"));
    }

    Ok(info)
}

/// Parses `/proc/uptime`, returning seconds since boot.
pub fn parse_uptime(content: &str) -> Result<f64, ParseError> {
    content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?
        .parse()
        .map_err(|_| ParseError::new("invalid uptime"))
}

/// Sector counters from one `/proc/diskstats` line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskStats {
    /// Device name (sda, nvme0n1, etc.)
    pub device: String,
    /// Number of sectors read
    pub read_sectors: u64,
    /// Number of sectors written
    pub write_sectors: u64,
}

/// Parses `/proc/diskstats` content.
///
/// Format: major minor name reads r_merged r_sectors r_time writes w_merged w_sectors w_time io_pending io_time w_io_time [discards ...]
pub fn parse_diskstats(content: &str) -> Result<Vec<DiskStats>, ParseError> {
    let mut disks = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 14 {
            continue; // Skip malformed lines
        }

        let get_val =
            |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        disks.push(DiskStats {
            device: parts[2].to_string(),
            read_sectors: get_val(5),
            write_sectors: get_val(9),
        });
    }

    Ok(disks)
}

/// Returns true for whole physical/virtual disks, false for partitions and
/// pseudo devices whose traffic is already counted elsewhere.
pub fn is_whole_disk(device: &str) -> bool {
    const PSEUDO: [&str; 6] = ["loop", "ram", "zram", "dm-", "md", "sr"];
    if PSEUDO.iter().any(|p| device.starts_with(p)) {
        return false;
    }

    // nvme0n1p1, mmcblk0p2
    if device.starts_with("nvme") || device.starts_with("mmcblk") {
        return match device.rfind('p') {
            Some(idx) => {
                let suffix = &device[idx + 1..];
                suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit())
            }
            None => true,
        };
    }

    // sda1, vdb2, xvda1
    !device.bytes().last().is_some_and(|b| b.is_ascii_digit())
}

/// Byte counters of one interface from `/proc/net/dev`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetDevStats {
    /// Interface name (eth0, lo, etc.)
    pub interface: String,
    /// Bytes received
    pub rx_bytes: u64,
    /// Bytes transmitted
    pub tx_bytes: u64,
}

/// Parses `/proc/net/dev` content.
///
/// Format:
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
pub fn parse_net_dev(content: &str) -> Result<Vec<NetDevStats>, ParseError> {
    let mut devices = Vec::new();

    for line in content.lines() {
        // Skip header lines
        if line.contains('|') || line.trim().is_empty() {
            continue;
        }

        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };

        let values: Vec<&str> = counters.split_whitespace().collect();
        if values.len() < 16 {
            continue;
        }

        let get_val =
            |idx: usize| -> u64 { values.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        devices.push(NetDevStats {
            interface: name.trim().to_string(),
            rx_bytes: get_val(0),
            tx_bytes: get_val(8),
        });
    }

    Ok(devices)
}
