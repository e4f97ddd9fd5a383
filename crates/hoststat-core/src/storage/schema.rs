//! SQL shared with the dashboard.
//!
//! Table names, column names, column order and column types are read by
//! other tooling and must not change.

pub const CREATE_GRAPH_TABLE: &str = "CREATE TABLE IF NOT EXISTS graph (
    time double,
    cpuLoad float,
    cpuProcessCount int,
    ramUsed int,
    ramUsedPercentage float,
    swapUsed int,
    swapUsedPercentage float,
    diskReadSpeed float,
    diskWriteSpeed float,
    downloadSpeed float,
    uploadSpeed float,
    pingGoogle float,
    pingCloudflare float,
    pingDiscord float
)";

pub const CREATE_STAT_TABLE: &str = "CREATE TABLE IF NOT EXISTS stat (
    time double,
    cpuClock float,
    cpuCores int,
    uptime double,
    ramTotal int,
    swapTotal int,
    diskSize float,
    diskReadTotal int,
    diskWriteTotal int,
    diskUsed float,
    diskUsedPercentage float,
    downloadTotal int,
    uploadTotal int
)";

pub const CLEAR_STAT: &str = "DELETE FROM stat";

/// The placeholder row every replace overwrites.
pub const SEED_STAT: &str =
    "INSERT INTO stat VALUES (NULL,NULL,NULL,NULL,NULL,NULL,NULL,NULL,NULL,NULL,NULL,NULL,NULL)";

pub const INSERT_GRAPH: &str = "INSERT INTO graph VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?)";

/// No WHERE clause: the table holds exactly one row.
pub const UPDATE_STAT: &str = "UPDATE stat SET
    time = ?,
    cpuClock = ?,
    cpuCores = ?,
    uptime = ?,
    ramTotal = ?,
    swapTotal = ?,
    diskSize = ?,
    diskReadTotal = ?,
    diskWriteTotal = ?,
    diskUsed = ?,
    diskUsedPercentage = ?,
    downloadTotal = ?,
    uploadTotal = ?";

pub const COUNT_GRAPH: &str = "SELECT COUNT(*) FROM graph";

pub const COUNT_STAT: &str = "SELECT COUNT(*) FROM stat";
