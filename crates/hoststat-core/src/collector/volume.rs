//! Space usage of the primary volume.

use std::path::Path;

use sysinfo::Disks;

use crate::collector::source::VolumeReading;

/// Looks up the filesystem mounted at `mount` and reports its usage.
///
/// Returns an empty reading when nothing is mounted there.
pub fn volume_usage(mount: &Path) -> VolumeReading {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .find(|d| d.mount_point() == mount)
        .map(|d| usage_from_space(d.total_space(), d.available_space()))
        .unwrap_or_default()
}

/// Derives used bytes and percentage from total and available space.
pub fn usage_from_space(total: u64, available: u64) -> VolumeReading {
    let used = total.saturating_sub(available);
    let used_pct = (total > 0).then(|| used as f64 / total as f64 * 100.0);

    VolumeReading {
        size: Some(total),
        used: Some(used),
        used_pct,
    }
}
