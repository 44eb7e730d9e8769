//! Display Formatting
//!
//! Size and type strings shown next to disks and partitions.

use crate::domain::models::{Disk, DiskType, LogicalKind, PartitionKind, StorageDevice};

/// Size the fleet manager reports when it does not know a device's size
pub const EMPTY_SIZE: u64 = 0;

/// Shown in place of an unknown size
pub const SIZE_PLACEHOLDER: &str = "—";

/// Shown in place of a missing device type
pub const UNKNOWN_TYPE: &str = "Unknown";

const SIZE_UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count with decimal (base 1000) units.
///
/// The largest unit that keeps the value at or above one is used. The value is
/// rounded half up to two decimals in integer arithmetic and trailing zeros
/// are dropped. A value that rounds up to 1000 moves to the next unit, so
/// `999_999` reads `"1 MB"`.
pub fn format_size(size: Option<u64>) -> String {
    let bytes = match size {
        Some(bytes) if bytes != EMPTY_SIZE => u128::from(bytes),
        _ => return SIZE_PLACEHOLDER.to_string(),
    };

    let last_unit = SIZE_UNITS.len() - 1;
    let mut unit = 0;
    let mut divisor: u128 = 1;
    while unit < last_unit && bytes >= divisor * 1000 {
        divisor *= 1000;
        unit += 1;
    }

    let mut hundredths = round_hundredths(bytes, divisor);
    if hundredths >= 100_000 && unit < last_unit {
        divisor *= 1000;
        unit += 1;
        hundredths = round_hundredths(bytes, divisor);
    }

    format!("{} {}", format_hundredths(hundredths), SIZE_UNITS[unit])
}

/// `bytes / divisor` in hundredths, halves rounded up
fn round_hundredths(bytes: u128, divisor: u128) -> u128 {
    (bytes * 100 + divisor / 2) / divisor
}

fn format_hundredths(hundredths: u128) -> String {
    let whole = hundredths / 100;
    let frac = hundredths % 100;
    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{}.{}", whole, frac / 10)
    } else {
        format!("{}.{:02}", whole, frac)
    }
}

/// Human readable type of a disk or partition.
///
/// With `lowercase` the label reads naturally inside a sentence
/// ("Remove physical disk..."); acronyms keep their case.
pub fn format_type(device: Option<StorageDevice<'_>>, lowercase: bool) -> String {
    match device {
        Some(StorageDevice::Disk(disk)) => disk_label(disk, lowercase),
        Some(StorageDevice::Partition(partition)) => match partition.kind {
            PartitionKind::Vmfs6 => "VMFS6".to_string(),
            PartitionKind::Partition => pick(lowercase, "Partition", "partition"),
        },
        None => UNKNOWN_TYPE.to_string(),
    }
}

fn disk_label(disk: &Disk, lowercase: bool) -> String {
    match disk.disk_type {
        DiskType::CacheSet => pick(lowercase, "Cache set", "cache set"),
        DiskType::Iscsi => "ISCSI".to_string(),
        DiskType::Virtual => match disk.logical_kind() {
            Some(LogicalKind::LogicalVolume) => pick(lowercase, "Logical volume", "logical volume"),
            Some(LogicalKind::Raid(level)) => format!("RAID {}", level),
            Some(LogicalKind::Bcache) => pick(lowercase, "Bcache", "bcache"),
            Some(LogicalKind::PlainVirtual) | None => pick(lowercase, "Virtual", "virtual disk"),
        },
        DiskType::VolumeGroup => pick(lowercase, "Volume group", "volume group"),
        DiskType::Physical => pick(lowercase, "Physical", "physical disk"),
    }
}

fn pick(lowercase: bool, canonical: &str, lower: &str) -> String {
    let label = if lowercase { lower } else { canonical };
    label.to_string()
}
