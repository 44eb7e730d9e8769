//! Storage Classifier
//!
//! Answers classification and eligibility questions about disks, partitions
//! and filesystems. Every check accepts `None` and answers `false` for it.

use crate::domain::models::{Disk, DiskType, Filesystem, LogicalKind, Partition, StorageDevice};
use crate::error::{Error, Result};
use crate::storage::format::{format_size, format_type};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Smallest amount of free space, in bytes, worth creating a partition or
/// logical volume in.
pub const MIN_PARTITION_SIZE: u64 = 4 * 1024 * 1024;

/// Filesystem type of a VMware datastore
pub const DATASTORE_FSTYPE: &str = "vmfs6";

// =============================================================================
// Classifier Configuration
// =============================================================================

/// Configuration for the storage classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Free space must exceed this to partition a disk or add a logical volume
    pub min_partition_size: u64,

    /// Filesystems that live in memory and take no space on the device
    pub non_storage_fstypes: Vec<String>,

    /// Filesystem type marking a datastore
    pub datastore_fstype: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_partition_size: MIN_PARTITION_SIZE,
            non_storage_fstypes: vec!["ramfs".to_string(), "tmpfs".to_string()],
            datastore_fstype: DATASTORE_FSTYPE.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Parse a configuration from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading classifier config");
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject settings that would make every check meaningless
    pub fn validate(&self) -> Result<()> {
        if self.min_partition_size == 0 {
            return Err(Error::Configuration(
                "min_partition_size must be greater than zero".into(),
            ));
        }
        if self.datastore_fstype.trim().is_empty() {
            return Err(Error::Configuration(
                "datastore_fstype must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Device Report
// =============================================================================

/// Everything the classifier can say about one disk or partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Display key, `{type}-{id}`
    pub id: String,
    pub name: String,
    /// Human readable type
    pub label: String,
    /// Human readable size
    pub size: String,
    pub size_bytes: u64,
    pub available: bool,
    pub mounted: bool,
    pub formattable: bool,
    pub uses_storage: bool,
    pub datastore: bool,
    pub can_be_partitioned: bool,
    pub can_create_logical_volume: bool,
    pub can_be_deleted: bool,
}

// =============================================================================
// Storage Classifier
// =============================================================================

/// Classifies disks, partitions and filesystems
#[derive(Debug, Clone, Default)]
pub struct StorageClassifier {
    config: ClassifierConfig,
}

impl StorageClassifier {
    /// Create a new classifier with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom config
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_physical(&self, disk: Option<&Disk>) -> bool {
        disk.is_some_and(|d| d.disk_type == DiskType::Physical)
    }

    /// True for every virtual disk, including RAIDs, logical volumes and bcaches
    pub fn is_virtual(&self, disk: Option<&Disk>) -> bool {
        disk.is_some_and(|d| d.disk_type == DiskType::Virtual)
    }

    pub fn is_logical_volume(&self, disk: Option<&Disk>) -> bool {
        logical_kind(disk) == Some(LogicalKind::LogicalVolume)
    }

    pub fn is_raid(&self, disk: Option<&Disk>) -> bool {
        matches!(logical_kind(disk), Some(LogicalKind::Raid(_)))
    }

    pub fn is_bcache(&self, disk: Option<&Disk>) -> bool {
        logical_kind(disk) == Some(LogicalKind::Bcache)
    }

    pub fn is_cache_set(&self, disk: Option<&Disk>) -> bool {
        disk.is_some_and(|d| d.disk_type == DiskType::CacheSet)
    }

    pub fn is_volume_group(&self, disk: Option<&Disk>) -> bool {
        disk.is_some_and(|d| d.disk_type == DiskType::VolumeGroup)
    }

    pub fn is_partition(&self, device: Option<StorageDevice<'_>>) -> bool {
        matches!(device, Some(StorageDevice::Partition(_)))
    }

    /// Whether a filesystem is a VMFS datastore
    pub fn is_datastore(&self, fs: Option<&Filesystem>) -> bool {
        fs.is_some_and(|fs| fs.fstype == self.config.datastore_fstype)
    }

    /// Whether a filesystem is mounted. The reserved mount point does not count.
    pub fn is_mounted(&self, fs: Option<&Filesystem>) -> bool {
        fs.is_some_and(Filesystem::is_mounted)
    }

    /// Whether a filesystem occupies space on its device
    pub fn uses_storage(&self, fs: Option<&Filesystem>) -> bool {
        fs.is_some_and(|fs| {
            !self
                .config
                .non_storage_fstypes
                .iter()
                .any(|fstype| *fstype == fs.fstype)
        })
    }

    pub fn can_be_formatted(&self, fs: Option<&Filesystem>) -> bool {
        fs.is_some_and(|fs| fs.is_format_fstype)
    }

    /// Whether a disk can still be assigned to something
    pub fn disk_available(&self, disk: Option<&Disk>) -> bool {
        match disk {
            Some(d) => !self.is_cache_set(disk) && !self.is_mounted(d.filesystem.as_ref()),
            None => false,
        }
    }

    pub fn partition_available(&self, partition: Option<&Partition>) -> bool {
        partition.is_some_and(|p| !self.is_mounted(p.filesystem.as_ref()))
    }

    /// Whether a new partition can be added to a disk.
    ///
    /// Physical disks, plain virtual disks and RAIDs qualify when they carry no
    /// whole-disk filesystem and have room for at least one partition.
    pub fn can_be_partitioned(&self, disk: Option<&Disk>) -> bool {
        let Some(d) = disk else {
            return false;
        };
        let partitionable_type = match d.disk_type {
            DiskType::Physical => true,
            DiskType::Virtual => matches!(
                d.logical_kind(),
                Some(LogicalKind::PlainVirtual | LogicalKind::Raid(_))
            ),
            DiskType::VolumeGroup | DiskType::CacheSet | DiskType::Iscsi => false,
        };
        partitionable_type
            && d.filesystem.is_none()
            && d.available_size > self.config.min_partition_size
    }

    /// Whether a logical volume can be carved out of a volume group
    pub fn can_create_logical_volume(&self, disk: Option<&Disk>) -> bool {
        let Some(d) = disk else {
            return false;
        };
        d.disk_type == DiskType::VolumeGroup
            && !self.is_mounted(d.filesystem.as_ref())
            && d.available_size > self.config.min_partition_size
    }

    /// A volume group can be removed once nothing is allocated from it, any
    /// other disk once it has no partitions.
    pub fn can_be_deleted(&self, disk: Option<&Disk>) -> bool {
        match disk {
            Some(d) if d.disk_type == DiskType::VolumeGroup => d.used_size == 0,
            Some(d) => d.partitions.is_empty(),
            None => false,
        }
    }

    /// Run every check against a disk or partition
    pub fn report(&self, device: StorageDevice<'_>) -> DeviceReport {
        let fs = device.filesystem();
        let (available, disk) = match device {
            StorageDevice::Disk(d) => (self.disk_available(Some(d)), Some(d)),
            StorageDevice::Partition(p) => (self.partition_available(Some(p)), None),
        };

        DeviceReport {
            id: device.unique_id(),
            name: device.name().to_string(),
            label: format_type(Some(device), false),
            size: format_size(Some(device.size())),
            size_bytes: device.size(),
            available,
            mounted: self.is_mounted(fs),
            formattable: self.can_be_formatted(fs),
            uses_storage: self.uses_storage(fs),
            datastore: self.is_datastore(fs),
            can_be_partitioned: self.can_be_partitioned(disk),
            can_create_logical_volume: self.can_create_logical_volume(disk),
            can_be_deleted: self.can_be_deleted(disk),
        }
    }
}

fn logical_kind(disk: Option<&Disk>) -> Option<LogicalKind> {
    disk.and_then(Disk::logical_kind)
}
