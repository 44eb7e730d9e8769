//! Domain Models - Machine storage snapshot records
//!
//! These records mirror the machine details published by the fleet manager.
//! They are read-only snapshots: nothing in this crate mutates them.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mount point the fleet manager uses for filesystems that are reserved
/// but not actually mounted.
pub const RESERVED_MOUNT_POINT: &str = "RESERVED";

// =============================================================================
// Disk Types
// =============================================================================

/// Type of a top-level block device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DiskType {
    #[serde(rename = "physical")]
    Physical,
    #[serde(rename = "virtual")]
    Virtual,
    #[serde(rename = "lvm-vg")]
    VolumeGroup,
    #[serde(rename = "cache-set")]
    CacheSet,
    #[serde(rename = "iscsi")]
    Iscsi,
}

impl DiskType {
    /// Wire tag of this disk type
    pub fn as_str(&self) -> &'static str {
        match self {
            DiskType::Physical => "physical",
            DiskType::Virtual => "virtual",
            DiskType::VolumeGroup => "lvm-vg",
            DiskType::CacheSet => "cache-set",
            DiskType::Iscsi => "iscsi",
        }
    }
}

impl std::fmt::Display for DiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RAID level of a software RAID device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RaidLevel {
    Raid0,
    Raid1,
    Raid5,
    Raid6,
    Raid10,
}

impl std::fmt::Display for RaidLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaidLevel::Raid0 => write!(f, "0"),
            RaidLevel::Raid1 => write!(f, "1"),
            RaidLevel::Raid5 => write!(f, "5"),
            RaidLevel::Raid6 => write!(f, "6"),
            RaidLevel::Raid10 => write!(f, "10"),
        }
    }
}

/// Type of the filesystem group a virtual disk is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ParentType {
    #[serde(rename = "lvm-vg")]
    VolumeGroup,
    #[serde(rename = "bcache")]
    Bcache,
    #[serde(rename = "raid-0")]
    Raid0,
    #[serde(rename = "raid-1")]
    Raid1,
    #[serde(rename = "raid-5")]
    Raid5,
    #[serde(rename = "raid-6")]
    Raid6,
    #[serde(rename = "raid-10")]
    Raid10,
    /// Any group type not listed above; the disk reads as plain virtual
    #[serde(other)]
    Unknown,
}

impl ParentType {
    /// RAID level, if this parent is a RAID array
    pub fn raid_level(&self) -> Option<RaidLevel> {
        match self {
            ParentType::Raid0 => Some(RaidLevel::Raid0),
            ParentType::Raid1 => Some(RaidLevel::Raid1),
            ParentType::Raid5 => Some(RaidLevel::Raid5),
            ParentType::Raid6 => Some(RaidLevel::Raid6),
            ParentType::Raid10 => Some(RaidLevel::Raid10),
            ParentType::VolumeGroup | ParentType::Bcache | ParentType::Unknown => None,
        }
    }
}

/// What a virtual disk actually is, resolved from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKind {
    PlainVirtual,
    Raid(RaidLevel),
    LogicalVolume,
    Bcache,
}

// =============================================================================
// Filesystem
// =============================================================================

/// Filesystem placed on a disk or partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Filesystem {
    /// Filesystem type (e.g. ext4, fat32, vmfs6)
    pub fstype: String,
    /// Mount point; empty when unmounted
    #[serde(default)]
    pub mount_point: String,
    /// Mount options
    #[serde(default)]
    pub mount_options: Option<String>,
    /// Whether the fstype is one that can be formatted and mounted
    #[serde(default)]
    pub is_format_fstype: bool,
}

impl Filesystem {
    /// Whether the mount point is the reserved sentinel
    pub fn is_reserved(&self) -> bool {
        self.mount_point == RESERVED_MOUNT_POINT
    }

    /// Whether the filesystem is mounted somewhere real
    pub fn is_mounted(&self) -> bool {
        !self.mount_point.is_empty() && !self.is_reserved()
    }
}

// =============================================================================
// Partition
// =============================================================================

/// Literal type tag carried by partition records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    Partition,
    Vmfs6,
}

impl PartitionKind {
    /// Wire tag of this partition kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionKind::Partition => "partition",
            PartitionKind::Vmfs6 => "vmfs6",
        }
    }
}

/// A partition of a disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Partition {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: PartitionKind,
    #[serde(default)]
    pub name: String,
    /// Size in bytes
    pub size: u64,
    #[serde(default)]
    pub filesystem: Option<Filesystem>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub used_for: String,
}

// =============================================================================
// Disk
// =============================================================================

/// Reference to the filesystem group a virtual disk belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiskParent {
    pub id: u64,
    #[serde(rename = "type")]
    pub parent_type: ParentType,
    #[serde(default)]
    pub uuid: String,
}

/// A top-level block device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Disk {
    pub id: u64,
    #[serde(rename = "type")]
    pub disk_type: DiskType,
    #[serde(default)]
    pub name: String,
    /// Total size in bytes
    pub size: u64,
    /// Bytes not yet allocated to partitions or logical volumes
    #[serde(default)]
    pub available_size: u64,
    /// Bytes allocated to partitions or logical volumes
    #[serde(default)]
    pub used_size: u64,
    #[serde(default)]
    pub filesystem: Option<Filesystem>,
    #[serde(default)]
    pub partitions: Vec<Partition>,
    #[serde(default)]
    pub parent: Option<DiskParent>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// NUMA node of a physical disk
    #[serde(default)]
    pub numa_node: Option<u32>,
    /// NUMA nodes spanned by a virtual disk or volume group
    #[serde(default)]
    pub numa_nodes: Option<Vec<u32>>,
    #[serde(default)]
    pub is_boot: bool,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub firmware_version: String,
    /// Storage test result code
    #[serde(default)]
    pub test_status: Option<i32>,
}

impl Disk {
    /// Create a disk with the given type and size and everything else empty
    pub fn new(id: u64, disk_type: DiskType, size: u64) -> Self {
        Self {
            id,
            disk_type,
            name: String::new(),
            size,
            available_size: size,
            used_size: 0,
            filesystem: None,
            partitions: Vec::new(),
            parent: None,
            tags: Vec::new(),
            numa_node: None,
            numa_nodes: None,
            is_boot: false,
            model: String::new(),
            serial: String::new(),
            firmware_version: String::new(),
            test_status: None,
        }
    }

    /// Resolve what a virtual disk is built from.
    ///
    /// Returns `None` for anything that is not a virtual disk.
    pub fn logical_kind(&self) -> Option<LogicalKind> {
        if self.disk_type != DiskType::Virtual {
            return None;
        }
        let kind = match self.parent.as_ref().map(|p| p.parent_type) {
            Some(ParentType::VolumeGroup) => LogicalKind::LogicalVolume,
            Some(ParentType::Bcache) => LogicalKind::Bcache,
            Some(parent) => match parent.raid_level() {
                Some(level) => LogicalKind::Raid(level),
                None => LogicalKind::PlainVirtual,
            },
            None => LogicalKind::PlainVirtual,
        };
        Some(kind)
    }

    /// NUMA nodes this disk is attached to, whichever field carries them
    pub fn numa_nodes(&self) -> Vec<u32> {
        match (&self.numa_nodes, self.numa_node) {
            (Some(nodes), _) => nodes.clone(),
            (None, Some(node)) => vec![node],
            (None, None) => Vec::new(),
        }
    }
}

// =============================================================================
// Storage Device
// =============================================================================

/// A row of a machine's storage: either a disk or one of its partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDevice<'a> {
    Disk(&'a Disk),
    Partition(&'a Partition),
}

impl<'a> StorageDevice<'a> {
    pub fn id(&self) -> u64 {
        match self {
            StorageDevice::Disk(disk) => disk.id,
            StorageDevice::Partition(partition) => partition.id,
        }
    }

    /// Wire type tag of the device
    pub fn type_tag(&self) -> &'static str {
        match self {
            StorageDevice::Disk(disk) => disk.disk_type.as_str(),
            StorageDevice::Partition(partition) => partition.kind.as_str(),
        }
    }

    /// Display key unique within one machine's storage, `{type}-{id}`.
    ///
    /// Disk and partition ids overlap, the type tag keeps them apart.
    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.type_tag(), self.id())
    }

    pub fn name(&self) -> &'a str {
        match self {
            StorageDevice::Disk(disk) => &disk.name,
            StorageDevice::Partition(partition) => &partition.name,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            StorageDevice::Disk(disk) => disk.size,
            StorageDevice::Partition(partition) => partition.size,
        }
    }

    pub fn filesystem(&self) -> Option<&'a Filesystem> {
        match self {
            StorageDevice::Disk(disk) => disk.filesystem.as_ref(),
            StorageDevice::Partition(partition) => partition.filesystem.as_ref(),
        }
    }

    pub fn tags(&self) -> &'a [String] {
        match self {
            StorageDevice::Disk(disk) => &disk.tags,
            StorageDevice::Partition(partition) => &partition.tags,
        }
    }
}

impl<'a> From<&'a Disk> for StorageDevice<'a> {
    fn from(disk: &'a Disk) -> Self {
        StorageDevice::Disk(disk)
    }
}

impl<'a> From<&'a Partition> for StorageDevice<'a> {
    fn from(partition: &'a Partition) -> Self {
        StorageDevice::Partition(partition)
    }
}

// =============================================================================
// Machine
// =============================================================================

/// Lifecycle status of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    New,
    Commissioning,
    FailedCommissioning,
    Missing,
    Ready,
    Reserved,
    Deployed,
    Retired,
    Broken,
    Deploying,
    Allocated,
    FailedDeployment,
    Releasing,
    FailedReleasing,
    DiskErasing,
    FailedDiskErasing,
    RescueMode,
    EnteringRescueMode,
    FailedEnteringRescueMode,
    ExitingRescueMode,
    FailedExitingRescueMode,
    Testing,
    FailedTesting,
}

impl NodeStatus {
    /// Map a numeric status code from the fleet manager
    pub fn from_code(code: u32) -> Result<Self> {
        let status = match code {
            0 => NodeStatus::New,
            1 => NodeStatus::Commissioning,
            2 => NodeStatus::FailedCommissioning,
            3 => NodeStatus::Missing,
            4 => NodeStatus::Ready,
            5 => NodeStatus::Reserved,
            6 => NodeStatus::Deployed,
            7 => NodeStatus::Retired,
            8 => NodeStatus::Broken,
            9 => NodeStatus::Deploying,
            10 => NodeStatus::Allocated,
            11 => NodeStatus::FailedDeployment,
            12 => NodeStatus::Releasing,
            13 => NodeStatus::FailedReleasing,
            14 => NodeStatus::DiskErasing,
            15 => NodeStatus::FailedDiskErasing,
            16 => NodeStatus::RescueMode,
            17 => NodeStatus::EnteringRescueMode,
            18 => NodeStatus::FailedEnteringRescueMode,
            19 => NodeStatus::ExitingRescueMode,
            20 => NodeStatus::FailedExitingRescueMode,
            21 => NodeStatus::Testing,
            22 => NodeStatus::FailedTesting,
            _ => return Err(Error::UnknownNodeStatus { code }),
        };
        Ok(status)
    }
}

/// Filesystem type a machine's OS can format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SupportedFilesystem {
    pub key: String,
    pub ui: String,
}

/// Storage-relevant part of a machine's details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Machine {
    pub system_id: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub osystem: String,
    pub status_code: u32,
    #[serde(default)]
    pub disks: Vec<Disk>,
    #[serde(default)]
    pub supported_filesystems: Vec<SupportedFilesystem>,
}

impl Machine {
    /// Parse a machine snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the machine's lifecycle status
    pub fn status(&self) -> Result<NodeStatus> {
        NodeStatus::from_code(self.status_code)
    }

    /// Every disk and partition of the machine, disks first then their partitions
    pub fn storage_devices(&self) -> impl Iterator<Item = StorageDevice<'_>> {
        self.disks.iter().flat_map(|disk| {
            std::iter::once(StorageDevice::Disk(disk))
                .chain(disk.partitions.iter().map(StorageDevice::Partition))
        })
    }
}
