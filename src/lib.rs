//! Machine Storage - Storage topology classification
//!
//! Classifies the disks, partitions and filesystems of a bare-metal or VM
//! machine and decides which storage actions each of them allows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Machine snapshot (JSON)                     │
//! └────────────────────────────────┬────────────────────────────────┘
//!                                  │
//!                      ┌───────────┴───────────┐
//!                      │    Domain models      │
//!                      │ Disk / Partition / Fs │
//!                      └───────────┬───────────┘
//!                                  │
//! ┌────────────────────────────────┴────────────────────────────────┐
//! │                          Storage                                 │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐  │
//! │  │   Classifier    │  │   Formatting    │  │    Available    │  │
//! │  │  (predicates)   │  │  (size / type)  │  │ (rows/actions)  │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Snapshot records
//! - [`storage`]: Classification, formatting and availability
//! - [`error`]: Error types and handling

pub mod domain;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use domain::models::{
    Disk, DiskParent, DiskType, Filesystem, LogicalKind, Machine, NodeStatus, ParentType,
    Partition, PartitionKind, RaidLevel, StorageDevice, SupportedFilesystem,
    RESERVED_MOUNT_POINT,
};

pub use error::{Error, Result};

pub use storage::{
    available_storage, disk_actions, format_size, format_type, partition_actions,
    ActionLink, ClassifierConfig, DeviceReport, StorageAction, StorageClassifier, StorageRow,
    MIN_PARTITION_SIZE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
