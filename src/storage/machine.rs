//! Machine-level storage gates
//!
//! Whether a machine's storage layout may be edited at all, and which
//! layouts its operating system can use.

use crate::domain::models::{Machine, NodeStatus};
use tracing::debug;

/// Operating systems that can be deployed with a custom storage layout
const STORAGE_CONFIG_OSYSTEMS: [&str; 3] = ["centos", "rhel", "ubuntu"];

/// Storage can only be changed on a machine that is ready or allocated.
///
/// A status code the crate does not know counts as not configurable.
pub fn is_machine_storage_configurable(machine: &Machine) -> bool {
    match machine.status() {
        Ok(status) => matches!(status, NodeStatus::Ready | NodeStatus::Allocated),
        Err(err) => {
            debug!(system_id = %machine.system_id, error = %err, "unreadable machine status");
            false
        }
    }
}

pub fn can_os_support_storage_config(machine: &Machine) -> bool {
    STORAGE_CONFIG_OSYSTEMS.contains(&machine.osystem.as_str())
}

/// Bcache and ZFS layouts are Ubuntu only
pub fn can_os_support_bcache_zfs(machine: &Machine) -> bool {
    machine.osystem == "ubuntu"
}
