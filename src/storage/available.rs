//! Available Storage
//!
//! Builds the list of a machine's disks and partitions that can still be
//! assigned, together with the actions each one offers.

use crate::domain::models::{Disk, Machine, Partition, StorageDevice};
use crate::storage::classifier::StorageClassifier;
use crate::storage::format::{format_size, format_type};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Actions
// =============================================================================

/// Action offered on an available disk or partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageAction {
    AddPartition,
    AddLogicalVolume,
    RemoveVolumeGroup,
    RemoveDisk,
    RemovePartition,
    EditPartition,
}

/// An action together with the menu label it is shown under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLink {
    pub action: StorageAction,
    pub label: String,
}

impl ActionLink {
    fn new(action: StorageAction, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
        }
    }
}

/// Actions a disk offers, in menu order
pub fn disk_actions(classifier: &StorageClassifier, disk: &Disk) -> Vec<ActionLink> {
    let mut actions = Vec::new();

    if classifier.can_be_partitioned(Some(disk)) {
        actions.push(ActionLink::new(StorageAction::AddPartition, "Add partition..."));
    }

    if classifier.can_create_logical_volume(Some(disk)) {
        actions.push(ActionLink::new(
            StorageAction::AddLogicalVolume,
            "Add logical volume...",
        ));
    }

    if classifier.can_be_deleted(Some(disk)) {
        if classifier.is_volume_group(Some(disk)) {
            actions.push(ActionLink::new(
                StorageAction::RemoveVolumeGroup,
                "Remove volume group...",
            ));
        } else {
            let disk_type = format_type(Some(StorageDevice::Disk(disk)), true);
            actions.push(ActionLink::new(
                StorageAction::RemoveDisk,
                format!("Remove {}...", disk_type),
            ));
        }
    }

    actions
}

/// Actions every available partition offers
pub fn partition_actions() -> Vec<ActionLink> {
    vec![
        ActionLink::new(StorageAction::RemovePartition, "Remove partition..."),
        ActionLink::new(StorageAction::EditPartition, "Edit partition..."),
    ]
}

// =============================================================================
// Rows
// =============================================================================

/// One disk or partition in the available storage list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRow {
    /// Display key, `{type}-{id}`
    pub id: String,
    pub name: String,
    /// Disk-only columns are `None` for partitions
    pub serial: Option<String>,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub boot: Option<bool>,
    pub size: String,
    pub type_label: String,
    pub numa_nodes: Vec<u32>,
    pub test_status: Option<i32>,
    pub tags: Vec<String>,
    pub actions: Vec<ActionLink>,
}

impl StorageRow {
    fn for_disk(disk: &Disk, actions: Vec<ActionLink>) -> Self {
        let device = StorageDevice::Disk(disk);
        Self {
            id: device.unique_id(),
            name: disk.name.clone(),
            serial: Some(disk.serial.clone()),
            model: Some(disk.model.clone()),
            firmware: Some(disk.firmware_version.clone()),
            boot: Some(disk.is_boot),
            size: format_size(Some(disk.size)),
            type_label: format_type(Some(device), false),
            numa_nodes: disk.numa_nodes(),
            test_status: disk.test_status,
            tags: disk.tags.clone(),
            actions,
        }
    }

    fn for_partition(partition: &Partition, actions: Vec<ActionLink>) -> Self {
        let device = StorageDevice::Partition(partition);
        Self {
            id: device.unique_id(),
            name: partition.name.clone(),
            serial: None,
            model: None,
            firmware: None,
            boot: None,
            size: format_size(Some(partition.size)),
            type_label: format_type(Some(device), false),
            numa_nodes: Vec::new(),
            test_status: None,
            tags: partition.tags.clone(),
            actions,
        }
    }
}

/// Disks and partitions of a machine that are free to use.
///
/// A disk is listed when it is available and not a datastore; its available,
/// non-datastore partitions follow it whether or not the disk itself is listed.
pub fn available_storage(classifier: &StorageClassifier, machine: &Machine) -> Vec<StorageRow> {
    let mut rows = Vec::new();

    for disk in &machine.disks {
        if classifier.disk_available(Some(disk))
            && !classifier.is_datastore(disk.filesystem.as_ref())
        {
            rows.push(StorageRow::for_disk(disk, disk_actions(classifier, disk)));
        } else {
            debug!(disk = %disk.name, id = disk.id, "disk not available");
        }

        for partition in &disk.partitions {
            if classifier.partition_available(Some(partition))
                && !classifier.is_datastore(partition.filesystem.as_ref())
            {
                rows.push(StorageRow::for_partition(partition, partition_actions()));
            } else {
                debug!(partition = %partition.name, id = partition.id, "partition not available");
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DiskParent, DiskType, Filesystem, ParentType, PartitionKind};
    use crate::storage::classifier::MIN_PARTITION_SIZE;

    fn make_disk(id: u64, disk_type: DiskType) -> Disk {
        let mut disk = Disk::new(id, disk_type, 2_000_000_000);
        disk.name = format!("disk{}", id);
        disk
    }

    fn make_partition(id: u64, fs: Option<Filesystem>) -> Partition {
        Partition {
            id,
            kind: PartitionKind::Partition,
            name: format!("part{}", id),
            size: 1_000_000_000,
            filesystem: fs,
            tags: vec!["fast".into()],
            used_for: String::new(),
        }
    }

    fn make_fs(fstype: &str, mount_point: &str) -> Filesystem {
        Filesystem {
            fstype: fstype.into(),
            mount_point: mount_point.into(),
            mount_options: None,
            is_format_fstype: true,
        }
    }

    fn make_machine(disks: Vec<Disk>) -> Machine {
        Machine {
            system_id: "abc123".into(),
            hostname: "node-1".into(),
            osystem: "ubuntu".into(),
            status_code: 4,
            disks,
            supported_filesystems: vec![],
        }
    }

    fn labels(actions: &[ActionLink]) -> Vec<&str> {
        actions.iter().map(|a| a.label.as_str()).collect()
    }

    #[test]
    fn test_physical_disk_actions() {
        let classifier = StorageClassifier::new();
        let disk = make_disk(1, DiskType::Physical);
        assert_eq!(
            labels(&disk_actions(&classifier, &disk)),
            vec!["Add partition...", "Remove physical disk..."]
        );
    }

    #[test]
    fn test_volume_group_actions() {
        let classifier = StorageClassifier::new();
        let mut vg = make_disk(1, DiskType::VolumeGroup);
        vg.available_size = MIN_PARTITION_SIZE + 1;

        let actions = disk_actions(&classifier, &vg);
        assert_eq!(
            actions.iter().map(|a| a.action).collect::<Vec<_>>(),
            vec![StorageAction::AddLogicalVolume, StorageAction::RemoveVolumeGroup]
        );

        vg.used_size = 1000;
        assert_eq!(
            labels(&disk_actions(&classifier, &vg)),
            vec!["Add logical volume..."]
        );
    }

    #[test]
    fn test_logical_volume_actions() {
        let classifier = StorageClassifier::new();
        let mut lv = make_disk(1, DiskType::Virtual);
        lv.parent = Some(DiskParent {
            id: 9,
            parent_type: ParentType::VolumeGroup,
            uuid: "vg".into(),
        });
        assert_eq!(
            labels(&disk_actions(&classifier, &lv)),
            vec!["Remove logical volume..."]
        );
    }

    #[test]
    fn test_partitioned_disk_cannot_be_removed() {
        let classifier = StorageClassifier::new();
        let mut disk = make_disk(1, DiskType::Physical);
        disk.available_size = 0;
        disk.partitions.push(make_partition(2, None));
        assert!(disk_actions(&classifier, &disk).is_empty());
    }

    #[test]
    fn test_available_storage_rows() {
        let classifier = StorageClassifier::new();

        let mut boot = make_disk(1, DiskType::Physical);
        boot.is_boot = true;
        boot.serial = "S1".into();
        boot.model = "ST2000".into();
        boot.numa_node = Some(0);
        boot.partitions = vec![
            make_partition(10, Some(make_fs("ext4", "/"))),
            make_partition(11, Some(make_fs("ext4", ""))),
            make_partition(12, Some(make_fs("vmfs6", ""))),
        ];

        let mut mounted = make_disk(2, DiskType::Physical);
        mounted.filesystem = Some(make_fs("xfs", "/srv"));

        let cache_set = make_disk(3, DiskType::CacheSet);

        let mut datastore = make_disk(4, DiskType::Physical);
        datastore.filesystem = Some(make_fs("vmfs6", ""));

        let free = make_disk(5, DiskType::Physical);

        let machine = make_machine(vec![boot, mounted, cache_set, datastore, free]);
        let rows = available_storage(&classifier, &machine);

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["physical-1", "partition-11", "physical-5"]);

        let disk_row = &rows[0];
        assert_eq!(disk_row.serial.as_deref(), Some("S1"));
        assert_eq!(disk_row.model.as_deref(), Some("ST2000"));
        assert_eq!(disk_row.boot, Some(true));
        assert_eq!(disk_row.size, "2 GB");
        assert_eq!(disk_row.type_label, "Physical");
        assert_eq!(disk_row.numa_nodes, vec![0]);
        // partitions block removal
        assert_eq!(labels(&disk_row.actions), vec!["Add partition..."]);

        let partition_row = &rows[1];
        assert_eq!(partition_row.model, None);
        assert_eq!(partition_row.serial, None);
        assert_eq!(partition_row.boot, None);
        assert_eq!(partition_row.type_label, "Partition");
        assert_eq!(partition_row.tags, vec!["fast"]);
        assert_eq!(
            labels(&partition_row.actions),
            vec!["Remove partition...", "Edit partition..."]
        );
    }

    #[test]
    fn test_empty_machine() {
        let classifier = StorageClassifier::new();
        assert!(available_storage(&classifier, &make_machine(vec![])).is_empty());
    }
}
