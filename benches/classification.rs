//! Benchmark for storage classification
//!
//! A large machine: 256 disks of mixed kinds with 8 partitions each.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use machine_storage::{
    available_storage, format_size, Disk, DiskParent, DiskType, Filesystem, Machine,
    ParentType, Partition, PartitionKind, StorageClassifier,
};

fn make_machine(disk_count: u64) -> Machine {
    let parents = [
        None,
        Some(ParentType::VolumeGroup),
        Some(ParentType::Raid5),
        Some(ParentType::Bcache),
    ];

    let disks = (0..disk_count)
        .map(|i| {
            let disk_type = match i % 5 {
                0 | 1 => DiskType::Physical,
                2 => DiskType::Virtual,
                3 => DiskType::VolumeGroup,
                _ => DiskType::CacheSet,
            };
            let mut disk = Disk::new(i, disk_type, 1_000_000_000_000);
            disk.name = format!("disk{}", i);
            if disk_type == DiskType::Virtual {
                disk.parent = parents[(i as usize / 5) % parents.len()].map(|parent_type| {
                    DiskParent {
                        id: i + 10_000,
                        parent_type,
                        uuid: format!("uuid-{}", i),
                    }
                });
            }
            disk.partitions = (0..8)
                .map(|p| Partition {
                    id: i * 8 + p,
                    kind: if p == 7 { PartitionKind::Vmfs6 } else { PartitionKind::Partition },
                    name: format!("disk{}-part{}", i, p),
                    size: 100_000_000_000,
                    filesystem: Some(Filesystem {
                        fstype: if p == 7 { "vmfs6" } else { "ext4" }.to_string(),
                        mount_point: if p % 2 == 0 { format!("/mnt/{}", p) } else { String::new() },
                        mount_options: None,
                        is_format_fstype: true,
                    }),
                    tags: vec![],
                    used_for: String::new(),
                })
                .collect();
            disk
        })
        .collect();

    Machine {
        system_id: "bench".to_string(),
        hostname: "bench.local".to_string(),
        osystem: "ubuntu".to_string(),
        status_code: 4,
        disks,
        supported_filesystems: vec![],
    }
}

fn bench_available_storage(c: &mut Criterion) {
    let mut group = c.benchmark_group("available_storage");
    let machine = make_machine(256);
    let classifier = StorageClassifier::new();
    group.throughput(Throughput::Elements(machine.disks.len() as u64));

    group.bench_function("256_disks", |b| {
        b.iter(|| available_storage(black_box(&classifier), black_box(&machine)));
    });

    group.finish();
}

fn bench_classify_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let machine = make_machine(256);
    let classifier = StorageClassifier::new();
    group.throughput(Throughput::Elements(machine.storage_devices().count() as u64));

    group.bench_function("report_all_devices", |b| {
        b.iter(|| {
            machine
                .storage_devices()
                .map(|device| classifier.report(black_box(device)))
                .count()
        });
    });

    group.finish();
}

fn bench_format_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    group.throughput(Throughput::Elements(1));

    group.bench_function("format_size", |b| {
        let mut bytes = 1u64;
        b.iter(|| {
            bytes = bytes.wrapping_mul(31).wrapping_add(17);
            format_size(black_box(Some(bytes)))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_available_storage,
    bench_classify_report,
    bench_format_size,
);
criterion_main!(benches);
