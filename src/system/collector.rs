use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};

use super::snapshot::{DiskUsage, HostSnapshot, LoadAverage};

pub const ROOT_DISK_PATH: &str = "/";
pub const DATA_DISK_PATH: &str = "/var/vcap/data";
pub const STORE_DISK_PATH: &str = "/var/vcap/store";

/// Mount points whose usage is reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskPaths {
    pub root: PathBuf,
    pub data: PathBuf,
    pub store: PathBuf,
}

impl Default for DiskPaths {
    fn default() -> Self {
        DiskPaths {
            root: PathBuf::from(ROOT_DISK_PATH),
            data: PathBuf::from(DATA_DISK_PATH),
            store: PathBuf::from(STORE_DISK_PATH),
        }
    }
}

/// Host resource poller. CPU usage is measured between consecutive refreshes,
/// so the collector is kept alive across scrapes.
pub struct Collector {
    sys: System,
    disks: Disks,
    disk_paths: DiskPaths,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(DiskPaths::default())
    }
}

impl Collector {
    pub fn new(disk_paths: DiskPaths) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        Collector {
            sys,
            disks: Disks::new_with_refreshed_list(),
            disk_paths,
        }
    }

    pub fn refresh(&mut self) -> HostSnapshot {
        let _refresh_span = tracing::debug_span!("system.refresh").entered();

        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.disks.refresh(true);
        self.build_snapshot()
    }

    fn build_snapshot(&self) -> HostSnapshot {
        let load = System::load_average();

        HostSnapshot {
            boot_time_secs: System::boot_time(),
            uptime_secs: System::uptime(),
            load: LoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            logical_cores: self.sys.cpus().len(),
            physical_cores: System::physical_core_count(),
            cpu_usage_ratio: f64::from(self.sys.global_cpu_usage()) / 100.0,
            memory_total: self.sys.total_memory(),
            memory_available: self.sys.available_memory(),
            memory_used: self.sys.used_memory(),
            swap_total: self.sys.total_swap(),
            swap_used: self.sys.used_swap(),
            root_disk: self.disk_usage(&self.disk_paths.root),
            data_disk: self.disk_usage(&self.disk_paths.data),
            store_disk: self.disk_usage(&self.disk_paths.store),
        }
    }

    fn disk_usage(&self, path: &Path) -> Option<DiskUsage> {
        let mounts: Vec<(&Path, u64, u64)> = self
            .disks
            .list()
            .iter()
            .map(|d| (d.mount_point(), d.total_space(), d.available_space()))
            .collect();
        usage_for_mount(&mounts, path)
    }
}

/// Usage of the filesystem holding `path`: the longest mount point it sits under.
fn usage_for_mount(mounts: &[(&Path, u64, u64)], path: &Path) -> Option<DiskUsage> {
    mounts
        .iter()
        .filter(|(mount, _, _)| path.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
        .map(|&(_, total, available)| DiskUsage {
            total_bytes: total,
            used_bytes: total.saturating_sub(available),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_reports_memory_and_cores() {
        let mut collector = Collector::default();
        let snapshot = collector.refresh();
        assert!(snapshot.memory_total > 0);
        assert!(snapshot.logical_cores > 0);
    }

    #[test]
    fn mount_lookup_picks_the_containing_filesystem() {
        let mounts = [
            (Path::new("/"), 100, 40),
            (Path::new("/var/vcap/data"), 50, 50),
        ];
        let root = usage_for_mount(&mounts, Path::new("/")).unwrap();
        assert_eq!(root.total_bytes, 100);
        assert_eq!(root.used_bytes, 60);
        let data = usage_for_mount(&mounts, Path::new("/var/vcap/data")).unwrap();
        assert_eq!(data.used_bytes, 0);
        let store = usage_for_mount(&mounts, Path::new("/var/vcap/store")).unwrap();
        assert_eq!(store.total_bytes, 100);
        let nested = usage_for_mount(&mounts, Path::new("/var/vcap/data/jobs")).unwrap();
        assert_eq!(nested.total_bytes, 50);
        assert!(usage_for_mount(&mounts[1..], Path::new("/var/vcap/store")).is_none());
    }
}
