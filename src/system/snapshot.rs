#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

impl DiskUsage {
    pub fn usage_ratio(&self) -> f64 {
        ratio(self.used_bytes, self.total_bytes)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostSnapshot {
    pub boot_time_secs: u64,
    pub uptime_secs: u64,
    pub load: LoadAverage,
    pub logical_cores: usize,
    pub physical_cores: Option<usize>,
    /// Global CPU utilization since the previous refresh, 0.0-1.0.
    pub cpu_usage_ratio: f64,
    pub memory_total: u64,
    pub memory_available: u64,
    pub memory_used: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub root_disk: Option<DiskUsage>,
    pub data_disk: Option<DiskUsage>,
    pub store_disk: Option<DiskUsage>,
}

impl HostSnapshot {
    pub fn memory_usage_ratio(&self) -> f64 {
        ratio(self.memory_used, self.memory_total)
    }

    pub fn swap_usage_ratio(&self) -> f64 {
        ratio(self.swap_used, self.swap_total)
    }
}

fn ratio(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64
    }
}
