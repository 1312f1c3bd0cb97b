use std::collections::HashMap;

use prometheus::Gauge;
use prometheus::core::Collector;

use super::{GaugeFactory, MetricGroup, boxed};
use crate::system::{DiskUsage, HostSnapshot};

/// Size, used bytes and usage ratio of one mount.
pub struct DiskGauges {
    pub size: Gauge,
    pub used: Gauge,
    pub usage_ratio: Gauge,
}

impl DiskGauges {
    fn new(factory: &GaugeFactory, disk: &str, description: &str) -> prometheus::Result<Self> {
        Ok(DiskGauges {
            size: factory.gauge(
                &format!("disk_{disk}_size_bytes"),
                &format!("Total bytes on {description}"),
            )?,
            used: factory.gauge(
                &format!("disk_{disk}_used_bytes"),
                &format!("Used bytes on {description}"),
            )?,
            usage_ratio: factory.gauge(
                &format!("disk_{disk}_usage_ratio"),
                &format!("Used {description} fraction (1=100%)"),
            )?,
        })
    }

    fn emit(&self, usage: Option<&DiskUsage>) {
        let Some(usage) = usage else {
            return;
        };
        self.size.set(usage.total_bytes as f64);
        self.used.set(usage.used_bytes as f64);
        self.usage_ratio.set(usage.usage_ratio());
    }
}

/// Host gauges read directly from the OS.
pub struct HostMetrics {
    pub boot_time: Gauge,
    pub uptime: Gauge,
    pub load1: Gauge,
    pub load5: Gauge,
    pub load15: Gauge,
    pub cpu_logical_cores: Gauge,
    pub cpu_physical_cores: Gauge,
    pub cpu_usage_ratio: Gauge,
    pub memory_size: Gauge,
    pub memory_available: Gauge,
    pub memory_used: Gauge,
    pub memory_usage_ratio: Gauge,
    pub swap_size: Gauge,
    pub swap_used: Gauge,
    pub swap_usage_ratio: Gauge,
    pub root_disk: DiskGauges,
    pub data_disk: DiskGauges,
    pub store_disk: DiskGauges,
}

impl HostMetrics {
    pub fn new(namespace: &str, instance_labels: HashMap<String, String>) -> prometheus::Result<Self> {
        let f = GaugeFactory::new(namespace, "system", instance_labels);
        Ok(HostMetrics {
            boot_time: f.gauge("host_boot_time_seconds", "System boot time as Unix timestamp")?,
            uptime: f.gauge("host_uptime_seconds", "Time since system boot in seconds")?,
            load1: f.gauge("load1", "1-minute load average")?,
            load5: f.gauge("load5", "5-minute load average")?,
            load15: f.gauge("load15", "15-minute load average")?,
            cpu_logical_cores: f.gauge("cpu_logical_core_count", "Number of logical CPU cores")?,
            cpu_physical_cores: f.gauge("cpu_physical_core_count", "Number of physical CPU cores")?,
            cpu_usage_ratio: f.gauge("cpu_usage_ratio", "CPU utilization fraction (1=100%)")?,
            memory_size: f.gauge("memory_virtual_size_bytes", "Total virtual memory in bytes")?,
            memory_available: f.gauge(
                "memory_virtual_available_bytes",
                "Available virtual memory in bytes",
            )?,
            memory_used: f.gauge("memory_virtual_used_bytes", "Used virtual memory in bytes")?,
            memory_usage_ratio: f.gauge(
                "memory_virtual_usage_ratio",
                "Used virtual memory fraction (1=100%)",
            )?,
            swap_size: f.gauge("memory_swap_size_bytes", "Total swap memory in bytes")?,
            swap_used: f.gauge("memory_swap_used_bytes", "Used swap memory in bytes")?,
            swap_usage_ratio: f.gauge(
                "memory_swap_usage_ratio",
                "Used swap memory fraction (1=100%)",
            )?,
            root_disk: DiskGauges::new(&f, "root", "root filesystem")?,
            data_disk: DiskGauges::new(&f, "data", "/var/vcap/data")?,
            store_disk: DiskGauges::new(&f, "store", "/var/vcap/store")?,
        })
    }

    pub fn emit(&self, snapshot: &HostSnapshot) {
        self.boot_time.set(snapshot.boot_time_secs as f64);
        self.uptime.set(snapshot.uptime_secs as f64);

        self.load1.set(snapshot.load.one);
        self.load5.set(snapshot.load.five);
        self.load15.set(snapshot.load.fifteen);

        self.cpu_logical_cores.set(snapshot.logical_cores as f64);
        if let Some(physical) = snapshot.physical_cores {
            self.cpu_physical_cores.set(physical as f64);
        }
        self.cpu_usage_ratio.set(snapshot.cpu_usage_ratio);

        self.memory_size.set(snapshot.memory_total as f64);
        self.memory_available.set(snapshot.memory_available as f64);
        self.memory_used.set(snapshot.memory_used as f64);
        self.memory_usage_ratio.set(snapshot.memory_usage_ratio());

        self.swap_size.set(snapshot.swap_total as f64);
        self.swap_used.set(snapshot.swap_used as f64);
        self.swap_usage_ratio.set(snapshot.swap_usage_ratio());

        self.root_disk.emit(snapshot.root_disk.as_ref());
        self.data_disk.emit(snapshot.data_disk.as_ref());
        self.store_disk.emit(snapshot.store_disk.as_ref());
    }
}

impl MetricGroup for HostMetrics {
    fn collectors(&self) -> Vec<Box<dyn Collector>> {
        let mut collectors = vec![
            boxed(&self.boot_time),
            boxed(&self.uptime),
            boxed(&self.load1),
            boxed(&self.load5),
            boxed(&self.load15),
            boxed(&self.cpu_logical_cores),
            boxed(&self.cpu_physical_cores),
            boxed(&self.cpu_usage_ratio),
            boxed(&self.memory_size),
            boxed(&self.memory_available),
            boxed(&self.memory_used),
            boxed(&self.memory_usage_ratio),
            boxed(&self.swap_size),
            boxed(&self.swap_used),
            boxed(&self.swap_usage_ratio),
        ];
        for disk in [&self.root_disk, &self.data_disk, &self.store_disk] {
            collectors.extend([boxed(&disk.size), boxed(&disk.used), boxed(&disk.usage_ratio)]);
        }
        collectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::LoadAverage;

    #[test]
    fn emits_snapshot_and_skips_missing_disks() {
        let metrics = HostMetrics::new("boshi", HashMap::new()).unwrap();
        let snapshot = HostSnapshot {
            uptime_secs: 3600,
            load: LoadAverage {
                one: 0.5,
                five: 0.25,
                fifteen: 0.125,
            },
            memory_total: 4096,
            memory_used: 1024,
            root_disk: Some(DiskUsage {
                total_bytes: 1000,
                used_bytes: 100,
            }),
            ..HostSnapshot::default()
        };
        metrics.emit(&snapshot);

        assert_eq!(metrics.uptime.get(), 3600.0);
        assert_eq!(metrics.load5.get(), 0.25);
        assert_eq!(metrics.memory_usage_ratio.get(), 0.25);
        assert_eq!(metrics.root_disk.used.get(), 100.0);
        assert!((metrics.root_disk.usage_ratio.get() - 0.1).abs() < 1e-9);
        assert_eq!(metrics.data_disk.size.get(), 0.0);
    }
}
