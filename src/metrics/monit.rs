use std::collections::HashMap;

use chrono::{DateTime, Utc};
use prometheus::core::Collector;
use prometheus::{Gauge, GaugeVec};

use super::{GaugeFactory, MetricGroup, boxed};
use crate::monit::model::{ParsedReport, percent_to_ratio};

const PROCESS_NAME_LABEL: &str = "process_name";
const MONITORING_STATUS_LABEL: &str = "monitoring_status";
const PROCESS_STATUS_LABEL: &str = "process_status";
const PROCESS_PID_LABEL: &str = "process_pid";
const PROCESS_PARENT_PID_LABEL: &str = "process_parent_pid";
const VERSION_LABEL: &str = "version";
const STATUS_LABEL: &str = "status";

/// Gauges for the monit daemon, its processes and its system record.
pub struct MonitMetrics {
    pub process_status_info: GaugeVec,
    pub process_uptime: GaugeVec,
    pub process_children: GaugeVec,
    pub process_memory_used_bytes: GaugeVec,
    pub process_memory_used_bytes_total: GaugeVec,
    pub process_memory_usage_ratio: GaugeVec,
    pub process_memory_usage_ratio_total: GaugeVec,
    pub process_cpu_usage_ratio: GaugeVec,
    pub process_cpu_usage_ratio_total: GaugeVec,
    pub process_collected_timestamp: GaugeVec,

    pub daemon_info: GaugeVec,
    pub daemon_uptime: Gauge,

    pub system_status_info: GaugeVec,
    pub system_load1: Gauge,
    pub system_load5: Gauge,
    pub system_load15: Gauge,
    pub system_cpu_user_ratio: Gauge,
    pub system_cpu_system_ratio: Gauge,
    pub system_cpu_iowait_ratio: Gauge,
    pub system_memory_used_bytes: Gauge,
    pub system_memory_usage_ratio: Gauge,
    pub system_swap_used_bytes: Gauge,
    pub system_swap_usage_ratio: Gauge,
    pub system_collected_timestamp: Gauge,
}

impl MonitMetrics {
    pub fn new(namespace: &str, instance_labels: HashMap<String, String>) -> prometheus::Result<Self> {
        let process = GaugeFactory::new(namespace, "monit_process", instance_labels.clone());
        let monit = GaugeFactory::new(namespace, "monit", instance_labels);
        let min = &[PROCESS_NAME_LABEL, PROCESS_PID_LABEL];
        let full = &[
            PROCESS_NAME_LABEL,
            MONITORING_STATUS_LABEL,
            PROCESS_STATUS_LABEL,
            PROCESS_PID_LABEL,
            PROCESS_PARENT_PID_LABEL,
        ];

        Ok(MonitMetrics {
            process_status_info: process.gauge_vec(
                "status_info",
                "Monit process and monitoring status information",
                full,
            )?,
            process_uptime: process.gauge_vec(
                "uptime_seconds",
                "Monit process uptime since last start (seconds)",
                min,
            )?,
            process_children: process.gauge_vec("children_count", "Number of child processes", min)?,
            process_memory_used_bytes: process.gauge_vec(
                "memory_used_bytes",
                "Process memory used in bytes",
                min,
            )?,
            process_memory_used_bytes_total: process.gauge_vec(
                "memory_used_bytes_total",
                "Total process (with subprocesses) memory used in bytes",
                min,
            )?,
            process_memory_usage_ratio: process.gauge_vec(
                "memory_usage_ratio",
                "Process memory usage fraction (1=100%)",
                min,
            )?,
            process_memory_usage_ratio_total: process.gauge_vec(
                "memory_usage_ratio_total",
                "Total process (with subprocesses) memory usage fraction (1=100%)",
                min,
            )?,
            process_cpu_usage_ratio: process.gauge_vec(
                "cpu_usage_ratio",
                "Process CPU usage fraction (1=100%)",
                min,
            )?,
            process_cpu_usage_ratio_total: process.gauge_vec(
                "cpu_usage_ratio_total",
                "Total process (with subprocesses) CPU usage fraction (1=100%)",
                min,
            )?,
            process_collected_timestamp: process.gauge_vec(
                "collected_timestamp_seconds",
                "Data collection time as Unix timestamp (seconds)",
                min,
            )?,

            daemon_info: monit.gauge_vec("daemon_info", "Monit daemon information", &[VERSION_LABEL])?,
            daemon_uptime: monit.gauge("daemon_uptime_seconds", "Monit daemon uptime (seconds)")?,

            system_status_info: monit.gauge_vec(
                "system_status_info",
                "Monit system status information",
                &[MONITORING_STATUS_LABEL, STATUS_LABEL],
            )?,
            system_load1: monit.gauge("system_load1", "1-minute load average reported by monit")?,
            system_load5: monit.gauge("system_load5", "5-minute load average reported by monit")?,
            system_load15: monit.gauge("system_load15", "15-minute load average reported by monit")?,
            system_cpu_user_ratio: monit.gauge(
                "system_cpu_user_ratio",
                "CPU time fraction in user mode reported by monit (1=100%)",
            )?,
            system_cpu_system_ratio: monit.gauge(
                "system_cpu_system_ratio",
                "CPU time fraction in kernel mode reported by monit (1=100%)",
            )?,
            system_cpu_iowait_ratio: monit.gauge(
                "system_cpu_iowait_ratio",
                "CPU time fraction waiting for I/O reported by monit (1=100%)",
            )?,
            system_memory_used_bytes: monit.gauge(
                "system_memory_used_bytes",
                "Memory used in bytes reported by monit",
            )?,
            system_memory_usage_ratio: monit.gauge(
                "system_memory_usage_ratio",
                "Memory usage fraction reported by monit (1=100%)",
            )?,
            system_swap_used_bytes: monit.gauge(
                "system_swap_used_bytes",
                "Swap used in bytes reported by monit",
            )?,
            system_swap_usage_ratio: monit.gauge(
                "system_swap_usage_ratio",
                "Swap usage fraction reported by monit (1=100%)",
            )?,
            system_collected_timestamp: monit.gauge(
                "system_collected_timestamp_seconds",
                "System data collection time as Unix timestamp (seconds)",
            )?,
        })
    }

    /// Replaces every monit series with the values from `report`.
    pub fn emit(&self, report: &ParsedReport) {
        self.emit_processes(report);

        self.daemon_info.reset();
        self.daemon_info
            .with_label_values(&[report.header.version.as_str()])
            .set(1.0);
        self.daemon_uptime.set(report.header.uptime.as_secs_f64());

        let system = &report.system;
        self.system_status_info.reset();
        self.system_status_info
            .with_label_values(&[system.monitoring_status.as_str(), system.status.as_str()])
            .set(1.0);
        self.system_load1.set(system.load_avg_1);
        self.system_load5.set(system.load_avg_5);
        self.system_load15.set(system.load_avg_15);
        self.system_cpu_user_ratio
            .set(percent_to_ratio(system.cpu_user_percent));
        self.system_cpu_system_ratio
            .set(percent_to_ratio(system.cpu_system_percent));
        self.system_cpu_iowait_ratio
            .set(percent_to_ratio(system.cpu_iowait_percent));
        self.system_memory_used_bytes
            .set(system.memory_used_bytes as f64);
        self.system_memory_usage_ratio
            .set(percent_to_ratio(system.memory_used_percent));
        self.system_swap_used_bytes.set(system.swap_used_bytes as f64);
        self.system_swap_usage_ratio
            .set(percent_to_ratio(system.swap_used_percent));
        self.system_collected_timestamp
            .set(unix_seconds(system.data_collected));
    }

    fn emit_processes(&self, report: &ParsedReport) {
        for vec in self.process_vecs() {
            vec.reset();
        }

        for (name, status) in &report.processes {
            self.process_status_info
                .with_label_values(&[
                    name.as_str(),
                    status.monitoring_status.as_str(),
                    status.status.as_str(),
                    status.pid.as_str(),
                    status.parent_pid.as_str(),
                ])
                .set(1.0);

            let labels = [name.as_str(), status.pid.as_str()];
            self.process_uptime
                .with_label_values(&labels)
                .set(status.uptime.as_secs_f64());
            self.process_children
                .with_label_values(&labels)
                .set(f64::from(status.children));
            self.process_memory_used_bytes
                .with_label_values(&labels)
                .set(status.memory_bytes as f64);
            self.process_memory_used_bytes_total
                .with_label_values(&labels)
                .set(status.memory_bytes_total as f64);
            self.process_memory_usage_ratio
                .with_label_values(&labels)
                .set(percent_to_ratio(status.memory_percent));
            self.process_memory_usage_ratio_total
                .with_label_values(&labels)
                .set(percent_to_ratio(status.memory_percent_total));
            self.process_cpu_usage_ratio
                .with_label_values(&labels)
                .set(percent_to_ratio(status.cpu_percent));
            self.process_cpu_usage_ratio_total
                .with_label_values(&labels)
                .set(percent_to_ratio(status.cpu_percent_total));
            self.process_collected_timestamp
                .with_label_values(&labels)
                .set(unix_seconds(status.data_collected));
        }
    }

    fn process_vecs(&self) -> [&GaugeVec; 10] {
        [
            &self.process_status_info,
            &self.process_uptime,
            &self.process_children,
            &self.process_memory_used_bytes,
            &self.process_memory_used_bytes_total,
            &self.process_memory_usage_ratio,
            &self.process_memory_usage_ratio_total,
            &self.process_cpu_usage_ratio,
            &self.process_cpu_usage_ratio_total,
            &self.process_collected_timestamp,
        ]
    }
}

fn unix_seconds(time: Option<DateTime<Utc>>) -> f64 {
    time.map(|t| t.timestamp() as f64).unwrap_or(0.0)
}

impl MetricGroup for MonitMetrics {
    fn collectors(&self) -> Vec<Box<dyn Collector>> {
        let mut collectors: Vec<Box<dyn Collector>> =
            self.process_vecs().into_iter().map(boxed).collect();
        collectors.extend([
            boxed(&self.daemon_info),
            boxed(&self.daemon_uptime),
            boxed(&self.system_status_info),
            boxed(&self.system_load1),
            boxed(&self.system_load5),
            boxed(&self.system_load15),
            boxed(&self.system_cpu_user_ratio),
            boxed(&self.system_cpu_system_ratio),
            boxed(&self.system_cpu_iowait_ratio),
            boxed(&self.system_memory_used_bytes),
            boxed(&self.system_memory_usage_ratio),
            boxed(&self.system_swap_used_bytes),
            boxed(&self.system_swap_usage_ratio),
            boxed(&self.system_collected_timestamp),
        ]);
        collectors
    }
}
