use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Daemon version and uptime taken from the banner line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportHeader {
    pub version: String,
    pub uptime: Duration,
}

/// One `Process '<name>'` section.
///
/// Percentages stay on the 0-100 scale of the report; byte counts are
/// already converted from kilobytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessStatus {
    pub status: String,
    pub monitoring_status: String,
    pub pid: String,
    pub parent_pid: String,
    pub uptime: Duration,
    pub children: u32,
    pub memory_bytes: u64,
    pub memory_bytes_total: u64,
    pub memory_percent: f64,
    pub memory_percent_total: f64,
    pub cpu_percent: f64,
    pub cpu_percent_total: f64,
    pub data_collected: Option<DateTime<Utc>>,
}

/// The singleton `System '<name>'` section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemStatus {
    pub status: String,
    pub monitoring_status: String,
    pub load_avg_1: f64,
    pub load_avg_5: f64,
    pub load_avg_15: f64,
    pub cpu_user_percent: f64,
    pub cpu_system_percent: f64,
    pub cpu_iowait_percent: f64,
    pub memory_used_bytes: u64,
    pub memory_used_percent: f64,
    pub swap_used_bytes: u64,
    pub swap_used_percent: f64,
    pub data_collected: Option<DateTime<Utc>>,
}

/// Everything one `monit status` run reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedReport {
    pub header: ReportHeader,
    pub processes: HashMap<String, ProcessStatus>,
    pub system: SystemStatus,
}

impl ParsedReport {
    pub fn process(&self, name: &str) -> Option<&ProcessStatus> {
        self.processes.get(name)
    }

    /// Process names in a stable order.
    pub fn process_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.processes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Converts a 0-100 percentage into a 0.0-1.0 ratio.
pub fn percent_to_ratio(percent: f64) -> f64 {
    percent / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_names_are_sorted() {
        let mut report = ParsedReport::default();
        report
            .processes
            .insert("nginx".to_string(), ProcessStatus::default());
        report
            .processes
            .insert("blackbox".to_string(), ProcessStatus::default());
        assert_eq!(report.process_names(), vec!["blackbox", "nginx"]);
        assert!(report.process("nginx").is_some());
        assert!(report.process("missing").is_none());
    }

    #[test]
    fn ratio_from_percent() {
        assert!((percent_to_ratio(16.3) - 0.163).abs() < 1e-9);
        assert_eq!(percent_to_ratio(0.0), 0.0);
    }
}
