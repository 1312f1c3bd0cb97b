use tracing::debug;

use super::coerce::{
    parse_count, parse_cpu_breakdown, parse_duration, parse_kilobytes, parse_load_average,
    parse_percent, parse_timestamp, parse_usage,
};
use super::model::{ProcessStatus, SystemStatus};

type Setter<T> = fn(&mut T, &str);

const PROCESS_FIELDS: &[(&str, Setter<ProcessStatus>)] = &[
    ("status", |p, v| p.status = v.to_string()),
    ("monitoring status", |p, v| p.monitoring_status = v.to_string()),
    ("pid", |p, v| p.pid = v.to_string()),
    ("parent pid", |p, v| p.parent_pid = v.to_string()),
    ("uptime", |p, v| {
        if let Some(uptime) = parse_duration(v) {
            p.uptime = uptime;
        }
    }),
    ("children", |p, v| p.children = parse_count(v)),
    ("memory kilobytes", |p, v| p.memory_bytes = parse_kilobytes(v)),
    ("memory kilobytes total", |p, v| {
        p.memory_bytes_total = parse_kilobytes(v)
    }),
    ("memory percent", |p, v| p.memory_percent = parse_percent(v)),
    ("memory percent total", |p, v| {
        p.memory_percent_total = parse_percent(v)
    }),
    ("cpu percent", |p, v| p.cpu_percent = parse_percent(v)),
    ("cpu percent total", |p, v| p.cpu_percent_total = parse_percent(v)),
    ("data collected", |p, v| p.data_collected = parse_timestamp(v)),
];

const SYSTEM_FIELDS: &[(&str, Setter<SystemStatus>)] = &[
    ("status", |s, v| s.status = v.to_string()),
    ("monitoring status", |s, v| s.monitoring_status = v.to_string()),
    ("load average", |s, v| match parse_load_average(v) {
        Some([one, five, fifteen]) => {
            s.load_avg_1 = one;
            s.load_avg_5 = five;
            s.load_avg_15 = fifteen;
        }
        None => debug!(value = v, "unparsable load average"),
    }),
    ("cpu", |s, v| match parse_cpu_breakdown(v) {
        Some([user, system, iowait]) => {
            s.cpu_user_percent = user;
            s.cpu_system_percent = system;
            s.cpu_iowait_percent = iowait;
        }
        None => debug!(value = v, "unparsable cpu breakdown"),
    }),
    ("memory usage", |s, v| match parse_usage(v) {
        Some((bytes, percent)) => {
            s.memory_used_bytes = bytes;
            s.memory_used_percent = percent;
        }
        None => debug!(value = v, "unparsable memory usage"),
    }),
    ("swap usage", |s, v| match parse_usage(v) {
        Some((bytes, percent)) => {
            s.swap_used_bytes = bytes;
            s.swap_used_percent = percent;
        }
        None => debug!(value = v, "unparsable swap usage"),
    }),
    ("data collected", |s, v| s.data_collected = parse_timestamp(v)),
];

/// Applies `key`/`value` to `target` through `table`. Unknown keys are
/// ignored; returns whether the key was recognized.
fn apply<T>(table: &[(&str, Setter<T>)], target: &mut T, key: &str, value: &str) -> bool {
    match table.iter().find(|(name, _)| *name == key) {
        Some((_, set)) => {
            set(target, value);
            true
        }
        None => false,
    }
}

pub fn apply_process_field(status: &mut ProcessStatus, key: &str, value: &str) -> bool {
    apply(PROCESS_FIELDS, status, key, value)
}

pub fn apply_system_field(status: &mut SystemStatus, key: &str, value: &str) -> bool {
    apply(SYSTEM_FIELDS, status, key, value)
}
