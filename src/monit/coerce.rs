use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Parses `2d 17h 13m` style durations. Spaces between tokens are ignored.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    if compact == "0" {
        return Some(Duration::ZERO);
    }

    let mut total_secs: u64 = 0;
    let mut rest = compact.as_str();
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
        if digits_end == 0 {
            return None;
        }
        let value: u64 = rest[..digits_end].parse().ok()?;
        let mut tail = rest[digits_end..].chars();
        let scale = match tail.next()? {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total_secs = total_secs.checked_add(value.checked_mul(scale)?)?;
        rest = tail.as_str();
    }
    Some(Duration::from_secs(total_secs))
}

pub fn parse_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Kilobyte count to bytes.
pub fn parse_kilobytes(text: &str) -> u64 {
    text.trim()
        .parse::<u64>()
        .map(|kb| kb.saturating_mul(1024))
        .unwrap_or(0)
}

/// `16.3%` to `16.3`. The value stays on the 0-100 scale.
pub fn parse_percent(text: &str) -> f64 {
    let text = text.trim();
    text.strip_suffix('%')
        .unwrap_or(text)
        .trim()
        .parse()
        .unwrap_or(0.0)
}

/// Parses `Tue May 20 10:33:22 2025`. The report carries no zone, so the
/// result is taken as UTC. The weekday must be a word but is not checked
/// against the date.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let mut tokens = text.split_whitespace();
    let weekday = tokens.next()?;
    if weekday.len() != 3 || !weekday.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let normalized = tokens.collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT)
        .ok()
        .map(|t| t.and_utc())
}

/// `[0.09] [0.10] [0.04]` to the 1, 5 and 15 minute loads.
pub fn parse_load_average(text: &str) -> Option<[f64; 3]> {
    let mut tokens = text.split_whitespace();
    let mut loads = [0.0; 3];
    for load in &mut loads {
        let token = tokens.next()?;
        *load = token
            .strip_prefix('[')?
            .strip_suffix(']')?
            .parse()
            .ok()?;
    }
    Some(loads)
}

/// `2.0%us 4.0%sy 0.1%wa` to user, system and io-wait percentages.
pub fn parse_cpu_breakdown(text: &str) -> Option<[f64; 3]> {
    let mut tokens = text.split_whitespace();
    let mut values = [0.0; 3];
    for (value, tag) in values.iter_mut().zip(["%us", "%sy", "%wa"]) {
        *value = tokens.next()?.strip_suffix(tag)?.parse().ok()?;
    }
    Some(values)
}

/// `227240 kB [23.0%]` to used bytes and the 0-100 percentage.
pub fn parse_usage(text: &str) -> Option<(u64, f64)> {
    let mut tokens = text.split_whitespace();
    let kb: u64 = tokens.next()?.parse().ok()?;
    if tokens.next()? != "kB" {
        return None;
    }
    let percent = tokens
        .next()?
        .strip_prefix('[')?
        .strip_suffix(']')?
        .strip_suffix('%')?
        .parse()
        .ok()?;
    Some((kb.saturating_mul(1024), percent))
}
