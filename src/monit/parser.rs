use tracing::debug;

use super::coerce::parse_duration;
use super::fields::{apply_process_field, apply_system_field};
use super::line::{Line, classify};
use super::model::{ParsedReport, ProcessStatus, ReportHeader, SystemStatus};
use crate::error::ParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Process,
    System,
    Other,
}

impl SectionKind {
    /// Kind tokens are matched case-sensitively.
    pub fn from_token(token: &str) -> Self {
        match token {
            "Process" => SectionKind::Process,
            "System" => SectionKind::System,
            _ => SectionKind::Other,
        }
    }
}

#[derive(Debug)]
enum SectionFields {
    Process(ProcessStatus),
    System(SystemStatus),
    Other,
}

/// The section currently being read. Never visible outside this module.
#[derive(Debug)]
struct Section {
    kind: String,
    name: String,
    fields: SectionFields,
}

impl Section {
    fn none() -> Self {
        Section {
            kind: String::new(),
            name: String::new(),
            fields: SectionFields::Other,
        }
    }

    fn open(kind: &str, name: &str) -> Self {
        let fields = match SectionKind::from_token(kind) {
            SectionKind::Process => SectionFields::Process(ProcessStatus::default()),
            SectionKind::System => SectionFields::System(SystemStatus::default()),
            SectionKind::Other => SectionFields::Other,
        };
        Section {
            kind: kind.to_string(),
            name: name.to_string(),
            fields,
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        let known = match &mut self.fields {
            SectionFields::Process(status) => apply_process_field(status, key, value),
            SectionFields::System(status) => apply_system_field(status, key, value),
            SectionFields::Other => return,
        };
        if !known {
            debug!(section = %self.name, key, "ignoring unknown field");
        }
    }

    fn commit(self, report: &mut ParsedReport) {
        if self.name.is_empty() {
            return;
        }
        match self.fields {
            SectionFields::Process(status) => {
                report.processes.insert(self.name, status);
            }
            SectionFields::System(status) => report.system = status,
            SectionFields::Other => {
                debug!(kind = %self.kind, name = %self.name, "skipping section");
            }
        }
    }
}

/// Parses a full `monit status` report.
pub fn parse_report(text: &str) -> Result<ParsedReport, ParseError> {
    let mut lines = text.lines();
    let banner = lines
        .by_ref()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let header = parse_banner(banner).ok_or_else(|| ParseError::MalformedBanner {
        line: banner.to_string(),
    })?;

    let mut report = ParsedReport {
        header,
        ..ParsedReport::default()
    };
    let mut section = Section::none();
    for line in lines {
        match classify(line) {
            Line::SectionHeader { kind, name } => {
                section.commit(&mut report);
                section = Section::open(kind, name);
            }
            Line::Field { key, value } => section.apply(key, value),
            Line::Blank | Line::Unrecognized => {}
        }
    }
    section.commit(&mut report);

    Ok(report)
}

/// `The Monit daemon 5.2.5 uptime: 19h 17m`. An unparsable uptime is zero.
pub fn parse_banner(line: &str) -> Option<ReportHeader> {
    let (_, after) = line.split_once("daemon ")?;
    let (version, rest) = after.trim_start().split_once(char::is_whitespace)?;
    let uptime = rest.trim_start().strip_prefix("uptime:")?;
    Some(ReportHeader {
        version: version.to_string(),
        uptime: parse_duration(uptime).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SAMPLE: &str = "The Monit daemon 5.2.5 uptime: 19h 17m

Process 'gitea'
  status                            running
  monitoring status                 monitored
  pid                               65763
  parent pid                        1
  uptime                            2h 12m
  children                          1
  memory kilobytes                  992
  memory kilobytes total            328184
  memory percent                    0.0%
  memory percent total              16.3%
  cpu percent                       0.0%
  cpu percent total                 0.0%
  data collected                    Tue May 20 10:33:22 2025

Process 'blackbox'
  status                            running
  monitoring status                 monitored
  pid                               65799
  parent pid                        1
  uptime                            2h 12m
  children                          0
  memory kilobytes                  9992
  memory kilobytes total            9992
  memory percent                    0.4%
  memory percent total              0.4%
  cpu percent                       0.4%
  cpu percent total                 0.4%
  data collected                    Tue May 20 10:33:22 2025

System 'system_c9020371-a500-4399-8b2f-765cdf01635e'
  status                            running
  monitoring status                 monitored
  load average                      [0.09] [0.10] [0.04]
  cpu                               2.0%us 4.0%sy 0.1%wa
  memory usage                      227240 kB [23.0%]
  swap usage                        256 kB [0.0%]
  data collected                    Tue May 20 10:33:22 2025
";

    #[test]
    fn parses_processes_and_system() {
        let report = parse_report(SAMPLE).unwrap();
        assert_eq!(report.header.version, "5.2.5");
        assert_eq!(report.header.uptime, Duration::from_secs(19 * 3600 + 17 * 60));
        assert_eq!(report.processes.len(), 2);

        let gitea = report.process("gitea").unwrap();
        assert_eq!(gitea.status, "running");
        assert_eq!(gitea.monitoring_status, "monitored");
        assert_eq!(gitea.pid, "65763");
        assert_eq!(gitea.children, 1);
        assert_eq!(gitea.memory_bytes, 992 * 1024);
        assert!((gitea.memory_percent_total - 16.3).abs() < 1e-6);

        let blackbox = report.process("blackbox").unwrap();
        assert_eq!(blackbox.memory_bytes, 9992 * 1024);
        assert!((blackbox.cpu_percent - 0.4).abs() < 1e-6);

        assert_eq!(report.system.status, "running");
        assert!((report.system.load_avg_5 - 0.10).abs() < 1e-6);
        assert_eq!(report.system.swap_used_bytes, 256 * 1024);
        assert!(report.system.data_collected.is_some());
    }

    #[test]
    fn same_text_parses_to_equal_reports() {
        assert_eq!(parse_report(SAMPLE).unwrap(), parse_report(SAMPLE).unwrap());
    }

    #[test]
    fn later_duplicate_section_wins() {
        let text = "The Monit daemon 5.2.5 uptime: 1m
Process 'x'
  pid     1
  status  running
Process 'x'
  pid     2
";
        let report = parse_report(text).unwrap();
        assert_eq!(report.processes.len(), 1);
        let x = report.process("x").unwrap();
        assert_eq!(x.pid, "2");
        assert_eq!(x.status, "");
    }

    #[test]
    fn unknown_sections_are_skipped() {
        let text = "The Monit daemon 5.2.5 uptime: 1m
File 'foo'
  status  accessible
  permission  644
Process 'nginx'
  status  running
Filesystem 'rootfs'
  status  accessible
System 'box'
  status  running
";
        let report = parse_report(text).unwrap();
        assert!(report.process("foo").is_none());
        assert!(report.process("rootfs").is_none());
        assert_eq!(report.process("nginx").unwrap().status, "running");
        assert_eq!(report.system.status, "running");
    }

    #[test]
    fn banner_only_report_is_empty() {
        let report = parse_report("\n\nThe Monit daemon 5.2.5 uptime: 2d 17h 13m  \n\n").unwrap();
        assert!(report.processes.is_empty());
        assert_eq!(report.system, SystemStatus::default());
        assert_eq!(
            report.header.uptime,
            Duration::from_secs(2 * 86_400 + 17 * 3600 + 13 * 60)
        );
    }

    #[test]
    fn missing_banner_is_fatal() {
        let err = parse_report("Process 'gitea'\n  status  running\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedBanner { ref line } if line == "Process 'gitea'"));
        assert!(parse_report("").is_err());
        assert!(parse_report("monit: cannot read status from the monit daemon").is_err());
    }

    #[test]
    fn fields_before_first_section_are_dropped() {
        let text = "The Monit daemon 5.2.5 uptime: 1m
  status  running
Process 'a'
  status  stopped
";
        let report = parse_report(text).unwrap();
        assert_eq!(report.processes.len(), 1);
        assert_eq!(report.process("a").unwrap().status, "stopped");
        assert_eq!(report.system.status, "");
    }

    #[test]
    fn banner_variants() {
        let header = parse_banner("The Monit daemon 5.2.5 uptime: 0m").unwrap();
        assert_eq!(header.version, "5.2.5");
        assert_eq!(header.uptime, Duration::ZERO);

        let header = parse_banner("The Monit daemon 5.2.5 uptime: later").unwrap();
        assert_eq!(header.uptime, Duration::ZERO);

        assert!(parse_banner("The Monit daemon 5.2.5").is_none());
        assert!(parse_banner("Monit 5.33.0 uptime: 1m").is_none());
    }

    #[test]
    fn section_kind_tokens() {
        assert_eq!(SectionKind::from_token("Process"), SectionKind::Process);
        assert_eq!(SectionKind::from_token("System"), SectionKind::System);
        assert_eq!(SectionKind::from_token("process"), SectionKind::Other);
        assert_eq!(SectionKind::from_token("Program"), SectionKind::Other);
    }
}
