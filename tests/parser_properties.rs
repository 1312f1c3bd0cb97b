use std::collections::HashSet;
use std::time::Duration;

use boshi_exporter::monit::coerce::parse_duration;
use boshi_exporter::monit::parse_report;
use proptest::prelude::*;

const BANNER: &str = "The Monit daemon 5.2.5 uptime: 1h";

fn process_section(name: &str, pid: u32, kilobytes: u64) -> String {
    format!(
        "Process '{name}'\n  status                            running\n  pid                               {pid}\n  memory kilobytes                  {kilobytes}\n\n"
    )
}

proptest! {
    #[test]
    fn duration_tokens_sum(
        d in 0u64..400,
        h in 0u64..24,
        m in 0u64..60,
        s in 0u64..60,
    ) {
        let expected = Duration::from_secs(d * 86_400 + h * 3_600 + m * 60 + s);
        prop_assert_eq!(parse_duration(&format!("{d}d {h}h {m}m {s}s")), Some(expected));
        prop_assert_eq!(parse_duration(&format!("{d}d{h}h{m}m{s}s")), Some(expected));
    }

    #[test]
    fn parsing_is_idempotent(
        sections in prop::collection::vec(
            ("[a-z][a-z0-9_]{0,10}", 1u32..100_000, 0u64..10_000_000),
            0..20,
        ),
    ) {
        let mut text = format!("{BANNER}\n\n");
        for (name, pid, kb) in &sections {
            text.push_str(&process_section(name, *pid, *kb));
        }

        let first = parse_report(&text).unwrap();
        let second = parse_report(&text).unwrap();
        prop_assert_eq!(&first, &second);

        let unique: HashSet<&str> = sections.iter().map(|(name, _, _)| name.as_str()).collect();
        prop_assert_eq!(first.processes.len(), unique.len());
    }

    #[test]
    fn body_lines_never_fail_the_parse(
        lines in prop::collection::vec("[ -~\t]{0,60}", 0..40),
    ) {
        let text = format!("{BANNER}\n{}", lines.join("\n"));
        prop_assert!(parse_report(&text).is_ok());
    }

    #[test]
    fn kilobytes_scale_to_bytes(kb in 0u64..1_000_000_000) {
        let text = format!("{BANNER}\n{}", process_section("p", 1, kb));
        let report = parse_report(&text).unwrap();
        prop_assert_eq!(report.process("p").map(|p| p.memory_bytes), Some(kb * 1024));
    }
}
