use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use prometheus::{Registry, TextEncoder};
use tracing::{debug, error};

use crate::metrics::ExporterMetrics;
use crate::monit::MonitFetcher;
use crate::system::Collector;

pub struct Exporter {
    registry: Registry,
    metrics: ExporterMetrics,
    monit: MonitFetcher,
    host: Arc<Mutex<Collector>>,
    scrape_lock: tokio::sync::Mutex<()>,
}

impl Exporter {
    pub fn new(
        metrics: ExporterMetrics,
        monit: MonitFetcher,
        host: Collector,
    ) -> prometheus::Result<Self> {
        let registry = Registry::new();
        metrics.register(&registry)?;
        Ok(Exporter {
            registry,
            metrics,
            monit,
            host: Arc::new(Mutex::new(host)),
            scrape_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Refreshes every gauge group and returns the text exposition.
    ///
    /// A failed fetch leaves that group's previous values in place.
    pub async fn scrape(&self) -> prometheus::Result<String> {
        let _guard = self.scrape_lock.lock().await;
        let started = Instant::now();

        self.metrics.base.emit();

        match self.monit.fetch().await {
            Ok(report) => self.metrics.monit.emit(&report),
            Err(e) => error!(
                error = %e,
                "Failed to fetch monit status, monit metrics won't be updated"
            ),
        }

        let host = Arc::clone(&self.host);
        let snapshot = tokio::task::spawn_blocking(move || {
            host.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .refresh()
        })
        .await;
        match snapshot {
            Ok(snapshot) => self.metrics.host.emit(&snapshot),
            Err(e) => error!(
                error = %e,
                "Failed to fetch system stat, system metrics won't be updated"
            ),
        }

        debug!(
            duration_ms = started.elapsed().as_millis() as u64,
            "scrape completed"
        );
        self.render()
    }

    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bosh::InstanceSpec;
    use crate::metrics::MetricsContext;

    fn exporter(monit_path: &str) -> Exporter {
        let metrics = ExporterMetrics::new(
            "boshi_exporter",
            "test",
            &MetricsContext::default(),
            &InstanceSpec::default(),
        )
        .unwrap();
        Exporter::new(metrics, MonitFetcher::new(monit_path), Collector::default()).unwrap()
    }

    #[tokio::test]
    async fn scrape_survives_missing_monit() {
        let exporter = exporter("/does/not/exist");
        let text = exporter.scrape().await.unwrap();
        assert!(text.contains("boshi_build_info"));
        assert!(text.contains("boshi_system_memory_virtual_size_bytes"));
        assert!(!text.contains("boshi_monit_process_uptime_seconds{"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn scrape_exports_monit_processes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monit");
        std::fs::write(
            &path,
            "#!/bin/sh\ncat <<'EOF'\nThe Monit daemon 5.2.5 uptime: 1h\n\nProcess 'nginx'\n  status  running\n  pid     42\nEOF\n",
        )
        .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let exporter = exporter(path.to_str().unwrap());
        let text = exporter.scrape().await.unwrap();
        assert!(text.contains("process_name=\"nginx\""));
        assert!(text.contains("boshi_monit_daemon_info"));
        assert!(text.contains("version=\"5.2.5\""));
    }
}
