use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::model::ParsedReport;
use super::parser::parse_report;
use crate::error::FetchError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs `<monit> status` and parses its output.
#[derive(Clone, Debug)]
pub struct MonitFetcher {
    monit_path: PathBuf,
    timeout: Duration,
}

impl MonitFetcher {
    pub fn new(monit_path: impl Into<PathBuf>) -> Self {
        Self {
            monit_path: monit_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch(&self) -> Result<ParsedReport, FetchError> {
        let text = self.run_status().await?;
        Ok(parse_report(&text)?)
    }

    async fn run_status(&self) -> Result<String, FetchError> {
        let child = Command::new(&self.monit_path)
            .arg("status")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(result) => result.map_err(|source| FetchError::Spawn {
                path: self.monit_path.clone(),
                source,
            })?,
            Err(_) => {
                return Err(FetchError::TimedOut {
                    path: self.monit_path.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let combined = format!("{}{}", stdout, stderr);
            return Err(FetchError::Failed {
                path: self.monit_path.clone(),
                status: output.status,
                output: combined.trim().to_string(),
            });
        }
        Ok(stdout)
    }
}
