use std::path::PathBuf;
use std::process::ExitStatus;

/// The only way parsing a status report fails outright.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported monit output, banner not recognized: {line:?}")]
    MalformedBanner { line: String },
}

/// Failure to obtain a status report from the monit binary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to execute {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} status timed out after {timeout_secs}s", .path.display())]
    TimedOut { path: PathBuf, timeout_secs: u64 },

    #[error("{} status exited with {status} (output: {output})", .path.display())]
    Failed {
        path: PathBuf,
        status: ExitStatus,
        output: String,
    },

    #[error("failed to parse monit output: {0}")]
    Parse(#[from] ParseError),
}

/// Failure to load the BOSH instance spec.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("cannot read instance spec file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse instance spec file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
