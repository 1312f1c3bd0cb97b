use std::path::PathBuf;
use std::sync::Arc;

use boshi_exporter::bosh::load_instance_spec;
use boshi_exporter::config::{self, load_config, load_config_from_path};
use boshi_exporter::exporter::Exporter;
use boshi_exporter::metrics::ExporterMetrics;
use boshi_exporter::monit::MonitFetcher;
use boshi_exporter::system::Collector;
use boshi_exporter::{logging, server};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing::info;

const PROGRAM_NAME: &str = "boshi_exporter";

#[derive(Parser)]
#[command(
    name = "boshi-exporter",
    about = "Prometheus exporter for BOSH instance processes and host resources",
    version
)]
struct Cli {
    /// Path to config file
    #[arg(long, env = "BOSHI_EXPORTER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on for telemetry, `:port` for all interfaces
    #[arg(long = "web.listen-address", env = "BOSHI_EXPORTER_WEB_LISTEN_ADDRESS")]
    listen_address: Option<String>,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", env = "BOSHI_EXPORTER_WEB_TELEMETRY_PATH")]
    telemetry_path: Option<String>,

    /// BOSH instance spec.json
    #[arg(long = "bosh.spec-path", env = "BOSHI_EXPORTER_BOSH_SPEC_PATH")]
    spec_path: Option<PathBuf>,

    /// Monit binary
    #[arg(long = "monit.path", env = "BOSHI_EXPORTER_MONIT_PATH")]
    monit_path: Option<PathBuf>,

    /// Seconds to wait for `monit status`
    #[arg(long = "monit.timeout-secs", env = "BOSHI_EXPORTER_MONIT_TIMEOUT_SECS")]
    monit_timeout_secs: Option<u64>,

    /// Metrics namespace
    #[arg(long = "metrics.namespace", env = "BOSHI_EXPORTER_METRICS_NAMESPACE")]
    namespace: Option<String>,

    /// Environment label value
    #[arg(long = "metrics.environment", env = "BOSHI_EXPORTER_METRICS_ENVIRONMENT")]
    environment: Option<String>,

    /// BOSH director name label value
    #[arg(long = "metrics.bosh-name", env = "BOSHI_EXPORTER_METRICS_BOSH_NAME")]
    bosh_name: Option<String>,

    /// BOSH director UUID label value
    #[arg(long = "metrics.bosh-uuid", env = "BOSHI_EXPORTER_METRICS_BOSH_UUID")]
    bosh_uuid: Option<String>,

    /// Log level: debug, info, warn, error
    #[arg(long = "log.level", env = "BOSHI_EXPORTER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log destination: stdout, stderr or a file path
    #[arg(long = "log.path", env = "BOSHI_EXPORTER_LOG_PATH")]
    log_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    logging::init_logging(&config.log.level, &config.log.path)?;

    let spec = load_instance_spec(&config.bosh.spec_path)?;
    let addr = config
        .web
        .socket_addr()
        .wrap_err_with(|| format!("invalid listen address {:?}", config.web.listen_address))?;

    let metrics = ExporterMetrics::new(
        PROGRAM_NAME,
        env!("CARGO_PKG_VERSION"),
        &config.metrics.context(),
        &spec,
    )?;
    let monit = MonitFetcher::new(&config.monit.path).with_timeout(config.monit.timeout());
    let exporter = Arc::new(Exporter::new(metrics, monit, Collector::default())?);

    info!(
        program = PROGRAM_NAME,
        version = env!("CARGO_PKG_VERSION"),
        listen_address = %addr,
        telemetry_path = %config.web.telemetry_path,
        pid = std::process::id(),
        "Starting application"
    );

    let app = server::router(exporter, &config.web.telemetry_path);
    server::serve(addr, app).await?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref addr) = cli.listen_address {
        config.web.listen_address = addr.clone();
    }
    if let Some(ref path) = cli.telemetry_path {
        config.web.telemetry_path = path.clone();
    }
    if let Some(ref path) = cli.spec_path {
        config.bosh.spec_path = path.clone();
    }
    if let Some(ref path) = cli.monit_path {
        config.monit.path = path.clone();
    }
    if let Some(secs) = cli.monit_timeout_secs {
        config.monit.timeout_secs = secs;
    }
    if let Some(ref namespace) = cli.namespace {
        config.metrics.namespace = namespace.clone();
    }
    if let Some(ref environment) = cli.environment {
        config.metrics.environment = environment.clone();
    }
    if let Some(ref name) = cli.bosh_name {
        config.metrics.bosh_name = name.clone();
    }
    if let Some(ref uuid) = cli.bosh_uuid {
        config.metrics.bosh_uuid = uuid.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(ref path) = cli.log_path {
        config.log.path = path.clone();
    }

    config
}
