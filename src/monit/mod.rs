pub mod coerce;
pub mod fetcher;
pub mod fields;
pub mod line;
pub mod model;
pub mod parser;

pub use fetcher::MonitFetcher;
pub use model::{ParsedReport, ProcessStatus, ReportHeader, SystemStatus};
pub use parser::parse_report;
