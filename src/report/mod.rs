// Division "rink reports": highlight rules, standouts and the report store

// Public API - what other modules can use
pub use builder::{build_report, standout_tag, standouts, ReportBuilder};
pub use models::{
    DivisionReport, ReportOptions, Standout, StandoutTag, DEFAULT_HIGHLIGHT_LIMIT,
    DEFAULT_PER_RULE_CAP, DEFAULT_STANDOUT_COUNT,
};
pub use repository::{InMemoryReportStore, PostgresReportStore, ReportStore};
pub use service::{ReportService, ReportServiceBuilder};

pub mod highlights;

// Internal modules
mod builder;
mod models;
mod repository;
mod service;
