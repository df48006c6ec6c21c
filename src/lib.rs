// Library crate for the rinkstats game-analytics engine
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod event;
pub mod game;
pub mod report;
pub mod seed;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use event::{EventLog, GameEvent, InMemoryEventLog, RawEventRecord, ValidationError};
pub use game::{reconstruct, DerivedGameState, GameDirectory, GameRecord, GameTracker, InMemoryGameDirectory};
pub use report::{DivisionReport, InMemoryReportStore, ReportService, ReportStore};
pub use shared::AppError;
pub use stats::{aggregate, SeasonStats, StatsError};
