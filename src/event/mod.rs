// Scorekeeper events and the log that holds them
//
// Raw records from any client version pass through `normalize` once; the rest
// of the crate only ever sees canonical `GameEvent`s.

// Public API - what other modules can use
pub use errors::ValidationError;
pub use events::{
    game_time, sort_by_recorded_at, EventHeader, GameClock, GameEvent, GoalEvent, GoalType,
    PenaltyEvent, Period, MAX_PENALTY_MINUTES, PERIOD_SECONDS,
};
pub use normalize::{normalize_records, AssistList, RawEventRecord, RejectedRecords, Scalar};
pub use repository::{EventLog, InMemoryEventLog, PostgresEventLog};

// Internal modules
mod errors;
mod events;
mod normalize;
mod repository;
