// Public API - what other modules can use
pub use classify::{
    goal_context, goal_strength, penalty_context, strength_between, validate_goal,
    validate_penalty, GoalClassification, GoalContext, PenaltyClassification, PenaltyContext,
    StrengthSituation, StrengthSnapshot, ValidGoal, ValidPenalty, MAJOR_VOCABULARY,
    MINOR_PENALTY_MINUTES, MISCONDUCT_VOCABULARY,
};
pub use models::{GameRecord, GameStatus, GameTeams, PlayerKey, UNKNOWN_DIVISION};
pub use repository::{resolve_game, GameDirectory, InMemoryGameDirectory, PostgresGameDirectory};
pub use state::{
    reconstruct, ClassifiedGoal, ClassifiedPenalty, DerivedGameState, EventOutcome,
    PenaltyWindow, RejectedEvent, Watermark,
};
pub use tracker::GameTracker;

// Internal modules
mod classify;
mod models;
mod repository;
mod state;
mod tracker;
