mod penalties;
mod result;
mod scoring;

pub use penalties::PenaltyCollector;
pub use result::ResultCollector;
pub use scoring::ScoringCollector;
