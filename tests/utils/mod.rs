pub mod assertions;
pub mod game_builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{category_of, ReportAssertion};
pub use game_builders::GameLogBuilder;
#[allow(unused_imports)]
pub use setup::{PipelineSetup, PipelineSetupBuilder};
