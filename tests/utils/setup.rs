#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;

use rinkstats::{
    event::{EventLog, InMemoryEventLog},
    game::{GameTracker, InMemoryGameDirectory},
    report::{InMemoryReportStore, ReportOptions, ReportService},
};

use super::game_builders::GameLogBuilder;

// ============================================================================
// Pipeline Setup Infrastructure
// ============================================================================

pub struct PipelineSetup {
    pub event_log: Arc<InMemoryEventLog>,
    pub directory: Arc<InMemoryGameDirectory>,
    pub store: Arc<InMemoryReportStore>,
    pub tracker: Arc<GameTracker>,
    pub service: ReportService,
}

pub struct PipelineSetupBuilder {
    games: Vec<GameLogBuilder>,
    options: ReportOptions,
}

impl PipelineSetupBuilder {
    pub fn new() -> Self {
        Self {
            games: vec![],
            options: ReportOptions::default(),
        }
    }

    pub fn with_game(mut self, game: GameLogBuilder) -> Self {
        self.games.push(game);
        self
    }

    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn build(self) -> PipelineSetup {
        let event_log = Arc::new(InMemoryEventLog::new());
        let directory = Arc::new(InMemoryGameDirectory::new());
        let store = Arc::new(InMemoryReportStore::new());

        for game in self.games {
            let (record, events) = game.into_parts();
            let game_id = record.id.clone();
            directory.put_game(record).await;
            for event in events {
                event_log.append_event(&game_id, event).await.unwrap();
            }
        }

        let tracker = Arc::new(GameTracker::new(event_log.clone(), directory.clone()));
        let service = ReportService::builder(event_log.clone(), directory.clone(), store.clone())
            .with_options(self.options)
            .build();

        PipelineSetup {
            event_log,
            directory,
            store,
            tracker,
            service,
        }
    }
}
