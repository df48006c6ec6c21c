use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{
    builder::ReportBuilder,
    highlights::{HighlightGenerator, HighlightRule},
    repository::ReportStore,
    DivisionReport, ReportOptions,
};
use crate::event::EventLog;
use crate::game::{
    reconstruct, resolve_game, DerivedGameState, GameDirectory, GameRecord, GameTracker,
    UNKNOWN_DIVISION,
};
use crate::shared::AppError;
use crate::stats::{Aggregator, GameResult, StatCollector, StatsError};

/// Runs the pipeline from event logs to a stored division report
pub struct ReportService {
    event_log: Arc<dyn EventLog>,
    directory: Arc<dyn GameDirectory>,
    store: Arc<dyn ReportStore>,
    tracker: Option<Arc<GameTracker>>,
    aggregator: Aggregator,
    report_builder: ReportBuilder,
    division_mutexes: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ReportService {
    pub fn builder(
        event_log: Arc<dyn EventLog>,
        directory: Arc<dyn GameDirectory>,
        store: Arc<dyn ReportStore>,
    ) -> ReportServiceBuilder {
        ReportServiceBuilder::new(event_log, directory, store)
    }

    /// Rebuilds a division's report from every game it holds and stores it,
    /// replacing whatever report was there.
    ///
    /// Games whose event log cannot be read are left out; the rest still
    /// produce a report.
    #[instrument(skip(self))]
    pub async fn generate(&self, division: &str) -> Result<DivisionReport, StatsError> {
        let division_lock = self.division_lock(division).await;
        let _guard = division_lock.lock().await;

        let records = self.directory.list_games(division).await?;
        let loaded = join_all(records.into_iter().map(|record| self.load_game(record))).await;

        let mut games = Vec::with_capacity(loaded.len());
        for (record, result) in loaded {
            match result {
                Ok(state) => games.push((record, state)),
                Err(err) => {
                    warn!(game_id = %record.id, error = %err, "Skipping game whose events could not be loaded");
                }
            }
        }

        let stats = self.aggregator.aggregate(&games);
        let results: Vec<GameResult> = games
            .iter()
            .map(|(record, state)| GameResult::from_game(record, state))
            .collect();

        let report = self
            .report_builder
            .build(division, &stats, &results, Utc::now());
        self.store.upsert_report(division, &report).await?;

        info!(
            division = %division,
            games = results.len(),
            gaps = report.gaps.len(),
            highlights = report.highlights.len(),
            "Division report regenerated"
        );
        Ok(report)
    }

    /// Regenerates the given divisions, or every division the directory knows
    /// when none are given
    #[instrument(skip(self))]
    pub async fn generate_all(
        &self,
        divisions: &[String],
    ) -> Result<Vec<DivisionReport>, StatsError> {
        let divisions = if divisions.is_empty() {
            self.directory.list_divisions().await?
        } else {
            divisions.to_vec()
        };

        let mut reports = Vec::with_capacity(divisions.len());
        for division in &divisions {
            reports.push(self.generate(division).await?);
        }
        Ok(reports)
    }

    /// Regenerates the report for the division a game belongs to. Games whose
    /// division cannot be resolved have no report to refresh.
    #[instrument(skip(self))]
    pub async fn regenerate_for_game(
        &self,
        game_id: &str,
    ) -> Result<Option<DivisionReport>, StatsError> {
        let record = resolve_game(self.directory.as_ref(), game_id).await;
        if record.division == UNKNOWN_DIVISION {
            debug!(game_id = %game_id, "Game has no known division, no report to refresh");
            return Ok(None);
        }

        self.generate(&record.division).await.map(Some)
    }

    pub async fn get_report(&self, division: &str) -> Result<Option<DivisionReport>, StatsError> {
        Ok(self.store.get_report(division).await?)
    }

    async fn load_game(
        &self,
        record: GameRecord,
    ) -> (GameRecord, Result<DerivedGameState, AppError>) {
        let state = match &self.tracker {
            Some(tracker) => tracker.state(&record.id).await,
            None => self
                .event_log
                .get_events(&record.id)
                .await
                .map(|events| reconstruct(&events, record.teams().as_ref())),
        };
        (record, state)
    }

    async fn division_lock(&self, division: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.division_mutexes.read().await;
            if let Some(lock) = guard.get(division) {
                return lock.clone();
            }
        }

        let mut guard = self.division_mutexes.write().await;
        guard
            .entry(division.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

pub struct ReportServiceBuilder {
    event_log: Arc<dyn EventLog>,
    directory: Arc<dyn GameDirectory>,
    store: Arc<dyn ReportStore>,
    tracker: Option<Arc<GameTracker>>,
    collectors: Vec<Arc<dyn StatCollector>>,
    rules: Vec<Arc<dyn HighlightRule>>,
    options: ReportOptions,
}

impl ReportServiceBuilder {
    fn new(
        event_log: Arc<dyn EventLog>,
        directory: Arc<dyn GameDirectory>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            event_log,
            directory,
            store,
            tracker: None,
            collectors: Vec::new(),
            rules: Vec::new(),
            options: ReportOptions::default(),
        }
    }

    /// Read game states from the tracker's snapshots instead of replaying logs
    pub fn with_tracker(mut self, tracker: Arc<GameTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn with_collector(mut self, collector: Arc<dyn StatCollector>) -> Self {
        self.collectors.push(collector);
        self
    }

    pub fn with_highlight_rule(mut self, rule: Arc<dyn HighlightRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> ReportService {
        let aggregator = self
            .collectors
            .into_iter()
            .fold(Aggregator::builder(), |builder, collector| {
                builder.with_collector(collector)
            })
            .build();

        let mut generator = HighlightGenerator::new(&self.options);
        for rule in self.rules {
            generator.add_rule(rule);
        }

        ReportService {
            event_log: self.event_log,
            directory: self.directory,
            store: self.store,
            tracker: self.tracker,
            aggregator,
            report_builder: ReportBuilder::with_generator(generator, &self.options),
            division_mutexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
