use std::sync::Arc;

use rinkstats::event::PostgresEventLog;
use rinkstats::game::PostgresGameDirectory;
use rinkstats::report::PostgresReportStore;
use rinkstats::seed::SeedData;
use rinkstats::{
    AppConfig, AppError, EventLog, GameDirectory, InMemoryEventLog, InMemoryGameDirectory,
    InMemoryReportStore, ReportService, ReportStore, StatsError,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rinkstats=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting rinkstats report run");

    if let Err(err) = run(AppConfig::from_env()).await {
        error!(error = %err, "Report run failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), StatsError> {
    let event_log: Arc<dyn EventLog>;
    let directory: Arc<dyn GameDirectory>;
    let store: Arc<dyn ReportStore>;

    match &config.database_url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
            info!("Using PostgreSQL adapters");
            event_log = Arc::new(PostgresEventLog::new(pool.clone()));
            directory = Arc::new(PostgresGameDirectory::new(pool.clone()));
            store = Arc::new(PostgresReportStore::new(pool));
        }
        None => {
            let memory_log = Arc::new(InMemoryEventLog::new());
            let memory_directory = Arc::new(InMemoryGameDirectory::new());
            if let Some(path) = &config.seed_file {
                SeedData::load(path)
                    .await?
                    .apply(&memory_directory, memory_log.as_ref())
                    .await?;
            }
            info!("Using in-memory adapters");
            event_log = memory_log;
            directory = memory_directory;
            store = Arc::new(InMemoryReportStore::new());
        }
    }

    let service = ReportService::builder(event_log, directory, store)
        .with_options(config.report)
        .build();

    for report in service.generate_all(&config.divisions).await? {
        let rendered = serde_json::to_string_pretty(&report)?;
        println!("{}", rendered);
    }
    Ok(())
}
