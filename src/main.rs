use std::process;
use std::sync::Arc;

use foglio::{
    application::blog::{BlogRepository, BlogService},
    application::error::AppError,
    config,
    infra::{
        cache::MemoryCache,
        db::PostgresStore,
        error::InfraError,
        http::{self, AppState},
        records::RecordsClient,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let settings = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let pool = PostgresStore::connect(&settings.database.url, settings.database.max_connections)
        .await
        .map_err(|err| InfraError::database(format!("failed to connect: {err}")))?;
    PostgresStore::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(format!("failed to run migrations: {err}")))?;
    info!(target: "foglio", "database ready");

    let store = Arc::new(PostgresStore::new(pool));
    let cache = Arc::new(MemoryCache::new());
    let notifier = Arc::new(
        RecordsClient::new(&settings.records)
            .map_err(|err| AppError::unexpected(format!("failed to build records client: {err}")))?,
    );

    let repository = BlogRepository::new(store.clone(), cache, settings.cache.ttl);
    let service = Arc::new(BlogService::new(
        repository,
        notifier,
        settings.records.failure_policy,
    ));

    let state = AppState {
        blog: service,
        probe: store,
    };

    let router = http::build_router(state);
    http::serve(&settings.server, router)
        .await
        .map_err(AppError::from)
}
