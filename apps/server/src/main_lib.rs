use std::sync::Arc;

use crate::config::{Config, LogFormat};
use feecalc_core::extraction::CalamineExtractor;
use feecalc_core::{CalculationService, CalculationServiceTrait};
use feecalc_storage_sqlite::{db, CalculationRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub calculation_service: Arc<dyn CalculationServiceTrait>,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&db::get_db_path(&config.db_path))?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let repository = Arc::new(CalculationRepository::new(pool, writer));
    let calculation_service = Arc::new(CalculationService::new(
        repository,
        Arc::new(CalamineExtractor::new()),
    ));

    Ok(Arc::new(AppState {
        calculation_service,
    }))
}
