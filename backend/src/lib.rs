//! Agro-Climate Advisory Platform - Backend
//!
//! HTTP service around the pure engine in `shared`: it loads observation
//! history, runs pattern analysis, seasonal forecasts and predictions, stores
//! the results and dispatches critical alerts.

use std::sync::Arc;

use axum::{routing::get, Router};
use shared::ClimateReferenceData;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;

use error::AppResult;
use external::ArchiveClient;
use services::{AlertDispatcher, AnalysisService, ForecastService, ObservationService, PredictionService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub reference: Arc<ClimateReferenceData>,
    pub archive: Option<ArchiveClient>,
    pub alerts: AlertDispatcher,
}

impl AppState {
    /// Build state with the built-in reference tables
    pub fn new(db: sqlx::PgPool, config: Config) -> AppResult<Self> {
        Self::with_reference(db, config, ClimateReferenceData::default())
    }

    pub fn with_reference(
        db: sqlx::PgPool,
        config: Config,
        reference: ClimateReferenceData,
    ) -> AppResult<Self> {
        let archive = if config.data_source.enabled {
            Some(ArchiveClient::new(&config.data_source)?)
        } else {
            None
        };
        let alerts = AlertDispatcher::new(&config.alerts)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            reference: Arc::new(reference),
            archive,
            alerts,
        })
    }

    pub fn observation_service(&self) -> ObservationService {
        match &self.archive {
            Some(archive) => ObservationService::with_archive(self.db.clone(), archive.clone()),
            None => ObservationService::new(self.db.clone()),
        }
    }

    pub fn analysis_service(&self) -> AnalysisService {
        AnalysisService::new(self.db.clone(), self.config.engine.clone())
    }

    pub fn forecast_service(&self) -> ForecastService {
        ForecastService::new(
            self.db.clone(),
            self.reference.clone(),
            self.config.engine.clone(),
        )
    }

    pub fn prediction_service(&self) -> PredictionService {
        PredictionService::new(
            self.db.clone(),
            self.reference.clone(),
            self.config.engine.clone(),
            self.observation_service(),
            self.alerts.clone(),
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Agro-Climate Advisory Platform API v1.0"
}
