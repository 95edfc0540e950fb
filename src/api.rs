//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the screening operations. A thin adapter: it
//! parses requests into screening queries, delegates to the match engine,
//! and formats responses; no matching logic lives here.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with a screening query and minimum score
//! - **Output**: JSON responses with matched entries and their scores
//! - **Endpoints**: POST /search, POST /search/{type}, GET /sources,
//!   GET /health

use crate::engine::ScreeningMatch;
use crate::errors::{Result, ScreeningError};
use crate::{ScreeningQuery, SourceMetaData};
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// API server wrapping the shared application state
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Search request payload: the attribute map plus the minimum score
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Minimum fuzzy name score, 0-100
    pub minimum_score: u8,
    #[serde(flatten)]
    pub query: ScreeningQuery,
}

/// Search response payload
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matches: Vec<ScreeningMatch>,
    pub total_matches: usize,
    pub query_time_ms: u64,
}

/// Source metadata response payload
#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceMetaData>,
}

/// Uniform error envelope for API failures
#[derive(Debug, Serialize)]
pub struct ServiceErrorBody {
    pub code: u16,
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ServiceErrorBody {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: 400,
            error: "Bad Request".to_string(),
            message: message.into(),
            timestamp: chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: crate::AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );

        tracing::info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .route("/search", web::post().to(search_handler))
                .route("/search/{type}", web::post().to(search_by_type_handler))
                .route("/sources", web::get().to(sources_handler))
                .route("/health", web::get().to(health_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| ScreeningError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| ScreeningError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

fn validate_request(request: &SearchRequest) -> std::result::Result<(), HttpResponse> {
    if request.minimum_score > 100 {
        return Err(HttpResponse::BadRequest().json(ServiceErrorBody::bad_request(
            "minimum_score must be between 0 and 100",
        )));
    }
    Ok(())
}

/// Search endpoint handler
async fn search_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_request(&request) {
        return Ok(response);
    }

    let start_time = std::time::Instant::now();
    let matches = app_state
        .engine
        .search(request.minimum_score, &request.query)
        .await;

    let total_matches = matches.len();
    Ok(HttpResponse::Ok().json(SearchResponse {
        matches,
        total_matches,
        query_time_ms: start_time.elapsed().as_millis() as u64,
    }))
}

/// Type-filtered search endpoint handler
async fn search_by_type_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<String>,
    request: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_request(&request) {
        return Ok(response);
    }

    let start_time = std::time::Instant::now();
    let matches = app_state
        .engine
        .filter_by_type(request.minimum_score, &request.query, &path)
        .await;

    let total_matches = matches.len();
    Ok(HttpResponse::Ok().json(SearchResponse {
        matches,
        total_matches,
        query_time_ms: start_time.elapsed().as_millis() as u64,
    }))
}

/// Source metadata endpoint handler
async fn sources_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let sources = app_state.engine.source_data().await;
    Ok(HttpResponse::Ok().json(SourcesResponse { sources }))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let stats = app_state.store.stats().await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "store": stats,
        "malformed_dates_seen": crate::date_window::malformed_date_count(),
    })))
}
