//! GET routes in JSON, consumed via fetch from the frontend.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use guiasaude_core::service::DirectoryService;

use crate::data::{self, Symptom, TriageRule};

/// Build the router with all API endpoints and permissive CORS.
pub(crate) fn router(service: Arc<DirectoryService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/sintomas", get(symptoms))
        .route("/api/orientacoes", get(triage_rules))
        .route("/api/unidades", get(facilities))
        .layer(cors)
        .with_state(service)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn symptoms() -> Json<Vec<Symptom>> {
    Json(data::symptom_catalog())
}

async fn triage_rules() -> Json<Vec<TriageRule>> {
    Json(data::triage_rules())
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacilityQuery {
    /// Category slug: ubs | upa | hospital | caps.
    tipo: Option<String>,
    /// Free-text search over name, neighborhood, and address.
    q: Option<String>,
}

async fn facilities(
    State(service): State<Arc<DirectoryService>>,
    Query(params): Query<FacilityQuery>,
) -> Response {
    match service
        .list_facilities(params.tipo.as_deref(), params.q.as_deref())
        .await
    {
        Ok(records) => Json(records).into_response(),
        Err(error) => {
            tracing::error!(%error, "facility lookup unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}
