//! HTTP request handlers.

use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};

use super::server::{AppState, RequestId};
use super::types::{ChatReply, EstimateResponse, QueryRequest, SustainabilityInfo};
use crate::analyzer::QueryAnalysis;
use crate::error::{Error, Result};
use crate::router::ResourceEstimate;

/// Analyze `query` and select a provider for it. Blank queries are rejected
/// here; the estimator itself would accept them.
fn assess(state: &AppState, query: &str) -> Result<(QueryAnalysis, ResourceEstimate)> {
    if query.trim().is_empty() {
        return Err(Error::BadRequest("Query must not be empty".to_string()));
    }

    let analysis = state.analyzer.analyze(query);
    let estimate = state.selector.evaluate(query, &analysis)?;
    Ok((analysis, estimate))
}

/// Handle POST /v1/estimate
pub async fn estimate(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<EstimateResponse>> {
    let (analysis, estimate) = assess(&state, &request.query)?;

    tracing::info!(
        request_id = %request_id.0,
        category = %analysis.category,
        complexity = analysis.complexity,
        provider = %estimate.provider.name,
        token_count = estimate.token_count,
        "Estimated query"
    );

    Ok(Json(EstimateResponse {
        impact: analysis.sustainability_impact(),
        analysis,
        estimate,
    }))
}

/// Handle POST /v1/chat
///
/// The estimate is computed before and independently of the completion.
pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<ChatReply>> {
    let (analysis, estimate) = assess(&state, &request.query)?;

    tracing::info!(
        request_id = %request_id.0,
        category = %analysis.category,
        provider = %estimate.provider.name,
        upstream_model = %state.chat.model(),
        "Received chat request"
    );

    let response = state.chat.complete(&request.query).await?;

    Ok(Json(ChatReply {
        response,
        sustainability: SustainabilityInfo::from(&estimate),
        analysis,
    }))
}

/// Handle GET /providers - catalog with base scores
pub async fn list_providers(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.selector.catalog();
    let providers: Vec<serde_json::Value> = catalog
        .providers()
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.name,
                "model": p.model,
                "region": p.region,
                "available": p.available,
                "energy_wh_per_1k": p.energy_wh_per_1k,
                "co2_g_per_1k": p.co2_g_per_1k,
                "adjusted_co2_g_per_1k": catalog.adjusted_co2_per_1k(p),
                "water_ml_per_1k": p.water_ml_per_1k,
                "region_intensity": catalog.regions().factor(&p.region),
                "base_score": state.selector.score(p, 0.0),
            })
        })
        .collect();

    Json(serde_json::json!({
        "providers": providers,
        "worst_case": catalog.worst_case(),
    }))
}

/// Handle GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "willow"
    }))
}
