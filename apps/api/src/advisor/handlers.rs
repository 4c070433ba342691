//! Axum route handlers for the advisor API. One handler per form action.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::advisor::co2::co2_estimate;
use crate::advisor::models::{SavingsEstimate, UserQuery, UserType};
use crate::advisor::pipeline::{self, Advice};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub recommendations: String,
}

#[derive(Debug, Deserialize)]
pub struct AppliancesRequest {
    pub appliances: String,
}

#[derive(Debug, Deserialize)]
pub struct RenewablesRequest {
    pub location: String,
    pub user_type: UserType,
}

#[derive(Debug, Deserialize)]
pub struct ManualSavingsRequest {
    pub kwh_saved: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub struct SavingsResponse {
    pub savings: SavingsEstimate,
    pub co2_tonnes_yearly: f64,
}

impl From<SavingsEstimate> for SavingsResponse {
    fn from(savings: SavingsEstimate) -> Self {
        Self {
            co2_tonnes_yearly: savings.co2_tonnes_yearly(),
            savings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    #[serde(flatten)]
    pub advice: Advice,
    pub co2_tonnes_yearly: f64,
}

#[derive(Debug, Serialize)]
pub struct ApplianceSuggestionsResponse {
    pub suggestions: String,
}

#[derive(Debug, Serialize)]
pub struct RenewableOptionsResponse {
    pub options: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(query): Json<UserQuery>,
) -> Result<Json<RecommendResponse>, AppError> {
    let recommendations = pipeline::recommend(state.llm.as_ref(), &query).await?;
    Ok(Json(RecommendResponse { recommendations }))
}

/// POST /api/v1/recommendations/analysis
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let analysis = pipeline::analyze(state.llm.as_ref(), &request.recommendations).await?;
    Ok(Json(AnalysisResponse { analysis }))
}

/// POST /api/v1/recommendations/savings
///
/// Asks the model how many kWh the advice saves per month. A response with no
/// usable number yields an all-zero estimate, not an error.
pub async fn handle_estimate_savings(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<SavingsResponse>, AppError> {
    let savings = pipeline::estimate_savings(
        state.llm.as_ref(),
        &request.recommendations,
        state.kwh_extraction,
    )
    .await?;
    Ok(Json(savings.into()))
}

/// POST /api/v1/advice
///
/// Full recommendations flow: advice → (analysis, savings estimate).
pub async fn handle_advise(
    State(state): State<AppState>,
    Json(query): Json<UserQuery>,
) -> Result<Json<AdviceResponse>, AppError> {
    let advice = pipeline::advise(state.llm.as_ref(), &query, state.kwh_extraction).await?;
    Ok(Json(AdviceResponse {
        co2_tonnes_yearly: advice.savings.co2_tonnes_yearly(),
        advice,
    }))
}

/// POST /api/v1/appliances/suggestions
pub async fn handle_suggest_appliances(
    State(state): State<AppState>,
    Json(request): Json<AppliancesRequest>,
) -> Result<Json<ApplianceSuggestionsResponse>, AppError> {
    let suggestions = pipeline::suggest_appliances(state.llm.as_ref(), &request.appliances).await?;
    Ok(Json(ApplianceSuggestionsResponse { suggestions }))
}

/// POST /api/v1/renewables/options
pub async fn handle_suggest_renewables(
    State(state): State<AppState>,
    Json(request): Json<RenewablesRequest>,
) -> Result<Json<RenewableOptionsResponse>, AppError> {
    let options =
        pipeline::suggest_renewables(state.llm.as_ref(), &request.location, request.user_type)
            .await?;
    Ok(Json(RenewableOptionsResponse { options }))
}

/// POST /api/v1/co2/savings
///
/// Manual entry of monthly kWh saved. No model call. Negative values are
/// rejected here even though `co2_estimate` itself accepts them.
pub async fn handle_manual_savings(
    Json(request): Json<ManualSavingsRequest>,
) -> Result<Json<SavingsResponse>, AppError> {
    if !request.kwh_saved.is_finite() || request.kwh_saved < 0.0 {
        return Err(AppError::Validation(
            "kwh_saved must be a non-negative number".to_string(),
        ));
    }

    Ok(Json(co2_estimate(request.kwh_saved).into()))
}
