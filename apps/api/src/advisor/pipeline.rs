//! Pipelines — one per user-facing action.
//!
//! Flow: PromptTemplate::build → ChatModel::invoke → (kWh extraction → co2_estimate).
//!
//! Pipelines hold no state and cache nothing: calling one twice with the same
//! input makes two model calls.

use serde::Serialize;
use tracing::{debug, info};

use crate::advisor::co2::co2_estimate;
use crate::advisor::extractor::ExtractionMode;
use crate::advisor::models::{SavingsEstimate, UserQuery, UserType};
use crate::advisor::prompts::{ANALYSIS, APPLIANCE, CO2_ESTIMATE, RECOMMENDATION, RENEWABLE};
use crate::errors::AppError;
use crate::llm_client::prompts::{PromptFields, PromptTemplate};
use crate::llm_client::ChatModel;

/// Output of the full recommendations flow.
#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub recommendations: String,
    pub analysis: String,
    pub savings: SavingsEstimate,
}

/// Personalised advice for the submitted form.
pub async fn recommend(llm: &dyn ChatModel, query: &UserQuery) -> Result<String, AppError> {
    info!("Generating recommendations for {} user", query.user_type);
    run(llm, &RECOMMENDATION, &query.prompt_fields()).await
}

/// Environmental and cost analysis of previously generated advice.
pub async fn analyze(llm: &dyn ChatModel, recommendations: &str) -> Result<String, AppError> {
    info!("Analyzing recommendations");
    run(
        llm,
        &ANALYSIS,
        &PromptFields::from([("recommendations", recommendations)]),
    )
    .await
}

pub async fn suggest_appliances(llm: &dyn ChatModel, appliances: &str) -> Result<String, AppError> {
    info!("Suggesting appliance alternatives");
    run(llm, &APPLIANCE, &PromptFields::from([("appliances", appliances)])).await
}

pub async fn suggest_renewables(
    llm: &dyn ChatModel,
    location: &str,
    user_type: UserType,
) -> Result<String, AppError> {
    info!("Suggesting renewable options for {user_type} user");
    run(
        llm,
        &RENEWABLE,
        &PromptFields::from([("location", location), ("user_type", user_type.as_str())]),
    )
    .await
}

/// Asks the model for a monthly kWh figure and converts it to CO2 savings.
/// An unparseable answer yields a zero estimate rather than an error.
pub async fn estimate_savings(
    llm: &dyn ChatModel,
    recommendations: &str,
    mode: ExtractionMode,
) -> Result<SavingsEstimate, AppError> {
    info!("Estimating kWh savings");
    let raw = run(
        llm,
        &CO2_ESTIMATE,
        &PromptFields::from([("recommendations", recommendations)]),
    )
    .await?;

    let kwh = mode.extract(&raw);
    debug!("Extracted {kwh} kWh from {:?} using {:?}", raw, mode);

    Ok(co2_estimate(kwh))
}

/// Runs the full recommendations flow: advice first, then analysis and the
/// savings estimate on that advice. The latter two are independent and run
/// concurrently.
pub async fn advise(
    llm: &dyn ChatModel,
    query: &UserQuery,
    mode: ExtractionMode,
) -> Result<Advice, AppError> {
    let recommendations = recommend(llm, query).await?;

    let (analysis, savings) = tokio::try_join!(
        analyze(llm, &recommendations),
        estimate_savings(llm, &recommendations, mode),
    )?;

    Ok(Advice {
        recommendations,
        analysis,
        savings,
    })
}

async fn run(
    llm: &dyn ChatModel,
    template: &PromptTemplate,
    fields: &PromptFields<'_>,
) -> Result<String, AppError> {
    let messages = template.build(fields)?;

    let text = llm
        .invoke(&messages)
        .await
        .map_err(|e| AppError::Upstream(format!("{} call failed: {e}", template.name)))?;

    debug!("{} returned {} chars", template.name, text.len());
    Ok(text)
}
