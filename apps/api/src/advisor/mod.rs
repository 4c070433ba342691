// Energy advisor: prompt templates, model pipelines, kWh extraction and CO2 conversion.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod co2;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
