//! JSON handlers for the `/api` routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tally_core::{ModelInfo, WordFrequency, CHAT_MODELS};
use tally_logging::tally_info;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CountWordsRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountWordsResponse {
    pub top_words: Vec<WordFrequency>,
}

#[derive(Debug, Deserialize)]
pub struct LlmCountRequest {
    pub text: String,
    pub words: Vec<String>,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LlmCountResponse {
    pub counts: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub article: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: &'static [ModelInfo],
}

pub async fn count_words(
    State(state): State<AppState>,
    payload: Result<Json<CountWordsRequest>, JsonRejection>,
) -> Result<Json<CountWordsResponse>, ApiError> {
    let Json(request) = payload?;
    let top_words = state.tally.count_words(&request.text);
    tally_info!(
        "count-words: {} chars, {} top words",
        request.text.chars().count(),
        top_words.len()
    );
    Ok(Json(CountWordsResponse { top_words }))
}

pub async fn crawl_article(
    State(state): State<AppState>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state.tally.crawl_article().await?;
    tally_info!("crawl-article: {} chars", article.chars().count());
    Ok(Json(ArticleResponse { article }))
}

pub async fn generate_article(
    State(state): State<AppState>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state.tally.generate_article().await?;
    tally_info!("generate-article: {} chars", article.chars().count());
    Ok(Json(ArticleResponse { article }))
}

pub async fn llm_count(
    State(state): State<AppState>,
    payload: Result<Json<LlmCountRequest>, JsonRejection>,
) -> Result<Json<LlmCountResponse>, ApiError> {
    let Json(request) = payload?;
    let counts = state
        .tally
        .llm_count(&request.text, &request.words, &request.model)
        .await?;
    tally_info!(
        "llm-count: model {}, {} words",
        request.model,
        request.words.len()
    );
    Ok(Json(LlmCountResponse { counts }))
}

pub async fn list_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: CHAT_MODELS,
    })
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
