use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{PipelineError, PipelineResult};
use crate::domains::jobs::{
    ExperienceLevel, IngestionResult, JobStats, SkillCategories, SkillCount, SkillQuery,
};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SkillsParams {
    pub limit: Option<i64>,
    pub level: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunIngestionResponse {
    success: bool,
    message: String,
    run_id: Uuid,
}

#[derive(Serialize)]
pub struct CompanyIngestionResponse {
    success: bool,
    #[serde(flatten)]
    result: IngestionResult,
}

#[derive(Serialize)]
pub struct StatsResponse {
    success: bool,
    #[serde(flatten)]
    stats: JobStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsResponse {
    success: bool,
    total_skills: usize,
    skills: Vec<SkillCount>,
    categories: SkillCategories,
}

#[derive(Serialize)]
pub struct CompanySkillsResponse {
    success: bool,
    company: String,
    skills: Vec<SkillCount>,
}

impl SkillsParams {
    fn into_query(self) -> PipelineResult<SkillQuery> {
        let mut query = SkillQuery::top(self.limit.unwrap_or(SkillQuery::DEFAULT_LIMIT));
        if let Some(level) = self.level.filter(|l| !l.trim().is_empty()) {
            let level: ExperienceLevel = level
                .parse()
                .map_err(|e: anyhow::Error| PipelineError::InvalidInput(e.to_string()))?;
            query = query.with_level(level);
        }
        Ok(query)
    }
}

/// POST /ingestion/run - ingest every discovered company in the background
pub async fn run_ingestion_handler(
    Extension(state): Extension<AppState>,
) -> PipelineResult<Json<RunIngestionResponse>> {
    let tokens = state.discovery.get_company_tokens().await?;
    let count = tokens.len();
    let run_id = state.ingestion.start_ingest_all(tokens)?;

    Ok(Json(RunIngestionResponse {
        success: true,
        message: format!("Ingestion started for {} companies", count),
        run_id,
    }))
}

/// POST /ingestion/company/:token
pub async fn ingest_company_handler(
    Extension(state): Extension<AppState>,
    Path(token): Path<String>,
) -> PipelineResult<Json<CompanyIngestionResponse>> {
    let result = state.ingestion.ingest_company(&token).await?;

    Ok(Json(CompanyIngestionResponse {
        success: !result.is_error(),
        result,
    }))
}

/// GET /ingestion/stats
pub async fn ingestion_stats_handler(
    Extension(state): Extension<AppState>,
) -> PipelineResult<Json<StatsResponse>> {
    let stats = state.ingestion.stats().await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// GET /ingestion/skills?limit&level
pub async fn top_skills_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<SkillsParams>,
) -> PipelineResult<Json<SkillsResponse>> {
    let skills = state.ingestion.top_skills(&params.into_query()?).await?;

    Ok(Json(SkillsResponse {
        success: true,
        total_skills: skills.len(),
        categories: state.ingestion.categorize(&skills),
        skills,
    }))
}

/// GET /ingestion/skills/by-company/:company?limit
pub async fn skills_by_company_handler(
    Extension(state): Extension<AppState>,
    Path(company): Path<String>,
    Query(params): Query<SkillsParams>,
) -> PipelineResult<Json<CompanySkillsResponse>> {
    let query = SkillsParams {
        limit: params.limit,
        level: None,
    }
    .into_query()?
    .with_company(company.clone());
    let skills = state.ingestion.top_skills(&query).await?;

    Ok(Json(CompanySkillsResponse {
        success: true,
        company,
        skills,
    }))
}
