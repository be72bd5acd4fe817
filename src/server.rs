//! HTTP 服务模块
//!
//! 对外提供整页流式翻译（SSE）与单区块翻译接口。

use crate::error::TranslationError;
use crate::prompt::LANGUAGES;
use crate::section::Section;
use crate::stream::PageRun;
use crate::translator::TranslationService;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
}

/// 构建路由
pub fn router(service: Arc<TranslationService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/languages", get(list_languages))
        .route("/translate-page", post(translate_page))
        .route("/translate-section", post(translate_section))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(AppState { service })
}

/// 处理器错误，响应体为 `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError(pub TranslationError);

impl From<TranslationError> for ApiError {
    fn from(error: TranslationError) -> Self {
        ApiError(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(TranslationError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("请求失败: {}", self.0);
        } else {
            warn!("请求被拒绝: {}", self.0);
        }
        (status, Json(ErrorBody { error: self.0.client_message() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTranslationRequest {
    pub sections: Option<Vec<Section>>,
    pub target_language: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTranslationRequest {
    pub section: Option<Section>,
    pub target_language: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SectionTranslationResponse {
    pub section: Section,
}

#[derive(Debug, Serialize)]
struct LanguageEntry {
    code: &'static str,
    name: &'static str,
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_languages() -> Json<Vec<LanguageEntry>> {
    Json(
        LANGUAGES
            .iter()
            .map(|&(code, name)| LanguageEntry { code, name })
            .collect(),
    )
}

/// POST /translate-page
///
/// 校验通过后立即返回 `text/event-stream`，每个事件一帧。
async fn translate_page(
    State(state): State<AppState>,
    body: Result<Json<PageTranslationRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let Json(req) = body?;
    let sections = req
        .sections
        .ok_or_else(|| TranslationError::Validation("No sections provided".to_string()))?;
    let target_language = state
        .service
        .resolve_target_language(req.target_language.as_deref())?
        .to_string();
    let model = state.service.resolve_model(req.model.as_deref()).to_string();

    info!("整页翻译请求: {} 个区块 -> {}", sections.len(), target_language);

    let rx = state.service.spawn_page_run(PageRun {
        sections,
        target_language,
        model,
    });
    let stream = ReceiverStream::new(rx).map(|event| Event::default().json_data(&event));

    Ok(Sse::new(stream))
}

/// POST /translate-section
async fn translate_section(
    State(state): State<AppState>,
    body: Result<Json<SectionTranslationRequest>, JsonRejection>,
) -> Result<Json<SectionTranslationResponse>, ApiError> {
    let Json(req) = body?;
    let section = req
        .section
        .ok_or_else(|| TranslationError::Validation("No section provided".to_string()))?;

    let section = state
        .service
        .translate_section(&section, req.target_language.as_deref(), req.model.as_deref())
        .await?;

    Ok(Json(SectionTranslationResponse { section }))
}
