use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, Method, header},
    middleware,
    response::Html,
    routing::{get, post},
};
use lingproc::WordBudget;
use llm::{LLMClient, OpenAiClient, ScriptWriter};
use shared::{
    GenerateAudioRequest, GenerateAudioResponse, GenerateScriptRequest, GenerateScriptResponse,
    MAX_DURATION_MINUTES, PreviewVoiceResponse,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tts::{ElevenLabsTts, SpeechService, Synthesizer};

use crate::{ApiError, Config, RateLimiter, rate_limit};

/// State shared across HTTP handlers.
///
/// Services are built once at startup and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub scripts: Arc<ScriptWriter>,
    pub speech: Arc<SpeechService>,
    pub client_url: Arc<str>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        model: impl Into<String>,
        synthesizer: Arc<dyn Synthesizer>,
        client_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            scripts: Arc::new(ScriptWriter::new(
                llm,
                model,
                WordBudget::new(MAX_DURATION_MINUTES),
            )),
            speech: Arc::new(SpeechService::new(synthesizer)),
            client_url: client_url.into(),
        }
    }

    /// Build the provider clients described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let llm = OpenAiClient::new(config.openai_api_key.clone())
            .with_base_url(config.openai_base_url.clone());
        let tts = ElevenLabsTts::new(config.elevenlabs_api_key.clone())
            .with_base_url(config.elevenlabs_base_url.clone());
        Self::new(
            Arc::new(llm),
            config.openai_model.clone(),
            Arc::new(tts),
            config.client_url.clone(),
        )
    }
}

/// Landing page pointing visitors at the client application.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    static LANDING: &str = include_str!("landing.html");
    Html(LANDING.replace("{{client_url}}", &state.client_url))
}

pub async fn generate_script(
    State(state): State<AppState>,
    body: Result<Json<GenerateScriptRequest>, JsonRejection>,
) -> Result<Json<GenerateScriptResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        debug!(error = %e, "rejected script request body");
        ApiError::InvalidBody
    })?;
    if let Some(minutes) = req.duration.filter(|m| *m != MAX_DURATION_MINUTES) {
        debug!(minutes, "ignoring requested duration");
    }
    let script = state.scripts.write(&req.prompt).await?;
    Ok(Json(GenerateScriptResponse { script }))
}

pub async fn generate_audio(
    State(state): State<AppState>,
    body: Result<Json<GenerateAudioRequest>, JsonRejection>,
) -> Result<Json<GenerateAudioResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        debug!(error = %e, "rejected audio request body");
        ApiError::InvalidBody
    })?;
    let audio = state.speech.synthesize(&req.script, &req.voice_id).await?;
    Ok(Json(GenerateAudioResponse {
        audio_url: audio.audio_url,
        duration: audio.duration,
    }))
}

pub async fn preview_voice(
    State(state): State<AppState>,
    Path(voice_id): Path<String>,
) -> Result<Json<PreviewVoiceResponse>, ApiError> {
    let preview_url = state
        .speech
        .preview(&voice_id)
        .await
        .map_err(ApiError::preview)?;
    Ok(Json(PreviewVoiceResponse { preview_url }))
}

/// CORS policy admitting only `origin`, with credentials.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin.trim_end_matches('/'))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Build the application router.
///
/// Layers, outermost first: request tracing, CORS, rate limiting.
pub fn app(state: AppState, limiter: Arc<RateLimiter>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/generate-script", post(generate_script))
        .route("/api/generate-audio", post(generate_audio))
        .route("/api/preview-voice/{voice_id}", get(preview_voice))
        .with_state(state)
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the router described by `config`.
pub fn build_app(config: &Config) -> anyhow::Result<Router> {
    let state = AppState::from_config(config);
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window(),
    ));
    let cors = cors_layer(&config.client_url)?;
    info!(
        origin = %config.client_url,
        max = config.rate_limit_max,
        window_secs = config.rate_limit_window_secs,
        "admission control configured"
    );
    Ok(app(state, limiter, cors))
}
