//! Speech HTTP Handlers
//!
//! - POST /api/transcribe  multipart `file` -> `{"transcript": ...}`
//! - POST /api/synthesis   JSON -> audio/mpeg

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::{SynthesizeSpeech, TranscribeAudio};
use crate::infrastructure::http::dto::{SynthesisRequest, TranscribeResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传音频转文字
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart request: {}", e)))?;

    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, audio_data) =
        upload.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    tracing::info!(
        file_name = ?file_name,
        size = audio_data.len(),
        "Received audio for transcription"
    );

    let response = state
        .transcribe_handler
        .handle(TranscribeAudio {
            audio_data,
            file_name,
        })
        .await?;

    Ok(Json(TranscribeResponse {
        transcript: response.transcript,
    }))
}

/// 文字转语音
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let response = state
        .synthesize_handler
        .handle(SynthesizeSpeech::from(request))
        .await?;

    let content_length = response.audio_data.len().to_string();
    Ok((
        [
            (header::CONTENT_TYPE, response.content_type.to_string()),
            (header::CONTENT_LENGTH, content_length),
        ],
        response.audio_data,
    )
        .into_response())
}
