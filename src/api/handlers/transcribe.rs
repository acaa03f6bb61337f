use crate::AppState;
use crate::api::error::{AppError, MISSING_AUDIO_MESSAGE};
use crate::models::AudioUpload;
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Form field that carries the audio file.
pub const AUDIO_FIELD: &str = "audio";

#[derive(Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub transcript: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Multipart body accepted by `/transcribe`
#[derive(ToSchema)]
pub struct TranscribeUpload {
    #[schema(value_type = String, format = Binary)]
    pub audio: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/transcribe",
    request_body(content = TranscribeUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Transcript of the uploaded audio", body = TranscriptResponse),
        (status = 400, description = "No audio file in the form", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 413, description = "Request body over the configured limit", body = ErrorResponse),
        (status = 500, description = "Upload, transcription or transcript retrieval failed", body = ErrorResponse)
    ),
    tag = "transcribe"
)]
pub async fn transcribe_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let upload = read_audio_field(&mut multipart).await?;
    tracing::info!(
        "🎧 Received '{}' ({} bytes, {})",
        upload.filename,
        upload.data.len(),
        upload.content_type.as_deref().unwrap_or("unknown type")
    );

    let transcription = state.transcriber.transcribe(upload).await?;
    tracing::info!(
        "✅ Job {} transcribed {} ({} chars)",
        transcription.job_name,
        transcription.object.uri(),
        transcription.transcript.chars().count()
    );

    Ok(Json(TranscriptResponse {
        transcript: transcription.transcript,
    }))
}

/// Fallback for every method other than POST on the transcribe routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Consume the whole form and return the first non-empty file in the `audio` field.
async fn read_audio_field(multipart: &mut Multipart) -> Result<AudioUpload, AppError> {
    let mut upload: Option<AudioUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if upload.is_some() || field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        // A text value under `audio` is not a file upload.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let data = field.bytes().await.map_err(map_multipart_error)?;
        if data.is_empty() {
            continue;
        }

        upload = Some(AudioUpload {
            filename,
            content_type,
            data,
        });
    }

    upload.ok_or_else(|| AppError::BadRequest(MISSING_AUDIO_MESSAGE.to_string()))
}

fn map_multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
