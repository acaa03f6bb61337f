use crate::services::transcribe_service::TranscribeError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned for every failure after the upload was accepted.
pub const PROCESSING_ERROR_MESSAGE: &str = "Erro ao processar o áudio.";
pub const MISSING_AUDIO_MESSAGE: &str = "Nenhum arquivo de áudio enviado.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscribeError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Transcription(e) => {
                tracing::error!("Transcription pipeline error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PROCESSING_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
