use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One audio file received from the multipart form, buffered in full.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
}

impl StoredObject {
    /// `s3://bucket/key`, the form Transcribe expects as media URI
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Point-in-time view of a transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub name: String,
    pub status: JobStatus,
    pub failure_reason: Option<String>,
    pub transcript_uri: Option<String>,
}

impl JobSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Result document written by the transcription service.
///
/// Only the fields this service reads are modelled; everything else in the
/// document (items, alternatives, speaker labels) is ignored.
#[derive(Debug, Deserialize)]
pub struct TranscriptDocument {
    pub results: TranscriptResults,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResults {
    #[serde(default)]
    pub transcripts: Vec<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptEntry {
    pub transcript: String,
}

impl TranscriptDocument {
    pub fn into_first_transcript(self) -> Option<String> {
        self.results
            .transcripts
            .into_iter()
            .next()
            .map(|entry| entry.transcript)
    }
}

/// Outcome of one successful upload-and-transcribe run.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub job_name: String,
    pub object: StoredObject,
    pub transcript: String,
}
