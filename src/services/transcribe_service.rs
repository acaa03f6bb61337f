use crate::config::TranscribeConfig;
use crate::models::{AudioUpload, JobSnapshot, JobStatus, StoredObject, TranscriptDocument, Transcription};
use crate::services::fetcher::TranscriptFetcher;
use crate::services::naming::ResourceNaming;
use crate::services::poller::{PollError, PollPolicy, poll_until};
use crate::services::storage::StorageService;
use crate::services::transcription::TranscriptionService;
use crate::utils::validation::sanitize_filename;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("Upload of {key} failed: {source}")]
    Upload {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Starting job {job_name} failed: {source}")]
    JobStart {
        job_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Checking status of job {job_name} failed: {source}")]
    StatusCheck {
        job_name: String,
        #[source]
        source: PollError,
    },

    #[error("Job {job_name} gave up after {attempts} status checks")]
    PollExhausted { job_name: String, attempts: u32 },

    #[error("Job {job_name} failed: {reason}")]
    JobFailed { job_name: String, reason: String },

    #[error("Job {job_name} completed without a transcript URI")]
    MissingTranscriptUri { job_name: String },

    #[error("Fetching transcript of job {job_name} failed: {source}")]
    Fetch {
        job_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Transcript document of job {job_name} is invalid: {reason}")]
    Parse { job_name: String, reason: String },
}

/// Upload → start job → poll → fetch, over injected collaborators.
pub struct TranscribeService {
    storage: Arc<dyn StorageService>,
    transcription: Arc<dyn TranscriptionService>,
    fetcher: Arc<dyn TranscriptFetcher>,
    naming: ResourceNaming,
    language_code: String,
    poll_policy: PollPolicy,
}

impl TranscribeService {
    pub fn new(
        storage: Arc<dyn StorageService>,
        transcription: Arc<dyn TranscriptionService>,
        fetcher: Arc<dyn TranscriptFetcher>,
        config: &TranscribeConfig,
    ) -> Self {
        Self {
            storage,
            transcription,
            fetcher,
            naming: ResourceNaming::new(
                config.upload_prefix.clone(),
                config.job_name_prefix.clone(),
            ),
            language_code: config.language_code.clone(),
            poll_policy: PollPolicy::new(config.poll_interval(), config.max_poll_attempts),
        }
    }

    pub async fn transcribe(&self, upload: AudioUpload) -> Result<Transcription, TranscribeError> {
        // 1. Upload to storage
        let filename = sanitize_filename(&upload.filename);
        let object = StoredObject {
            bucket: self.storage.bucket().to_string(),
            key: self.naming.object_key(&filename),
        };
        let size = upload.data.len();

        self.storage
            .upload_file(&object.key, upload.data, upload.content_type.as_deref())
            .await
            .map_err(|source| TranscribeError::Upload {
                key: object.key.clone(),
                source,
            })?;
        info!("☁️  Uploaded {} bytes to {}", size, object.uri());

        // 2. Start job
        let job_name = self.naming.job_name();
        self.transcription
            .start_job(&job_name, &self.language_code, &object.uri())
            .await
            .map_err(|source| TranscribeError::JobStart {
                job_name: job_name.clone(),
                source,
            })?;
        info!("🎙️  Started transcription job {} ({})", job_name, self.language_code);

        // 3. Wait for a terminal status
        let job = self.wait_for_job(&job_name).await?;

        // 4. Fetch and extract the transcript
        let uri = job
            .transcript_uri
            .ok_or_else(|| TranscribeError::MissingTranscriptUri {
                job_name: job_name.clone(),
            })?;
        let transcript = self.fetch_transcript(&job_name, &uri).await?;

        Ok(Transcription {
            job_name,
            object,
            transcript,
        })
    }

    async fn wait_for_job(&self, job_name: &str) -> Result<JobSnapshot, TranscribeError> {
        let job = poll_until(
            self.poll_policy,
            || async move {
                let job = self.transcription.get_job(job_name).await?;
                tracing::debug!("⏳ Job {} status: {}", job_name, job.status);
                Ok::<_, anyhow::Error>(job)
            },
            JobSnapshot::is_terminal,
        )
        .await
        .map_err(|e| match e {
            PollError::Exhausted { attempts } => TranscribeError::PollExhausted {
                job_name: job_name.to_string(),
                attempts,
            },
            other => TranscribeError::StatusCheck {
                job_name: job_name.to_string(),
                source: other,
            },
        })?;

        if job.status == JobStatus::Failed {
            let reason = job
                .failure_reason
                .unwrap_or_else(|| "no reason given".to_string());
            warn!("❌ Job {} failed: {}", job_name, reason);
            return Err(TranscribeError::JobFailed {
                job_name: job_name.to_string(),
                reason,
            });
        }

        Ok(job)
    }

    async fn fetch_transcript(&self, job_name: &str, uri: &str) -> Result<String, TranscribeError> {
        let body = self
            .fetcher
            .fetch(uri)
            .await
            .map_err(|source| TranscribeError::Fetch {
                job_name: job_name.to_string(),
                source,
            })?;

        let document: TranscriptDocument =
            serde_json::from_slice(&body).map_err(|e| TranscribeError::Parse {
                job_name: job_name.to_string(),
                reason: e.to_string(),
            })?;

        document
            .into_first_transcript()
            .ok_or_else(|| TranscribeError::Parse {
                job_name: job_name.to_string(),
                reason: "no transcripts in results".to_string(),
            })
    }
}
