use crate::models::{JobSnapshot, JobStatus};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_transcribe::Client;
use aws_sdk_transcribe::types::{LanguageCode, Media, TranscriptionJobStatus};

/// Client side of an asynchronous speech-to-text service.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Submit a job for the media at `media_uri`. Returns once the service has accepted it.
    async fn start_job(&self, job_name: &str, language_code: &str, media_uri: &str) -> Result<()>;

    /// Current status of a previously started job.
    async fn get_job(&self, job_name: &str) -> Result<JobSnapshot>;
}

/// AWS Transcribe backed implementation.
pub struct AwsTranscriptionService {
    client: Client,
}

impl AwsTranscriptionService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn map_status(status: &TranscriptionJobStatus) -> Result<JobStatus> {
    match status {
        TranscriptionJobStatus::Queued => Ok(JobStatus::Queued),
        TranscriptionJobStatus::InProgress => Ok(JobStatus::InProgress),
        TranscriptionJobStatus::Completed => Ok(JobStatus::Completed),
        TranscriptionJobStatus::Failed => Ok(JobStatus::Failed),
        other => Err(anyhow!("Unrecognised transcription job status: {}", other.as_str())),
    }
}

#[async_trait]
impl TranscriptionService for AwsTranscriptionService {
    async fn start_job(&self, job_name: &str, language_code: &str, media_uri: &str) -> Result<()> {
        self.client
            .start_transcription_job()
            .transcription_job_name(job_name)
            .language_code(LanguageCode::from(language_code))
            .media(Media::builder().media_file_uri(media_uri).build())
            .send()
            .await?;
        Ok(())
    }

    async fn get_job(&self, job_name: &str) -> Result<JobSnapshot> {
        let res = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await?;

        let job = res
            .transcription_job()
            .ok_or_else(|| anyhow!("Transcription job {} missing from response", job_name))?;

        let status = job
            .transcription_job_status()
            .ok_or_else(|| anyhow!("Transcription job {} has no status", job_name))
            .and_then(map_status)?;

        Ok(JobSnapshot {
            name: job_name.to_string(),
            status,
            failure_reason: job.failure_reason().map(str::to_string),
            transcript_uri: job
                .transcript()
                .and_then(|t| t.transcript_file_uri())
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status() {
        assert_eq!(
            map_status(&TranscriptionJobStatus::InProgress).unwrap(),
            JobStatus::InProgress
        );
        assert_eq!(
            map_status(&TranscriptionJobStatus::Completed).unwrap(),
            JobStatus::Completed
        );
        assert_eq!(
            map_status(&TranscriptionJobStatus::Failed).unwrap(),
            JobStatus::Failed
        );
        assert!(map_status(&TranscriptionJobStatus::from("PAUSED")).is_err());
    }
}
