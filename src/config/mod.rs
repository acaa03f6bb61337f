use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for the transcription pipeline
#[derive(Debug, Clone)]
pub struct TranscribeConfig {
    /// Destination bucket for uploaded audio (required)
    pub bucket: String,

    /// AWS region; falls back to the SDK provider chain when unset
    pub region: Option<String>,

    /// Optional S3-compatible endpoint (e.g. MinIO)
    pub s3_endpoint: Option<String>,

    /// Language code passed to every transcription job (default: "pt-BR")
    pub language_code: String,

    /// Object key prefix for uploads (default: "audio-uploads")
    pub upload_prefix: String,

    /// Job name prefix (default: "transcription-job")
    pub job_name_prefix: String,

    /// Delay between job status checks in milliseconds (default: 4000)
    pub poll_interval_ms: u64,

    /// Upper bound on status checks before giving up (default: 450)
    pub max_poll_attempts: u32,

    /// Maximum request body size in bytes (default: 512 MB)
    pub max_upload_size: usize,

    /// Timeout for fetching the transcript document (default: 30s)
    pub fetch_timeout_secs: u64,
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: None,
            s3_endpoint: None,
            language_code: "pt-BR".to_string(),
            upload_prefix: "audio-uploads".to_string(),
            job_name_prefix: "transcription-job".to_string(),
            poll_interval_ms: 4000,
            max_poll_attempts: 450,
            max_upload_size: 512 * 1024 * 1024,
            fetch_timeout_secs: 30,
        }
    }
}

impl TranscribeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let default = Self::default();

        let bucket = env::var("S3_BUCKET_NAME").context("S3_BUCKET_NAME must be set")?;

        Ok(Self {
            bucket,

            region: env::var("AWS_REGION").ok().filter(|v| !v.is_empty()),

            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),

            language_code: env::var("TRANSCRIBE_LANGUAGE_CODE")
                .unwrap_or(default.language_code),

            upload_prefix: env::var("UPLOAD_PREFIX")
                .map(|v| v.trim_matches('/').to_string())
                .unwrap_or(default.upload_prefix),

            job_name_prefix: env::var("JOB_NAME_PREFIX").unwrap_or(default.job_name_prefix),

            poll_interval_ms: positive_env("POLL_INTERVAL_MS", default.poll_interval_ms),

            max_poll_attempts: positive_env("MAX_POLL_ATTEMPTS", default.max_poll_attempts),

            max_upload_size: positive_env("MAX_UPLOAD_SIZE", default.max_upload_size),

            fetch_timeout_secs: positive_env("FETCH_TIMEOUT_SECS", default.fetch_timeout_secs),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Read a numeric setting that must be non-zero; unparsable or zero values keep the default.
fn positive_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Default + PartialEq + Copy + std::fmt::Display,
{
    let Ok(raw) = env::var(name) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            tracing::warn!(
                "⚠️  Ignoring {}={:?}: expected a positive integer, using {}",
                name,
                raw,
                default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranscribeConfig::default();
        assert_eq!(config.language_code, "pt-BR");
        assert_eq!(config.upload_prefix, "audio-uploads");
        assert_eq!(config.job_name_prefix, "transcription-job");
        assert_eq!(config.poll_interval(), Duration::from_millis(4000));
        assert_eq!(config.max_poll_attempts, 450);
    }

    // Env-mutating assertions live in one test so they cannot race each other.
    #[test]
    fn test_from_env() {
        unsafe { env::remove_var("S3_BUCKET_NAME") };
        assert!(TranscribeConfig::from_env().is_err());

        unsafe {
            env::set_var("S3_BUCKET_NAME", "audio-bucket");
            env::set_var("POLL_INTERVAL_MS", "250");
            env::set_var("MAX_POLL_ATTEMPTS", "not-a-number");
            env::set_var("UPLOAD_PREFIX", "/uploads/");
        }
        let config = TranscribeConfig::from_env().unwrap();
        unsafe {
            env::remove_var("S3_BUCKET_NAME");
            env::remove_var("POLL_INTERVAL_MS");
            env::remove_var("MAX_POLL_ATTEMPTS");
            env::remove_var("UPLOAD_PREFIX");
        }

        assert_eq!(config.bucket, "audio-bucket");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_poll_attempts, 450);
        assert_eq!(config.upload_prefix, "uploads");

        // Zero would mean a busy loop or a poll that gives up before its first check.
        unsafe {
            env::set_var("S3_BUCKET_NAME", "audio-bucket");
            env::set_var("POLL_INTERVAL_MS", "0");
            env::set_var("MAX_POLL_ATTEMPTS", "0");
            env::set_var("MAX_UPLOAD_SIZE", "0");
        }
        let config = TranscribeConfig::from_env().unwrap();
        unsafe {
            env::remove_var("S3_BUCKET_NAME");
            env::remove_var("POLL_INTERVAL_MS");
            env::remove_var("MAX_POLL_ATTEMPTS");
            env::remove_var("MAX_UPLOAD_SIZE");
        }

        assert_eq!(config.poll_interval_ms, 4000);
        assert_eq!(config.max_poll_attempts, 450);
        assert_eq!(config.max_upload_size, 512 * 1024 * 1024);
    }
}
