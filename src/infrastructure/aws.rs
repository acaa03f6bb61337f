use crate::config::TranscribeConfig;
use crate::services::storage::S3StorageService;
use crate::services::transcription::AwsTranscriptionService;
use aws_config::SdkConfig;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Shared SDK configuration for every AWS client the service builds.
///
/// Credentials come from the default provider chain (`AWS_ACCESS_KEY_ID`,
/// `AWS_SECRET_ACCESS_KEY`, profiles, instance roles).
pub async fn load_sdk_config(config: &TranscribeConfig) -> SdkConfig {
    let mut loader = aws_config::from_env();
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    info!(
        "🌎 AWS region: {}",
        sdk_config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| "<unset>".to_string())
    );
    sdk_config
}

pub fn setup_storage(sdk_config: &SdkConfig, config: &TranscribeConfig) -> Arc<S3StorageService> {
    let mut s3_config = aws_sdk_s3::config::Builder::from(sdk_config);
    if let Some(endpoint_url) = &config.s3_endpoint {
        info!("☁️  S3 endpoint override: {}", endpoint_url);
        s3_config = s3_config.endpoint_url(endpoint_url).force_path_style(true);
    }

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());
    info!("🪣 Uploads go to bucket '{}'", config.bucket);

    Arc::new(S3StorageService::new(s3_client, config.bucket.clone()))
}

pub fn setup_transcription(sdk_config: &SdkConfig) -> Arc<AwsTranscriptionService> {
    let client = aws_sdk_transcribe::Client::new(sdk_config);
    Arc::new(AwsTranscriptionService::new(client))
}
