use crate::services::object_store::S3ObjectStore;
use aws_sdk_s3::config::Region;
use std::env;
use std::sync::Arc;
use tracing::info;

/// Builds the S3 client. With `S3_ENDPOINT` set (MinIO, LocalStack) a
/// static-credential, path-style client is produced; otherwise the
/// ambient AWS environment supplies credentials and endpoints.
pub async fn setup_storage() -> Arc<S3ObjectStore> {
    let region = env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let client = if let Ok(endpoint_url) = env::var("S3_ENDPOINT") {
        let access_key = env::var("S3_ACCESS_KEY").expect("S3_ACCESS_KEY must be set");
        let secret_key = env::var("S3_SECRET_KEY").expect("S3_SECRET_KEY must be set");

        info!("☁️  Object store: {}", endpoint_url);

        let aws_config = aws_config::from_env()
            .endpoint_url(&endpoint_url)
            .region(Region::new(region))
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();

        aws_sdk_s3::Client::from_conf(s3_config)
    } else {
        info!("☁️  Object store: AWS default endpoints ({})", region);

        let aws_config = aws_config::from_env().region(Region::new(region)).load().await;
        aws_sdk_s3::Client::new(&aws_config)
    };

    Arc::new(S3ObjectStore::new(client))
}
