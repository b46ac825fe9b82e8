use std::env;

/// Runtime configuration for the catalog service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bucket that receives client-uploaded originals
    pub source_bucket: String,

    /// Bucket the pipeline writes resized derivatives to. Fixed at
    /// deployment, never computed from the source bucket.
    pub destination_bucket: String,

    /// Public domain used to build derivative image URIs
    pub object_store_domain: String,

    /// Maximum accepted upload body in bytes (default: 16 MB)
    pub max_upload_size: usize,

    /// Address the HTTP server binds to
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_bucket: "product-image-bucket".to_string(),
            destination_bucket: "product-optimized-image-bucket".to_string(),
            object_store_domain: "s3.amazonaws.com".to_string(),
            max_upload_size: 16 * 1024 * 1024, // 16 MB
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            source_bucket: env::var("SOURCE_BUCKET").unwrap_or(default.source_bucket),

            destination_bucket: env::var("DESTINATION_BUCKET").unwrap_or(default.destination_bucket),

            object_store_domain: env::var("OBJECT_STORE_DOMAIN").unwrap_or(default.object_store_domain),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            bind_addr: env::var("BIND_ADDR").unwrap_or(default.bind_addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source_bucket, "product-image-bucket");
        assert_eq!(config.destination_bucket, "product-optimized-image-bucket");
        assert_eq!(config.object_store_domain, "s3.amazonaws.com");
        assert_eq!(config.max_upload_size, 16 * 1024 * 1024);
    }

    #[test]
    fn test_from_env_overrides() {
        unsafe {
            env::set_var("SOURCE_BUCKET", "test-src");
            env::set_var("DESTINATION_BUCKET", "test-dst");
            env::set_var("MAX_UPLOAD_SIZE", "1024");
        }

        let config = AppConfig::from_env();
        assert_eq!(config.source_bucket, "test-src");
        assert_eq!(config.destination_bucket, "test-dst");
        assert_eq!(config.max_upload_size, 1024);

        unsafe {
            env::remove_var("SOURCE_BUCKET");
            env::remove_var("DESTINATION_BUCKET");
            env::remove_var("MAX_UPLOAD_SIZE");
        }
    }
}
