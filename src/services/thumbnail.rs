use std::sync::Arc;
use tracing::{info, warn};

use crate::models::ObjectCreated;
use crate::services::image::{self, THUMBNAIL_WIDTH};
use crate::services::object_store::ObjectStore;
use crate::services::record_store::{RecordStore, RecordStoreError};

/// File suffixes the pipeline acts on. The storage trigger also fires
/// for non-image writes, so anything else is dropped without a word.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Key prefix the upload handler writes originals under. The path
/// segment after it carries the product id the derivative belongs to.
pub const ORIGINAL_PREFIX: &str = "original/";

/// Key prefix marking derivative objects in the destination bucket.
pub const DERIVATIVE_PREFIX: &str = "resized-";

/// Stage a pipeline invocation failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Fetch,
    Transform,
    Store,
    Record,
}

/// Terminal result of a single pipeline invocation. Failures never
/// cross the pipeline boundary; callers always get a value and the
/// trigger sees an implicit success either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed,
    Failed(Stage),
}

/// Orchestrates fetch → transform → store → record-update for one
/// storage-change event. Holds no state across invocations; both
/// backing clients are injected so the pipeline runs against fakes in
/// tests.
pub struct ThumbnailPipeline {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn RecordStore>,
    destination_bucket: String,
    object_store_domain: String,
}

/// `"resized-" + source key`, any path prefix included.
pub fn derive_destination_key(source_key: &str) -> String {
    format!("{DERIVATIVE_PREFIX}{source_key}")
}

/// Suffix after the last dot, lowercased. None when the key has no dot.
fn infer_extension(key: &str) -> Option<String> {
    key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Product id embedded in an `original/<id>/<name>` source key.
fn extract_product_id(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(ORIGINAL_PREFIX)?;
    let (id, _) = rest.split_once('/')?;
    (!id.is_empty()).then_some(id)
}

impl ThumbnailPipeline {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        records: Arc<dyn RecordStore>,
        destination_bucket: String,
        object_store_domain: String,
    ) -> Self {
        Self {
            objects,
            records,
            destination_bucket,
            object_store_domain,
        }
    }

    /// Public URI of a derivative object.
    pub fn public_uri(&self, destination_key: &str) -> String {
        format!(
            "https://{}.{}/{}",
            self.destination_bucket, self.object_store_domain, destination_key
        )
    }

    /// Run the pipeline for one decoded change event. The four calls
    /// are strictly sequential; every failure is terminal for this
    /// invocation and retries are left to the trigger mechanism.
    pub async fn run(&self, event: ObjectCreated) -> PipelineOutcome {
        let Some(extension) = infer_extension(&event.key) else {
            info!(key = %event.key, "could not determine the image type, skipping");
            return PipelineOutcome::Failed(Stage::Validate);
        };

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            info!(key = %event.key, %extension, "unsupported image type, skipping");
            return PipelineOutcome::Failed(Stage::Validate);
        }

        let destination_key = derive_destination_key(&event.key);

        let original = match self.objects.get_object(&event.bucket, &event.key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(bucket = %event.bucket, key = %event.key, error = %e, "failed to fetch original");
                return PipelineOutcome::Failed(Stage::Fetch);
            }
        };

        let thumbnail = match image::resize_to_width(&original, THUMBNAIL_WIDTH) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %event.key, error = %e, "failed to resize image");
                return PipelineOutcome::Failed(Stage::Transform);
            }
        };

        if let Err(e) = self
            .objects
            .put_object(
                &self.destination_bucket,
                &destination_key,
                thumbnail,
                "image/jpeg",
            )
            .await
        {
            warn!(bucket = %self.destination_bucket, key = %destination_key, error = %e, "failed to store derivative");
            return PipelineOutcome::Failed(Stage::Store);
        }

        let Some(product_id) = extract_product_id(&event.key) else {
            warn!(key = %event.key, "source key carries no product id, derivative left without a record");
            return PipelineOutcome::Failed(Stage::Record);
        };

        let image_uri = self.public_uri(&destination_key);
        match self.records.update_image_uri(product_id, &image_uri).await {
            Ok(_) => {
                info!(
                    source = %format!("{}/{}", event.bucket, event.key),
                    destination = %format!("{}/{}", self.destination_bucket, destination_key),
                    "successfully resized and recorded thumbnail"
                );
                PipelineOutcome::Completed
            }
            Err(RecordStoreError::NotFound(id)) => {
                // Accepted gap: the derivative stays in storage, orphaned
                warn!(product_id = %id, "no product record for upload, derivative is orphaned");
                PipelineOutcome::Failed(Stage::Record)
            }
            Err(e) => {
                warn!(%product_id, error = %e, "failed to update product record");
                PipelineOutcome::Failed(Stage::Record)
            }
        }
    }
}
