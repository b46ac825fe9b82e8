#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use product_catalog_backend::entities::products;
use product_catalog_backend::services::object_store::{ObjectStore, ObjectStoreError};
use product_catalog_backend::services::record_store::{RecordStore, RecordStoreError};

#[derive(Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object-store fake with per-operation call counters so tests can
/// assert which network calls a pipeline run attempted.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    pub get_calls: AtomicUsize,
    pub put_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn insert(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn stored(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn get_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        self.stored(bucket, key)
            .map(|o| o.data)
            .ok_or_else(|| ObjectStoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.insert(bucket, key, data, content_type);
        Ok(())
    }
}

/// Record-store fake over a plain map, with an update counter.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<HashMap<String, products::Model>>,
    pub update_calls: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn with_product(product_id: &str, name: &str) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().insert(
            product_id.to_string(),
            products::Model {
                product_id: product_id.to_string(),
                name: name.to_string(),
                description: String::new(),
                image_uri: String::new(),
                created_at: Some(Utc::now()),
            },
        );
        store
    }

    pub fn record(&self, product_id: &str) -> Option<products::Model> {
        self.records.lock().unwrap().get(product_id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create_product(
        &self,
        product_id: &str,
        name: &str,
        description: &str,
    ) -> Result<products::Model, RecordStoreError> {
        let model = products::Model {
            product_id: product_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            image_uri: String::new(),
            created_at: Some(Utc::now()),
        };
        self.records
            .lock()
            .unwrap()
            .insert(product_id.to_string(), model.clone());
        Ok(model)
    }

    async fn list_products(&self) -> Result<Vec<products::Model>, RecordStoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), RecordStoreError> {
        self.records.lock().unwrap().remove(product_id);
        Ok(())
    }

    async fn update_image_uri(
        &self,
        product_id: &str,
        image_uri: &str,
    ) -> Result<products::Model, RecordStoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let mut records = self.records.lock().unwrap();
        let model = records
            .get_mut(product_id)
            .ok_or_else(|| RecordStoreError::NotFound(product_id.to_string()))?;
        model.image_uri = image_uri.to_string();
        Ok(model.clone())
    }
}

/// Encode a blank JPEG of the given dimensions.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}
