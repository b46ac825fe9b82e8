use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait};
use thiserror::Error;

use crate::entities::{prelude::*, products};

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("product record {0} not found")]
    NotFound(String),

    #[error("record store unavailable: {0}")]
    Unavailable(#[from] DbErr),
}

/// Product table access for the CRUD handlers and the pipeline's final
/// update step.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_product(
        &self,
        product_id: &str,
        name: &str,
        description: &str,
    ) -> Result<products::Model, RecordStoreError>;

    /// Unordered full scan of the product table.
    async fn list_products(&self) -> Result<Vec<products::Model>, RecordStoreError>;

    async fn delete_product(&self, product_id: &str) -> Result<(), RecordStoreError>;

    /// Partial update touching only the image-URI attribute. Fails with
    /// `NotFound` if no record matches; never creates one.
    async fn update_image_uri(
        &self,
        product_id: &str,
        image_uri: &str,
    ) -> Result<products::Model, RecordStoreError>;
}

pub struct SeaOrmRecordStore {
    db: DatabaseConnection,
}

impl SeaOrmRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SeaOrmRecordStore {
    async fn create_product(
        &self,
        product_id: &str,
        name: &str,
        description: &str,
    ) -> Result<products::Model, RecordStoreError> {
        let model = products::ActiveModel {
            product_id: Set(product_id.to_string()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            // The thumbnail pipeline fills this in later
            image_uri: Set(String::new()),
            created_at: Set(Some(Utc::now())),
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn list_products(&self) -> Result<Vec<products::Model>, RecordStoreError> {
        Ok(Products::find().all(&self.db).await?)
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), RecordStoreError> {
        // Deleting an unknown id is a no-op, matching put-style idempotence
        Products::delete_by_id(product_id.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn update_image_uri(
        &self,
        product_id: &str,
        image_uri: &str,
    ) -> Result<products::Model, RecordStoreError> {
        let existing = Products::find_by_id(product_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RecordStoreError::NotFound(product_id.to_string()))?;

        let mut active: products::ActiveModel = existing.into();
        active.image_uri = Set(image_uri.to_string());

        Ok(active.update(&self.db).await?)
    }
}
