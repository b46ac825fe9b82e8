use crate::models::ObjectCreated;
use crate::services::thumbnail::ThumbnailPipeline;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Owns the receiving end of the event channel and fans every
/// notification out to its own detached pipeline task. The sender side
/// never waits on an outcome.
pub struct ThumbnailWorker {
    pipeline: Arc<ThumbnailPipeline>,
    events: mpsc::Receiver<ObjectCreated>,
    shutdown: watch::Receiver<bool>,
}

impl ThumbnailWorker {
    pub fn new(
        pipeline: Arc<ThumbnailPipeline>,
        events: mpsc::Receiver<ObjectCreated>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            pipeline,
            events,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("🚀 Thumbnail worker started");

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::info!("🛑 Thumbnail worker shutting down");
                    break;
                }
                event = self.events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("🛑 Event channel closed, thumbnail worker exiting");
                        break;
                    };

                    // Events for different keys run fully in parallel;
                    // duplicate deliveries are safe because both writes
                    // are idempotent.
                    let pipeline = self.pipeline.clone();
                    tokio::spawn(async move {
                        pipeline.run(event).await;
                    });
                }
            }
        }
    }
}
