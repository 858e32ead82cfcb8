//! Background segmentation seam
//!
//! The web handlers only need one capability: turn image bytes into image
//! bytes with the background removed. [`Segmenter`] captures that, so the
//! actual model never leaks into handler code and tests can substitute a
//! deterministic implementation.
//!
//! [`ImglySegmenter`] is the production implementation, backed by the
//! `imgly-bgremove` crate with its pure-Rust Tract backend. The inference
//! session is not `Send`, so it lives on a dedicated worker thread and
//! requests are serialized through a channel.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use imgly_bgremove::{
    BackendType, BackgroundRemovalProcessor, ModelDownloader, ModelSource, ModelSpec, OutputFormat,
    ProcessorConfig, ProcessorConfigBuilder,
};

use crate::error::{BgWebError, Result};

/// Capability to remove the background from raw image bytes
///
/// Input is any raster format the implementation understands; output is
/// an encoded image with the background stripped (PNG with alpha for the
/// production implementation).
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Remove the background, returning the re-encoded image bytes.
    async fn remove_background(&self, image_bytes: Vec<u8>) -> Result<Vec<u8>>;
}

struct SegmentationJob {
    image_bytes: Vec<u8>,
    reply: oneshot::Sender<Result<Vec<u8>>>,
}

/// Segmenter backed by the `imgly-bgremove` Tract backend
pub struct ImglySegmenter {
    jobs: mpsc::Sender<SegmentationJob>,
}

impl ImglySegmenter {
    /// Download (or reuse the cached copy of) the model at `model_url`,
    /// then start the segmentation worker.
    ///
    /// # Errors
    /// Returns an error when the model cannot be downloaded or the
    /// processor configuration is rejected.
    pub async fn from_model_url(model_url: &str) -> Result<Self> {
        info!(url = %model_url, "Fetching segmentation model");
        let downloader = ModelDownloader::new()
            .map_err(|e| BgWebError::processing(format!("model downloader setup failed: {e}")))?;
        let model_id = downloader
            .download_model(model_url, false)
            .await
            .map_err(|e| BgWebError::network_error(format!("model download failed: {e}")))?;
        info!(model_id = %model_id, "Segmentation model ready");
        Self::from_downloaded_model(model_id)
    }

    /// Start the segmentation worker for an already-cached model.
    ///
    /// # Errors
    /// Returns an error when the processor configuration is rejected or
    /// the worker thread cannot be spawned.
    pub fn from_downloaded_model(model_id: impl Into<String>) -> Result<Self> {
        let model_spec = ModelSpec {
            source: ModelSource::Downloaded(model_id.into()),
            variant: None,
        };
        let processor_config = ProcessorConfigBuilder::new()
            .model_spec(model_spec)
            .backend_type(BackendType::Tract)
            .output_format(OutputFormat::Png)
            .build()
            .map_err(|e| {
                BgWebError::processing(format!("invalid segmentation configuration: {e}"))
            })?;

        let (jobs, rx) = mpsc::channel(16);
        std::thread::Builder::new()
            .name("segmentation-worker".to_string())
            .spawn(move || worker_loop(processor_config, rx))
            .map_err(|e| {
                BgWebError::internal(format!("failed to spawn segmentation worker: {e}"))
            })?;

        Ok(Self { jobs })
    }
}

#[async_trait]
impl Segmenter for ImglySegmenter {
    async fn remove_background(&self, image_bytes: Vec<u8>) -> Result<Vec<u8>> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send(SegmentationJob { image_bytes, reply })
            .await
            .map_err(|_| BgWebError::internal("segmentation worker is not running"))?;
        response
            .await
            .map_err(|_| BgWebError::internal("segmentation worker dropped the request"))?
    }
}

/// Blocking loop owning the inference session; exits when the channel closes
fn worker_loop(config: ProcessorConfig, mut rx: mpsc::Receiver<SegmentationJob>) {
    let mut processor = BackgroundRemovalProcessor::new(config).map_err(|e| {
        warn!(error = %e, "Segmentation backend could not be constructed");
        e.to_string()
    });

    while let Some(job) = rx.blocking_recv() {
        let result = match processor.as_mut() {
            Ok(p) => remove_once(p, &job.image_bytes),
            Err(e) => Err(BgWebError::processing(format!(
                "segmentation backend unavailable: {e}"
            ))),
        };
        // Receiver may have hung up (client disconnect); nothing to do then.
        let _ = job.reply.send(result);
    }
    debug!("Segmentation worker shutting down");
}

fn remove_once(processor: &mut BackgroundRemovalProcessor, image_bytes: &[u8]) -> Result<Vec<u8>> {
    let removal = processor
        .process_bytes(image_bytes)
        .map_err(|e| BgWebError::processing(format!("background removal failed: {e}")))?;
    removal
        .to_bytes(OutputFormat::Png, 100)
        .map_err(|e| BgWebError::processing(format!("failed to encode segmented image: {e}")))
}
