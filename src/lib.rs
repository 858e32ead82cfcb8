#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # Background Removal Web Service
//!
//! A small web backend that pairs image background removal with stock
//! photo search:
//!
//! - `POST /remove-background` accepts a multipart image upload, strips
//!   its background with the `imgly-bgremove` segmentation library, and
//!   returns the result as PNG.
//! - `GET /api/backgrounds` forwards a text query to the Pexels photo API
//!   and relays the `src.large` URL of each result.
//! - `GET /` serves the bundled landing page.
//!
//! Both collaborators sit behind narrow traits ([`Segmenter`] and
//! [`PhotoSearch`]) so handlers can be tested with in-memory fakes and
//! the real implementations swapped without touching routing code.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use bgremove_web::{server, ServerConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::builder()
//!     .pexels_api_key(ServerConfig::api_key_from_env()?)
//!     .build()?;
//! server::run(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The processed image is persisted at a single well-known path
//! (`<storage_dir>/output.png`) and overwritten on every successful
//! request; concurrent removals race on that file by design of the
//! original service.

pub mod cli;
pub mod config;
pub mod error;
pub mod search;
pub mod segmentation;
pub mod server;
pub mod storage;
pub mod tracing_config;

// Public API exports
pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_MODEL_URL, DEFAULT_PEXELS_URL};
pub use error::{BgWebError, Result};
pub use search::{PexelsClient, PhotoSearch, SearchError};
pub use segmentation::{ImglySegmenter, Segmenter};
pub use server::{create_router, AppState};
pub use storage::{decode_image, OutputStore};
pub use tracing_config::{TracingConfig, TracingFormat};
