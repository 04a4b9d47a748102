//! # AIORNOT SDK
//!
//! The AIORNOT SDK detects AI-generated images, video, voice, music and text
//! through the AIORNOT API. It ships an asynchronous client ([`AsyncClient`]),
//! a blocking client ([`Client`]) and batch helpers with bounded concurrency.
//!
//! ## Basic Usage Example
//!
//! ```no_run
//! use aiornot::{AsyncClient, Config, ImageOptions, Report};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Initialize with API key
//!     let client = AsyncClient::new(Config {
//!         api_key: std::env::var("AIORNOT_API_KEY")?,
//!         ..Default::default()
//!     })?;
//!
//!     let report = client
//!         .image_report_from_file("./image.jpg", &ImageOptions::default())
//!         .await?;
//!
//!     println!("Verdict: {}", report.verdict());
//!     if let Some(confidence) = report.confidence() {
//!         println!("Confidence: {:.1}%", confidence * 100.0);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Batch Processing
//!
//! ```no_run
//! use aiornot::{AsyncClient, BatchOptions, ImageOptions, MediaKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AsyncClient::from_env()?;
//!
//!     let batch = BatchOptions {
//!         external_id_prefix: Some("nightly".to_string()),
//!         ..BatchOptions::for_kind(MediaKind::Image)
//!     };
//!     let progress = |done: usize, total: usize| eprintln!("{done}/{total}");
//!
//!     let summary = client
//!         .image_report_directory(
//!             "./photos",
//!             true,
//!             &ImageOptions::default(),
//!             &batch,
//!             Some(&progress),
//!         )
//!         .await?;
//!
//!     println!("{}", summary.summary_line());
//!     for failed in summary.errors() {
//!         if let Some(error) = failed.error() {
//!             println!("{}: {}", failed.input, error);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Blocking Client
//!
//! ```no_run
//! use aiornot::{Client, Config, TextOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(Config::from_env())?;
//!
//!     let options = TextOptions {
//!         include_annotations: true,
//!         ..Default::default()
//!     };
//!     let report = client.text_report("Some text long enough to be analyzed.", &options)?;
//!
//!     for (block, confidence) in report.annotations().unwrap_or_default() {
//!         println!("{confidence} {block}");
//!     }
//!
//!     Ok(())
//! }
//! ```

mod batch;
mod blocking;
mod client;
mod config;
mod error;
mod files;
mod http;
mod models;
pub mod utils;

// Re-exports
pub use batch::{
    process_batch, BatchOptions, BatchOutcome, BatchResult, BatchSummary, ProgressObserver,
};
pub use blocking::{BlockingReportClient, Client};
pub use client::{AsyncClient, ReportClient};
pub use config::{Config, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
pub use error::{Error, Result};
pub use files::{collect_from_csv, collect_from_dir, MediaKind};
pub use http::api_paths;
pub use models::{
    AiGeneratedReport, AiTextReport, AnalysisFilter, AnalysisType, Annotation, AudioReport, BBox,
    Confidence, DeepfakeReport, DeepfakeVideoReport, GeneratorPrediction, GeneratorScheme,
    ImageAnalysisType, ImageMetadata, ImageOptions, ImageReport, ImageReportResponse, MediaSource,
    MusicReport, MusicReportResponse, NsfwReport, PredictionBase, QualityReport, Report,
    ReportOptions, ReportStatus, ReverseSearchMatch, ReverseSearchReport, RoiReport, TextMetadata,
    TextOptions, TextReport, TextReportResponse, VideoAnalysisType, VideoMetadata, VideoOptions,
    VideoReport, VideoReportResponse, Verdict, VoiceReport, VoiceReportResponse, MIN_TEXT_LENGTH,
};
