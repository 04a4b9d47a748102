//! Request options and response types for the AIORNOT API

mod audio;
mod common;
mod image;
mod request;
mod text;
mod video;

pub use audio::{AudioReport, MusicReport, MusicReportResponse, VoiceReport, VoiceReportResponse};
pub use common::{
    AiGeneratedReport, BBox, Confidence, DeepfakeReport, DeepfakeVideoReport, GeneratorPrediction,
    GeneratorScheme, NsfwReport, PredictionBase, QualityReport, Report, ReportStatus,
    ReverseSearchMatch, ReverseSearchReport, RoiReport, Verdict,
};
pub use image::{ImageMetadata, ImageReport, ImageReportResponse};
pub use request::{
    AnalysisFilter, AnalysisType, ImageAnalysisType, ImageOptions, MediaSource, ReportOptions,
    TextOptions, VideoAnalysisType, VideoOptions, MIN_TEXT_LENGTH,
};
pub(crate) use request::validate_text;
pub use text::{AiTextReport, Annotation, TextMetadata, TextReport, TextReportResponse};
pub use video::{VideoMetadata, VideoReport, VideoReportResponse};

/// Response body of the health check endpoint
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct LiveResponse {
    #[serde(default)]
    pub is_live: bool,
}
