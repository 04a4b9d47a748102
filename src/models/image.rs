use super::common::{
    AiGeneratedReport, DeepfakeReport, GeneratorPrediction, NsfwReport, QualityReport, Report,
    ReportStatus, ReverseSearchReport, Verdict,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about the analyzed image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub md5: Option<String>,
    /// Per analysis type processing status
    #[serde(default)]
    pub processing_status: BTreeMap<String, ReportStatus>,
}

/// Image analysis report containing every requested analysis type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_generated: Option<AiGeneratedReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepfake: Option<DeepfakeReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<NsfwReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_search: Option<ReverseSearchReport>,
    pub meta: ImageMetadata,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Full response from the image analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReportResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub report: ImageReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImageReportResponse {
    /// Check if a deepfake was detected
    pub fn is_deepfake(&self) -> bool {
        self.report
            .deepfake
            .as_ref()
            .map(|deepfake| deepfake.is_detected)
            .unwrap_or(false)
    }

    /// Check if NSFW content was detected
    pub fn is_nsfw(&self) -> bool {
        self.report
            .nsfw
            .as_ref()
            .map(|nsfw| nsfw.is_detected)
            .unwrap_or(false)
    }

    /// Generator with the highest confidence, if generator predictions were returned
    pub fn top_generator(&self) -> Option<(&'static str, &GeneratorPrediction)> {
        self.report
            .ai_generated
            .as_ref()
            .and_then(|ai_generated| ai_generated.generator.as_ref())
            .map(|generator| generator.top())
    }
}

impl Report for ImageReportResponse {
    fn id(&self) -> &str {
        &self.id
    }

    /// `Unknown` when the AI-generated analysis was not run
    fn verdict(&self) -> Verdict {
        self.report
            .ai_generated
            .as_ref()
            .map(|ai_generated| ai_generated.verdict)
            .unwrap_or(Verdict::Unknown)
    }

    fn confidence(&self) -> Option<f64> {
        self.report
            .ai_generated
            .as_ref()
            .map(|ai_generated| ai_generated.ai.confidence.value())
    }
}
