use super::common::{DeepfakeVideoReport, PredictionBase, Report, Verdict};
use serde::{Deserialize, Serialize};

/// Metadata about the analyzed video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Duration in seconds
    pub duration: u64,
    pub total_bytes: u64,
    pub md5: String,
    pub audio: String,
    pub video: String,
}

/// Video analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoReport {
    pub ai_video: PredictionBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_voice: Option<PredictionBase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_music: Option<PredictionBase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepfake_video: Option<DeepfakeVideoReport>,
    pub meta: VideoMetadata,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Full response from the video analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoReportResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub report: VideoReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VideoReportResponse {
    /// Check if AI-generated video was detected
    pub fn ai_video_detected(&self) -> bool {
        self.report.ai_video.is_detected
    }

    /// AI video detection confidence
    pub fn ai_video_confidence(&self) -> f64 {
        self.report.ai_video.confidence.value()
    }

    /// `None` when the voice track was not analyzed
    pub fn ai_voice_detected(&self) -> Option<bool> {
        self.report.ai_voice.as_ref().map(|voice| voice.is_detected)
    }

    /// `None` when the music track was not analyzed
    pub fn ai_music_detected(&self) -> Option<bool> {
        self.report.ai_music.as_ref().map(|music| music.is_detected)
    }

    pub fn deepfake_detected(&self) -> Option<bool> {
        self.report
            .deepfake_video
            .as_ref()
            .map(|deepfake| deepfake.is_detected)
    }
}

impl Report for VideoReportResponse {
    fn id(&self) -> &str {
        &self.id
    }

    fn verdict(&self) -> Verdict {
        Verdict::from_detection(self.ai_video_detected())
    }

    fn confidence(&self) -> Option<f64> {
        Some(self.ai_video_confidence())
    }
}
