use super::common::{Confidence, Report, Verdict};
use serde::{Deserialize, Serialize};

/// Voice or music analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioReport {
    pub verdict: Verdict,
    pub confidence: Confidence,
    /// Duration in seconds
    pub duration: u64,
    pub total_bytes: u64,
    pub md5: String,
}

/// Voice analysis report
pub type VoiceReport = AudioReport;

/// Music analysis report
pub type MusicReport = AudioReport;

/// Full response from the voice analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceReportResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub report: VoiceReport,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Full response from the music analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicReportResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub report: MusicReport,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Report for VoiceReportResponse {
    fn id(&self) -> &str {
        &self.id
    }

    fn verdict(&self) -> Verdict {
        self.report.verdict
    }

    fn confidence(&self) -> Option<f64> {
        Some(self.report.confidence.value())
    }
}

impl Report for MusicReportResponse {
    fn id(&self) -> &str {
        &self.id
    }

    fn verdict(&self) -> Verdict {
        self.report.verdict
    }

    fn confidence(&self) -> Option<f64> {
        Some(self.report.confidence.value())
    }
}
