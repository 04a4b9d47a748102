use super::common::{Confidence, Report, Verdict};
use serde::{Deserialize, Serialize};

/// A block of the analyzed text with its AI confidence
pub type Annotation = (String, Confidence);

/// Metadata about the analyzed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMetadata {
    pub word_count: u64,
    pub character_count: u64,
    pub token_count: u64,
    pub md5: String,
}

/// AI text detection report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiTextReport {
    pub is_detected: bool,
    pub confidence: Confidence,
    /// Block-level annotations, in document order (only when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

/// Text analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReport {
    pub ai_text: AiTextReport,
}

/// Full response from the text analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReportResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub report: TextReport,
    pub metadata: TextMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TextReportResponse {
    /// Check if AI-generated text was detected
    pub fn is_detected(&self) -> bool {
        self.report.ai_text.is_detected
    }

    /// Block-level annotations if they were requested
    pub fn annotations(&self) -> Option<&[Annotation]> {
        self.report.ai_text.annotations.as_deref()
    }
}

impl Report for TextReportResponse {
    fn id(&self) -> &str {
        &self.id
    }

    fn verdict(&self) -> Verdict {
        Verdict::from_detection(self.is_detected())
    }

    fn confidence(&self) -> Option<f64> {
        Some(self.report.ai_text.confidence.value())
    }
}
