use serde::{Deserialize, Serialize};
use std::fmt;

/// Model certainty score, guaranteed to lie in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Create a confidence score, rejecting values outside `[0, 1]` (and NaN)
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The raw score
    pub fn value(self) -> f64 {
        self.0
    }

    /// The score as a percentage in `[0, 100]`
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("confidence {value} is outside [0, 1]"))
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

/// Classification outcome of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// AI-generated content
    Ai,
    /// Human-made content
    Human,
    /// The service could not decide
    #[serde(alias = "uncertain")]
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ai => "ai",
            Verdict::Human => "human",
            Verdict::Unknown => "unknown",
        }
    }

    /// Verdict implied by a detection flag
    pub fn from_detection(is_detected: bool) -> Self {
        if is_detected {
            Verdict::Ai
        } else {
            Verdict::Human
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status for an individual analysis type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Processed,
    Rejected,
    Errored,
}

/// Detection flag with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBase {
    pub is_detected: bool,
    pub confidence: Confidence,
}

/// Prediction for one known image generator
pub type GeneratorPrediction = PredictionBase;

/// Predictions for known AI image generators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorScheme {
    pub midjourney: GeneratorPrediction,
    pub dall_e: GeneratorPrediction,
    pub stable_diffusion: GeneratorPrediction,
    pub this_person_does_not_exist: GeneratorPrediction,
    pub adobe_firefly: GeneratorPrediction,
    pub flux: GeneratorPrediction,
    pub four_o: GeneratorPrediction,

    /// Generators added to the API after this release
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GeneratorScheme {
    /// Known generators with their display names
    pub fn named(&self) -> [(&'static str, &GeneratorPrediction); 7] {
        [
            ("Midjourney", &self.midjourney),
            ("DALL-E", &self.dall_e),
            ("Stable Diffusion", &self.stable_diffusion),
            ("This Person Does Not Exist", &self.this_person_does_not_exist),
            ("Adobe Firefly", &self.adobe_firefly),
            ("Flux", &self.flux),
            ("4o", &self.four_o),
        ]
    }

    /// The known generator with the highest confidence
    pub fn top(&self) -> (&'static str, &GeneratorPrediction) {
        let named = self.named();
        let mut top = named[0];
        for candidate in &named[1..] {
            if candidate.1.confidence > top.1.confidence {
                top = *candidate;
            }
        }
        top
    }
}

/// AI generated detection report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiGeneratedReport {
    pub verdict: Verdict,
    pub ai: PredictionBase,
    pub human: PredictionBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorScheme>,
}

/// Bounding box coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

/// Region of interest with its bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiReport {
    pub is_detected: bool,
    pub confidence: Confidence,
    pub bbox: BBox,
}

/// Deepfake detection report for images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepfakeReport {
    pub is_detected: bool,
    pub confidence: Confidence,
    #[serde(default)]
    pub rois: Vec<RoiReport>,
}

/// Deepfake detection report for videos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepfakeVideoReport {
    pub is_detected: bool,
    pub confidence: Confidence,
    #[serde(default)]
    pub no_faces_found: bool,
}

/// NSFW content detection report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NsfwReport {
    pub is_detected: bool,
    #[serde(default = "default_nsfw_version")]
    pub version: String,
}

fn default_nsfw_version() -> String {
    "1.0.0".to_string()
}

/// Image quality report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub is_detected: bool,
}

/// A match found during reverse image search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseSearchMatch {
    pub domain: String,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    pub earliest_crawl_date: String,
    pub earliest_backlink: String,
}

/// Reverse image search report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseSearchReport {
    pub was_found: bool,
    #[serde(default)]
    pub matches: Vec<ReverseSearchMatch>,
}

/// Common view over every report type
pub trait Report {
    /// Identifier assigned by the API
    fn id(&self) -> &str;

    /// Headline verdict of the report
    fn verdict(&self) -> Verdict;

    /// Confidence of the headline verdict, when the report carries one
    fn confidence(&self) -> Option<f64>;

    /// Whether the content was classified as AI-generated
    fn is_ai(&self) -> bool {
        self.verdict() == Verdict::Ai
    }
}
