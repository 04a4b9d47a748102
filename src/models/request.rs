use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Shorter texts are rejected before any request is sent
pub const MIN_TEXT_LENGTH: usize = 10;

/// An analysis type that can be selected with `only` / `excluding`
pub trait AnalysisType: Copy + fmt::Debug + Send + Sync + 'static {
    /// Wire name of the analysis type
    fn as_str(&self) -> &'static str;
}

/// Analysis types available for image reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAnalysisType {
    AiGenerated,
    Deepfake,
    Nsfw,
    Quality,
    ReverseSearch,
}

impl ImageAnalysisType {
    pub const ALL: [ImageAnalysisType; 5] = [
        ImageAnalysisType::AiGenerated,
        ImageAnalysisType::Deepfake,
        ImageAnalysisType::Nsfw,
        ImageAnalysisType::Quality,
        ImageAnalysisType::ReverseSearch,
    ];
}

impl AnalysisType for ImageAnalysisType {
    fn as_str(&self) -> &'static str {
        match self {
            ImageAnalysisType::AiGenerated => "ai_generated",
            ImageAnalysisType::Deepfake => "deepfake",
            ImageAnalysisType::Nsfw => "nsfw",
            ImageAnalysisType::Quality => "quality",
            ImageAnalysisType::ReverseSearch => "reverse_search",
        }
    }
}

/// Analysis types available for video reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoAnalysisType {
    AiVideo,
    AiMusic,
    AiVoice,
    DeepfakeVideo,
}

impl VideoAnalysisType {
    pub const ALL: [VideoAnalysisType; 4] = [
        VideoAnalysisType::AiVideo,
        VideoAnalysisType::AiMusic,
        VideoAnalysisType::AiVoice,
        VideoAnalysisType::DeepfakeVideo,
    ];
}

impl AnalysisType for VideoAnalysisType {
    fn as_str(&self) -> &'static str {
        match self {
            VideoAnalysisType::AiVideo => "ai_video",
            VideoAnalysisType::AiMusic => "ai_music",
            VideoAnalysisType::AiVoice => "ai_voice",
            VideoAnalysisType::DeepfakeVideo => "deepfake_video",
        }
    }
}

macro_rules! impl_analysis_type_str {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                <$ty>::ALL
                    .into_iter()
                    .find(|kind| kind.as_str() == s)
                    .ok_or_else(|| {
                        let valid: Vec<&str> =
                            <$ty>::ALL.iter().map(|kind| kind.as_str()).collect();
                        Error::InvalidRequest(format!(
                            "Unknown analysis type '{s}'. Valid types: {}",
                            valid.join(", ")
                        ))
                    })
            }
        }
    };
}

impl_analysis_type_str!(ImageAnalysisType);
impl_analysis_type_str!(VideoAnalysisType);

/// Selection of analysis types to run.
///
/// `Only` and `Excluding` are mutually exclusive selection modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFilter<T> {
    /// Run every analysis type the endpoint offers
    All,
    /// Run only the listed types
    Only(Vec<T>),
    /// Run everything except the listed types
    Excluding(Vec<T>),
}

impl<T> Default for AnalysisFilter<T> {
    fn default() -> Self {
        AnalysisFilter::All
    }
}

impl<T: AnalysisType> AnalysisFilter<T> {
    /// Build a filter from separate `only` / `excluding` lists, as given on a command line
    pub fn from_lists(only: Vec<T>, excluding: Vec<T>) -> Result<Self> {
        match (only.is_empty(), excluding.is_empty()) {
            (true, true) => Ok(AnalysisFilter::All),
            (false, true) => Ok(AnalysisFilter::Only(only)),
            (true, false) => Ok(AnalysisFilter::Excluding(excluding)),
            (false, false) => Err(Error::InvalidRequest(
                "'only' and 'excluding' cannot be combined".to_string(),
            )),
        }
    }

    /// Query parameters for the filter, one pair per selected type
    pub(crate) fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let (name, kinds) = match self {
            AnalysisFilter::All => return Ok(Vec::new()),
            AnalysisFilter::Only(kinds) => ("only", kinds),
            AnalysisFilter::Excluding(kinds) => ("excluding", kinds),
        };

        if kinds.is_empty() {
            return Err(Error::validation(format!(
                "'{name}' requires at least one analysis type"
            )));
        }

        Ok(kinds
            .iter()
            .map(|kind| (name, kind.as_str().to_string()))
            .collect())
    }
}

/// Options for image and video reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions<T> {
    /// Analysis types to run
    pub filter: AnalysisFilter<T>,

    /// External tracking ID echoed back in the report
    pub external_id: Option<String>,
}

impl<T> Default for ReportOptions<T> {
    fn default() -> Self {
        Self {
            filter: AnalysisFilter::All,
            external_id: None,
        }
    }
}

/// Options for image reports
pub type ImageOptions = ReportOptions<ImageAnalysisType>;

/// Options for video reports
pub type VideoOptions = ReportOptions<VideoAnalysisType>;

/// Options for text reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Return block-level annotations
    pub include_annotations: bool,

    /// External tracking ID echoed back in the report
    pub external_id: Option<String>,
}

/// Where the media to analyze comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A local file
    Path(PathBuf),
    /// In-memory content
    Bytes {
        data: Vec<u8>,
        file_name: Option<String>,
    },
    /// An http(s) URL; the client downloads it and forwards the content
    Url(String),
}

impl MediaSource {
    /// Interpret a command-line style input: http(s) URLs become `Url`, everything else a `Path`
    pub fn parse(input: &str) -> Self {
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            MediaSource::Url(input.to_string())
        } else {
            MediaSource::Path(PathBuf::from(input))
        }
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        MediaSource::Bytes {
            data: data.into(),
            file_name: None,
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Path(path) => write!(f, "{}", path.display()),
            MediaSource::Bytes {
                file_name: Some(name),
                ..
            } => f.write_str(name),
            MediaSource::Bytes { data, .. } => write!(f, "<{} bytes>", data.len()),
            MediaSource::Url(url) => f.write_str(url),
        }
    }
}

impl From<PathBuf> for MediaSource {
    fn from(path: PathBuf) -> Self {
        MediaSource::Path(path)
    }
}

impl From<&Path> for MediaSource {
    fn from(path: &Path) -> Self {
        MediaSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for MediaSource {
    fn from(data: Vec<u8>) -> Self {
        MediaSource::bytes(data)
    }
}

/// Reject texts the API would refuse anyway
pub(crate) fn validate_text(text: &str) -> Result<()> {
    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return Err(Error::validation(format!(
            "Text must be at least {MIN_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}
