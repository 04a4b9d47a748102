use crate::batch::{process_batch, BatchOptions, BatchSummary, ProgressObserver};
use crate::config::Config;
use crate::error::Result;
use crate::files::{collect_from_csv, collect_from_dir, MediaKind};
use crate::http::{self, HttpClient};
use crate::models::{
    ImageOptions, ImageReportResponse, MediaSource, MusicReportResponse, TextOptions,
    TextReportResponse, VideoOptions, VideoReportResponse, VoiceReportResponse,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Multipart file name used for image and video content without a name
pub(crate) const DEFAULT_MEDIA_NAME: &str = "upload";

/// Multipart file name used for audio content without a name
pub(crate) const DEFAULT_AUDIO_NAME: &str = "audio.mp3";

/// The report operations offered by the AIORNOT API
#[async_trait]
pub trait ReportClient: Send + Sync {
    /// Check whether the API is reachable and healthy
    async fn is_live(&self) -> bool;

    async fn image_report_from_source(
        &self,
        source: MediaSource,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse>;

    async fn video_report_from_source(
        &self,
        source: MediaSource,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse>;

    async fn voice_report_from_source(&self, source: MediaSource) -> Result<VoiceReportResponse>;

    async fn music_report_from_source(&self, source: MediaSource) -> Result<MusicReportResponse>;

    async fn text_report(&self, text: &str, options: &TextOptions) -> Result<TextReportResponse>;
}

/// Asynchronous client for the AIORNOT API
#[derive(Debug, Clone)]
pub struct AsyncClient {
    http_client: HttpClient,
}

impl AsyncClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let http_client = HttpClient::new(config)?;
        Ok(Self { http_client })
    }

    /// Create a client configured from `AIORNOT_API_KEY` and `AIORNOT_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        self.http_client.config()
    }

    /// Check whether the API is live. Never fails; errors count as not live
    pub async fn is_live(&self) -> bool {
        self.http_client.is_live().await
    }

    /// Analyze an image held in memory
    pub async fn image_report(
        &self,
        data: Vec<u8>,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        self.image_report_from_source(MediaSource::bytes(data), options)
            .await
    }

    /// Analyze an image file
    pub async fn image_report_from_file(
        &self,
        path: impl AsRef<Path>,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        self.image_report_from_source(MediaSource::from(path.as_ref()), options)
            .await
    }

    /// Analyze an image from any source
    pub async fn image_report_from_source(
        &self,
        source: MediaSource,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_MEDIA_NAME).await?;
        let request = http::image_request(upload, options)?;
        self.http_client.send(request).await
    }

    /// Analyze a video held in memory
    pub async fn video_report(
        &self,
        data: Vec<u8>,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        self.video_report_from_source(MediaSource::bytes(data), options)
            .await
    }

    /// Analyze a video file
    pub async fn video_report_from_file(
        &self,
        path: impl AsRef<Path>,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        self.video_report_from_source(MediaSource::from(path.as_ref()), options)
            .await
    }

    /// Analyze a video from any source
    pub async fn video_report_from_source(
        &self,
        source: MediaSource,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_MEDIA_NAME).await?;
        let request = http::video_request(upload, options)?;
        self.http_client.send(request).await
    }

    /// Analyze voice audio held in memory
    pub async fn voice_report(&self, data: Vec<u8>) -> Result<VoiceReportResponse> {
        self.voice_report_from_source(MediaSource::bytes(data)).await
    }

    /// Analyze a voice audio file
    pub async fn voice_report_from_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<VoiceReportResponse> {
        self.voice_report_from_source(MediaSource::from(path.as_ref()))
            .await
    }

    pub async fn voice_report_from_source(
        &self,
        source: MediaSource,
    ) -> Result<VoiceReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_AUDIO_NAME).await?;
        self.http_client.send(http::voice_request(upload)).await
    }

    /// Analyze music audio held in memory
    pub async fn music_report(&self, data: Vec<u8>) -> Result<MusicReportResponse> {
        self.music_report_from_source(MediaSource::bytes(data)).await
    }

    /// Analyze a music audio file
    pub async fn music_report_from_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<MusicReportResponse> {
        self.music_report_from_source(MediaSource::from(path.as_ref()))
            .await
    }

    pub async fn music_report_from_source(
        &self,
        source: MediaSource,
    ) -> Result<MusicReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_AUDIO_NAME).await?;
        self.http_client.send(http::music_request(upload)).await
    }

    /// Analyze text. Texts shorter than 10 characters are rejected locally
    pub async fn text_report(
        &self,
        text: &str,
        options: &TextOptions,
    ) -> Result<TextReportResponse> {
        let request = http::text_request(text, options)?;
        self.http_client.send(request).await
    }

    /// Analyze many images under a concurrency limit
    pub async fn image_report_batch(
        &self,
        sources: Vec<MediaSource>,
        options: &ImageOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<ImageReportResponse>> {
        process_batch(labeled(sources), batch, progress, |index, source| {
            let options = ImageOptions {
                filter: options.filter.clone(),
                external_id: batch.external_id(index),
            };
            async move { self.image_report_from_source(source, &options).await }
        })
        .await
    }

    /// Analyze many videos under a concurrency limit
    pub async fn video_report_batch(
        &self,
        sources: Vec<MediaSource>,
        options: &VideoOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VideoReportResponse>> {
        process_batch(labeled(sources), batch, progress, |index, source| {
            let options = VideoOptions {
                filter: options.filter.clone(),
                external_id: batch.external_id(index),
            };
            async move { self.video_report_from_source(source, &options).await }
        })
        .await
    }

    /// Analyze many voice recordings under a concurrency limit
    pub async fn voice_report_batch(
        &self,
        sources: Vec<MediaSource>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VoiceReportResponse>> {
        process_batch(labeled(sources), batch, progress, |_, source| {
            self.voice_report_from_source(source)
        })
        .await
    }

    /// Analyze many music tracks under a concurrency limit
    pub async fn music_report_batch(
        &self,
        sources: Vec<MediaSource>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<MusicReportResponse>> {
        process_batch(labeled(sources), batch, progress, |_, source| {
            self.music_report_from_source(source)
        })
        .await
    }

    /// Analyze many texts under a concurrency limit
    pub async fn text_report_batch(
        &self,
        texts: Vec<String>,
        options: &TextOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<TextReportResponse>> {
        let items = texts.into_iter().map(|text| (text.clone(), text)).collect();
        process_batch(items, batch, progress, |index, text| {
            let options = TextOptions {
                include_annotations: options.include_annotations,
                external_id: batch.external_id(index),
            };
            async move { self.text_report(&text, &options).await }
        })
        .await
    }

    /// Analyze every image in a directory, sorted by path
    pub async fn image_report_directory(
        &self,
        directory: impl AsRef<Path>,
        recursive: bool,
        options: &ImageOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<ImageReportResponse>> {
        let files = collect_from_dir(directory.as_ref(), MediaKind::Image, recursive)?;
        self.image_report_batch(into_sources(files), options, batch, progress)
            .await
    }

    /// Analyze the images listed in column `key` of a CSV file
    pub async fn image_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        options: &ImageOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<ImageReportResponse>> {
        let files = collect_from_csv(csv_path.as_ref(), key, base_directory)?;
        self.image_report_batch(into_sources(files), options, batch, progress)
            .await
    }

    /// Analyze the videos listed in column `key` of a CSV file
    pub async fn video_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        options: &VideoOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VideoReportResponse>> {
        let files = collect_from_csv(csv_path.as_ref(), key, base_directory)?;
        self.video_report_batch(into_sources(files), options, batch, progress)
            .await
    }

    /// Analyze the voice recordings listed in column `key` of a CSV file
    pub async fn voice_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VoiceReportResponse>> {
        let files = collect_from_csv(csv_path.as_ref(), key, base_directory)?;
        self.voice_report_batch(into_sources(files), batch, progress)
            .await
    }

    /// Analyze the music tracks listed in column `key` of a CSV file
    pub async fn music_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<MusicReportResponse>> {
        let files = collect_from_csv(csv_path.as_ref(), key, base_directory)?;
        self.music_report_batch(into_sources(files), batch, progress)
            .await
    }
}

#[async_trait]
impl ReportClient for AsyncClient {
    async fn is_live(&self) -> bool {
        AsyncClient::is_live(self).await
    }

    async fn image_report_from_source(
        &self,
        source: MediaSource,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        AsyncClient::image_report_from_source(self, source, options).await
    }

    async fn video_report_from_source(
        &self,
        source: MediaSource,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        AsyncClient::video_report_from_source(self, source, options).await
    }

    async fn voice_report_from_source(&self, source: MediaSource) -> Result<VoiceReportResponse> {
        AsyncClient::voice_report_from_source(self, source).await
    }

    async fn music_report_from_source(&self, source: MediaSource) -> Result<MusicReportResponse> {
        AsyncClient::music_report_from_source(self, source).await
    }

    async fn text_report(&self, text: &str, options: &TextOptions) -> Result<TextReportResponse> {
        AsyncClient::text_report(self, text, options).await
    }
}

fn labeled(sources: Vec<MediaSource>) -> Vec<(String, MediaSource)> {
    sources
        .into_iter()
        .map(|source| (source.to_string(), source))
        .collect()
}

pub(crate) fn into_sources(files: Vec<PathBuf>) -> Vec<MediaSource> {
    files.into_iter().map(MediaSource::Path).collect()
}
