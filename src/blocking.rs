//! Blocking client for the AIORNOT API.
//!
//! [`Client`] mirrors [`AsyncClient`](crate::AsyncClient) method for method.
//! Single reports run on a blocking HTTP client; batch helpers drive the async
//! client on a private current-thread runtime. Do not call it from inside an
//! async runtime.

use crate::batch::{BatchOptions, BatchSummary, ProgressObserver};
use crate::client::{AsyncClient, DEFAULT_AUDIO_NAME, DEFAULT_MEDIA_NAME};
use crate::config::Config;
use crate::error::Result;
use crate::http::{self, BlockingHttpClient};
use crate::models::{
    ImageOptions, ImageReportResponse, MediaSource, MusicReportResponse, TextOptions,
    TextReportResponse, VideoOptions, VideoReportResponse, VoiceReportResponse,
};
use std::future::Future;
use std::path::Path;

/// Blocking counterpart of [`ReportClient`](crate::ReportClient)
pub trait BlockingReportClient: Send + Sync {
    /// Check whether the API is reachable and healthy
    fn is_live(&self) -> bool;

    fn image_report_from_source(
        &self,
        source: MediaSource,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse>;

    fn video_report_from_source(
        &self,
        source: MediaSource,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse>;

    fn voice_report_from_source(&self, source: MediaSource) -> Result<VoiceReportResponse>;

    fn music_report_from_source(&self, source: MediaSource) -> Result<MusicReportResponse>;

    fn text_report(&self, text: &str, options: &TextOptions) -> Result<TextReportResponse>;
}

/// Blocking client for the AIORNOT API
#[derive(Debug, Clone)]
pub struct Client {
    http_client: BlockingHttpClient,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let http_client = BlockingHttpClient::new(config)?;
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
    pub fn is_live(&self) -> bool {
        self.http_client.is_live()
    }

    pub fn image_report(
        &self,
        data: Vec<u8>,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        self.image_report_from_source(MediaSource::bytes(data), options)
    }

    pub fn image_report_from_file(
        &self,
        path: impl AsRef<Path>,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        self.image_report_from_source(MediaSource::from(path.as_ref()), options)
    }

    pub fn image_report_from_source(
        &self,
        source: MediaSource,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_MEDIA_NAME)?;
        self.http_client.send(http::image_request(upload, options)?)
    }

    pub fn video_report(
        &self,
        data: Vec<u8>,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        self.video_report_from_source(MediaSource::bytes(data), options)
    }

    pub fn video_report_from_file(
        &self,
        path: impl AsRef<Path>,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        self.video_report_from_source(MediaSource::from(path.as_ref()), options)
    }

    pub fn video_report_from_source(
        &self,
        source: MediaSource,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_MEDIA_NAME)?;
        self.http_client.send(http::video_request(upload, options)?)
    }

    pub fn voice_report(&self, data: Vec<u8>) -> Result<VoiceReportResponse> {
        self.voice_report_from_source(MediaSource::bytes(data))
    }

    pub fn voice_report_from_file(&self, path: impl AsRef<Path>) -> Result<VoiceReportResponse> {
        self.voice_report_from_source(MediaSource::from(path.as_ref()))
    }

    pub fn voice_report_from_source(&self, source: MediaSource) -> Result<VoiceReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_AUDIO_NAME)?;
        self.http_client.send(http::voice_request(upload))
    }

    pub fn music_report(&self, data: Vec<u8>) -> Result<MusicReportResponse> {
        self.music_report_from_source(MediaSource::bytes(data))
    }

    pub fn music_report_from_file(&self, path: impl AsRef<Path>) -> Result<MusicReportResponse> {
        self.music_report_from_source(MediaSource::from(path.as_ref()))
    }

    pub fn music_report_from_source(&self, source: MediaSource) -> Result<MusicReportResponse> {
        let upload = self.http_client.load(source, DEFAULT_AUDIO_NAME)?;
        self.http_client.send(http::music_request(upload))
    }

    /// Analyze text. Texts shorter than 10 characters are rejected locally
    pub fn text_report(&self, text: &str, options: &TextOptions) -> Result<TextReportResponse> {
        self.http_client.send(http::text_request(text, options)?)
    }

    pub fn image_report_batch(
        &self,
        sources: Vec<MediaSource>,
        options: &ImageOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<ImageReportResponse>> {
        self.run_async(|client| async move {
            client
                .image_report_batch(sources, options, batch, progress)
                .await
        })
    }

    pub fn video_report_batch(
        &self,
        sources: Vec<MediaSource>,
        options: &VideoOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VideoReportResponse>> {
        self.run_async(|client| async move {
            client
                .video_report_batch(sources, options, batch, progress)
                .await
        })
    }

    pub fn voice_report_batch(
        &self,
        sources: Vec<MediaSource>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VoiceReportResponse>> {
        self.run_async(|client| async move {
            client
                .voice_report_batch(sources, batch, progress)
                .await
        })
    }

    pub fn music_report_batch(
        &self,
        sources: Vec<MediaSource>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<MusicReportResponse>> {
        self.run_async(|client| async move {
            client
                .music_report_batch(sources, batch, progress)
                .await
        })
    }

    pub fn text_report_batch(
        &self,
        texts: Vec<String>,
        options: &TextOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<TextReportResponse>> {
        self.run_async(|client| async move {
            client
                .text_report_batch(texts, options, batch, progress)
                .await
        })
    }

    pub fn image_report_directory(
        &self,
        directory: impl AsRef<Path>,
        recursive: bool,
        options: &ImageOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<ImageReportResponse>> {
        let directory = directory.as_ref();
        self.run_async(|client| async move {
            client
                .image_report_directory(directory, recursive, options, batch, progress)
                .await
        })
    }

    pub fn image_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        options: &ImageOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<ImageReportResponse>> {
        let csv_path = csv_path.as_ref();
        self.run_async(|client| async move {
            client
                .image_report_from_csv(csv_path, key, base_directory, options, batch, progress)
                .await
        })
    }

    pub fn video_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        options: &VideoOptions,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VideoReportResponse>> {
        let csv_path = csv_path.as_ref();
        self.run_async(|client| async move {
            client
                .video_report_from_csv(csv_path, key, base_directory, options, batch, progress)
                .await
        })
    }

    pub fn voice_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<VoiceReportResponse>> {
        let csv_path = csv_path.as_ref();
        self.run_async(|client| async move {
            client
                .voice_report_from_csv(csv_path, key, base_directory, batch, progress)
                .await
        })
    }

    pub fn music_report_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        key: &str,
        base_directory: Option<&Path>,
        batch: &BatchOptions,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<BatchSummary<MusicReportResponse>> {
        let csv_path = csv_path.as_ref();
        self.run_async(|client| async move {
            client
                .music_report_from_csv(csv_path, key, base_directory, batch, progress)
                .await
        })
    }

    /// Drive an async client operation to completion on a private runtime
    fn run_async<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(AsyncClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = AsyncClient::new(self.config().clone())?;
        runtime.block_on(operation(client))
    }
}

impl BlockingReportClient for Client {
    fn is_live(&self) -> bool {
        Client::is_live(self)
    }

    fn image_report_from_source(
        &self,
        source: MediaSource,
        options: &ImageOptions,
    ) -> Result<ImageReportResponse> {
        Client::image_report_from_source(self, source, options)
    }

    fn video_report_from_source(
        &self,
        source: MediaSource,
        options: &VideoOptions,
    ) -> Result<VideoReportResponse> {
        Client::video_report_from_source(self, source, options)
    }

    fn voice_report_from_source(&self, source: MediaSource) -> Result<VoiceReportResponse> {
        Client::voice_report_from_source(self, source)
    }

    fn music_report_from_source(&self, source: MediaSource) -> Result<MusicReportResponse> {
        Client::music_report_from_source(self, source)
    }

    fn text_report(&self, text: &str, options: &TextOptions) -> Result<TextReportResponse> {
        Client::text_report(self, text, options)
    }
}
