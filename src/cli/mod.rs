//! Command line interface of the `aiornot` binary

pub mod batch;
pub mod output;
pub mod token;

use aiornot::{
    AnalysisFilter, AsyncClient, ImageAnalysisType, ImageOptions, MediaSource, ReportClient,
    TextOptions, VideoAnalysisType, VideoOptions,
};
use anyhow::{bail, Context, Result};
use batch::BatchFormat;
use clap::{Args, Parser, Subcommand};
use output::{render, OutputFormat, Presentation};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a log filter, e.g. `aiornot=debug`
const LOG_ENV: &str = "AIORNOT_LOG";

#[derive(Parser)]
#[command(name = "aiornot")]
#[command(author, version, about = "Detect AI-generated images, video, audio and text", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Presentation flags shared by single-report commands
#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Print only the verdict
    #[arg(short, long)]
    pub quiet: bool,
    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,
    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl FormatArgs {
    pub fn use_color(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            console::colors_enabled()
        }
    }

    pub fn presentation(&self) -> Presentation {
        Presentation {
            format: self.format,
            quiet: self.quiet,
            color: self.use_color(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an image file or URL
    Image {
        /// Path or URL of the image
        input: String,
        /// Run only these analysis types
        #[arg(long, value_delimiter = ',')]
        only: Vec<ImageAnalysisType>,
        /// Skip these analysis types
        #[arg(long, value_delimiter = ',', conflicts_with = "only")]
        excluding: Vec<ImageAnalysisType>,
        /// Identifier echoed back by the API
        #[arg(long)]
        external_id: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Analyze a video file or URL
    Video {
        /// Path or URL of the video
        input: String,
        /// Run only these analysis types
        #[arg(long, value_delimiter = ',')]
        only: Vec<VideoAnalysisType>,
        /// Skip these analysis types
        #[arg(long, value_delimiter = ',', conflicts_with = "only")]
        excluding: Vec<VideoAnalysisType>,
        /// Identifier echoed back by the API
        #[arg(long)]
        external_id: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Analyze a voice recording
    Voice {
        /// Path or URL of the audio file
        input: String,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Analyze a music track
    Music {
        /// Path or URL of the audio file
        input: String,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Analyze text
    Text {
        /// Text to analyze, a file path with --file, or "-" for stdin
        source: String,
        /// Treat the source as a file path
        #[arg(short, long)]
        file: bool,
        /// Include per-block annotations
        #[arg(short, long)]
        annotations: bool,
        /// Identifier echoed back by the API
        #[arg(long)]
        external_id: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Analyze many inputs with bounded concurrency
    Batch {
        #[command(subcommand)]
        command: BatchCommand,
    },
    /// Manage the API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
pub enum BatchCommand {
    /// Batch image analysis
    Image {
        #[command(flatten)]
        input: BatchInputArgs,
        #[command(flatten)]
        output: BatchOutputArgs,
        /// Run only these analysis types
        #[arg(long, value_delimiter = ',')]
        only: Vec<ImageAnalysisType>,
        /// Skip these analysis types
        #[arg(long, value_delimiter = ',', conflicts_with = "only")]
        excluding: Vec<ImageAnalysisType>,
    },
    /// Batch video analysis
    Video {
        #[command(flatten)]
        input: BatchInputArgs,
        #[command(flatten)]
        output: BatchOutputArgs,
        /// Run only these analysis types
        #[arg(long, value_delimiter = ',')]
        only: Vec<VideoAnalysisType>,
        /// Skip these analysis types
        #[arg(long, value_delimiter = ',', conflicts_with = "only")]
        excluding: Vec<VideoAnalysisType>,
    },
    /// Batch voice analysis
    Voice {
        #[command(flatten)]
        input: BatchInputArgs,
        #[command(flatten)]
        output: BatchOutputArgs,
    },
    /// Batch music analysis
    Music {
        #[command(flatten)]
        input: BatchInputArgs,
        #[command(flatten)]
        output: BatchOutputArgs,
    },
    /// Batch text analysis; each file's content is one item
    Text {
        #[command(flatten)]
        input: BatchInputArgs,
        #[command(flatten)]
        output: BatchOutputArgs,
        /// Include per-block annotations
        #[arg(short, long)]
        annotations: bool,
    },
}

/// Where batch inputs come from; exactly one mode must be used
#[derive(Args, Debug, Clone)]
pub struct BatchInputArgs {
    /// Files to process
    pub files: Vec<PathBuf>,
    /// Process every matching file in a directory
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Descend into subdirectories of --dir
    #[arg(short, long, requires = "dir")]
    pub recursive: bool,
    /// Read file paths from a CSV column
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// CSV column holding the file paths
    #[arg(long, default_value = "file_path")]
    pub key: String,
    /// Directory that relative CSV paths are resolved against
    #[arg(long, requires = "csv")]
    pub base_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BatchOutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = BatchFormat::Jsonl)]
    pub format: BatchFormat,
    /// Write JSONL results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Always show a progress bar
    #[arg(long, conflicts_with = "no_progress")]
    pub progress: bool,
    /// Never show a progress bar
    #[arg(long)]
    pub no_progress: bool,
    /// Maximum concurrent requests (defaults depend on the media kind)
    #[arg(short, long)]
    pub concurrency: Option<usize>,
    /// Stop launching new items after the first failure
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Check that the API is reachable with the configured token
    Check,
    /// Prompt for an API key and save it
    Config,
}

/// Install the stderr log subscriber
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run a parsed command line, returning the process exit code
pub async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Token { action } => token::execute(action).await,
        Commands::Batch { command } => {
            let client = connect()?;
            batch::execute(command, &client).await
        }
        command => {
            let client = connect()?;
            println!("{}", analyze(command, &client).await?);
            Ok(0)
        }
    }
}

fn connect() -> Result<AsyncClient> {
    let api_key = token::load_api_key()?;
    Ok(AsyncClient::new(token::client_config(api_key))?)
}

/// Run a single-report command and render its result
pub async fn analyze(command: Commands, client: &dyn ReportClient) -> Result<String> {
    match command {
        Commands::Image {
            input,
            only,
            excluding,
            external_id,
            format,
        } => {
            let options = ImageOptions {
                filter: AnalysisFilter::from_lists(only, excluding)?,
                external_id,
            };
            let report = client
                .image_report_from_source(MediaSource::parse(&input), &options)
                .await?;
            render(&report, format.presentation())
        }
        Commands::Video {
            input,
            only,
            excluding,
            external_id,
            format,
        } => {
            let options = VideoOptions {
                filter: AnalysisFilter::from_lists(only, excluding)?,
                external_id,
            };
            let report = client
                .video_report_from_source(MediaSource::parse(&input), &options)
                .await?;
            render(&report, format.presentation())
        }
        Commands::Voice { input, format } => {
            let report = client
                .voice_report_from_source(MediaSource::parse(&input))
                .await?;
            render(&report, format.presentation())
        }
        Commands::Music { input, format } => {
            let report = client
                .music_report_from_source(MediaSource::parse(&input))
                .await?;
            render(&report, format.presentation())
        }
        Commands::Text {
            source,
            file,
            annotations,
            external_id,
            format,
        } => {
            let text = read_text_source(&source, file)?;
            let options = TextOptions {
                include_annotations: annotations,
                external_id,
            };
            let report = client.text_report(&text, &options).await?;
            render(&report, format.presentation())
        }
        Commands::Batch { .. } | Commands::Token { .. } => {
            bail!("Not a single-report command")
        }
    }
}

fn read_text_source(source: &str, file: bool) -> Result<String> {
    if source == "-" {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read stdin");
    }
    if file {
        return std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read text file {source}"));
    }
    Ok(source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiornot::{
        Error, ImageReportResponse, MusicReportResponse, TextReportResponse, VideoReportResponse,
        VoiceReportResponse,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every call with canned reports and records what it was asked
    #[derive(Default)]
    struct FakeClient {
        calls: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn voice() -> VoiceReportResponse {
        serde_json::from_value(json!({
            "id": "voice-1",
            "report": {
                "verdict": "human",
                "confidence": 0.9,
                "duration": 3,
                "total_bytes": 10,
                "md5": "m"
            }
        }))
        .unwrap()
    }

    #[async_trait]
    impl ReportClient for FakeClient {
        async fn is_live(&self) -> bool {
            true
        }

        async fn image_report_from_source(
            &self,
            _source: MediaSource,
            _options: &ImageOptions,
        ) -> aiornot::Result<ImageReportResponse> {
            Err(Error::InvalidRequest("unused".to_string()))
        }

        async fn video_report_from_source(
            &self,
            _source: MediaSource,
            _options: &VideoOptions,
        ) -> aiornot::Result<VideoReportResponse> {
            Err(Error::InvalidRequest("unused".to_string()))
        }

        async fn voice_report_from_source(
            &self,
            source: MediaSource,
        ) -> aiornot::Result<VoiceReportResponse> {
            self.record(format!("voice {source}"));
            Ok(voice())
        }

        async fn music_report_from_source(
            &self,
            source: MediaSource,
        ) -> aiornot::Result<MusicReportResponse> {
            self.record(format!("music {source}"));
            Err(Error::FileNotFound(source.to_string()))
        }

        async fn text_report(
            &self,
            text: &str,
            options: &TextOptions,
        ) -> aiornot::Result<TextReportResponse> {
            self.record(format!("text {text} {}", options.include_annotations));
            Ok(serde_json::from_value(json!({
                "id": "text-1",
                "report": {"ai_text": {"is_detected": true, "confidence": 0.85}},
                "metadata": {"word_count": 4, "character_count": 20, "token_count": 5, "md5": "m"}
            }))
            .unwrap())
        }
    }

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args.iter().copied()).unwrap().command
    }

    #[tokio::test]
    async fn test_voice_command_renders_minimal() {
        let client = FakeClient::default();
        let command = parse(&["aiornot", "voice", "clip.mp3", "--format", "minimal"]);

        let rendered = analyze(command, &client).await.unwrap();
        assert_eq!(rendered, "human 0.9000");
        assert_eq!(*client.calls.lock().unwrap(), vec!["voice clip.mp3"]);
    }

    #[tokio::test]
    async fn test_text_command_quiet() {
        let client = FakeClient::default();
        let command = parse(&["aiornot", "text", "Plenty of words here", "-a", "-q"]);

        let rendered = analyze(command, &client).await.unwrap();
        assert_eq!(rendered, "ai");
        assert_eq!(
            *client.calls.lock().unwrap(),
            vec!["text Plenty of words here true"]
        );
    }

    #[tokio::test]
    async fn test_text_command_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essay.txt");
        std::fs::write(&path, "From a file on disk").unwrap();
        let path = path.display().to_string();

        let client = FakeClient::default();
        let command = parse(&["aiornot", "text", &path, "--file"]);
        analyze(command, &client).await.unwrap();
        assert_eq!(
            *client.calls.lock().unwrap(),
            vec!["text From a file on disk false"]
        );
    }

    #[tokio::test]
    async fn test_client_errors_propagate() {
        let client = FakeClient::default();
        let command = parse(&["aiornot", "music", "missing.mp3"]);

        let err = analyze(command, &client).await.unwrap_err();
        assert!(err.to_string().contains("missing.mp3"));
    }

    #[test]
    fn test_analysis_types_parse() {
        match parse(&["aiornot", "image", "a.jpg", "--only", "ai_generated,nsfw"]) {
            Commands::Image { only, excluding, .. } => {
                assert_eq!(
                    only,
                    vec![ImageAnalysisType::AiGenerated, ImageAnalysisType::Nsfw]
                );
                assert!(excluding.is_empty());
            }
            _ => panic!("expected image command"),
        }

        assert!(Cli::try_parse_from(["aiornot", "image", "a.jpg", "--only", "bogus"]).is_err());
        assert!(Cli::try_parse_from([
            "aiornot",
            "video",
            "a.mp4",
            "--only",
            "ai_video",
            "--excluding",
            "ai_music"
        ])
        .is_err());
    }

    #[test]
    fn test_batch_arguments() {
        match parse(&[
            "aiornot", "batch", "voice", "--dir", "clips", "-r", "-c", "4", "--fail-fast",
            "--format", "summary",
        ]) {
            Commands::Batch {
                command: BatchCommand::Voice { input, output },
            } => {
                assert_eq!(input.dir, Some(PathBuf::from("clips")));
                assert!(input.recursive);
                assert_eq!(input.key, "file_path");
                assert_eq!(output.concurrency, Some(4));
                assert!(output.fail_fast);
                assert_eq!(output.format, BatchFormat::Summary);
            }
            _ => panic!("expected batch voice command"),
        }
    }

    #[test]
    fn test_color_flags() {
        let mut format = FormatArgs {
            format: OutputFormat::Table,
            quiet: false,
            color: true,
            no_color: false,
        };
        assert!(format.use_color());

        format.color = false;
        format.no_color = true;
        assert!(!format.presentation().color);
    }
}
