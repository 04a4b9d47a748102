//! `aiornot batch ...` commands

use super::output::paint;
use super::{BatchCommand, BatchInputArgs, BatchOutputArgs};
use aiornot::{
    collect_from_csv, collect_from_dir, process_batch, AnalysisFilter, AsyncClient, BatchOptions,
    BatchSummary, ImageOptions, MediaKind, MediaSource, ProgressObserver, TextOptions,
    VideoOptions,
};
use anyhow::{bail, Context, Result};
use console::{Color, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output format of batch commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BatchFormat {
    /// One JSON object per result, then a summary line
    Jsonl,
    /// One human-readable summary line
    Summary,
    /// No output; only the exit code
    Quiet,
}

/// Run a batch command, returning the process exit code
pub async fn execute(command: BatchCommand, client: &AsyncClient) -> Result<i32> {
    match command {
        BatchCommand::Image {
            input,
            output,
            only,
            excluding,
        } => {
            let options = ImageOptions {
                filter: AnalysisFilter::from_lists(only, excluding)?,
                external_id: None,
            };
            let sources = collect_sources(&input, MediaKind::Image)?;
            let batch = batch_options(&output, MediaKind::Image);
            let progress = Progress::new(&output, sources.len());
            let summary = client
                .image_report_batch(sources, &options, &batch, progress.observer())
                .await;
            progress.finish();
            write_output(&summary?, &output)
        }
        BatchCommand::Video {
            input,
            output,
            only,
            excluding,
        } => {
            let options = VideoOptions {
                filter: AnalysisFilter::from_lists(only, excluding)?,
                external_id: None,
            };
            let sources = collect_sources(&input, MediaKind::Video)?;
            let batch = batch_options(&output, MediaKind::Video);
            let progress = Progress::new(&output, sources.len());
            let summary = client
                .video_report_batch(sources, &options, &batch, progress.observer())
                .await;
            progress.finish();
            write_output(&summary?, &output)
        }
        BatchCommand::Voice { input, output } => {
            let sources = collect_sources(&input, MediaKind::Voice)?;
            let batch = batch_options(&output, MediaKind::Voice);
            let progress = Progress::new(&output, sources.len());
            let summary = client
                .voice_report_batch(sources, &batch, progress.observer())
                .await;
            progress.finish();
            write_output(&summary?, &output)
        }
        BatchCommand::Music { input, output } => {
            let sources = collect_sources(&input, MediaKind::Music)?;
            let batch = batch_options(&output, MediaKind::Music);
            let progress = Progress::new(&output, sources.len());
            let summary = client
                .music_report_batch(sources, &batch, progress.observer())
                .await;
            progress.finish();
            write_output(&summary?, &output)
        }
        BatchCommand::Text {
            input,
            output,
            annotations,
        } => {
            let texts = read_texts(&collect_paths(&input, MediaKind::Text)?);
            if texts.is_empty() {
                bail!("No text content could be read from files");
            }

            let batch = batch_options(&output, MediaKind::Text);
            let options = TextOptions {
                include_annotations: annotations,
                external_id: None,
            };
            let progress = Progress::new(&output, texts.len());
            let summary = process_batch(texts, &batch, progress.observer(), |_, text| {
                let options = &options;
                async move { client.text_report(&text, options).await }
            })
            .await;
            progress.finish();
            write_output(&summary?, &output)
        }
    }
}

fn batch_options(output: &BatchOutputArgs, kind: MediaKind) -> BatchOptions {
    let mut options = BatchOptions::for_kind(kind);
    if let Some(concurrency) = output.concurrency {
        options.concurrency = concurrency;
    }
    options.fail_fast = output.fail_fast;
    options
}

/// Resolve exactly one input mode into a list of paths
pub(crate) fn collect_paths(input: &BatchInputArgs, kind: MediaKind) -> Result<Vec<PathBuf>> {
    let modes = [
        !input.files.is_empty(),
        input.dir.is_some(),
        input.csv.is_some(),
    ];
    match modes.iter().filter(|used| **used).count() {
        0 => bail!("No input specified. Provide files, --csv, or --dir"),
        1 => {}
        _ => bail!("Multiple input sources specified. Use only one of: files, --csv, --dir"),
    }

    let files = if let Some(dir) = &input.dir {
        collect_from_dir(dir, kind, input.recursive)?
    } else if let Some(csv) = &input.csv {
        collect_from_csv(csv, &input.key, input.base_dir.as_deref())?
    } else {
        input.files.clone()
    };

    if files.is_empty() {
        bail!("No files found to process");
    }
    Ok(files)
}

fn collect_sources(input: &BatchInputArgs, kind: MediaKind) -> Result<Vec<MediaSource>> {
    Ok(collect_paths(input, kind)?
        .into_iter()
        .map(MediaSource::Path)
        .collect())
}

/// Read each text file, labelled by its path; unreadable files are skipped with a warning
pub(crate) fn read_texts(paths: &[PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| match std::fs::read_to_string(path) {
            Ok(text) => Some((path.display().to_string(), text)),
            Err(e) => {
                eprintln!(
                    "{} Could not read {}: {e}",
                    paint("Warning:", Color::Yellow, Term::stderr().is_term()),
                    path.display()
                );
                None
            }
        })
        .collect()
}

/// Progress bar on stderr, shown when requested or when stderr is a terminal
struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    fn new(output: &BatchOutputArgs, total: usize) -> Self {
        let enabled = if output.progress {
            true
        } else if output.no_progress {
            false
        } else {
            Term::stderr().is_term()
        };
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::with_template("Processing: {pos}/{len} [{bar:40.cyan/blue}] {elapsed}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar: Some(bar) }
    }

    fn observer(&self) -> Option<&dyn ProgressObserver> {
        self.bar.as_ref().map(|_| self as &dyn ProgressObserver)
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressObserver for Progress {
    fn on_progress(&self, completed: usize, total: usize) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
        }
    }
}

fn write_output<T: Serialize>(summary: &BatchSummary<T>, output: &BatchOutputArgs) -> Result<i32> {
    match output.format {
        BatchFormat::Jsonl => match &output.output {
            Some(path) => write_jsonl_file(summary, path)?,
            None => summary.write_jsonl(io::stdout().lock())?,
        },
        BatchFormat::Summary => {
            let color = Term::stdout().is_term();
            println!("{}", summary_line(summary, color));
        }
        BatchFormat::Quiet => {}
    }

    Ok(if summary.failed > 0 { 1 } else { 0 })
}

fn write_jsonl_file<T: Serialize>(summary: &BatchSummary<T>, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    summary.write_jsonl(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn summary_line<T>(summary: &BatchSummary<T>, color: bool) -> String {
    let failed = if summary.failed > 0 {
        paint(summary.failed, Color::Red, color)
    } else {
        summary.failed.to_string()
    };
    format!(
        "Processed {} files: {} succeeded, {} failed ({:.1}% success rate)",
        summary.total,
        paint(summary.succeeded, Color::Green, color),
        failed,
        summary.success_rate() * 100.0
    )
}
