//! Rendering of single reports for the terminal

use aiornot::{
    Confidence, ImageReportResponse, MusicReportResponse, PredictionBase, Report,
    TextReportResponse, Verdict, VideoReportResponse, VoiceReportResponse,
};
use anyhow::Result;
use console::{style, Color};
use serde::Serialize;

const WIDTH: usize = 60;
const MAX_ANNOTATIONS: usize = 5;
const ANNOTATION_PREVIEW: usize = 50;

/// Output format of single-report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON report
    Json,
    /// Human-readable table
    Table,
    /// Verdict and confidence on one line
    Minimal,
}

/// How a single report should be printed
#[derive(Debug, Clone, Copy)]
pub struct Presentation {
    pub format: OutputFormat,
    pub quiet: bool,
    pub color: bool,
}

/// A report that can be printed as a table
pub trait Render: Report + Serialize {
    fn table(&self, color: bool) -> String;
}

/// Render a report in the requested presentation
pub fn render<R: Render>(report: &R, presentation: Presentation) -> Result<String> {
    if presentation.quiet {
        return Ok(report.verdict().to_string());
    }

    Ok(match presentation.format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Minimal => minimal(report.verdict(), report.confidence()),
        OutputFormat::Table => report.table(presentation.color),
    })
}

fn minimal(verdict: Verdict, confidence: Option<f64>) -> String {
    match confidence {
        Some(confidence) => format!("{verdict} {confidence:.4}"),
        None => verdict.to_string(),
    }
}

pub(crate) fn paint(text: impl std::fmt::Display, color: Color, enabled: bool) -> String {
    style(text).fg(color).force_styling(enabled).to_string()
}

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Ai => Color::Red,
        Verdict::Human => Color::Green,
        Verdict::Unknown => Color::Yellow,
    }
}

fn painted_verdict(verdict: Verdict, color: bool) -> String {
    paint(
        verdict.as_str().to_uppercase(),
        verdict_color(verdict),
        color,
    )
}

fn detection(is_detected: bool, color: bool) -> String {
    if is_detected {
        paint("DETECTED", Color::Red, color)
    } else {
        paint("Not detected", Color::Green, color)
    }
}

fn prediction_line(label: &str, prediction: &PredictionBase, color: bool) -> String {
    let (text, fg) = if prediction.is_detected {
        ("AI", Color::Red)
    } else {
        ("Human", Color::Green)
    };
    format!(
        "  {:<14}{} ({})",
        format!("{label}:"),
        paint(text, fg, color),
        prediction.confidence
    )
}

struct Table {
    lines: Vec<String>,
}

impl Table {
    fn new(title: String) -> Self {
        let rule = "=".repeat(WIDTH);
        Self {
            lines: vec![rule.clone(), format!("  {title}"), rule],
        }
    }

    fn row(&mut self, label: &str, value: impl std::fmt::Display) {
        self.lines
            .push(format!("  {:<14}{value}", format!("{label}:")));
    }

    fn line(&mut self, line: String) {
        self.lines.push(line);
    }

    fn separator(&mut self) {
        self.lines.push("-".repeat(WIDTH));
    }

    fn finish(mut self) -> String {
        self.lines.push("=".repeat(WIDTH));
        self.lines.join("\n")
    }
}

impl Render for ImageReportResponse {
    fn table(&self, color: bool) -> String {
        let report = &self.report;
        let mut table = Table::new(format!("Image Analysis: {}", self.id));

        table.row("Verdict", painted_verdict(self.verdict(), color));
        let confidence = report
            .ai_generated
            .as_ref()
            .map(|ai_generated| ai_generated.ai.confidence.to_string())
            .unwrap_or_else(|| "0.0%".to_string());
        table.row("Confidence", confidence);

        if let Some((name, prediction)) = self.top_generator() {
            if prediction.is_detected {
                table.row("Generator", format!("{name} ({})", prediction.confidence));
            }
        }

        table.separator();

        if let Some(deepfake) = &report.deepfake {
            table.row("Deepfake", detection(deepfake.is_detected, color));
        }
        if let Some(nsfw) = &report.nsfw {
            table.row("NSFW", detection(nsfw.is_detected, color));
        }
        if let Some(quality) = &report.quality {
            let quality = if quality.is_detected {
                paint("High", Color::Green, color)
            } else {
                paint("Low", Color::Yellow, color)
            };
            table.row("Quality", quality);
        }
        if let Some(reverse_search) = &report.reverse_search {
            let found = if reverse_search.was_found {
                format!("{} match(es)", reverse_search.matches.len())
            } else {
                "Not found".to_string()
            };
            table.row("Found online", found);
        }

        table.finish()
    }
}

impl Render for VideoReportResponse {
    fn table(&self, color: bool) -> String {
        let report = &self.report;
        let mut table = Table::new(format!("Video Analysis: {}", self.id));

        table.line(prediction_line("Video", &report.ai_video, color));
        if let Some(voice) = &report.ai_voice {
            table.line(prediction_line("Voice", voice, color));
        }
        if let Some(music) = &report.ai_music {
            table.line(prediction_line("Music", music, color));
        }
        if let Some(deepfake) = &report.deepfake_video {
            table.row(
                "Deepfake",
                format!(
                    "{} ({})",
                    detection(deepfake.is_detected, color),
                    deepfake.confidence
                ),
            );
        }

        table.separator();
        table.row("Duration", format!("{}s", report.meta.duration));
        table.finish()
    }
}

fn audio_table(
    label: &str,
    id: &str,
    verdict: Verdict,
    confidence: Confidence,
    duration: u64,
    color: bool,
) -> String {
    let mut table = Table::new(format!("{label} Analysis: {id}"));
    table.row("Verdict", painted_verdict(verdict, color));
    table.row("Confidence", confidence);
    table.separator();
    table.row("Duration", format!("{duration}s"));
    table.finish()
}

impl Render for VoiceReportResponse {
    fn table(&self, color: bool) -> String {
        audio_table(
            "Voice",
            &self.id,
            self.report.verdict,
            self.report.confidence,
            self.report.duration,
            color,
        )
    }
}

impl Render for MusicReportResponse {
    fn table(&self, color: bool) -> String {
        audio_table(
            "Music",
            &self.id,
            self.report.verdict,
            self.report.confidence,
            self.report.duration,
            color,
        )
    }
}

impl Render for TextReportResponse {
    fn table(&self, color: bool) -> String {
        let ai_text = &self.report.ai_text;
        let mut table = Table::new(format!("Text Analysis: {}", self.id));

        table.row("Verdict", painted_verdict(self.verdict(), color));
        table.row("Confidence", ai_text.confidence);
        table.separator();
        table.row("Words", self.metadata.word_count);
        table.row("Characters", self.metadata.character_count);

        if let Some(annotations) = self.annotations().filter(|a| !a.is_empty()) {
            table.separator();
            table.line("  Annotations:".to_string());
            for (block, confidence) in annotations.iter().take(MAX_ANNOTATIONS) {
                table.line(format!("    [{confidence}] {}", preview(block)));
            }
            if annotations.len() > MAX_ANNOTATIONS {
                table.line(format!(
                    "    ... and {} more",
                    annotations.len() - MAX_ANNOTATIONS
                ));
            }
        }

        table.finish()
    }
}

fn preview(block: &str) -> String {
    if block.chars().count() > ANNOTATION_PREVIEW {
        let head: String = block.chars().take(ANNOTATION_PREVIEW).collect();
        format!("{head}...")
    } else {
        block.to_string()
    }
}
