use aiornot::{AsyncClient, BatchOptions, MediaKind, MediaSource};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = AsyncClient::from_env()?;

    // Directory with voice recordings to analyze
    let directory = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("files/voices"));

    let files = aiornot::collect_from_dir(&directory, MediaKind::Voice, true)?;
    if files.is_empty() {
        println!("No audio files found in {}", directory.display());
        return Ok(());
    }
    println!("Analyzing {} recordings from {}", files.len(), directory.display());

    let batch = BatchOptions {
        concurrency: 2,
        fail_fast: false,
        external_id_prefix: None,
    };
    let progress = |completed: usize, total: usize| println!("  {}/{} done", completed, total);

    let sources = files.into_iter().map(MediaSource::Path).collect();
    let summary = client
        .voice_report_batch(sources, &batch, Some(&progress))
        .await?;

    println!("\n{}", summary.summary_line());

    for result in &summary.results {
        match (result.result(), result.error()) {
            (Some(report), _) => println!(
                "- {}: {} ({})",
                result.input, report.report.verdict, report.report.confidence
            ),
            (_, Some(error)) => println!(
                "- {}: failed with {}: {}",
                result.input,
                error.kind(),
                error
            ),
            _ => {}
        }
    }

    // Persist the results as JSON lines
    let output = std::fs::File::create("voice_results.jsonl")?;
    summary.write_jsonl(output)?;
    println!("\nResults written to voice_results.jsonl");

    Ok(())
}
