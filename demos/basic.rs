use aiornot::{AsyncClient, Config, ImageAnalysisType, ImageOptions, Report, TextOptions};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get API key from environment variable
    let api_key = env::var("AIORNOT_API_KEY")?;

    let client = AsyncClient::new(Config {
        api_key,
        ..Default::default()
    })?;

    if !client.is_live().await {
        println!("The AIORNOT API is not reachable right now.");
        return Ok(());
    }

    // Path to the image to analyze - make sure this file exists
    let file_path = env::args().nth(1).unwrap_or_else(|| "files/test_image.jpg".to_string());

    println!("Checking if file exists at path: {}", file_path);
    if !std::path::Path::new(&file_path).exists() {
        println!("Warning: File does not exist at path: {}", file_path);
        println!("Pass the path of an existing image as the first argument.");
        return Ok(());
    }

    let options = ImageOptions {
        filter: aiornot::AnalysisFilter::Only(vec![
            ImageAnalysisType::AiGenerated,
            ImageAnalysisType::Deepfake,
        ]),
        external_id: Some("basic-demo".to_string()),
    };
    let report = client.image_report_from_file(&file_path, &options).await?;

    println!("Report ID: {}", report.id());
    println!("Verdict: {}", report.verdict());
    if let Some(confidence) = report.confidence() {
        println!("Confidence: {:.4} ({:.1}%)", confidence, confidence * 100.0);
    }
    if let Some((name, prediction)) = report.top_generator() {
        println!("Most likely generator: {} ({})", name, prediction.confidence);
    }
    println!("Deepfake: {}", report.is_deepfake());

    // Text analysis with per-block annotations
    let text = "Artificial intelligence is transforming the way we create and consume content.";
    let text_report = client
        .text_report(
            text,
            &TextOptions {
                include_annotations: true,
                external_id: None,
            },
        )
        .await?;

    println!("\nText verdict: {}", text_report.verdict());
    for (block, confidence) in text_report.annotations().unwrap_or_default() {
        println!("- [{}] {}", confidence, block);
    }

    Ok(())
}
