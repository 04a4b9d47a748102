//! aiornot CLI - detect AI-generated images, video, audio and text

mod cli;

use clap::Parser;
use cli::Cli;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    match cli::run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
