//! Background Removal CLI Tool
//!
//! Drives one session from the terminal: select the input file, request the
//! removal, and save the result as `background-removed.png`.

use super::config::CliConfigBuilder;
use crate::{
    adapter::GeminiBackgroundRemover,
    config::RemovalConfig,
    controller::SessionController,
    services::ImageIOService,
    session::SessionState,
    tracing_config::{init_cli_tracing, spans},
    view::{Screen, ViewModel, LOADER_TEXT},
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, Instrument};

/// Remove image backgrounds with the Gemini API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "gemini-bgremove")]
pub struct Cli {
    /// Input image file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory to save background-removed.png into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Gemini model name [default: gemini-2.5-flash-image-preview or $GEMINI_MODEL]
    #[arg(short, long)]
    pub model: Option<String>,

    /// API base URL [default: $GEMINI_ENDPOINT or the public endpoint]
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the rendered view as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let session_id = init_cli_tracing(cli.verbose, std::env::var("RUST_LOG").ok())
        .context("Failed to initialize tracing")?;

    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;
    let span = spans::session(&session_id, &config.model);

    run(&cli, config).instrument(span).await
}

async fn run(cli: &Cli, config: RemovalConfig) -> Result<()> {
    let start_time = Instant::now();

    let remover = GeminiBackgroundRemover::new(config)
        .context("Failed to create background removal adapter")?;
    let controller = SessionController::new(remover);

    let image = ImageIOService::load_source_image(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    let file_span = spans::file_processing(&cli.input, image.mime_type());

    controller.select_image(image);
    print_view(&controller.view(), cli.json)?;

    let task = controller
        .request_removal()
        .context("Session did not accept the removal request")?;

    let spinner = processing_spinner()?;
    let settled = task.settled().instrument(file_span).await;
    spinner.finish_and_clear();
    settled?;

    print_view(&controller.view(), cli.json)?;

    match controller.snapshot().state() {
        SessionState::Succeeded { result_handle, .. } => {
            let saved = ImageIOService::save_download(result_handle, &cli.output)
                .context("Failed to save result")?;
            info!(
                path = %saved.display(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Result saved"
            );
            println!("Saved {}", saved.display());
            Ok(())
        },
        SessionState::Failed { message, .. } => anyhow::bail!("{}", message),
        other => anyhow::bail!("Unexpected session state: {}", other.status()),
    }
}

fn processing_spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .context("Invalid progress template")?,
    );
    spinner.set_message(LOADER_TEXT);
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

fn print_view(view: &ViewModel, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(view).context("Failed to serialize view")?
        );
    } else {
        print!("{}", format_view(view));
    }
    Ok(())
}

/// Plain-text rendering of a view for the terminal
pub fn format_view(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.subtitle);
    let _ = writeln!(out);

    match &view.screen {
        Screen::Uploader => {
            let _ = writeln!(out, "Select an image to begin.");
        },
        Screen::Preview { image, .. } => {
            let _ = writeln!(out, "{}: {}", image.title, image.src.mime_type());
        },
        Screen::Processing { loader_text } => {
            let _ = writeln!(out, "{}", loader_text);
        },
        Screen::Result {
            original, result, ..
        } => {
            let _ = writeln!(out, "{}: {}", original.title, original.src.mime_type());
            let _ = writeln!(
                out,
                "{}: {} ({} base64 chars)",
                result.title,
                result.src.mime_type(),
                result.src.payload().len()
            );
        },
        Screen::Error {
            heading, message, ..
        } => {
            let _ = writeln!(out, "{}", heading);
            let _ = writeln!(out, "{}", message);
        },
    }

    let actions = view.screen.actions();
    if !actions.is_empty() {
        let labels: Vec<&str> = actions.iter().map(|action| action.label()).collect();
        let _ = writeln!(out, "[{}]", labels.join("] ["));
    }

    let _ = writeln!(out, "{}", view.footer);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::encoding::DataUrl;
    use crate::session::{Session, SourceImage};
    use crate::view::render;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "gemini-bgremove",
            "in.png",
            "-o",
            "out",
            "-vv",
            "--timeout",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("in.png"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.timeout, Some(30));
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["gemini-bgremove"]).is_err());
    }

    #[test]
    fn test_format_preview() {
        let mut session = Session::new();
        session.select_image(SourceImage::new(b"x".to_vec(), "image/jpeg"));
        let text = format_view(&render(&session));

        assert!(text.starts_with("AI Background Remover\n"));
        assert!(text.contains("Your Image: image/jpeg"));
        assert!(text.contains("[Remove Background] [Choose a different image]"));
        assert!(text.trim_end().ends_with("Powered by Gemini API"));
    }

    #[test]
    fn test_format_result_and_error() {
        let mut session = Session::new();
        session.select_image(SourceImage::new(b"x".to_vec(), "image/png"));
        let ticket = session.begin_removal().unwrap().ticket;
        assert!(format_view(&render(&session)).contains(LOADER_TEXT));

        session.complete(ticket, Ok(DataUrl::png("QUJD")));
        let text = format_view(&render(&session));
        assert!(text.contains("Result: image/png (4 base64 chars)"));
        assert!(text.contains("[Download Image] [Start Over]"));

        session.reset();
        session.select_image(SourceImage::new(b"y".to_vec(), "image/png"));
        let ticket = session.begin_removal().unwrap().ticket;
        session.complete(ticket, Err("quota exceeded".to_string()));
        let text = format_view(&render(&session));
        assert!(text.contains("An Error Occurred\nquota exceeded"));
        assert!(text.contains("[Try Again]"));
    }
}
