//! Gemini Background Removal CLI Tool
//!
//! Command-line interface for removing image backgrounds through the Gemini API.

#[cfg(feature = "cli")]
use gemini_bgremove::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Please rebuild with --features cli");
    std::process::exit(1);
}
