use clap::{Args, Parser, Subcommand};
use pdf_container_splitter::types::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-split")]
#[command(about = "Send a PDF to the container splitter API, then preview and save the split containers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Container splitter endpoint
    #[arg(long, global = true, env = "PDF_SPLIT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a PDF and render the split containers
    Process(ProcessArgs),

    /// Render a previously saved API response without calling the API
    Render(RenderArgs),
}

#[derive(Args, Clone)]
pub struct OutputArgs {
    /// Directory for the saved split PDFs and the HTML report
    #[arg(short, long, default_value = "./splits")]
    pub output: PathBuf,

    /// Only render to the terminal, write nothing to disk
    #[arg(long)]
    pub no_save: bool,

    /// Skip the HTML report with download links and previews
    #[arg(long)]
    pub no_report: bool,

    /// Open each saved split in the system PDF viewer
    #[arg(long)]
    pub open: bool,

    /// Print the raw JSON response
    #[arg(long)]
    pub show_raw: bool,
}

#[derive(Args)]
pub struct ProcessArgs {
    /// PDF file to upload
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file holding a splitter API response
    #[arg(value_name = "RESPONSE")]
    pub response: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}
