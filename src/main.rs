mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands, OutputArgs, ProcessArgs, RenderArgs};
use pdf_container_splitter::services::exporter::REPORT_FILE_NAME;
use pdf_container_splitter::{
    ApiResponse, ArtifactExporter, ClientConfig, EntryOutcome, ExportConfig, ExportOutcome,
    RenderReport, ResultRenderer, Session, SplitterClient, SplitterError, UploadedDocument,
};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let client_config = ClientConfig {
        api_url: cli.api_url.clone(),
        timeout: Duration::from_secs(cli.timeout),
    };

    let result = match &cli.command {
        Commands::Process(args) => handle_process_command(args, client_config).await,
        Commands::Render(args) => handle_render_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_process_command(args: &ProcessArgs, config: ClientConfig) -> anyhow::Result<()> {
    let client = SplitterClient::new(config).context("Invalid client configuration")?;
    let document = UploadedDocument::from_path(&args.file).await?;

    let mut session = Session::new();
    session.select_file(document);

    info!("Sending file to API at {}...", client.api_url());
    info!("Processing PDF... this might take a moment.");

    match session.process(&client).await {
        Ok(processed) => {
            println!(
                "API call successful! Use the sections below to preview and save the split containers."
            );
            present(&processed.response, &processed.report, &args.output).await
        }
        Err(e) => {
            println!("Error: {}", e);
            if let SplitterError::HttpStatus { body, .. } = e {
                println!("{}", body);
            }
            bail!("request to {} failed", client.api_url())
        }
    }
}

async fn handle_render_command(args: &RenderArgs) -> anyhow::Result<()> {
    info!("Rendering saved response: {}", args.response.display());

    let content = tokio::fs::read_to_string(&args.response)
        .await
        .with_context(|| format!("Failed to read {}", args.response.display()))?;
    let raw = serde_json::from_str(&content).context("Response file is not valid JSON")?;

    let response = ApiResponse::new(raw);
    let report = ResultRenderer::render(&response);
    present(&response, &report, &args.output).await
}

async fn present(
    response: &ApiResponse,
    report: &RenderReport,
    args: &OutputArgs,
) -> anyhow::Result<()> {
    let export = ExportConfig {
        output_dir: args.output.clone(),
        write_report: !args.no_report,
        open_viewer: args.open,
    };

    if args.show_raw {
        println!("\n=== Raw JSON Response ===\n{}", response.pretty());
    }

    match report {
        RenderReport::UnexpectedStructure => {
            println!("API response structure is unexpected. Please check the format of the returned data.");
            if !args.show_raw {
                println!("\n=== Raw JSON Response (for debugging) ===\n{}", response.pretty());
            }
            if !args.no_save {
                write_reports(response, report, &export).await?;
            }
            bail!("unexpected response structure");
        }
        RenderReport::Rendered {
            containers_detected,
            entries,
        } => {
            println!("\n=== Results: {} Containers Detected ===", containers_detected);
            for entry in entries {
                print_entry(entry);
            }
        }
    }

    if args.no_save {
        return Ok(());
    }

    let outcomes = ArtifactExporter::save_all(report, &export.output_dir).await?;
    println!("\nSaved splits:");
    for outcome in &outcomes {
        match outcome {
            ExportOutcome::Saved { path, bytes, .. } => {
                println!("  - {} ({} bytes)", path.display(), bytes);
            }
            ExportOutcome::Failed {
                file_name, reason, ..
            } => {
                println!("  ! {}: {}", file_name, reason);
            }
        }
    }

    write_reports(response, report, &export).await?;

    if export.open_viewer {
        for path in outcomes.iter().filter_map(ExportOutcome::saved_path) {
            if let Err(e) = ArtifactExporter::launch_viewer(path) {
                warn!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    if report.warning_count() > 0 {
        warn!(
            "{} of {} splits could not be rendered",
            report.warning_count(),
            report.entries().len()
        );
    }

    Ok(())
}

async fn write_reports(
    response: &ApiResponse,
    report: &RenderReport,
    export: &ExportConfig,
) -> anyhow::Result<()> {
    let raw_path = ArtifactExporter::write_raw_response(response, &export.output_dir).await?;
    info!("Raw response written to: {}", raw_path.display());

    if export.write_report {
        let report_path = export.output_dir.join(REPORT_FILE_NAME);
        ArtifactExporter::write_html_report(response, report, &report_path).await?;
        println!("Report with downloads and previews: {}", report_path.display());
    }

    Ok(())
}

fn print_entry(entry: &EntryOutcome) {
    match entry {
        EntryOutcome::Ready(artifact) => {
            println!(
                "\n📦 Container: {} (Pages: {})",
                artifact.container, artifact.page_range
            );
            println!("  📥 {}", artifact.download_label());
            println!(
                "  Preview: {} ({} base64 chars)",
                artifact.preview_title(),
                artifact.base64.len()
            );
        }
        EntryOutcome::MissingData {
            container,
            page_range,
            ..
        } => {
            println!("\n📦 Container: {} (Pages: {})", container, page_range);
            println!("  ⚠ {}", entry.message().unwrap_or_default());
        }
        EntryOutcome::Failed { container, .. } => {
            println!("\n📦 Container: {}", container);
            println!("  ✗ {}", entry.message().unwrap_or_default());
        }
    }
}
