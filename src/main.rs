mod allocation;
mod catalog;
mod cli;
mod config;
mod declaration;
mod error;
mod heuristics;
mod narrative;
mod pdf_text;
mod render;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use declaration::{DraftRequest, Ed01Draft};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing; stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading config");
            Config::load(path)?
        }
        None => Config::default(),
    };

    match cli.command {
        Commands::Draft {
            invoice,
            packing,
            transport,
            parts,
            html,
            json,
        } => run_draft(&cfg, invoice, packing, transport, parts, html, json).await,
        Commands::Generate { payload, html, json } => run_generate(&cfg, &payload, html, json).await,
        Commands::Allocate {
            input,
            total,
            strict,
            precision,
        } => run_allocate(&cfg, &input, total, strict, precision),
        Commands::Inspect { file } => run_inspect(&file),
    }
}

/// Extraction is blocking; the three documents are read in parallel.
async fn read_document(label: &'static str, path: Option<PathBuf>) -> Option<String> {
    tokio::task::spawn_blocking(move || pdf_text::document_text(label, path.as_deref()))
        .await
        .unwrap_or_else(|e| {
            warn!(doc = label, error = %e, "Extraction task failed");
            None
        })
}

async fn run_draft(
    cfg: &Config,
    invoice: Option<PathBuf>,
    packing: Option<PathBuf>,
    transport: Option<PathBuf>,
    parts: Vec<String>,
    html_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (invoice_text, packing_text, transport_text) = tokio::join!(
        read_document("invoice", invoice),
        read_document("packing", packing),
        read_document("transport", transport),
    );

    let request = DraftRequest {
        selected_parts: parts,
        invoice_text,
        packing_text,
        transport_text,
        ..DraftRequest::default()
    };
    let draft = declaration::build_draft(&request, cfg)?;
    write_outputs(cfg, &draft, html_out, json_out).await
}

async fn run_generate(
    cfg: &Config,
    payload: &Path,
    html_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %payload.display(), "Loading shipment payload");
    let content = std::fs::read_to_string(payload)?;
    let request = DraftRequest {
        payload: Some(serde_json::from_str(&content)?),
        ..DraftRequest::default()
    };
    let draft = declaration::build_draft(&request, cfg)?;
    write_outputs(cfg, &draft, html_out, json_out).await
}

async fn write_outputs(
    cfg: &Config,
    draft: &Ed01Draft,
    html_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = serde_json::to_string_pretty(draft)?;
    match &json_out {
        Some(path) => {
            std::fs::write(path, &payload)?;
            info!(path = %path.display(), "Wrote ED01 payload");
        }
        None => println!("{payload}"),
    }

    if let Some(path) = &html_out {
        let narrator = narrative::narrator_for(&cfg.llm);
        let narrative = narrative::narrate_or_demo(narrator.as_ref(), draft).await?;
        std::fs::write(path, render::render_declaration(draft, &narrative))?;
        info!(path = %path.display(), "Wrote ED01 preview");
    }

    for w in &draft.warnings {
        warn!("{w}");
    }
    info!(
        declaration = %draft.declaration_number,
        difference_kg = draft.weights.difference_kg,
        "OK. Generated ED01 draft successfully."
    );
    Ok(())
}

fn run_allocate(
    cfg: &Config,
    input: &Path,
    total: f64,
    strict: bool,
    precision: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(input)?;
    let raw: Vec<allocation::RawLineItem> = serde_json::from_str(&content)?;

    let mode = if strict {
        allocation::ValidationMode::Strict
    } else {
        cfg.allocation.validation
    };
    let items = allocation::sanitize(&raw, mode)?;
    let result = allocation::allocate(&items, total, precision.unwrap_or(cfg.allocation.precision));

    info!(
        items = result.items.len(),
        mode = ?result.mode,
        declared = result.declared_total,
        allocated = result.allocated_total,
        "Allocation complete"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_inspect(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %file.display(), "Inspecting PDF");

    let Some(text) = pdf_text::extract_text_from_file(file).into_text() else {
        println!("\n⚠ No text could be extracted (scanned or unreadable PDF).\n");
        return Ok(());
    };

    println!("\n--- Extracted Text (first 2000 chars) ---");
    println!("{}", text.chars().take(2000).collect::<String>());
    println!("--- End ---\n");

    let doc = heuristics::parse_document(&text);
    let (filled, total) = doc.coverage();
    println!("--- Parsed Document ---");
    println!("{}", serde_json::to_string_pretty(&doc)?);
    println!("--- End ({filled}/{total} fields, {} items) ---\n", doc.items.len());
    Ok(())
}
