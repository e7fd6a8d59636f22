// src/main.rs
mod config;
mod document;
mod extractors;
mod resolver;
mod sheet;
mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;

use config::RunConfig;
use extractors::tier::CanonicalTier;
use extractors::SchemeRegistry;
use resolver::RateResolver;
use utils::AppError;

/// Command Line Interface for the brokerage trail filler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Brokerage disclosure PDF to extract trail rates from
    #[arg(short, long)]
    pdf: PathBuf,

    /// Spreadsheet of (fund, tier) rows to fill
    #[arg(short, long)]
    sheet: PathBuf,

    /// Where to write the filled workbook
    #[arg(short, long, default_value = "filled_brokerage.xlsx")]
    output: PathBuf,

    /// Optional JSON file overriding the built-in run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Optional path for a JSON dump of the extracted registry
    #[arg(long)]
    dump_registry: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Load run configuration
    let cfg = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    // 4. Extract the scheme registry from the PDF
    let pdf_bytes = std::fs::read(&args.pdf)?;
    tracing::info!(
        "Read {} bytes from {}",
        pdf_bytes.len(),
        args.pdf.display()
    );
    let registry = extractors::extract_scheme_data(&pdf_bytes, &cfg);
    tracing::info!("Extraction finished: {} schemes", registry.len());

    if let Some(path) = &args.dump_registry {
        dump_registry(&registry, path)?;
    }

    // 5. Resolve every spreadsheet row against the registry
    let mut data = sheet::read_sheet(&args.sheet)?;
    let mut resolver = RateResolver::new(&registry, &cfg);
    sheet::fill_rates(&mut data, &mut resolver)?;

    let stats = resolver.stats();
    tracing::info!(
        "Resolution finished. Exact: {}, fuzzy: {}, unresolved: {}",
        stats.exact_hits,
        stats.fuzzy_hits,
        stats.misses
    );

    // 6. Write the filled workbook
    sheet::write_sheet(&data, &args.output)?;
    tracing::info!("Wrote filled workbook to {}", args.output.display());

    Ok(())
}

/// Saves the extracted registry as pretty JSON, for inspection and support.
fn dump_registry(registry: &SchemeRegistry, path: &Path) -> Result<(), AppError> {
    let mut schemes = serde_json::Map::new();
    for (name, card) in registry.iter() {
        let mut rates = serde_json::Map::new();
        for tier in CanonicalTier::ALL {
            let value = match card.get(tier) {
                Some(rate) => serde_json::json!(rate),
                None => serde_json::Value::Null,
            };
            rates.insert(tier.label().to_string(), value);
        }
        schemes.insert(name.clone(), serde_json::Value::Object(rates));
    }

    let dump = serde_json::json!({
        "scheme_count": registry.len(),
        "extracted_at": chrono::Utc::now().to_rfc3339(),
        "schemes": schemes,
    });

    std::fs::write(path, serde_json::to_string_pretty(&dump)?)?;
    tracing::info!("Saved registry dump to {}", path.display());
    Ok(())
}
