//! # Receipt Renderer
//!
//! Renders a transaction record (JSON) into a printable HTML receipt.
//!
//! ## Usage
//! ```bash
//! # Print to stdout
//! cargo run -p till-receipt --bin render-receipt -- --input sale.json
//!
//! # Write to a file with a custom config
//! cargo run -p till-receipt --bin render-receipt -- \
//!     -i sale.json -o receipt.html -c ./receipt.toml
//!
//! # More logging
//! RUST_LOG=till_receipt=trace cargo run -p till-receipt --bin render-receipt -- -i sale.json
//! ```

use std::env;
use std::io::Write;
use std::path::PathBuf;
use till_core::TransactionRecord;
use till_receipt::{ReceiptConfig, ReceiptPrinter};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Till Receipt Renderer");
    println!();
    println!("Usage: render-receipt --input <FILE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -i, --input <FILE>     Transaction record JSON (required)");
    println!("  -o, --output <FILE>    HTML output path (default: stdout)");
    println!("  -c, --config <FILE>    receipt.toml path (default: platform config dir)");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                if i + 1 < args.len() {
                    input = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--output" | "-o" => {
                if i + 1 < args.len() {
                    output = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let Some(input) = input else {
        print_help();
        return Err("missing required --input <FILE>".into());
    };

    init_tracing();

    let config = ReceiptConfig::load(config_path)?;
    let json = std::fs::read_to_string(&input)?;
    let record = TransactionRecord::from_json(&json)?;
    info!(?input, identifier = %record.identifier, "Rendering receipt");

    let printer = ReceiptPrinter::new(config);
    let document = printer.render_async(record).await?;

    match output {
        Some(path) => {
            std::fs::write(&path, document.as_str())?;
            info!(?path, bytes = document.len(), "Receipt written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(document.as_str().as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
