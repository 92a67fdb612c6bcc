use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Draft a Thai customs import declaration (ED01) from trade documents.
#[derive(Debug, Parser)]
#[command(name = "ed01_draft", about, version)]
pub struct Cli {
    /// TOML config file. Built-in demo defaults are used when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a draft from uploaded PDFs
    Draft {
        /// Commercial invoice (PDF)
        #[arg(long, value_name = "PDF")]
        invoice: Option<PathBuf>,

        /// Packing list (PDF)
        #[arg(long, value_name = "PDF")]
        packing: Option<PathBuf>,

        /// Transport document: B/L, AWB or CMR (PDF)
        #[arg(long, value_name = "PDF")]
        transport: Option<PathBuf>,

        /// Catalog parts to declare when the invoice has no readable lines
        /// (e.g. 'P001,P004'). Default: the whole catalog
        #[arg(long, value_delimiter = ',')]
        parts: Vec<String>,

        /// Write the HTML preview here
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Write the JSON payload here instead of stdout
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Build a draft from a structured shipment payload (JSON)
    Generate {
        /// Shipment JSON: parties, invoice fields, incoterm, origin_country,
        /// ports and items (quantity, unit_price, optional gross_weight)
        #[arg(long, value_name = "FILE")]
        payload: PathBuf,

        /// Write the HTML preview here
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Write the JSON payload here instead of stdout
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Allocate a total weight across line items read from JSON
    Allocate {
        /// JSON array of line items (quantity, unit_price, optional line_weight)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Declared shipment gross weight (kg)
        #[arg(long, allow_negative_numbers = true)]
        total: f64,

        /// Reject malformed numbers instead of treating them as zero
        #[arg(long)]
        strict: bool,

        /// Decimal places (overrides the config)
        #[arg(long)]
        precision: Option<u32>,
    },

    /// Show extracted text and parsed fields of one PDF
    Inspect {
        #[arg(value_name = "PDF")]
        file: PathBuf,
    },
}
