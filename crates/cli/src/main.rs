//! PrintForge CLI - drive the quote service from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Price one or more design files
//! printforge quote bracket.stl gear.stl
//!
//! # Price with explicit quantity and material
//! printforge quote bracket.stl -q 3 -m PETG
//!
//! # Run the full checkout flow and print the payment link
//! printforge order bracket.stl \
//!     --firstname Ada --lastname Lovelace \
//!     --street "1 Analytical Way" --city Minneapolis \
//!     --state MN --zipcode 55401
//! ```
//!
//! # Commands
//!
//! - `quote` - Upload files and print their estimates
//! - `order` - Full flow: estimates, shipping rates, payment link
//!
//! # Environment Variables
//!
//! - `PRINTFORGE_API_BASE_URL` - Base URL of the quote service (required)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "printforge")]
#[command(author, version, about = "PrintForge quote service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload design files and print their price estimates
    Quote {
        /// Design files to estimate (STL, OBJ)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Quantity per file
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Print material (PLA, ABS, PETG, RESIN)
        #[arg(short, long, default_value = "PLA")]
        material: String,
    },
    /// Run the full checkout flow and print the payment link
    Order {
        /// Design files to order (STL, OBJ)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Quantity per file
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Print material (PLA, ABS, PETG, RESIN)
        #[arg(short, long, default_value = "PLA")]
        material: String,

        /// Company name (optional)
        #[arg(long)]
        company: Option<String>,

        /// First name
        #[arg(long)]
        firstname: String,

        /// Last name
        #[arg(long)]
        lastname: String,

        /// Street address
        #[arg(long)]
        street: String,

        /// City
        #[arg(long)]
        city: String,

        /// Two-letter state code (e.g. MN)
        #[arg(long)]
        state: String,

        /// Five-digit ZIP code
        #[arg(long)]
        zipcode: String,

        /// Shipping rate to use: index into the offered list
        /// (default: cheapest)
        #[arg(long)]
        rate: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote {
            files,
            quantity,
            material,
        } => {
            commands::quote::run(&files, quantity, &material).await?;
        }
        Commands::Order {
            files,
            quantity,
            material,
            company,
            firstname,
            lastname,
            street,
            city,
            state,
            zipcode,
            rate,
        } => {
            let destination = printforge_checkout::ShippingDestination {
                company,
                firstname,
                lastname,
                street,
                city,
                state,
                zipcode,
            };
            commands::order::run(&files, quantity, &material, destination, rate).await?;
        }
    }
    Ok(())
}
