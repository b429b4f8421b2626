//! # CLI Argument Definitions
//!
//! Command-line structure for `aurum-repricer`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Gold and diamond repricing for the Aurum POS catalog.
#[derive(Debug, Parser)]
#[command(name = "aurum-repricer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to pricing.toml (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reprice a catalog from a fetched price page
    Reprice {
        /// File holding the fetched price page
        #[arg(short, long)]
        page: PathBuf,

        /// Catalog JSON (array of products)
        #[arg(long)]
        products: PathBuf,

        /// Use the configured fallback price when the page cannot be read or parsed
        #[arg(long)]
        allow_fallback: bool,

        /// Store a successfully fetched live price as the new fallback
        #[arg(long)]
        save_fallback: bool,
    },
    /// Price a single item at a given base price
    Quote {
        /// Catalog category code, e.g. gold_local or gold_bars
        #[arg(short = 't', long = "type")]
        jewellery_type: String,

        /// Purity code, e.g. 21K
        #[arg(short, long)]
        purity: Option<String>,

        /// Weight in grams
        #[arg(short, long)]
        weight: Option<Decimal>,

        /// USD ticket price, for diamond items
        #[arg(long)]
        usd_price: Option<Decimal>,

        /// Base price per gram of the reference purity
        #[arg(short, long)]
        base_price: Decimal,
    },
    /// Check an order JSON against the pricing policy
    CheckOrder {
        /// Order JSON (array of order lines)
        #[arg(short, long)]
        order: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reprice() {
        let cli = Cli::try_parse_from([
            "aurum-repricer",
            "--config",
            "pricing.toml",
            "reprice",
            "--page",
            "page.html",
            "--products",
            "catalog.json",
            "--allow-fallback",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("pricing.toml")));
        match cli.command {
            Command::Reprice {
                page,
                allow_fallback,
                save_fallback,
                ..
            } => {
                assert_eq!(page, PathBuf::from("page.html"));
                assert!(allow_fallback);
                assert!(!save_fallback);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_quote() {
        let cli = Cli::try_parse_from([
            "aurum-repricer",
            "quote",
            "-t",
            "gold_bars",
            "-p",
            "24K",
            "-w",
            "7.5",
            "-b",
            "5415",
        ])
        .unwrap();

        match cli.command {
            Command::Quote {
                jewellery_type,
                weight,
                base_price,
                ..
            } => {
                assert_eq!(jewellery_type, "gold_bars");
                assert_eq!(weight, Some(Decimal::new(75, 1)));
                assert_eq!(base_price, Decimal::from(5415));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_weight() {
        let result = Cli::try_parse_from([
            "aurum-repricer",
            "quote",
            "-t",
            "gold_local",
            "-w",
            "heavy",
            "-b",
            "100",
        ]);
        assert!(result.is_err());
    }
}
