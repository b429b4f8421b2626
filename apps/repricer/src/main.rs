//! # Aurum Repricer
//!
//! Command-line front end for the pricing services.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         aurum-repricer                                  │
//! │                                                                         │
//! │  pricing.toml ──► PricingConfig ──┐                                    │
//! │  page.html ─────► FilePriceFeed ──┼──► Repricer ───► report (stdout)   │
//! │  catalog.json ────────────────────┘                                    │
//! │                                                                         │
//! │  order.json ────► OrderGuard ─────────────────────► verdict (stdout)   │
//! │                                                                         │
//! │  logs ──► stderr (RUST_LOG, default "info")                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod args;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use aurum_service::{
    BasePriceResolver, FilePriceFeed, LineCheck, OrderGuard, OrderLine, PriceOrigin,
    PricingConfig, ProductSpec, RepriceReport, Repricer,
};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let config = PricingConfig::load(cli.config.clone()).context("Failed to load pricing config")?;
    info!(
        retention = %config.policy.retention,
        batch_size = config.batch.batch_size,
        "Configuration loaded"
    );

    match cli.command {
        Command::Reprice {
            page,
            products,
            allow_fallback,
            save_fallback,
        } => reprice(
            config,
            cli.config,
            &page,
            &products,
            allow_fallback,
            save_fallback,
        ),
        Command::Quote {
            jewellery_type,
            purity,
            weight,
            usd_price,
            base_price,
        } => {
            let product = ProductSpec {
                id: "quote".to_string(),
                name: String::new(),
                jewellery_type,
                purity,
                weight_g: weight,
                diamond_usd_price: usd_price,
            };
            let outcome = Repricer::new(config)?.price_item(base_price, &product)?;
            print_json(&outcome)
        }
        Command::CheckOrder { order } => check_order(config, &order),
    }
}

fn reprice(
    config: PricingConfig,
    config_path: Option<PathBuf>,
    page: &Path,
    products: &Path,
    allow_fallback: bool,
    save_fallback: bool,
) -> Result<()> {
    let catalog: Vec<ProductSpec> = read_json(products)?;
    let feed = FilePriceFeed::new(page);
    let resolver = BasePriceResolver::from_config(&config);
    let repricer = Repricer::new(config)?;

    let report: RepriceReport = if allow_fallback {
        let resolved = resolver.resolve(&feed);
        let mut report = repricer.reprice(resolved.price, &catalog);
        report.price_origin = Some(resolved.source);
        report
    } else {
        repricer.run(&feed, &catalog)
    };

    print_json(&report)?;

    if !report.success {
        bail!("{}", report.message);
    }

    if save_fallback {
        match (report.base_price, report.price_origin) {
            (Some(price), Some(PriceOrigin::Live)) => {
                PricingConfig::persist_fallback_price(config_path, price)?;
                info!(%price, "Fallback price updated");
            }
            _ => warn!("No live price fetched, fallback price left unchanged"),
        }
    }

    Ok(())
}

/// Output of `check-order`.
#[derive(Debug, Serialize)]
struct OrderVerdict {
    accepted: bool,
    lines: Vec<LineCheck>,
    error: Option<String>,
}

fn check_order(config: PricingConfig, order: &Path) -> Result<()> {
    let lines: Vec<OrderLine> = read_json(order)?;
    let guard = OrderGuard::new(config)?;

    let checks = lines
        .iter()
        .map(|line| guard.check_line(line))
        .collect::<Result<Vec<_>, _>>()?;

    let verdict = match guard.finalize(&lines) {
        Ok(()) => OrderVerdict {
            accepted: true,
            lines: checks,
            error: None,
        },
        Err(e) => OrderVerdict {
            accepted: false,
            lines: checks,
            error: Some(e.to_string()),
        },
    };

    print_json(&verdict)?;

    if !verdict.accepted {
        bail!("Order rejected");
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
