//! Catalog check binary - validates every built-in report language
//!
//! Usage:
//!   cargo run --bin catalog-check          # Human-readable summary
//!   cargo run --bin catalog-check -- --json  # Machine-readable reports
//!
//! Exits non-zero when any language is missing a required key.

use anyhow::{bail, Context, Result};
use compliance_report::i18n::{CatalogValidator, TranslationCatalog, REQUIRED_KEYS};
use serde_json::json;
use tracing::{info, warn};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_check=info".parse()?),
        )
        .init();

    let as_json = std::env::args().skip(1).any(|arg| arg == "--json");

    let catalog = TranslationCatalog::builtin().context("Failed to load translation catalog")?;
    let reports = CatalogValidator::validate_all(&catalog);

    if as_json {
        let body: Vec<_> = reports
            .iter()
            .map(|report| {
                json!({
                    "language": report.language,
                    "errors": report.errors,
                    "warnings": report.warnings,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        info!(
            "Checking {} languages against {} required keys",
            reports.len(),
            REQUIRED_KEYS.len()
        );
        for report in &reports {
            if report.is_clean() {
                info!("✓ {}: clean", report.language);
                continue;
            }
            for error in &report.errors {
                warn!("✗ {}: {}", report.language, error);
            }
            for warning in &report.warnings {
                warn!("! {}: {}", report.language, warning);
            }
        }
    }

    let failed: Vec<&str> = reports
        .iter()
        .filter(|report| report.has_errors())
        .map(|report| report.language)
        .collect();
    if !failed.is_empty() {
        bail!("Catalog incomplete for: {}", failed.join(", "));
    }

    Ok(())
}
