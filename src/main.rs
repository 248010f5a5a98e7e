//! Report generation binary - renders one export request to a file
//!
//! Usage:
//!   cargo run -- request.json            # Render using REPORT_FORMAT
//!   cargo run -- request.json out.pdf    # Render to an explicit path
//!
//! The request file holds `{"progressData": {...}, "businessType": "...", "language": "..."}`.
//!
//! Optional environment variables:
//! - REPORT_FORMAT (pdf, html or text, defaults to pdf)
//! - REPORT_OUTPUT_DIR (defaults to reports)
//! - CHART_WIDTH (defaults to 720)
//! - DEFAULT_BUSINESS_TYPE (defaults to general)

use anyhow::{bail, Context, Result};
use compliance_report::assembler::ReportEngine;
use compliance_report::chart_renderer::PngChartRenderer;
use compliance_report::config::Config;
use compliance_report::i18n::TranslationCatalog;
use compliance_report::snapshot::ExportRequest;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compliance_report=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next() else {
        bail!("Usage: compliance-report <request.json> [output path]");
    };
    let output_override = args.next().map(PathBuf::from);

    let config = Config::from_env()?;

    let raw = fs::read_to_string(&request_path)
        .with_context(|| format!("Failed to read export request {}", request_path))?;
    let request: ExportRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Export request {} is not valid JSON", request_path))?;

    if let Some(kind) = request.report_type.as_deref() {
        info!("Report type '{}' requested, rendering comprehensive report", kind);
    }
    if request.progress_data.is_empty() {
        warn!("Export request carries no usable progress data");
    }

    // Catalog is parsed once and shared by reference
    let catalog = TranslationCatalog::builtin().context("Failed to load translation catalog")?;
    let engine = ReportEngine::new(&catalog, Box::new(PngChartRenderer::new()), config.clone());

    let business_type = request.business_type.as_deref().unwrap_or_default();
    let language = request.language.as_deref().unwrap_or("en");
    let report = engine
        .generate(&request.progress_data, business_type, language)
        .context("Report generation failed")?;

    let output_path = match output_override {
        Some(path) => path,
        None => {
            fs::create_dir_all(&config.output_dir).with_context(|| {
                format!("Failed to create output directory {}", config.output_dir.display())
            })?;
            config.output_dir.join(format!(
                "progress-report-{}-{}.{}",
                report.language.code(),
                chrono::Utc::now().format("%Y%m%d-%H%M%S"),
                report.format.extension()
            ))
        }
    };

    fs::write(&output_path, &report.bytes)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    info!(
        "✓ Wrote {} report ({} bytes) to {}",
        report.language.name(),
        report.bytes.len(),
        output_path.display()
    );
    if !report.outcome.charts_rendered {
        info!("Charts were unavailable; the report carries the fallback notice");
    }
    info!(
        "Translation lookups: {} ({} missing)",
        report.translation.lookups, report.translation.misses
    );

    Ok(())
}
