//! Chart rendering to a temporary PNG file.
//!
//! Charts are drafted as SVG markup, rasterized with resvg and written as a
//! PNG into a `tempfile::TempPath` owned by `ChartImage`. The file is removed
//! when the image is dropped, whichever way the caller leaves the scope that
//! embeds it.

use crate::charts::{ChartKind, ChartSpec, Palette};
use maud::{html, Markup};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb::Database, Options, Tree};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::TempPath;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error("Chart '{title}' has {categories} categories but {values} values")]
    MismatchedSeries {
        title: String,
        categories: usize,
        values: usize,
    },

    #[error("Chart '{title}' contains a non-finite value")]
    InvalidValue { title: String },

    #[error("Failed to rasterize chart: {0}")]
    Raster(String),

    #[error("Failed to encode chart PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Failed to write chart image: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered chart image backed by a temporary file.
#[derive(Debug)]
pub struct ChartImage {
    path: TempPath,
}

impl ChartImage {
    pub fn new(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders chart specs into one composite image.
pub trait ChartRenderer: Send + Sync {
    /// Returns `Ok(None)` when there is nothing to draw.
    fn render(&self, specs: &[ChartSpec], title: &str) -> Result<Option<ChartImage>, ChartError>;
}

const PALETTE: [&str; 4] = ["#4CAF50", "#2196F3", "#FF9800", "#9C27B0"];
const PRIORITY_COLORS: [&str; 3] = ["#F44336", "#FF9800", "#4CAF50"];
const STATUS_COLORS: [&str; 2] = ["#4CAF50", "#FFC107"];
const UNIFORM_COLOR: &str = "#2196F3";

const PANEL_WIDTH: f64 = 360.0;
const PANEL_HEIGHT: f64 = 300.0;
const HEADER_HEIGHT: f64 = 48.0;
const COLUMNS: usize = 2;

fn color(palette: Palette, index: usize) -> &'static str {
    match palette {
        Palette::Categorical => PALETTE[index % PALETTE.len()],
        Palette::Priority => PRIORITY_COLORS[index % PRIORITY_COLORS.len()],
        Palette::Status => STATUS_COLORS[index % STATUS_COLORS.len()],
        Palette::Uniform => UNIFORM_COLOR,
    }
}

/// Draws a two-column grid of pie and bar panels as a PNG.
#[derive(Debug, Clone, Default)]
pub struct PngChartRenderer {
    temp_dir: Option<PathBuf>,
}

impl PngChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write images under `dir` instead of the system temp directory.
    pub fn with_temp_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: Some(dir.into()),
        }
    }

    fn write_image(&self, png: &[u8]) -> Result<ChartImage, ChartError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("progress-chart-").suffix(".png");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(png)?;
        file.flush()?;
        Ok(ChartImage::new(file.into_temp_path()))
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, specs: &[ChartSpec], title: &str) -> Result<Option<ChartImage>, ChartError> {
        let drawable: Vec<&ChartSpec> = specs.iter().filter(|spec| !spec.is_empty()).collect();
        if drawable.is_empty() {
            return Ok(None);
        }

        for spec in &drawable {
            if spec.categories.len() != spec.values.len() {
                return Err(ChartError::MismatchedSeries {
                    title: spec.title.clone(),
                    categories: spec.categories.len(),
                    values: spec.values.len(),
                });
            }
            if spec.values.iter().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidValue {
                    title: spec.title.clone(),
                });
            }
        }

        let svg = draft_svg(&drawable, title);
        let png = rasterize(&svg)?;
        let image = self.write_image(&png)?;
        debug!(
            "Rendered {} chart panel(s) to {}",
            drawable.len(),
            image.path().display()
        );
        Ok(Some(image))
    }
}

/// Rasterize SVG markup into an opaque RGB PNG.
static SYSTEM_FONTS: OnceLock<Arc<Database>> = OnceLock::new();

/// System font database, loaded once per process.
fn system_fonts() -> Arc<Database> {
    SYSTEM_FONTS
        .get_or_init(|| {
            let mut fonts = Database::new();
            fonts.load_system_fonts();
            debug!("Loaded {} system font faces for charts", fonts.len());
            Arc::new(fonts)
        })
        .clone()
}

fn rasterize(svg: &str) -> Result<Vec<u8>, ChartError> {
    let options = Options {
        fontdb: system_fonts(),
        ..Options::default()
    };

    let tree = Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| ChartError::Raster(format!("SVG parse failed: {}", e)))?;
    let size = tree.size().to_int_size();

    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| ChartError::Raster("pixmap allocation failed".to_string()))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    // The draft paints an opaque background, so dropping alpha loses nothing
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
        .collect();

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, size.width(), size.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header()?.write_image_data(&rgb)?;

    Ok(out)
}

/// Composite SVG document: a title row, then panels two per row.
fn draft_svg(specs: &[&ChartSpec], title: &str) -> String {
    let rows = specs.len().div_ceil(COLUMNS);
    let width = PANEL_WIDTH * COLUMNS as f64;
    let height = HEADER_HEIGHT + PANEL_HEIGHT * rows as f64;

    let markup = html! {
        svg xmlns="http://www.w3.org/2000/svg"
            viewBox=(format!("0 0 {} {}", width, height))
            width=(width)
            height=(height)
            font-family="Arial, Helvetica, sans-serif" {
            rect width=(width) height=(height) fill="#ffffff" {}
            text x=(width / 2.0) y="32" text-anchor="middle" font-size="20" font-weight="bold" {
                (title)
            }
            @for (index, spec) in specs.iter().enumerate() {
                @let x = PANEL_WIDTH * (index % COLUMNS) as f64;
                @let y = HEADER_HEIGHT + PANEL_HEIGHT * (index / COLUMNS) as f64;
                text x=(x + PANEL_WIDTH / 2.0) y=(y + 24.0) text-anchor="middle" font-size="14" font-weight="bold" {
                    (spec.title)
                }
                @match spec.kind {
                    ChartKind::Pie => { (pie_panel(spec, x, y)) }
                    ChartKind::Bar => { (bar_panel(spec, x, y)) }
                }
            }
        }
    };
    markup.into_string()
}

fn pie_panel(spec: &ChartSpec, x: f64, y: f64) -> Markup {
    let (cx, cy, r) = (x + 120.0, y + 160.0, 90.0);
    let values: Vec<f64> = spec.values.iter().map(|v| v.max(0.0)).collect();
    let total: f64 = values.iter().sum();

    let mut slices = Vec::new();
    let mut angle = -90.0_f64;
    if total > 0.0 {
        for (index, value) in values.iter().enumerate() {
            if *value <= 0.0 {
                continue;
            }
            let sweep = value / total * 360.0;
            let outline = if sweep >= 359.999 {
                None
            } else {
                let (x1, y1) = polar(cx, cy, r, angle);
                let (x2, y2) = polar(cx, cy, r, angle + sweep);
                let large_arc = u8::from(sweep > 180.0);
                Some(format!(
                    "M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r} {r} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
                ))
            };
            slices.push((color(spec.palette, index), outline));
            angle += sweep;
        }
    }

    html! {
        @if total <= 0.0 {
            circle cx=(cx) cy=(cy) r=(r) fill="none" stroke="#cccccc" stroke-width="2" {}
        }
        @for (fill, outline) in &slices {
            @match outline {
                Some(d) => { path d=(d) fill=(fill) stroke="#ffffff" {} }
                None => { circle cx=(cx) cy=(cy) r=(r) fill=(fill) {} }
            }
        }
        @for (index, (category, value)) in spec.categories.iter().zip(&values).enumerate() {
            @let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            @let ly = y + 90.0 + 22.0 * index as f64;
            rect x=(x + 230.0) y=(ly - 10.0) width="12" height="12" fill=(color(spec.palette, index)) {}
            text x=(x + 248.0) y=(ly) font-size="11" {
                (format!("{} ({:.1}%)", category, share))
            }
        }
    }
}

fn bar_panel(spec: &ChartSpec, x: f64, y: f64) -> Markup {
    let (left, top, plot_width, plot_height) = (x + 50.0, y + 50.0, 290.0, 190.0);
    let baseline = top + plot_height;
    let max = spec.values.iter().cloned().fold(0.0_f64, f64::max);
    let slot = plot_width / spec.values.len().max(1) as f64;
    let bar_width = slot * 0.6;
    let (ax, ay) = (x + 18.0, top + plot_height / 2.0);

    html! {
        line x1=(left) y1=(top) x2=(left) y2=(baseline) stroke="#555555" {}
        line x1=(left) y1=(baseline) x2=(left + plot_width) y2=(baseline) stroke="#555555" {}
        @if let Some(axis_label) = &spec.axis_label {
            text x=(ax) y=(ay) font-size="11" text-anchor="middle"
                transform=(format!("rotate(-90 {} {})", ax, ay)) {
                (axis_label)
            }
        }
        @for (index, (category, value)) in spec.categories.iter().zip(&spec.values).enumerate() {
            @let value = value.max(0.0);
            @let height = if max > 0.0 { value / max * plot_height } else { 0.0 };
            @let bx = left + slot * index as f64 + (slot - bar_width) / 2.0;
            @let center = bx + bar_width / 2.0;
            rect x=(format!("{:.2}", bx)) y=(format!("{:.2}", baseline - height))
                width=(format!("{:.2}", bar_width)) height=(format!("{:.2}", height))
                fill=(color(spec.palette, index)) {}
            text x=(format!("{:.2}", center)) y=(format!("{:.2}", baseline - height - 4.0))
                font-size="11" text-anchor="middle" {
                (format_value(value))
            }
            text x=(format!("{:.2}", center)) y=(format!("{:.2}", baseline + 16.0))
                font-size="11" text-anchor="middle" {
                (category)
            }
        }
    }
}

fn polar(cx: f64, cy: f64, r: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (cx + r * radians.cos(), cy + r * radians.sin())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::BufReader;

    fn pie() -> ChartSpec {
        ChartSpec::pie(
            "Progress by Category".into(),
            vec!["Compliance".into(), "Skills".into(), "Knowledge".into()],
            vec![67.0, 32.0, 70.0],
        )
    }

    fn bar() -> ChartSpec {
        ChartSpec::bar(
            "Compliance Tasks".into(),
            vec!["Completed".into(), "Remaining".into()],
            vec![10.0, 5.0],
            "Number of Tasks".into(),
        )
        .with_palette(Palette::Status)
    }

    fn png_dimensions(path: &Path) -> (u32, u32) {
        let decoder = png::Decoder::new(BufReader::new(File::open(path).unwrap()));
        let reader = decoder.read_info().unwrap();
        (reader.info().width, reader.info().height)
    }

    // ==================== Render Tests ====================

    #[test]
    fn test_render_writes_png_file() {
        let renderer = PngChartRenderer::new();
        let image = renderer
            .render(&[pie(), bar()], "Business Progress Overview")
            .unwrap()
            .unwrap();

        let bytes = std::fs::read(image.path()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        assert_eq!(
            image.path().extension().and_then(|e| e.to_str()),
            Some("png")
        );
        assert_eq!(png_dimensions(image.path()), (720, 348));
    }

    #[test]
    fn test_raster_grows_by_row() {
        let renderer = PngChartRenderer::new();
        let image = renderer.render(&[pie(), bar(), pie()], "t").unwrap().unwrap();
        assert_eq!(png_dimensions(image.path()), (720, 648));
    }

    #[test]
    fn test_image_deleted_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PngChartRenderer::with_temp_dir(dir.path());
        let image = renderer.render(&[pie()], "t").unwrap().unwrap();
        let path = image.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());

        drop(image);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_nothing_to_draw_returns_none() {
        let renderer = PngChartRenderer::new();
        assert!(renderer.render(&[], "t").unwrap().is_none());

        let empty = ChartSpec::pie("empty".into(), Vec::new(), Vec::new());
        assert!(renderer.render(&[empty], "t").unwrap().is_none());
    }

    #[test]
    fn test_mismatched_series_is_error() {
        let mut spec = pie();
        spec.values.pop();

        let result = PngChartRenderer::new().render(&[spec], "t");
        assert!(matches!(
            result,
            Err(ChartError::MismatchedSeries {
                categories: 3,
                values: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_value_is_error() {
        let mut spec = bar();
        spec.values[0] = f64::NAN;
        assert!(matches!(
            PngChartRenderer::new().render(&[spec], "t"),
            Err(ChartError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_temp_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PngChartRenderer::with_temp_dir(dir.path().join("missing"));
        assert!(matches!(
            renderer.render(&[pie()], "t"),
            Err(ChartError::Io(_))
        ));
    }

    // ==================== SVG Draft Tests ====================

    #[test]
    fn test_draft_labels_and_colors() {
        let (p, b) = (pie(), bar());
        let svg = draft_svg(&[&p, &b], "Business Progress Overview");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Business Progress Overview"));
        assert!(svg.contains("Compliance (39.6%)"));
        assert!(svg.contains("#FFC107"));
        assert!(svg.contains("rotate(-90"));
    }

    #[test]
    fn test_zero_total_pie_draws_ring() {
        let spec = ChartSpec::pie("p".into(), vec!["a".into()], vec![0.0]);
        let svg = draft_svg(&[&spec], "t");
        assert!(svg.contains("fill=\"none\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_single_slice_pie_is_full_circle() {
        let spec = ChartSpec::pie("p".into(), vec!["a".into(), "b".into()], vec![5.0, 0.0]);
        let svg = draft_svg(&[&spec], "t");
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
        assert!(svg.contains("a (100.0%)"));
    }

    #[test]
    fn test_draft_height_grows_by_row() {
        let (p, b) = (pie(), bar());
        assert!(draft_svg(&[&p, &b], "t").contains("height=\"348\""));
        assert!(draft_svg(&[&p, &b, &p], "t").contains("height=\"648\""));
    }

    #[test]
    fn test_labels_are_escaped() {
        let spec = ChartSpec::pie("R&D".into(), vec!["<x>".into()], vec![1.0]);
        let svg = draft_svg(&[&spec], "t");
        assert!(svg.contains("R&amp;D"));
        assert!(svg.contains("&lt;x&gt;"));
        assert!(rasterize(&svg).is_ok());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(2.5), "2.5");
    }
}
