//! Document canvases: the page/text/image surface a report is drawn on.
//!
//! Three implementations ship with the crate:
//! - `PdfCanvas`: paginated A4 PDF with embedded PNG charts (the default)
//! - `HtmlCanvas`: a self-contained HTML document with inline PNG charts
//! - `TextCanvas`: plain UTF-8 text with form-feed page breaks

use crate::i18n::Language;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rgb,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CanvasError {
    #[error("Canvas could not be initialized: {0}")]
    Init(String),

    #[error("Nothing can be written before the first page is opened")]
    NoPage,

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image format: {0}")]
    UnsupportedImage(PathBuf),

    #[error("Failed to decode image {path}: {reason}")]
    ImageDecode { path: PathBuf, reason: String },

    #[error("Failed to write PDF: {0}")]
    Pdf(String),

    #[error("Unknown report format '{0}' (expected 'pdf', 'html' or 'text')")]
    UnknownFormat(String),
}

/// Visual role of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Subtitle,
    Heading,
    Body,
    Bullet,
    Numbered,
    Notice,
}

/// Capability for placing text and images and producing a finished buffer.
pub trait Canvas {
    fn new_page(&mut self) -> Result<(), CanvasError>;

    fn write_text(&mut self, style: TextStyle, content: &str) -> Result<(), CanvasError>;

    /// Place the PNG image at `path`, scaled to `width` pixels.
    fn embed_image(&mut self, path: &Path, width: u32) -> Result<(), CanvasError>;

    /// Close the document and return its bytes.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasKind {
    #[default]
    Pdf,
    Html,
    Text,
}

impl CanvasKind {
    /// File extension of documents produced by this canvas.
    pub fn extension(&self) -> &'static str {
        match self {
            CanvasKind::Pdf => "pdf",
            CanvasKind::Html => "html",
            CanvasKind::Text => "txt",
        }
    }
}

impl FromStr for CanvasKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(CanvasKind::Pdf),
            "html" => Ok(CanvasKind::Html),
            "text" | "txt" => Ok(CanvasKind::Text),
            other => Err(CanvasError::UnknownFormat(other.to_string())),
        }
    }
}

/// Open a fresh canvas of the given kind.
pub fn open_canvas(kind: CanvasKind, language: Language) -> Result<Box<dyn Canvas>, CanvasError> {
    match kind {
        CanvasKind::Pdf => Ok(Box::new(PdfCanvas::new(language)?)),
        CanvasKind::Html => Ok(Box::new(HtmlCanvas::new(language))),
        CanvasKind::Text => Ok(Box::new(TextCanvas::new())),
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn read_png(path: &Path) -> Result<Vec<u8>, CanvasError> {
    let bytes = std::fs::read(path).map_err(|source| CanvasError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    if !bytes.starts_with(PNG_SIGNATURE) {
        return Err(CanvasError::UnsupportedImage(path.to_path_buf()));
    }
    Ok(bytes)
}

// ==================== PDF ====================

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const MM_PER_POINT: f32 = 0.3528;
const MM_PER_INCH: f32 = 25.4;
const SCREEN_DPI: f32 = 96.0;
const IMAGE_GAP: f32 = 4.0;
const LAYER_NAME: &str = "Content";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontFace {
    Regular,
    Bold,
    Oblique,
}

/// Layout of one text style on a PDF page.
#[derive(Debug, Clone, Copy)]
struct PdfTextLayout {
    size: f32,
    face: FontFace,
    indent: f32,
    space_before: f32,
    centered: bool,
}

impl PdfTextLayout {
    fn for_style(style: TextStyle) -> Self {
        let (size, face, indent, space_before, centered) = match style {
            TextStyle::Title => (20.0, FontFace::Bold, 0.0, 0.0, true),
            TextStyle::Subtitle => (11.0, FontFace::Regular, 0.0, 1.0, true),
            TextStyle::Heading => (15.0, FontFace::Bold, 0.0, 7.0, false),
            TextStyle::Body => (11.0, FontFace::Regular, 0.0, 2.0, false),
            TextStyle::Bullet | TextStyle::Numbered => (11.0, FontFace::Regular, 6.0, 0.5, false),
            TextStyle::Notice => (11.0, FontFace::Oblique, 0.0, 2.0, false),
        };
        Self {
            size,
            face,
            indent,
            space_before,
            centered,
        }
    }

    fn line_height(&self) -> f32 {
        self.size * MM_PER_POINT * 1.4
    }

    /// Approximate Helvetica advance: half an em per character.
    fn char_width(&self) -> f32 {
        self.size * MM_PER_POINT * 0.5
    }

    fn max_chars(&self) -> usize {
        (((CONTENT_WIDTH - self.indent) / self.char_width()) as usize).max(1)
    }
}

/// Break `text` into lines of at most `max_chars` characters at word
/// boundaries. A single word longer than the limit keeps its own line.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Built-in PDF fonts only cover Latin-1; anything else becomes '?'.
fn latin1(text: &str) -> String {
    text.chars()
        .map(|c| if u32::from(c) <= 0xFF { c } else { '?' })
        .collect()
}

struct PdfFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl PdfFonts {
    fn face(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Oblique => &self.oblique,
        }
    }
}

/// Canvas producing an A4 PDF with the built-in Helvetica family.
///
/// Text flows down the page and continues on a fresh page when it reaches
/// the bottom margin.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    fonts: PdfFonts,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    cursor: f32,
    next_number: usize,
    pages: usize,
}

impl PdfCanvas {
    pub fn new(language: Language) -> Result<Self, CanvasError> {
        let title = format!("Business Progress Report ({})", language.native_name());
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);

        let font = |builtin: BuiltinFont| {
            doc.add_builtin_font(builtin)
                .map_err(|e| CanvasError::Init(format!("built-in font: {}", e)))
        };
        let fonts = PdfFonts {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            oblique: font(BuiltinFont::HelveticaOblique)?,
        };

        Ok(Self {
            doc,
            fonts,
            first_page: Some((page, layer)),
            layer: None,
            cursor: PAGE_HEIGHT - MARGIN,
            next_number: 1,
            pages: 0,
        })
    }

    fn open_page(&mut self) {
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME),
        };
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    /// Move down by `height`, continuing on a new page when it does not fit.
    fn reserve(&mut self, height: f32) -> Result<(), CanvasError> {
        if self.layer.is_none() {
            return Err(CanvasError::NoPage);
        }
        if self.cursor - height < MARGIN {
            self.open_page();
        }
        self.cursor -= height;
        Ok(())
    }

    fn layer(&self) -> Result<&PdfLayerReference, CanvasError> {
        self.layer.as_ref().ok_or(CanvasError::NoPage)
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) -> Result<(), CanvasError> {
        self.open_page();
        self.next_number = 1;
        Ok(())
    }

    fn write_text(&mut self, style: TextStyle, content: &str) -> Result<(), CanvasError> {
        let prefix = match style {
            TextStyle::Numbered => {
                let prefix = format!("{}. ", self.next_number);
                self.next_number += 1;
                prefix
            }
            TextStyle::Bullet => {
                self.next_number = 1;
                "- ".to_string()
            }
            _ => {
                self.next_number = 1;
                String::new()
            }
        };

        let layout = PdfTextLayout::for_style(style);
        let text = latin1(&format!("{}{}", prefix, content));
        self.reserve(layout.space_before)?;

        for line in wrap_words(&text, layout.max_chars()) {
            self.reserve(layout.line_height())?;
            let x = if layout.centered {
                let width = line.chars().count() as f32 * layout.char_width();
                ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
            } else {
                MARGIN + layout.indent
            };

            let layer = self.layer()?;
            if style == TextStyle::Notice {
                layer.set_fill_color(Color::Rgb(Rgb::new(0.54, 0.43, 0.23, None)));
            }
            layer.use_text(
                line,
                layout.size,
                Mm(x),
                Mm(self.cursor),
                self.fonts.face(layout.face),
            );
            if style == TextStyle::Notice {
                layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            }
        }
        Ok(())
    }

    fn embed_image(&mut self, path: &Path, width: u32) -> Result<(), CanvasError> {
        self.layer()?;
        let file = File::open(path).map_err(|source| CanvasError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        let decode_error = |e: printpdf::image_crate::ImageError| CanvasError::ImageDecode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let decoder = PngDecoder::new(BufReader::new(file)).map_err(decode_error)?;
        let image = Image::try_from(decoder).map_err(decode_error)?;

        let (pixel_width, pixel_height) = (image.image.width.0 as f32, image.image.height.0 as f32);
        if pixel_width == 0.0 || pixel_height == 0.0 {
            return Err(CanvasError::UnsupportedImage(path.to_path_buf()));
        }

        let display_width = (width as f32 * MM_PER_INCH / SCREEN_DPI).min(CONTENT_WIDTH);
        let dpi = pixel_width * MM_PER_INCH / display_width;
        let display_height = pixel_height * MM_PER_INCH / dpi;

        self.reserve(display_height)?;
        let layer = self.layer()?.clone();
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(MARGIN + (CONTENT_WIDTH - display_width) / 2.0)),
                translate_y: Some(Mm(self.cursor)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        self.cursor -= IMAGE_GAP;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError> {
        let PdfCanvas { doc, layer, .. } = *self;
        drop(layer);
        doc.save_to_bytes()
            .map_err(|e| CanvasError::Pdf(e.to_string()))
    }
}

// ==================== HTML ====================

const HTML_STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;color:#222;max-width:820px;margin:0 auto}\
.page{padding:24px 0;border-bottom:1px solid #ddd}\
h1,.subtitle{text-align:center}\
.notice{font-style:italic;color:#8a6d3b}\
figure{margin:12px 0}\
figure img{max-width:100%}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

#[derive(Debug)]
enum HtmlBlock {
    Text(TextStyle, String),
    List(ListKind, Vec<String>),
    Image { src: String, width: u32 },
}

impl HtmlBlock {
    fn render(&self) -> Markup {
        match self {
            HtmlBlock::Text(TextStyle::Title, text) => html! { h1 { (text) } },
            HtmlBlock::Text(TextStyle::Subtitle, text) => html! { p class="subtitle" { (text) } },
            HtmlBlock::Text(TextStyle::Heading, text) => html! { h2 { (text) } },
            HtmlBlock::Text(TextStyle::Notice, text) => html! { p class="notice" { (text) } },
            HtmlBlock::Text(_, text) => html! { p { (text) } },
            HtmlBlock::List(ListKind::Bullet, items) => html! {
                ul { @for item in items { li { (item) } } }
            },
            HtmlBlock::List(ListKind::Numbered, items) => html! {
                ol { @for item in items { li { (item) } } }
            },
            HtmlBlock::Image { src, width } => html! {
                figure class="chart" style=(format!("width:{}px", width)) {
                    img src=(src) alt="";
                }
            },
        }
    }
}

/// Canvas producing a standalone HTML document.
#[derive(Debug)]
pub struct HtmlCanvas {
    language: Language,
    title: Option<String>,
    pages: Vec<Vec<HtmlBlock>>,
}

impl HtmlCanvas {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            title: None,
            pages: Vec::new(),
        }
    }

    fn current_page(&mut self) -> Result<&mut Vec<HtmlBlock>, CanvasError> {
        self.pages.last_mut().ok_or(CanvasError::NoPage)
    }
}

impl Canvas for HtmlCanvas {
    fn new_page(&mut self) -> Result<(), CanvasError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn write_text(&mut self, style: TextStyle, content: &str) -> Result<(), CanvasError> {
        let list = match style {
            TextStyle::Bullet => Some(ListKind::Bullet),
            TextStyle::Numbered => Some(ListKind::Numbered),
            _ => None,
        };

        let page = self.current_page()?;
        let Some(kind) = list else {
            page.push(HtmlBlock::Text(style, content.to_string()));
            if style == TextStyle::Title && self.title.is_none() {
                self.title = Some(content.to_string());
            }
            return Ok(());
        };

        if let Some(HtmlBlock::List(open, items)) = page.last_mut() {
            if *open == kind {
                items.push(content.to_string());
                return Ok(());
            }
        }
        page.push(HtmlBlock::List(kind, vec![content.to_string()]));
        Ok(())
    }

    fn embed_image(&mut self, path: &Path, width: u32) -> Result<(), CanvasError> {
        self.current_page()?;
        let png = read_png(path)?;
        let src = format!("data:image/png;base64,{}", STANDARD.encode(png));
        self.current_page()?.push(HtmlBlock::Image { src, width });
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError> {
        let markup = html! {
            (DOCTYPE)
            html lang=(self.language.code()) {
                head {
                    meta charset="utf-8";
                    title { (self.title.as_deref().unwrap_or_default()) }
                    style { (PreEscaped(HTML_STYLE)) }
                }
                body {
                    @for page in &self.pages {
                        section class="page" {
                            @for block in page {
                                (block.render())
                            }
                        }
                    }
                }
            }
        };
        Ok(markup.into_string().into_bytes())
    }
}

// ==================== Text ====================

/// Canvas producing plain text, one form feed between pages.
#[derive(Debug, Default)]
pub struct TextCanvas {
    pages: Vec<Vec<String>>,
    next_number: usize,
}

impl TextCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_page(&mut self) -> Result<&mut Vec<String>, CanvasError> {
        self.pages.last_mut().ok_or(CanvasError::NoPage)
    }
}

impl Canvas for TextCanvas {
    fn new_page(&mut self) -> Result<(), CanvasError> {
        self.pages.push(Vec::new());
        self.next_number = 1;
        Ok(())
    }

    fn write_text(&mut self, style: TextStyle, content: &str) -> Result<(), CanvasError> {
        let number = if style == TextStyle::Numbered {
            let number = self.next_number;
            self.next_number += 1;
            number
        } else {
            self.next_number = 1;
            0
        };

        let page = self.current_page()?;
        match style {
            TextStyle::Title => {
                page.push(content.to_string());
                page.push("=".repeat(content.chars().count()));
            }
            TextStyle::Heading => {
                page.push(String::new());
                page.push(content.to_string());
                page.push("-".repeat(content.chars().count()));
            }
            TextStyle::Bullet => page.push(format!("* {}", content)),
            TextStyle::Numbered => page.push(format!("{}. {}", number, content)),
            TextStyle::Notice => page.push(format!("! {}", content)),
            TextStyle::Subtitle | TextStyle::Body => page.push(content.to_string()),
        }
        Ok(())
    }

    fn embed_image(&mut self, path: &Path, width: u32) -> Result<(), CanvasError> {
        std::fs::metadata(path).map_err(|source| CanvasError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.current_page()?.push(format!("[image {}px]", width));
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError> {
        let text = self
            .pages
            .iter()
            .map(|lines| {
                let mut page = lines.join("\n");
                page.push('\n');
                page
            })
            .collect::<Vec<_>>()
            .join("\u{c}\n");
        Ok(text.into_bytes())
    }
}
