//! Immutable report document.
//!
//! A `ReportDocument` is built by folding section builders over an empty
//! document and is rendered onto a canvas as a separate step.

use crate::charts::ChartSpec;
use crate::i18n::Language;

/// Sections in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Header,
    ExecutiveSummary,
    ProgressCharts,
    ComplianceAnalysis,
    SkillsAnalysis,
    QuizAnalysis,
    ActionItems,
}

impl SectionKind {
    /// Whether the section begins on a fresh page.
    pub fn starts_page(&self) -> bool {
        matches!(self, SectionKind::ProgressCharts | SectionKind::ActionItems)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Paragraph(String),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
    /// Composite chart image, replaced by `fallback` when it cannot be drawn
    Charts {
        title: String,
        specs: Vec<ChartSpec>,
        fallback: String,
    },
    Notice(String),
}

impl Block {
    /// Text lines carried by the block.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Block::Title(text)
            | Block::Subtitle(text)
            | Block::Heading(text)
            | Block::Paragraph(text)
            | Block::Notice(text) => vec![text.as_str()],
            Block::Bullets(items) | Block::Numbered(items) => {
                items.iter().map(String::as_str).collect()
            }
            Block::Charts { title, .. } => vec![title.as_str()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// All text lines of the section, in block order.
    pub fn lines(&self) -> Vec<&str> {
        self.blocks.iter().flat_map(Block::lines).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    language: Language,
    sections: Vec<Section>,
}

impl ReportDocument {
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            sections: Vec::new(),
        }
    }

    /// Append a section, consuming the document.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|section| section.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_section_preserves_order() {
        let document = ReportDocument::empty(Language::ENGLISH)
            .with_section(Section::new(SectionKind::Header))
            .with_section(Section::new(SectionKind::ActionItems));

        assert_eq!(
            document.kinds(),
            vec![SectionKind::Header, SectionKind::ActionItems]
        );
        assert!(document.section(SectionKind::QuizAnalysis).is_none());
    }

    #[test]
    fn test_section_lines_flatten_blocks() {
        let section = Section::new(SectionKind::ActionItems)
            .with_block(Block::Heading("Steps".into()))
            .with_block(Block::Numbered(vec!["one".into(), "two".into()]))
            .with_block(Block::Paragraph("footer".into()));

        assert_eq!(section.lines(), vec!["Steps", "one", "two", "footer"]);
        assert!(section.contains_text("tw"));
        assert!(!section.contains_text("three"));
    }

    #[test]
    fn test_charts_block_exposes_title_only() {
        let block = Block::Charts {
            title: "Overview".into(),
            specs: Vec::new(),
            fallback: "unavailable".into(),
        };
        assert_eq!(block.lines(), vec!["Overview"]);
    }

    #[test]
    fn test_page_breaks() {
        assert!(SectionKind::ProgressCharts.starts_page());
        assert!(SectionKind::ActionItems.starts_page());
        assert!(!SectionKind::Header.starts_page());
        assert!(!SectionKind::QuizAnalysis.starts_page());
    }

    #[test]
    fn test_empty_document() {
        let document = ReportDocument::empty(Language::ZULU);
        assert!(document.sections().is_empty());
        assert_eq!(document.language(), Language::ZULU);
    }
}
