//! Report assembly.
//!
//! Assembly runs in two steps:
//! 1. `build_document` folds the section builders over an empty
//!    [`ReportDocument`]. This step is pure and needs no canvas.
//! 2. `render_document` walks the document onto a [`Canvas`], drawing the
//!    chart block through the [`ChartRenderer`].
//!
//! Missing snapshot data never fails a report: absent sub-records drop their
//! section, and a chart that cannot be drawn becomes a localized notice. The
//! only fatal errors come from the canvas itself.

use crate::actions::action_items;
use crate::aggregator::{aggregate, DerivedMetrics};
use crate::canvas::{open_canvas, Canvas, CanvasError, CanvasKind, TextStyle};
use crate::chart_renderer::ChartRenderer;
use crate::charts::{build_series, ChartSpec};
use crate::config::Config;
use crate::document::{Block, ReportDocument, Section, SectionKind};
use crate::i18n::{Language, MetricsReport, TranslationCatalog, Translator};
use crate::snapshot::{ChecklistProgress, ProgressSnapshot, QuizProgress, SkillsProgress};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal report generation failure. No bytes are returned with it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("Failed to initialize document canvas: {0}")]
    CanvasInit(#[source] CanvasError),

    #[error("Failed to render document: {0}")]
    Canvas(#[source] CanvasError),
}

/// What happened while drawing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    /// The chart image was embedded
    pub charts_rendered: bool,
    /// The chart fallback notice was written instead
    pub chart_fallback: bool,
}

/// A finished report and what went into it.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub format: CanvasKind,
    pub language: Language,
    pub sections: Vec<SectionKind>,
    pub outcome: RenderOutcome,
    pub translation: MetricsReport,
}

/// Turns progress snapshots into finished report documents.
///
/// The engine borrows the process-wide catalog and holds no per-request
/// state, so one instance can serve any number of concurrent calls.
pub struct ReportEngine<'a> {
    catalog: &'a TranslationCatalog,
    chart_renderer: Box<dyn ChartRenderer>,
    config: Config,
}

impl<'a> ReportEngine<'a> {
    pub fn new(
        catalog: &'a TranslationCatalog,
        chart_renderer: Box<dyn ChartRenderer>,
        config: Config,
    ) -> Self {
        Self {
            catalog,
            chart_renderer,
            config,
        }
    }

    /// Render a report to bytes in the configured format.
    pub fn assemble(
        &self,
        snapshot: &ProgressSnapshot,
        business_type: &str,
        language: &str,
    ) -> Result<Vec<u8>, RenderError> {
        self.generate(snapshot, business_type, language)
            .map(|report| report.bytes)
    }

    /// Render a report in the configured format.
    pub fn generate(
        &self,
        snapshot: &ProgressSnapshot,
        business_type: &str,
        language: &str,
    ) -> Result<GeneratedReport, RenderError> {
        let format = self.config.report_format;
        self.generate_with(snapshot, business_type, language, format, |language| {
            open_canvas(format, language)
        })
    }

    /// Render a report onto a canvas produced by `open`.
    pub fn generate_with<F>(
        &self,
        snapshot: &ProgressSnapshot,
        business_type: &str,
        language: &str,
        format: CanvasKind,
        open: F,
    ) -> Result<GeneratedReport, RenderError>
    where
        F: FnOnce(Language) -> Result<Box<dyn Canvas>, CanvasError>,
    {
        let (document, translation) =
            self.build_document(snapshot, business_type, language, Utc::now());

        if translation.has_misses() {
            warn!(
                "Report in {} used {} untranslated key(s) out of {}",
                document.language().name(),
                translation.misses,
                translation.lookups
            );
        }

        let mut canvas = open(document.language()).map_err(RenderError::CanvasInit)?;
        let outcome = self
            .render_document(&document, canvas.as_mut())
            .map_err(RenderError::Canvas)?;
        let bytes = canvas.finish().map_err(RenderError::Canvas)?;

        info!(
            "Generated {} report in {} ({} sections, {} bytes)",
            format.extension(),
            document.language().name(),
            document.sections().len(),
            bytes.len()
        );

        Ok(GeneratedReport {
            bytes,
            format,
            language: document.language(),
            sections: document.kinds(),
            outcome,
            translation,
        })
    }

    /// Build the report document for a snapshot.
    ///
    /// Returns the translation metrics of the build alongside the document.
    pub fn build_document(
        &self,
        snapshot: &ProgressSnapshot,
        business_type: &str,
        language: &str,
        generated_at: DateTime<Utc>,
    ) -> (ReportDocument, MetricsReport) {
        let language = Language::resolve(language);
        let t = self.catalog.translator(language);
        let metrics = aggregate(snapshot);

        let business_type = match business_type.trim() {
            "" => self.config.default_business_type.as_str(),
            trimmed => trimmed,
        };

        let sections = [
            Some(header_section(&t, business_type, generated_at)),
            Some(summary_section(&t, snapshot, &metrics)),
            Some(charts_section(&t, snapshot)),
            snapshot
                .checklist
                .as_ref()
                .map(|checklist| compliance_section(&t, checklist, &metrics)),
            snapshot
                .skills
                .as_ref()
                .map(|skills| skills_section(&t, skills, &metrics)),
            snapshot
                .quiz
                .as_ref()
                .map(|quiz| quiz_section(&t, quiz, &metrics)),
            Some(actions_section(&t, snapshot)),
        ];

        let document = sections
            .into_iter()
            .flatten()
            .fold(ReportDocument::empty(language), ReportDocument::with_section);

        debug!(
            "Built report document with sections {:?}",
            document.kinds()
        );
        (document, t.metrics())
    }

    /// Draw a document onto a canvas.
    pub fn render_document(
        &self,
        document: &ReportDocument,
        canvas: &mut dyn Canvas,
    ) -> Result<RenderOutcome, CanvasError> {
        let mut outcome = RenderOutcome::default();
        canvas.new_page()?;

        for (index, section) in document.sections().iter().enumerate() {
            if index > 0 && section.kind.starts_page() {
                canvas.new_page()?;
            }

            for block in &section.blocks {
                match block {
                    Block::Title(text) => canvas.write_text(TextStyle::Title, text)?,
                    Block::Subtitle(text) => canvas.write_text(TextStyle::Subtitle, text)?,
                    Block::Heading(text) => canvas.write_text(TextStyle::Heading, text)?,
                    Block::Paragraph(text) => canvas.write_text(TextStyle::Body, text)?,
                    Block::Notice(text) => canvas.write_text(TextStyle::Notice, text)?,
                    Block::Bullets(items) => {
                        for item in items {
                            canvas.write_text(TextStyle::Bullet, item)?;
                        }
                    }
                    Block::Numbered(items) => {
                        for item in items {
                            canvas.write_text(TextStyle::Numbered, item)?;
                        }
                    }
                    Block::Charts {
                        title,
                        specs,
                        fallback,
                    } => {
                        if self.draw_charts(canvas, specs, title)? {
                            outcome.charts_rendered = true;
                        } else {
                            canvas.write_text(TextStyle::Notice, fallback)?;
                            outcome.chart_fallback = true;
                        }
                    }
                }
            }
        }

        Ok(outcome)
    }

    /// Render and embed the chart image. Returns `false` when the fallback
    /// notice should be written instead.
    ///
    /// The rendered image is dropped, and its file deleted, before this
    /// returns on every path.
    fn draw_charts(
        &self,
        canvas: &mut dyn Canvas,
        specs: &[ChartSpec],
        title: &str,
    ) -> Result<bool, CanvasError> {
        let image = match self.chart_renderer.render(specs, title) {
            Ok(Some(image)) => image,
            Ok(None) => {
                warn!("No chart data to draw, using fallback notice");
                return Ok(false);
            }
            Err(e) => {
                warn!("Chart rendering failed, using fallback notice: {}", e);
                return Ok(false);
            }
        };

        match canvas.embed_image(image.path(), self.config.chart_width) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Failed to embed chart image, using fallback notice: {}", e);
                Ok(false)
            }
        }
    }
}

// ==================== Section Builders ====================

fn header_section(t: &Translator<'_>, business_type: &str, generated_at: DateTime<Utc>) -> Section {
    Section::new(SectionKind::Header)
        .with_block(Block::Title(t.t("report_title")))
        .with_block(Block::Subtitle(labeled(
            t,
            "business_type",
            &title_case(business_type),
        )))
        .with_block(Block::Subtitle(labeled(
            t,
            "generated",
            &generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        )))
        .with_block(Block::Subtitle(labeled(
            t,
            "report_language",
            t.display_name(),
        )))
}

fn summary_section(
    t: &Translator<'_>,
    snapshot: &ProgressSnapshot,
    metrics: &DerivedMetrics,
) -> Section {
    let not_recorded =
        |area: &str| t.t_with("summary.not_recorded", &[("area", t.t(area))]);

    let mut bullets = vec![t.t_with(
        "summary.overall_progress",
        &[("value", format!("{:.1}", metrics.overall_progress))],
    )];
    bullets.push(match &snapshot.checklist {
        Some(checklist) => t.t_with(
            "summary.business_compliance",
            &[("value", format_number(checklist.completion_percentage()))],
        ),
        None => not_recorded("chart_labels.compliance"),
    });
    bullets.push(match &snapshot.skills {
        Some(skills) => t.t_with(
            "summary.skills_bookmarked",
            &[("count", skills.bookmarked.to_string())],
        ),
        None => not_recorded("chart_labels.skills"),
    });
    bullets.push(match &snapshot.quiz {
        Some(quiz) => t.t_with(
            "summary.knowledge_score",
            &[
                ("score", quiz.score.to_string()),
                ("total", quiz.total_questions.to_string()),
            ],
        ),
        None => not_recorded("chart_labels.knowledge"),
    });

    Section::new(SectionKind::ExecutiveSummary)
        .with_block(Block::Heading(t.t("executive_summary")))
        .with_block(Block::Paragraph(t.t("summary.intro")))
        .with_block(Block::Bullets(bullets))
        .with_block(Block::Paragraph(t.t("summary.closing")))
}

fn charts_section(t: &Translator<'_>, snapshot: &ProgressSnapshot) -> Section {
    Section::new(SectionKind::ProgressCharts)
        .with_block(Block::Heading(t.t("progress_overview")))
        .with_block(Block::Charts {
            title: t.t("charts_title"),
            specs: build_series(snapshot, t),
            fallback: t.t("progress_charts_failed"),
        })
}

fn compliance_section(
    t: &Translator<'_>,
    checklist: &ChecklistProgress,
    metrics: &DerivedMetrics,
) -> Section {
    let priorities = checklist.priorities();
    let mut section = Section::new(SectionKind::ComplianceAnalysis)
        .with_block(Block::Heading(t.t("compliance_status")))
        .with_block(Block::Paragraph(t.t("compliance_analysis.title")))
        .with_block(Block::Bullets(vec![
            labeled(t, "compliance_analysis.total_tasks", &checklist.total.to_string()),
            labeled(
                t,
                "compliance_analysis.completed_tasks",
                &checklist.completed.to_string(),
            ),
            labeled(
                t,
                "compliance_analysis.progress_percentage",
                &format!("{}%", format_number(checklist.completion_percentage())),
            ),
            labeled(
                t,
                "compliance_analysis.remaining_tasks",
                &checklist.remaining().to_string(),
            ),
        ]))
        .with_block(Block::Paragraph(t.t("compliance_analysis.priority_breakdown")))
        .with_block(Block::Bullets(vec![
            labeled(t, "compliance_analysis.high_priority", &priorities.high.to_string()),
            labeled(
                t,
                "compliance_analysis.medium_priority",
                &priorities.medium.to_string(),
            ),
            labeled(t, "compliance_analysis.low_priority", &priorities.low.to_string()),
        ]));

    if let Some(tier) = metrics.checklist_tier {
        section = section
            .with_block(Block::Paragraph(labeled(
                t,
                "compliance_analysis.progress_trend",
                &t.t(tier.label_key()),
            )))
            .with_block(Block::Paragraph(t.t(tier.compliance_narrative_key())));
    }
    section
}

fn skills_section(t: &Translator<'_>, skills: &SkillsProgress, metrics: &DerivedMetrics) -> Section {
    let engagement_rate = metrics.engagement_rate.unwrap_or_default();
    let mut section = Section::new(SectionKind::SkillsAnalysis)
        .with_block(Block::Heading(t.t("skills_development")))
        .with_block(Block::Paragraph(t.t("skills_analysis.title")))
        .with_block(Block::Bullets(vec![
            labeled(
                t,
                "skills_analysis.total_resources",
                &skills.total_resources.to_string(),
            ),
            labeled(t, "skills_analysis.bookmarked", &skills.bookmarked.to_string()),
            labeled(
                t,
                "skills_analysis.engagement_rate",
                &format!("{:.1}%", engagement_rate),
            ),
        ]));

    let breakdown: Vec<String> = skills
        .paired_categories()
        .map(|(category, count)| {
            t.t_with(
                "skills_analysis.category_bookmarks",
                &[("category", category.to_string()), ("count", count.to_string())],
            )
        })
        .collect();
    if !breakdown.is_empty() {
        section = section
            .with_block(Block::Paragraph(t.t("skills_analysis.category_distribution")))
            .with_block(Block::Bullets(breakdown));
    }

    if let Some(tier) = metrics.engagement_tier {
        section = section
            .with_block(Block::Paragraph(labeled(
                t,
                "skills_analysis.learning_engagement",
                &t.t(tier.label_key()),
            )))
            .with_block(Block::Paragraph(t.t(tier.narrative_key())));
    }
    section
}

fn quiz_section(t: &Translator<'_>, quiz: &QuizProgress, metrics: &DerivedMetrics) -> Section {
    let category = quiz
        .category()
        .map(str::to_string)
        .unwrap_or_else(|| t.t("quiz_analysis.mixed_category"));
    let completed_at = quiz
        .completed_at()
        .map(str::to_string)
        .unwrap_or_else(|| t.t("quiz_analysis.not_available"));

    let mut section = Section::new(SectionKind::QuizAnalysis)
        .with_block(Block::Heading(t.t("knowledge_assessment")))
        .with_block(Block::Paragraph(t.t("quiz_analysis.title")))
        .with_block(Block::Bullets(vec![
            labeled(t, "quiz_analysis.score", &quiz.score.to_string()),
            labeled(
                t,
                "quiz_analysis.total_questions",
                &quiz.total_questions.to_string(),
            ),
            labeled(
                t,
                "quiz_analysis.percentage",
                &format!("{:.1}%", metrics.quiz_rate.unwrap_or_default()),
            ),
            labeled(t, "quiz_analysis.category", &category),
            labeled(t, "quiz_analysis.completed_at", &completed_at),
        ]));

    if let Some(tier) = metrics.quiz_tier {
        section = section
            .with_block(Block::Paragraph(labeled(
                t,
                "quiz_analysis.performance_level",
                &t.t(tier.label_key()),
            )))
            .with_block(Block::Paragraph(t.t(tier.quiz_narrative_key())));
    }

    let mut improvements = Vec::new();
    let incorrect = quiz.incorrect();
    if incorrect > 0 {
        improvements.push(t.t_with(
            "quiz_analysis.review_incorrect",
            &[("count", incorrect.to_string())],
        ));
        improvements.push(t.t("quiz_analysis.practical_focus"));
    }
    improvements.push(t.t("quiz_analysis.additional_quizzes"));

    section
        .with_block(Block::Paragraph(t.t("quiz_analysis.areas_for_improvement")))
        .with_block(Block::Bullets(improvements))
}

fn actions_section(t: &Translator<'_>, snapshot: &ProgressSnapshot) -> Section {
    Section::new(SectionKind::ActionItems)
        .with_block(Block::Heading(t.t("recommended_next_steps")))
        .with_block(Block::Paragraph(t.t("action_items.title")))
        .with_block(Block::Numbered(action_items(snapshot, t)))
        .with_block(Block::Paragraph(t.t("action_items.assistant_footer")))
}

/// `"<label>: <value>"` with a localized label.
fn labeled(t: &Translator<'_>, key: &str, value: &str) -> String {
    format!("{}: {}", t.t(key), value)
}

/// Whole numbers without decimals, others with one.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }

    result
}
