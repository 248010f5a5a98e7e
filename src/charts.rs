//! Chart series builder.
//!
//! Describes what to draw for a snapshot without touching any rendering
//! backend. All labels come from the translator.

use crate::i18n::Translator;
use crate::snapshot::ProgressSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

/// Color scheme hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// One distinct color per category
    #[default]
    Categorical,
    /// High, medium and low priority
    Priority,
    /// Completed and remaining
    Status,
    /// Every bar in the same color
    Uniform,
}

/// Renderer-agnostic description of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub categories: Vec<String>,
    /// One value per category
    pub values: Vec<f64>,
    pub axis_label: Option<String>,
    pub palette: Palette,
}

impl ChartSpec {
    pub fn pie(title: String, categories: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            kind: ChartKind::Pie,
            title,
            categories,
            values,
            axis_label: None,
            palette: Palette::Categorical,
        }
    }

    pub fn bar(
        title: String,
        categories: Vec<String>,
        values: Vec<f64>,
        axis_label: String,
    ) -> Self {
        Self {
            kind: ChartKind::Bar,
            title,
            categories,
            values,
            axis_label: Some(axis_label),
            palette: Palette::Uniform,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// A spec without categories is not drawn.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Build the chart specs for a snapshot, at most four, in fixed order:
/// progress by category, compliance tasks, skills by category, priority
/// distribution.
pub fn build_series(snapshot: &ProgressSnapshot, translator: &Translator<'_>) -> Vec<ChartSpec> {
    [
        progress_by_category(snapshot, translator),
        compliance_tasks(snapshot, translator),
        skills_by_category(snapshot, translator),
        priority_distribution(snapshot, translator),
    ]
    .into_iter()
    .flatten()
    .filter(|spec| !spec.is_empty())
    .collect()
}

fn progress_by_category(snapshot: &ProgressSnapshot, t: &Translator<'_>) -> Option<ChartSpec> {
    let mut categories = Vec::new();
    let mut values = Vec::new();

    if let Some(checklist) = &snapshot.checklist {
        categories.push(t.t("chart_labels.compliance"));
        values.push(checklist.completion_percentage());
    }
    if let Some(skills) = &snapshot.skills {
        categories.push(t.t("chart_labels.skills"));
        values.push(skills.bookmark_rate());
    }
    if let Some(quiz) = &snapshot.quiz {
        categories.push(t.t("chart_labels.knowledge"));
        values.push(quiz.score_rate());
    }

    if categories.is_empty() {
        return None;
    }
    Some(ChartSpec::pie(
        t.t("chart_titles.progress_by_category"),
        categories,
        values,
    ))
}

fn compliance_tasks(snapshot: &ProgressSnapshot, t: &Translator<'_>) -> Option<ChartSpec> {
    let checklist = snapshot.checklist.as_ref()?;
    Some(ChartSpec::bar(
        t.t("chart_titles.compliance_tasks"),
        vec![t.t("chart_labels.completed"), t.t("chart_labels.remaining")],
        vec![
            f64::from(checklist.completed),
            f64::from(checklist.remaining()),
        ],
        t.t("chart_labels.number_of_tasks"),
    )
    .with_palette(Palette::Status))
}

fn skills_by_category(snapshot: &ProgressSnapshot, t: &Translator<'_>) -> Option<ChartSpec> {
    let skills = snapshot.skills.as_ref()?;
    if skills.categories.is_empty() || skills.category_bookmarks.is_empty() {
        return None;
    }

    let (categories, values): (Vec<String>, Vec<f64>) = skills
        .paired_categories()
        .map(|(category, count)| (category.to_string(), f64::from(count)))
        .unzip();
    Some(ChartSpec::bar(
        t.t("chart_titles.skills_by_category"),
        categories,
        values,
        t.t("chart_labels.bookmarked_resources"),
    ))
}

fn priority_distribution(snapshot: &ProgressSnapshot, t: &Translator<'_>) -> Option<ChartSpec> {
    let priorities = snapshot.checklist.as_ref()?.priority_distribution?;
    Some(ChartSpec::pie(
        t.t("chart_titles.priority_distribution"),
        vec![
            t.t("chart_labels.high"),
            t.t("chart_labels.medium"),
            t.t("chart_labels.low"),
        ],
        vec![
            f64::from(priorities.high),
            f64::from(priorities.medium),
            f64::from(priorities.low),
        ],
    )
    .with_palette(Palette::Priority))
}
