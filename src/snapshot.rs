//! Progress snapshot: the aggregate input of a report.
//!
//! Each sub-record is optional, and its presence decides whether the
//! matching report section is emitted. Sub-records are parsed independently:
//! one with missing fields, wrong types or inconsistent counters is logged
//! and treated as absent, and the rest of the snapshot still renders.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Task counts per checklist priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PriorityDistribution {
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub low: u32,
}

impl PriorityDistribution {
    pub fn total(&self) -> u32 {
        self.high.saturating_add(self.medium).saturating_add(self.low)
    }
}

/// Compliance checklist completion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistProgress {
    pub total: u32,
    pub completed: u32,
    /// Stored completion percentage; derived from the counts when absent.
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub priority_distribution: Option<PriorityDistribution>,
}

impl ChecklistProgress {
    pub fn new(total: u32, completed: u32, percentage: f64) -> Self {
        Self {
            total,
            completed,
            percentage: Some(percentage),
            priority_distribution: None,
        }
    }

    pub fn with_priorities(mut self, high: u32, medium: u32, low: u32) -> Self {
        self.priority_distribution = Some(PriorityDistribution { high, medium, low });
        self
    }

    /// Completion percentage in `[0, 100]`.
    pub fn completion_percentage(&self) -> f64 {
        match self.percentage {
            Some(stored) => clamp_percentage(stored),
            None => rate(self.completed, self.total),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.completed)
    }

    pub fn priorities(&self) -> PriorityDistribution {
        self.priority_distribution.unwrap_or_default()
    }
}

/// Bookmarked learning resources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsProgress {
    pub total_resources: u32,
    pub bookmarked: u32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub category_bookmarks: Vec<u32>,
}

impl SkillsProgress {
    pub fn new(total_resources: u32, bookmarked: u32) -> Self {
        Self {
            total_resources,
            bookmarked,
            categories: Vec::new(),
            category_bookmarks: Vec::new(),
        }
    }

    pub fn with_categories<S: Into<String>>(mut self, categories: Vec<(S, u32)>) -> Self {
        let (names, counts): (Vec<String>, Vec<u32>) = categories
            .into_iter()
            .map(|(name, count)| (name.into(), count))
            .unzip();
        self.categories = names;
        self.category_bookmarks = counts;
        self
    }

    /// Bookmark rate in `[0, 100]`; 0 when there are no resources.
    pub fn bookmark_rate(&self) -> f64 {
        rate(self.bookmarked, self.total_resources)
    }

    /// Category/bookmark pairs, up to the shorter of the two sequences.
    pub fn paired_categories(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.categories
            .iter()
            .map(String::as_str)
            .zip(self.category_bookmarks.iter().copied())
    }
}

/// Latest quiz result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl QuizProgress {
    pub fn new(score: u32, total_questions: u32) -> Self {
        Self {
            score,
            total_questions,
            category: None,
            completed_at: None,
        }
    }

    /// Score rate in `[0, 100]`; 0 when the quiz had no questions.
    pub fn score_rate(&self) -> f64 {
        rate(self.score, self.total_questions)
    }

    pub fn incorrect(&self) -> u32 {
        self.total_questions.saturating_sub(self.score)
    }

    /// Quiz category, if one was given and is not blank.
    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Completion timestamp, if one was given and is not blank.
    pub fn completed_at(&self) -> Option<&str> {
        non_blank(self.completed_at.as_deref())
    }
}

/// A user's checklist, skills and quiz state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct ProgressSnapshot {
    pub checklist: Option<ChecklistProgress>,
    pub skills: Option<SkillsProgress>,
    pub quiz: Option<QuizProgress>,
}

impl ProgressSnapshot {
    pub fn is_empty(&self) -> bool {
        self.checklist.is_none() && self.skills.is_none() && self.quiz.is_none()
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    checklist: Option<Value>,
    #[serde(default)]
    skills: Option<Value>,
    #[serde(default)]
    quiz: Option<Value>,
}

impl From<RawSnapshot> for ProgressSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        Self {
            checklist: parse_sub_record(raw.checklist),
            skills: parse_sub_record(raw.skills),
            quiz: parse_sub_record(raw.quiz),
        }
    }
}

/// Report export request, as posted by the front end.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Requested report kind; every kind renders the comprehensive report.
    #[serde(rename = "type", default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub progress_data: ProgressSnapshot,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A snapshot sub-record with cross-field consistency rules.
trait SubRecord: DeserializeOwned {
    const NAME: &'static str;

    fn check(&self) -> Result<(), String>;
}

impl SubRecord for ChecklistProgress {
    const NAME: &'static str = "checklist";

    fn check(&self) -> Result<(), String> {
        if self.completed > self.total {
            return Err(format!(
                "completed ({}) exceeds total ({})",
                self.completed, self.total
            ));
        }
        match self.percentage {
            Some(p) if !p.is_finite() => Err("percentage is not a number".to_string()),
            _ => Ok(()),
        }
    }
}

impl SubRecord for SkillsProgress {
    const NAME: &'static str = "skills";

    fn check(&self) -> Result<(), String> {
        if self.bookmarked > self.total_resources {
            return Err(format!(
                "bookmarked ({}) exceeds totalResources ({})",
                self.bookmarked, self.total_resources
            ));
        }
        Ok(())
    }
}

impl SubRecord for QuizProgress {
    const NAME: &'static str = "quiz";

    fn check(&self) -> Result<(), String> {
        if self.score > self.total_questions {
            return Err(format!(
                "score ({}) exceeds totalQuestions ({})",
                self.score, self.total_questions
            ));
        }
        Ok(())
    }
}

fn parse_sub_record<T: SubRecord>(value: Option<Value>) -> Option<T> {
    let value = value.filter(|v| !v.is_null())?;

    let record: T = match serde_json::from_value(value) {
        Ok(record) => record,
        Err(e) => {
            warn!("Ignoring {} progress with invalid shape: {}", T::NAME, e);
            return None;
        }
    };

    match record.check() {
        Ok(()) => Some(record),
        Err(reason) => {
            warn!("Ignoring inconsistent {} progress: {}", T::NAME, reason);
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Percentage of `part` in `whole`, clamped to `[0, 100]`; 0 for an empty whole.
pub fn rate(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    clamp_percentage(f64::from(part) / f64::from(whole) * 100.0)
}

/// Clamp a percentage into `[0, 100]`, mapping NaN to 0.
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
