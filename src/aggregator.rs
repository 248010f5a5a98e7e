//! Metrics aggregation: raw progress counters to derived rates and tiers.
//!
//! Everything here is a pure function of the snapshot. The tiers, not the
//! raw numbers, select the narrative sentence of each analysis section.

use crate::snapshot::ProgressSnapshot;

/// Qualitative level of a completion or score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceTier {
    /// `Excellent` from 80, `Good` from 60, otherwise `NeedsImprovement`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Excellent
        } else if percentage >= 60.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Excellent => "tiers.excellent",
            Self::Good => "tiers.good",
            Self::NeedsImprovement => "tiers.needs_improvement",
        }
    }

    /// Narrative sentence for the compliance analysis.
    pub fn compliance_narrative_key(&self) -> &'static str {
        match self {
            Self::Excellent => "compliance_analysis.excellent_progress",
            Self::Good => "compliance_analysis.good_progress",
            Self::NeedsImprovement => "compliance_analysis.needs_attention",
        }
    }

    /// Narrative sentence for the quiz analysis.
    pub fn quiz_narrative_key(&self) -> &'static str {
        match self {
            Self::Excellent => "quiz_analysis.excellent_knowledge",
            Self::Good => "quiz_analysis.good_understanding",
            Self::NeedsImprovement => "quiz_analysis.needs_improvement",
        }
    }
}

/// Qualitative level of learning-resource engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementTier {
    High,
    Moderate,
    Low,
}

impl EngagementTier {
    /// `High` from 25, `Moderate` from 10, otherwise `Low`.
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 25.0 {
            Self::High
        } else if rate >= 10.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Self::High => "tiers.high",
            Self::Moderate => "tiers.moderate",
            Self::Low => "tiers.low",
        }
    }

    pub fn narrative_key(&self) -> &'static str {
        match self {
            Self::High => "skills_analysis.well_rounded",
            Self::Moderate => "skills_analysis.focus_areas",
            Self::Low => "skills_analysis.bookmark_more",
        }
    }
}

/// Values computed from a snapshot, never stored in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// Mean of the present sub-record percentages, 0 when none is present
    pub overall_progress: f64,
    /// Number of sub-records that contributed to `overall_progress`
    pub contributors: usize,
    pub checklist_rate: Option<f64>,
    /// Skills bookmark rate
    pub engagement_rate: Option<f64>,
    /// Quiz score rate
    pub quiz_rate: Option<f64>,
    pub checklist_tier: Option<PerformanceTier>,
    pub engagement_tier: Option<EngagementTier>,
    pub quiz_tier: Option<PerformanceTier>,
}

/// Derive rates and tiers from a snapshot.
pub fn aggregate(snapshot: &ProgressSnapshot) -> DerivedMetrics {
    let checklist_rate = snapshot
        .checklist
        .as_ref()
        .map(|checklist| checklist.completion_percentage());
    let engagement_rate = snapshot.skills.as_ref().map(|skills| skills.bookmark_rate());
    let quiz_rate = snapshot.quiz.as_ref().map(|quiz| quiz.score_rate());

    let present: Vec<f64> = [checklist_rate, engagement_rate, quiz_rate]
        .into_iter()
        .flatten()
        .collect();
    let overall_progress = if present.is_empty() {
        0.0
    } else {
        (present.iter().sum::<f64>() / present.len() as f64).clamp(0.0, 100.0)
    };

    DerivedMetrics {
        overall_progress,
        contributors: present.len(),
        checklist_rate,
        engagement_rate,
        quiz_rate,
        checklist_tier: checklist_rate.map(PerformanceTier::from_percentage),
        engagement_tier: engagement_rate.map(EngagementTier::from_rate),
        quiz_tier: quiz_rate.map(PerformanceTier::from_percentage),
    }
}
