//! Every catalog key the report engine resolves.
//!
//! The assembler, chart builder and action-item list only look up keys
//! listed here. Catalog validation and the completeness tests use this list
//! to prove that each supported language can render a full report.

/// Dotted catalog keys required to render a complete report.
pub const REQUIRED_KEYS: &[&str] = &[
    // top level
    "report_title",
    "business_type",
    "generated",
    "report_language",
    "executive_summary",
    "progress_overview",
    "compliance_status",
    "skills_development",
    "knowledge_assessment",
    "recommended_next_steps",
    "charts_title",
    "progress_charts_failed",
    // summary
    "summary.intro",
    "summary.overall_progress",
    "summary.business_compliance",
    "summary.skills_bookmarked",
    "summary.knowledge_score",
    "summary.not_recorded",
    "summary.closing",
    // chart_titles
    "chart_titles.progress_by_category",
    "chart_titles.compliance_tasks",
    "chart_titles.skills_by_category",
    "chart_titles.priority_distribution",
    // chart_labels
    "chart_labels.compliance",
    "chart_labels.skills",
    "chart_labels.knowledge",
    "chart_labels.completed",
    "chart_labels.remaining",
    "chart_labels.bookmarked_resources",
    "chart_labels.number_of_tasks",
    "chart_labels.high",
    "chart_labels.medium",
    "chart_labels.low",
    // compliance_analysis
    "compliance_analysis.title",
    "compliance_analysis.total_tasks",
    "compliance_analysis.completed_tasks",
    "compliance_analysis.progress_percentage",
    "compliance_analysis.remaining_tasks",
    "compliance_analysis.priority_breakdown",
    "compliance_analysis.high_priority",
    "compliance_analysis.medium_priority",
    "compliance_analysis.low_priority",
    "compliance_analysis.progress_trend",
    "compliance_analysis.excellent_progress",
    "compliance_analysis.good_progress",
    "compliance_analysis.needs_attention",
    // skills_analysis
    "skills_analysis.title",
    "skills_analysis.total_resources",
    "skills_analysis.bookmarked",
    "skills_analysis.engagement_rate",
    "skills_analysis.category_distribution",
    "skills_analysis.category_bookmarks",
    "skills_analysis.learning_engagement",
    "skills_analysis.well_rounded",
    "skills_analysis.focus_areas",
    "skills_analysis.bookmark_more",
    // quiz_analysis
    "quiz_analysis.title",
    "quiz_analysis.score",
    "quiz_analysis.total_questions",
    "quiz_analysis.percentage",
    "quiz_analysis.category",
    "quiz_analysis.completed_at",
    "quiz_analysis.mixed_category",
    "quiz_analysis.not_available",
    "quiz_analysis.performance_level",
    "quiz_analysis.areas_for_improvement",
    "quiz_analysis.review_incorrect",
    "quiz_analysis.practical_focus",
    "quiz_analysis.additional_quizzes",
    "quiz_analysis.excellent_knowledge",
    "quiz_analysis.good_understanding",
    "quiz_analysis.needs_improvement",
    // tiers
    "tiers.excellent",
    "tiers.good",
    "tiers.needs_improvement",
    "tiers.high",
    "tiers.moderate",
    "tiers.low",
    // action_items
    "action_items.title",
    "action_items.complete_remaining",
    "action_items.prioritize_high",
    "action_items.explore_skills",
    "action_items.review_quiz",
    "action_items.weekly_reviews",
    "action_items.compliance_reminders",
    "action_items.local_resources",
    "action_items.maintain_momentum",
    "action_items.review_progress",
    "action_items.assistant_footer",
];
