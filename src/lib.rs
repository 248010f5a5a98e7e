//! Multilingual business compliance progress reports.
//!
//! A report is produced from a [`snapshot::ProgressSnapshot`] in four steps:
//! metrics aggregation, chart series building, document assembly and
//! rendering onto a [`canvas::Canvas`]. See [`assembler::ReportEngine`].

pub mod actions;
pub mod aggregator;
pub mod assembler;
pub mod canvas;
pub mod chart_renderer;
pub mod charts;
pub mod config;
pub mod document;
pub mod i18n;
pub mod snapshot;
