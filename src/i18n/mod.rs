//! Internationalization (i18n) module for multilingual reports.
//!
//! All language-related logic, catalog data access and translation
//! diagnostics live here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Type-safe Language type validated against the registry
//! - `catalog`: Immutable dotted-key string catalog with literal-key fallback
//! - `translator`: Catalog bound to one language for one report
//! - `keys`: Every key the report engine resolves
//! - `validator`: Catalog completeness and placeholder validation
//! - `metrics`: Missing-key observability
//!
//! # Example
//!
//! ```rust,ignore
//! use compliance_report::i18n::{Language, TranslationCatalog};
//!
//! let catalog = TranslationCatalog::builtin()?;
//! let title = catalog.resolve("zu", "report_title", None);
//!
//! let translator = catalog.translator(Language::resolve("xh"));
//! let label = translator.t("chart_labels.skills");
//! ```

mod catalog;
mod keys;
mod language;
mod metrics;
mod registry;
mod translator;
mod validator;

pub use catalog::{CatalogError, TranslationCatalog};
pub use keys::REQUIRED_KEYS;
pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use translator::{fill_placeholders, Translator};
pub use validator::{CatalogValidator, ValidationReport};
