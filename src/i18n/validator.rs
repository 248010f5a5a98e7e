//! Catalog completeness validation.
//!
//! Checks that a language can render every string the report engine needs
//! and that each string carries the same `{placeholders}` as the canonical
//! language, so interpolated figures never silently disappear.

use super::translator::placeholder_regex;
use crate::i18n::{Language, TranslationCatalog, REQUIRED_KEYS};
use std::collections::BTreeSet;

/// Validation report containing errors and warnings about one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Language the report describes
    pub language: &'static str,

    /// Keys the language cannot resolve
    pub errors: Vec<String>,

    /// Non-critical issues such as placeholder drift or empty strings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new(language: &'static str) -> Self {
        Self {
            language,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for catalog completeness.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Validate one language against `REQUIRED_KEYS`.
    pub fn validate(catalog: &TranslationCatalog, language: Language) -> ValidationReport {
        Self::validate_keys(catalog, language, REQUIRED_KEYS)
    }

    /// Validate every language the catalog supports, canonical first.
    pub fn validate_all(catalog: &TranslationCatalog) -> Vec<ValidationReport> {
        let mut languages: Vec<Language> = catalog
            .supported_languages()
            .into_iter()
            .filter_map(|code| Language::from_code(code).ok())
            .collect();
        languages.sort_by_key(|language| (!language.is_canonical(), language.code()));

        languages
            .into_iter()
            .map(|language| Self::validate(catalog, language))
            .collect()
    }

    /// Validate one language against an explicit key list.
    pub fn validate_keys(
        catalog: &TranslationCatalog,
        language: Language,
        keys: &[&str],
    ) -> ValidationReport {
        let mut report = ValidationReport::new(language.code());
        let canonical = Language::canonical();

        for key in keys {
            let Some(text) = catalog.lookup(language, key) else {
                report.errors.push(format!("Missing key '{}'", key));
                continue;
            };

            if text.trim().is_empty() {
                report.warnings.push(format!("Empty string for '{}'", key));
            }

            if language == canonical {
                continue;
            }

            if let Some(reference) = catalog.lookup(canonical, key) {
                let expected = Self::extract_placeholders(reference);
                let actual = Self::extract_placeholders(text);
                if expected != actual {
                    report.warnings.push(format!(
                        "Placeholder mismatch for '{}': {} has {:?}, {} has {:?}",
                        key,
                        canonical.code(),
                        expected,
                        language.code(),
                        actual
                    ));
                }
            }
        }

        report
    }

    /// Extract the set of `{name}` placeholders from a template
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        placeholder_regex()
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
