//! Catalog bound to a single report language.

use crate::i18n::{Language, MetricsReport, TranslationCatalog, TranslationMetrics};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::debug;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches `{name}` placeholders; group 1 is the name.
pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap())
}

/// Resolves display strings for one report.
///
/// Every lookup is counted so that the caller can tell whether a rendered
/// report contains untranslated keys.
#[derive(Debug)]
pub struct Translator<'a> {
    catalog: &'a TranslationCatalog,
    language: Language,
    metrics: TranslationMetrics,
}

impl<'a> Translator<'a> {
    pub fn new(catalog: &'a TranslationCatalog, language: Language) -> Self {
        Self {
            catalog,
            language,
            metrics: TranslationMetrics::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Human-readable name of the bound language.
    pub fn display_name(&self) -> &'static str {
        self.catalog.display_name(self.language.code())
    }

    /// Resolve a dotted key, returning the key itself when it is missing.
    pub fn t(&self, key: &str) -> String {
        match self.catalog.lookup(self.language, key) {
            Some(text) => {
                self.metrics.record_hit();
                text.to_string()
            }
            None => {
                self.metrics.record_miss();
                debug!(
                    "Missing translation for '{}' in {}",
                    key,
                    self.language.name()
                );
                key.to_string()
            }
        }
    }

    /// Resolve a key and fill its `{name}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, String)]) -> String {
        fill_placeholders(&self.t(key), args)
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }
}

/// Replace each `{name}` in `template` with its value.
///
/// Substitution is a single pass over the template, so braces inside a
/// value are copied verbatim. Unknown placeholders are left untouched.
pub fn fill_placeholders(template: &str, args: &[(&str, String)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TranslationCatalog {
        TranslationCatalog::builtin().unwrap()
    }

    #[test]
    fn test_t_resolves_bound_language() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ZULU);
        assert_eq!(translator.t("chart_labels.skills"), "Amakhono");
        assert_eq!(translator.display_name(), "isiZulu");
    }

    #[test]
    fn test_t_with_fills_placeholders() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ENGLISH);
        let text = translator.t_with(
            "summary.knowledge_score",
            &[("score", "7".to_string()), ("total", "10".to_string())],
        );
        assert_eq!(text, "Knowledge Assessment: 7/10 correct");
    }

    #[test]
    fn test_missing_key_is_counted() {
        let catalog = catalog();
        let translator = catalog.translator(Language::AFRIKAANS);
        assert_eq!(translator.t("report_title"), "RegulaEase Besigheidsvordering Verslag");
        assert_eq!(translator.t("no.such.key"), "no.such.key");

        let metrics = translator.metrics();
        assert_eq!(metrics.lookups, 2);
        assert_eq!(metrics.misses, 1);
    }

    #[test]
    fn test_fill_placeholders_leaves_unknown() {
        let text = fill_placeholders("{a} and {b}", &[("a", "1".to_string())]);
        assert_eq!(text, "1 and {b}");
    }

    #[test]
    fn test_fill_placeholders_keeps_braces_in_values() {
        let text = fill_placeholders(
            "{category}: {count} bookmarks",
            &[("category", "Tax {count} Law".to_string()), ("count", "3".to_string())],
        );
        assert_eq!(text, "Tax {count} Law: 3 bookmarks");
    }

    #[test]
    fn test_fill_placeholders_repeated() {
        let text = fill_placeholders("{x}-{x}", &[("x", "y".to_string())]);
        assert_eq!(text, "y-y");
    }
}
