//! Language type: validated report language.
//!
//! `Language` can only hold a code that exists in the registry. Report
//! requests carry free-form codes, so `resolve` substitutes the canonical
//! language instead of failing.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use tracing::warn;

/// A validated report language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "af")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const AFRIKAANS: Language = Language { code: "af" };
    pub const ZULU: Language = Language { code: "zu" };
    pub const XHOSA: Language = Language { code: "xh" };

    /// Strict lookup: fails for any code missing from the registry.
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Resolve a requested code, falling back to the canonical language.
    ///
    /// Codes are matched after trimming and lowercasing, so `" ZU "` resolves
    /// to isiZulu. Anything unknown renders in the default language.
    pub fn resolve(code: &str) -> Language {
        let normalized = code.trim().to_ascii_lowercase();
        match Self::from_code(&normalized) {
            Ok(language) => language,
            Err(_) => {
                let canonical = Self::canonical();
                warn!(
                    "Unsupported report language '{}', using {}",
                    code,
                    canonical.name()
                );
                canonical
            }
        }
    }

    /// Get the canonical (default) language.
    pub fn canonical() -> Language {
        Language {
            code: LanguageRegistry::get().canonical().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Registry entry for this language.
    ///
    /// # Panics
    /// Panics if the code is not registered, which cannot happen for a
    /// Language built through `from_code`, `resolve` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the name shown on rendered reports.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_constants_are_registered() {
        for language in [
            Language::ENGLISH,
            Language::AFRIKAANS,
            Language::ZULU,
            Language::XHOSA,
        ] {
            assert!(LanguageRegistry::get().is_supported(language.code()));
        }
    }

    #[test]
    fn test_english_constant() {
        assert_eq!(Language::ENGLISH.code(), "en");
        assert_eq!(Language::ENGLISH.name(), "English");
        assert!(Language::ENGLISH.is_canonical());
    }

    #[test]
    fn test_xhosa_native_name() {
        assert_eq!(Language::XHOSA.native_name(), "isiXhosa");
        assert!(!Language::XHOSA.is_canonical());
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_afrikaans() {
        let language = Language::from_code("af").expect("Should succeed");
        assert_eq!(language, Language::AFRIKAANS);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_is_case_sensitive() {
        assert!(Language::from_code("ZU").is_err());
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_supported_code() {
        assert_eq!(Language::resolve("zu"), Language::ZULU);
    }

    #[test]
    fn test_resolve_normalizes_case_and_whitespace() {
        assert_eq!(Language::resolve("  XH "), Language::XHOSA);
    }

    #[test]
    fn test_resolve_unsupported_falls_back_to_canonical() {
        assert_eq!(Language::resolve("fr"), Language::ENGLISH);
        assert_eq!(Language::resolve(""), Language::ENGLISH);
    }

    #[test]
    fn test_default_is_canonical() {
        assert_eq!(Language::default(), Language::canonical());
    }
}
