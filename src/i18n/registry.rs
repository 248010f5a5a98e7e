//! Language registry: Single source of truth for all report languages.
//!
//! The registry is a static, read-only table. Every other i18n component
//! validates language codes against it, and the catalog loads exactly one
//! translation document per registered language.

/// Configuration for a supported report language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "zu")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Zulu")
    pub name: &'static str,

    /// Name shown on rendered reports (e.g., "Afrikaans", "isiZulu")
    pub native_name: &'static str,

    /// Whether this is the canonical/default language (only one should be true)
    pub is_canonical: bool,
}

/// Registry of every language the report engine can render.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
}

static LANGUAGES: [LanguageConfig; 4] = [
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
        is_canonical: true,
    },
    LanguageConfig {
        code: "af",
        name: "Afrikaans",
        native_name: "Afrikaans",
        is_canonical: false,
    },
    LanguageConfig {
        code: "zu",
        name: "Zulu",
        native_name: "isiZulu",
        is_canonical: false,
    },
    LanguageConfig {
        code: "xh",
        name: "Xhosa",
        native_name: "isiXhosa",
        is_canonical: false,
    },
];

static REGISTRY: LanguageRegistry = LanguageRegistry {
    languages: &LANGUAGES,
};

impl LanguageRegistry {
    /// Get the built-in language registry.
    pub fn get() -> &'static LanguageRegistry {
        &REGISTRY
    }

    /// Exact, case-sensitive code lookup.
    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all registered languages in registry order.
    pub fn list(&self) -> Vec<&'static LanguageConfig> {
        self.languages.iter().collect()
    }

    /// The canonical language is the default substituted for unsupported
    /// codes and the reference for placeholder validation.
    ///
    /// # Panics
    /// Panics if the static table defines no canonical language.
    pub fn canonical(&self) -> &'static LanguageConfig {
        self.languages
            .iter()
            .find(|lang| lang.is_canonical)
            .expect("language table must define a canonical language")
    }

    /// Check if a language code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}
