//! Translation catalog: immutable language → dotted key → string lookup.
//!
//! Each language is a JSON document whose objects nest arbitrarily deep.
//! A dotted key such as `chart_titles.compliance_tasks` walks one object per
//! segment. Resolution never fails: a missing segment yields the caller's
//! fallback, or the key itself, so a gap in a catalog degrades one label
//! instead of aborting a report.

use crate::i18n::{Language, LanguageRegistry, Translator};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Errors raised while loading catalog data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog for '{language}' is not valid: {source}")]
    Parse {
        language: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog root for '{0}' must be an object")]
    NotAnObject(String),
    #[error("catalog has no entries for supported language '{0}'")]
    MissingLanguage(&'static str),
    #[error("catalog contains unregistered language '{0}'")]
    UnknownLanguage(String),
}

/// One node of a language tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Text(String),
    Branch(BTreeMap<String, Node>),
}

impl Node {
    /// Walk a dotted key down the tree. Only a leaf counts as a hit.
    fn lookup(&self, dotted_key: &str) -> Option<&str> {
        let mut current = self;
        for segment in dotted_key.split('.') {
            current = match current {
                Node::Branch(children) => children.get(segment)?,
                Node::Text(_) => return None,
            };
        }
        match current {
            Node::Text(text) => Some(text.as_str()),
            Node::Branch(_) => None,
        }
    }
}

/// Built-in catalog sources, one per registered language.
const BUILTIN_SOURCES: [(&str, &str); 4] = [
    ("en", include_str!("../../locales/en.json")),
    ("af", include_str!("../../locales/af.json")),
    ("zu", include_str!("../../locales/zu.json")),
    ("xh", include_str!("../../locales/xh.json")),
];

/// Read-only multilingual string catalog.
///
/// Built once at startup and shared by reference; nothing mutates it after
/// construction, so concurrent report generation needs no locking.
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    trees: HashMap<&'static str, Node>,
}

impl TranslationCatalog {
    /// Load the catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_sources(BUILTIN_SOURCES)
    }

    /// Build a catalog from `(language code, JSON document)` pairs.
    ///
    /// Every registered language must be present and every code must be
    /// registered.
    pub fn from_sources<I, S>(sources: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'static str, S)>,
        S: AsRef<str>,
    {
        let registry = LanguageRegistry::get();
        let mut trees = HashMap::new();

        for (code, json) in sources {
            let config = registry
                .get_by_code(code)
                .ok_or_else(|| CatalogError::UnknownLanguage(code.to_string()))?;
            let node: Node =
                serde_json::from_str(json.as_ref()).map_err(|source| CatalogError::Parse {
                    language: code.to_string(),
                    source,
                })?;
            if !matches!(node, Node::Branch(_)) {
                return Err(CatalogError::NotAnObject(code.to_string()));
            }
            trees.insert(config.code, node);
        }

        if let Some(missing) = registry
            .list()
            .into_iter()
            .find(|config| !trees.contains_key(config.code))
        {
            return Err(CatalogError::MissingLanguage(missing.code));
        }

        Ok(Self { trees })
    }

    /// Resolve a dotted key for a requested language code.
    ///
    /// The code is matched the same way report generation matches it (see
    /// [`Language::resolve`]), so unsupported codes resolve against the
    /// default language. When the key is missing, `fallback` is returned if
    /// given, else the key unchanged.
    pub fn resolve(&self, language: &str, dotted_key: &str, fallback: Option<&str>) -> String {
        self.lookup(Language::resolve(language), dotted_key)
            .or(fallback)
            .unwrap_or(dotted_key)
            .to_string()
    }

    /// Look up a key without any fallback.
    pub fn lookup(&self, language: Language, dotted_key: &str) -> Option<&str> {
        self.lookup_code(language.code(), dotted_key)
    }

    fn lookup_code(&self, code: &str, dotted_key: &str) -> Option<&str> {
        self.trees.get(code)?.lookup(dotted_key)
    }

    /// Codes of every language this catalog can render.
    pub fn supported_languages(&self) -> BTreeSet<&'static str> {
        self.trees.keys().copied().collect()
    }

    /// Human-readable name of a language, e.g. "isiZulu" for `zu`.
    ///
    /// Unsupported codes report the default language's name, matching the
    /// language the report is actually rendered in.
    pub fn display_name(&self, language: &str) -> &'static str {
        Language::resolve(language).native_name()
    }

    /// Bind the catalog to one language for the duration of a report.
    pub fn translator(&self, language: Language) -> Translator<'_> {
        Translator::new(self, language)
    }
}
