//! Core data model of the localization catalog.

use std::collections::HashMap;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Identifier of a localization entry. Stable and unique within a project.
pub type EntryId = i64;

/// Per-language values of an entry, keyed by language code.
///
/// Sparse: an absent language means "no value yet".
pub type TranslationMap = HashMap<String, TranslationValue>;

/// One translated value of a single (entry, language) pair.
///
/// Rewritten only by a subsequent edit to the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationValue {
    pub value: String,
    /// Timestamp of the last write.
    pub updated_at: DateTime<Utc>,
    /// Identity of the editor that performed the last write.
    pub updated_by: String,
}

/// One translatable string of a project, holding per-language values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationEntry {
    pub id: EntryId,
    /// Human-readable identifier. Not guaranteed unique within a project.
    pub key: String,
    /// Free-form grouping label.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub translations: TranslationMap,
    pub project_id: String,
}

impl LocalizationEntry {
    /// Current value for `language`, or `None` when the language has no
    /// value yet.
    #[must_use]
    pub fn value_for(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(|translation| translation.value.as_str())
    }
}

/// A language column of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Unique short identifier (e.g. "en", "fr").
    pub code: String,
    pub name: String,
}

/// A project owning a set of localization entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Initial value of one language in a creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    pub value: String,
}

/// Payload of the entry creation flow.
///
/// Callers must provide at least one translation; the operation is
/// rejected before any network call otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub key: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub translations: HashMap<String, NewTranslation>,
}

/// One item of a batch update: the full per-language map replacing the
/// entry's current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryChange {
    pub id: EntryId,
    pub translations: TranslationMap,
}
