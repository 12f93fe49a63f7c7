//! Merge of a single-language edit into an entry's translation map.

use chrono::{
    DateTime,
    Utc,
};

use crate::model::{
    TranslationMap,
    TranslationValue,
};

/// Replace `language`'s value in `existing`, carrying every other
/// language forward untouched. Adds the language when absent.
///
/// This is the only place a translation map may be rebuilt. Both the
/// single-cell and the batch save path go through it, so an edit to one
/// language can never drop values held for other languages.
#[must_use]
pub fn merge_translation(
    existing: &TranslationMap,
    language: &str,
    value: &str,
    editor: &str,
    now: DateTime<Utc>,
) -> TranslationMap {
    let mut merged = existing.clone();
    merged.insert(
        language.to_string(),
        TranslationValue {
            value: value.to_string(),
            updated_at: now,
            updated_by: editor.to_string(),
        },
    );
    merged
}
