//! Multi-key bulk edit state machine.
//!
//! A batch session edits the active language across the selected
//! entries and submits the whole set as one sync call. The client-side
//! contract is all-or-nothing: on failure every draft and the selection
//! survive untouched so the user can retry without re-entering values.

use std::collections::HashMap;

use chrono::{
    DateTime,
    Utc,
};
use thiserror::Error;

use crate::model::{
    EntryChange,
    EntryId,
    LocalizationEntry,
};
use crate::sync::SyncError;

use super::merge::merge_translation;

/// Calls not permitted in the controller's current state, or drafts
/// referencing entries the controller cannot resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("batch edit requires a non-empty selection")]
    EmptySelection,
    #[error("a batch edit is already open")]
    AlreadyOpen,
    #[error("no batch edit is open")]
    NotOpen,
    #[error("a batch save is already in flight")]
    SaveInFlight,
    #[error("entry {0} is not part of this batch")]
    UnknownEntry(EntryId),
    #[error("entry {0} is no longer present in the loaded entries")]
    MissingEntry(EntryId),
}

/// Drafts of an open batch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDraft {
    /// Language the whole batch edits.
    pub language: String,
    /// Per-entry candidate values.
    pub values: HashMap<EntryId, String>,
    /// Last failed save, kept for display until the next transition.
    pub error: Option<SyncError>,
}

#[derive(Debug, Default)]
enum BatchState {
    #[default]
    Closed,
    Open(BatchDraft),
    Saving(BatchDraft),
}

/// Controller of the bulk edit session.
#[derive(Debug, Default)]
pub struct BatchEditController {
    state: BatchState,
}

impl BatchEditController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a bulk edit over `selected` for `language`, seeding each
    /// draft from the entry's current value (empty string when the
    /// language has no value yet).
    ///
    /// # Errors
    /// [`BatchError::EmptySelection`] for an empty selection,
    /// [`BatchError::AlreadyOpen`] / [`BatchError::SaveInFlight`]
    /// outside `Closed`, [`BatchError::MissingEntry`] when a selected
    /// id is not in `entries`.
    pub fn open(
        &mut self,
        selected: &[EntryId],
        language: &str,
        entries: &[LocalizationEntry],
    ) -> Result<(), BatchError> {
        match self.state {
            BatchState::Open(_) => return Err(BatchError::AlreadyOpen),
            BatchState::Saving(_) => return Err(BatchError::SaveInFlight),
            BatchState::Closed => {}
        }
        if selected.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        let mut values = HashMap::with_capacity(selected.len());
        for &id in selected {
            let entry = entries
                .iter()
                .find(|entry| entry.id == id)
                .ok_or(BatchError::MissingEntry(id))?;
            values.insert(id, entry.value_for(language).unwrap_or_default().to_string());
        }

        tracing::debug!(count = values.len(), language, "batch edit opened");
        self.state = BatchState::Open(BatchDraft {
            language: language.to_string(),
            values,
            error: None,
        });
        Ok(())
    }

    /// Replace the draft value of one entry.
    ///
    /// # Errors
    /// [`BatchError::NotOpen`] / [`BatchError::SaveInFlight`] outside
    /// `Open`, [`BatchError::UnknownEntry`] for an id outside the
    /// session.
    pub fn update_draft(&mut self, id: EntryId, value: &str) -> Result<(), BatchError> {
        match &mut self.state {
            BatchState::Open(draft) => {
                let slot = draft.values.get_mut(&id).ok_or(BatchError::UnknownEntry(id))?;
                *slot = value.to_string();
                Ok(())
            }
            BatchState::Saving(_) => Err(BatchError::SaveInFlight),
            BatchState::Closed => Err(BatchError::NotOpen),
        }
    }

    /// Transition `Open → Saving` and build one change per drafted
    /// entry, each carrying the entry's full map with only the batch
    /// language replaced. The whole list is meant for a single sync
    /// call.
    ///
    /// When any drafted id is missing from `entries` the save is
    /// aborted before any transition: a partial batch would silently
    /// break the one-payload-per-selected-entry property.
    ///
    /// # Errors
    /// [`BatchError::NotOpen`] / [`BatchError::SaveInFlight`] outside
    /// `Open`, [`BatchError::MissingEntry`] for an unresolvable id.
    pub fn begin_save(
        &mut self,
        entries: &[LocalizationEntry],
        editor: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<EntryChange>, BatchError> {
        let draft = match &self.state {
            BatchState::Open(draft) => draft.clone(),
            BatchState::Saving(_) => return Err(BatchError::SaveInFlight),
            BatchState::Closed => return Err(BatchError::NotOpen),
        };

        let mut ids: Vec<EntryId> = draft.values.keys().copied().collect();
        ids.sort_unstable();

        let mut changes = Vec::with_capacity(ids.len());
        for id in ids {
            let entry = entries
                .iter()
                .find(|entry| entry.id == id)
                .ok_or(BatchError::MissingEntry(id))?;
            let value = draft.values.get(&id).ok_or(BatchError::UnknownEntry(id))?;
            changes.push(EntryChange {
                id,
                translations: merge_translation(
                    &entry.translations,
                    &draft.language,
                    value,
                    editor,
                    now,
                ),
            });
        }

        tracing::debug!(count = changes.len(), "batch save started");
        self.state = BatchState::Saving(BatchDraft { error: None, ..draft });

        Ok(changes)
    }

    /// Apply the save outcome. Success closes the session and drops the
    /// drafts; failure returns to `Open` with every draft intact and
    /// the error kept for display. A stale outcome outside `Saving` is
    /// ignored.
    pub fn finish_save(&mut self, outcome: Result<(), SyncError>) {
        match (std::mem::take(&mut self.state), outcome) {
            (BatchState::Saving(draft), Ok(())) => {
                tracing::info!(count = draft.values.len(), "batch edit saved");
                self.state = BatchState::Closed;
            }
            (BatchState::Saving(mut draft), Err(error)) => {
                tracing::error!(%error, "batch save failed");
                draft.error = Some(error);
                self.state = BatchState::Open(draft);
            }
            (other, _) => {
                tracing::debug!("stale batch outcome ignored");
                self.state = other;
            }
        }
    }

    /// Discard the drafts. The selection is untouched: cancelling edits
    /// does not imply cancelling the selection.
    ///
    /// # Errors
    /// [`BatchError::NotOpen`] / [`BatchError::SaveInFlight`] outside
    /// `Open`.
    pub fn cancel(&mut self) -> Result<(), BatchError> {
        match self.state {
            BatchState::Open(_) => {
                tracing::debug!("batch edit cancelled");
                self.state = BatchState::Closed;
                Ok(())
            }
            BatchState::Saving(_) => Err(BatchError::SaveInFlight),
            BatchState::Closed => Err(BatchError::NotOpen),
        }
    }

    /// Current drafts, in `Open` or `Saving`.
    #[must_use]
    pub const fn draft(&self) -> Option<&BatchDraft> {
        match &self.state {
            BatchState::Open(draft) | BatchState::Saving(draft) => Some(draft),
            BatchState::Closed => None,
        }
    }

    /// Draft value of one entry, if the session covers it.
    #[must_use]
    pub fn draft_value(&self, id: EntryId) -> Option<&str> {
        self.draft().and_then(|draft| draft.values.get(&id)).map(String::as_str)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, BatchState::Open(_))
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        matches!(self.state, BatchState::Saving(_))
    }
}
