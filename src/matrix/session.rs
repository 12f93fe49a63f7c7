//! Single-cell inline edit state machine.
//!
//! One session exists system-wide. The save is split in two phases so
//! the caller can perform the network call without holding any state
//! lock: `begin_save` transitions to `Saving` and yields the merged
//! payload, `finish_save` applies the outcome.

use chrono::{
    DateTime,
    Utc,
};
use thiserror::Error;

use crate::model::{
    EntryId,
    TranslationMap,
};
use crate::sync::SyncError;

use super::merge::merge_translation;

/// Calls not permitted in the controller's current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no edit session is active")]
    NotEditing,
    #[error("a save for this cell is already in flight")]
    SaveInFlight,
}

/// Draft of the one active cell edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub entry_id: EntryId,
    pub language: String,
    /// Unsaved candidate value.
    pub value: String,
    /// Last failed save, kept for display until the next transition.
    pub error: Option<SyncError>,
}

/// Merged update ready to hand to the sync client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePayload {
    pub entry_id: EntryId,
    pub translations: TranslationMap,
}

#[derive(Debug, Default)]
enum EditState {
    #[default]
    Idle,
    Editing(EditDraft),
    Saving(EditDraft),
}

/// Controller of the single system-wide edit session.
#[derive(Debug, Default)]
pub struct EditSessionController {
    state: EditState,
}

impl EditSessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin editing `(entry_id, language)`, seeding the draft with
    /// `current_value`. An existing draft for another cell is discarded
    /// without saving.
    ///
    /// # Errors
    /// [`EditError::SaveInFlight`] while a save is running.
    pub fn begin_edit(
        &mut self,
        entry_id: EntryId,
        language: &str,
        current_value: &str,
    ) -> Result<(), EditError> {
        match self.state {
            EditState::Saving(_) => Err(EditError::SaveInFlight),
            EditState::Idle | EditState::Editing(_) => {
                tracing::debug!(entry_id, language, "edit session opened");
                self.state = EditState::Editing(EditDraft {
                    entry_id,
                    language: language.to_string(),
                    value: current_value.to_string(),
                    error: None,
                });
                Ok(())
            }
        }
    }

    /// Replace the draft value.
    ///
    /// # Errors
    /// [`EditError::NotEditing`] outside `Editing`,
    /// [`EditError::SaveInFlight`] while saving.
    pub fn update_draft(&mut self, value: &str) -> Result<(), EditError> {
        match &mut self.state {
            EditState::Editing(draft) => {
                draft.value = value.to_string();
                Ok(())
            }
            EditState::Saving(_) => Err(EditError::SaveInFlight),
            EditState::Idle => Err(EditError::NotEditing),
        }
    }

    /// Transition `Editing → Saving` and build the payload to persist.
    ///
    /// `existing` must be the entry's current translation map; every
    /// language except the edited one is carried forward unchanged.
    ///
    /// # Errors
    /// [`EditError::NotEditing`] outside `Editing`,
    /// [`EditError::SaveInFlight`] when a save is already running.
    pub fn begin_save(
        &mut self,
        existing: &TranslationMap,
        editor: &str,
        now: DateTime<Utc>,
    ) -> Result<SavePayload, EditError> {
        let draft = match &self.state {
            EditState::Editing(draft) => draft.clone(),
            EditState::Saving(_) => return Err(EditError::SaveInFlight),
            EditState::Idle => return Err(EditError::NotEditing),
        };

        let translations = merge_translation(existing, &draft.language, &draft.value, editor, now);
        let payload = SavePayload { entry_id: draft.entry_id, translations };

        tracing::debug!(entry_id = draft.entry_id, language = %draft.language, "cell save started");
        self.state = EditState::Saving(EditDraft { error: None, ..draft });

        Ok(payload)
    }

    /// Apply the save outcome. Success closes the session; failure
    /// returns to `Editing` with the draft intact and the error kept
    /// for display. An outcome arriving when no save is in flight is
    /// ignored — the user has already moved on.
    pub fn finish_save(&mut self, outcome: Result<(), SyncError>) {
        match (std::mem::take(&mut self.state), outcome) {
            (EditState::Saving(draft), Ok(())) => {
                tracing::info!(entry_id = draft.entry_id, "cell edit saved");
                self.state = EditState::Idle;
            }
            (EditState::Saving(mut draft), Err(error)) => {
                tracing::error!(entry_id = draft.entry_id, %error, "cell edit save failed");
                draft.error = Some(error);
                self.state = EditState::Editing(draft);
            }
            (other, _) => {
                tracing::debug!("stale save outcome ignored");
                self.state = other;
            }
        }
    }

    /// Discard the draft.
    ///
    /// # Errors
    /// [`EditError::NotEditing`] outside `Editing`,
    /// [`EditError::SaveInFlight`] while saving.
    pub fn cancel(&mut self) -> Result<(), EditError> {
        match self.state {
            EditState::Editing(_) => {
                tracing::debug!("edit session cancelled");
                self.state = EditState::Idle;
                Ok(())
            }
            EditState::Saving(_) => Err(EditError::SaveInFlight),
            EditState::Idle => Err(EditError::NotEditing),
        }
    }

    /// Current draft, in `Editing` or `Saving`.
    #[must_use]
    pub const fn draft(&self) -> Option<&EditDraft> {
        match &self.state {
            EditState::Editing(draft) | EditState::Saving(draft) => Some(draft),
            EditState::Idle => None,
        }
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        matches!(self.state, EditState::Saving(_))
    }

    /// True when `(entry_id, language)` is the cell currently bound to
    /// the session.
    #[must_use]
    pub fn is_active_cell(&self, entry_id: EntryId, language: &str) -> bool {
        self.draft().is_some_and(|draft| draft.entry_id == entry_id && draft.language == language)
    }
}
