//! Contract between the editing core and the persistence backend.

use crate::model::{
    EntryChange,
    EntryId,
    LocalizationEntry,
    NewEntry,
    TranslationMap,
};

use super::error::SyncError;

/// Persistence backend of the catalog.
///
/// Transport details (HTTP verbs, paths, encoding, timeouts) belong to
/// the implementor; the core only relies on the four operations below
/// and the [`SyncError`] taxonomy.
#[allow(async_fn_in_trait)]
pub trait SyncClient {
    /// Fetch all localization entries of a project.
    ///
    /// # Errors
    /// [`SyncError::Transport`] on network failure or a non-success
    /// response. Fetch failures are not retried by the core.
    async fn fetch_entries(
        &self,
        project_id: &str,
    ) -> Result<Vec<LocalizationEntry>, SyncError>;

    /// Create a new entry.
    ///
    /// Callers must ensure at least one translation is present before
    /// calling; the creation flow rejects empty payloads with
    /// [`SyncError::Validation`].
    ///
    /// # Errors
    /// [`SyncError::Transport`] on network failure.
    async fn create_entry(
        &self,
        project_id: &str,
        entry: NewEntry,
    ) -> Result<LocalizationEntry, SyncError>;

    /// Replace the full per-language map of one entry.
    ///
    /// # Errors
    /// [`SyncError::Transport`] on network failure.
    async fn update_entry(
        &self,
        project_id: &str,
        entry_id: EntryId,
        translations: TranslationMap,
    ) -> Result<LocalizationEntry, SyncError>;

    /// Apply a list of full-map updates as a single call.
    ///
    /// Whether the backend applies the list atomically is part of the
    /// implementor's contract to confirm; the core reports one failure
    /// for the whole list either way and does not distinguish which
    /// items were applied.
    ///
    /// # Errors
    /// [`SyncError::Transport`] on network failure.
    async fn update_entries_batch(
        &self,
        project_id: &str,
        changes: Vec<EntryChange>,
    ) -> Result<(), SyncError>;
}
