//! Async facade wiring the cache, the persisted stores and the edit
//! controllers together.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::model::{
    EntryId,
    Language,
    LocalizationEntry,
    NewEntry,
    Project,
};
use crate::store::{
    CategoryStore,
    LanguageStore,
    ProjectStore,
    StateStorage,
    StoreError,
    distinct_categories,
};
use crate::sync::{
    LoadState,
    ResourceCache,
    SyncClient,
    SyncError,
};

use super::batch::{
    BatchDraft,
    BatchEditController,
    BatchError,
};
use super::filter::{
    FilterState,
    clamp_page,
    page_count,
};
use super::selection::Selection;
use super::session::{
    EditDraft,
    EditError,
    EditSessionController,
};

/// Errors from workbench operations.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("no active project selected")]
    NoActiveProject,
    #[error("no active language selected")]
    NoActiveLanguage,
    #[error("entry {0} is not in the loaded entry set")]
    UnknownEntry(EntryId),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Mutable state of the matrix, shared behind one lock.
#[derive(Debug, Default)]
struct MatrixState {
    entries: ResourceCache<String, Vec<LocalizationEntry>>,
    filter: FilterState,
    selection: Selection,
    session: EditSessionController,
    batch: BatchEditController,
}

impl MatrixState {
    /// Ids of the entries passing the current filter, in display order.
    fn filtered_ids(&self, project_id: &str) -> Vec<EntryId> {
        self.entries.data(project_id).map_or_else(Vec::new, |entries| {
            self.filter.filtered(entries).iter().map(|entry| entry.id).collect()
        })
    }
}

/// Owned snapshot of the visible page, safe to render without locks.
#[derive(Debug, Clone)]
pub struct MatrixPage {
    /// Entries of the current page, in display order.
    pub entries: Vec<LocalizationEntry>,
    /// Current page, clamped against the filtered count.
    pub page: usize,
    pub page_count: usize,
    pub filtered_count: usize,
    /// Load state of the active project's entry slot.
    pub state: LoadState,
}

/// The translation matrix workbench.
///
/// Owns the entry cache, the view state (filter, search, pagination,
/// selection), both edit state machines and the persisted selection
/// stores, over a pluggable [`SyncClient`].
///
/// All mutable state sits behind `tokio` mutexes. Locks are taken one
/// at a time and never held across a client call, so every other
/// interaction keeps working while a save is in flight; the `Saving`
/// states alone guard the edited cell and the batch form against
/// double submission.
pub struct MatrixWorkbench<C, S> {
    client: Arc<C>,
    /// Identity stamped into `updated_by` on every write.
    editor: String,
    state: Arc<Mutex<MatrixState>>,
    projects: Arc<Mutex<ProjectStore<S>>>,
    languages: Arc<Mutex<LanguageStore<S>>>,
    categories: Arc<Mutex<CategoryStore<S>>>,
}

impl<C, S> Clone for MatrixWorkbench<C, S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            editor: self.editor.clone(),
            state: Arc::clone(&self.state),
            projects: Arc::clone(&self.projects),
            languages: Arc::clone(&self.languages),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<C, S> std::fmt::Debug for MatrixWorkbench<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixWorkbench").field("editor", &self.editor).finish_non_exhaustive()
    }
}

impl<C: SyncClient, S: StateStorage> MatrixWorkbench<C, S> {
    /// Create a workbench over hydrated stores. The category filter is
    /// seeded from the persisted active category.
    pub fn new(
        client: impl Into<Arc<C>>,
        editor: impl Into<String>,
        projects: ProjectStore<S>,
        languages: LanguageStore<S>,
        categories: CategoryStore<S>,
    ) -> Self {
        let mut filter = FilterState::new();
        filter.set_category(categories.active());

        let state = MatrixState { filter, ..MatrixState::default() };

        Self {
            client: client.into(),
            editor: editor.into(),
            state: Arc::new(Mutex::new(state)),
            projects: Arc::new(Mutex::new(projects)),
            languages: Arc::new(Mutex::new(languages)),
            categories: Arc::new(Mutex::new(categories)),
        }
    }

    /// Handle to the project store, for the project picker.
    #[must_use]
    pub fn project_store(&self) -> Arc<Mutex<ProjectStore<S>>> {
        Arc::clone(&self.projects)
    }

    /// Handle to the language store, for the language picker.
    #[must_use]
    pub fn language_store(&self) -> Arc<Mutex<LanguageStore<S>>> {
        Arc::clone(&self.languages)
    }

    /// Handle to the category store, for the category picker.
    #[must_use]
    pub fn category_store(&self) -> Arc<Mutex<CategoryStore<S>>> {
        Arc::clone(&self.categories)
    }

    async fn active_project_id(&self) -> Result<String, WorkbenchError> {
        self.projects
            .lock()
            .await
            .active()
            .map(|project| project.id.clone())
            .ok_or(WorkbenchError::NoActiveProject)
    }

    async fn active_language(&self) -> Result<String, WorkbenchError> {
        self.languages
            .lock()
            .await
            .active()
            .map(|language| language.code.clone())
            .ok_or(WorkbenchError::NoActiveLanguage)
    }

    // --- cache -----------------------------------------------------------

    /// Fetch the active project's entries and resolve the cache slot.
    /// On success the category list is recomputed from the new entries
    /// and the selection is pruned to the ids that still pass the
    /// filter.
    ///
    /// # Errors
    /// [`WorkbenchError::NoActiveProject`] without an active project;
    /// fetch failures resolve the slot to [`LoadState::Failed`] and
    /// propagate. They are not retried automatically.
    pub async fn refresh_entries(&self) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;

        self.state.lock().await.entries.mark_loading(project_id.clone());
        tracing::debug!(%project_id, "fetching entries");

        match self.client.fetch_entries(&project_id).await {
            Ok(entries) => {
                let categories = distinct_categories(&entries);
                {
                    let mut guard = self.state.lock().await;
                    let state = &mut *guard;
                    state.entries.resolve(project_id.clone(), Ok(entries));
                    let filtered = state.filtered_ids(&project_id);
                    state.selection.prune(&filtered);
                }
                self.categories.lock().await.set_categories(categories)?;
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "entry fetch failed");
                self.state.lock().await.entries.resolve(project_id, Err(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Snapshot of the visible page under the current filter.
    ///
    /// # Errors
    /// [`WorkbenchError::NoActiveProject`] without an active project.
    pub async fn page(&self) -> Result<MatrixPage, WorkbenchError> {
        let project_id = self.active_project_id().await?;
        let guard = self.state.lock().await;

        let load_state = guard.entries.state(project_id.as_str());
        let empty = Vec::new();
        let entries = guard.entries.data(project_id.as_str()).unwrap_or(&empty);
        let filtered = guard.filter.filtered(entries);

        Ok(MatrixPage {
            entries: guard.filter.page_slice(&filtered).into_iter().cloned().collect(),
            page: clamp_page(guard.filter.page(), filtered.len()),
            page_count: page_count(filtered.len()),
            filtered_count: filtered.len(),
            state: load_state,
        })
    }

    // --- filter and selection --------------------------------------------

    /// Change the category filter. Persists the choice, resets the page
    /// to 1 and clears the selection.
    ///
    /// # Errors
    /// [`WorkbenchError::Store`] when the write-through fails.
    pub async fn set_category(&self, category: &str) -> Result<(), WorkbenchError> {
        self.categories.lock().await.set_active(category)?;

        let mut guard = self.state.lock().await;
        guard.filter.set_category(category);
        guard.selection.clear();
        tracing::debug!(category, "category filter changed");
        Ok(())
    }

    /// Change the search query. Resets the page to 1 and clears the
    /// selection.
    pub async fn set_search(&self, query: &str) {
        let mut guard = self.state.lock().await;
        guard.filter.set_search(query);
        guard.selection.clear();
    }

    /// Move to `page` (clamped). An actual page change clears the
    /// selection so a bulk edit never covers rows the user did not see.
    ///
    /// # Errors
    /// [`WorkbenchError::NoActiveProject`] without an active project.
    pub async fn set_page(&self, page: usize) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let count = state.filtered_ids(&project_id).len();
        let current = clamp_page(state.filter.page(), count);
        state.filter.set_page(page, count);
        if state.filter.page() != current {
            state.selection.clear();
        }
        Ok(())
    }

    /// Flip the selection state of one filtered entry.
    ///
    /// # Errors
    /// [`WorkbenchError::NoActiveProject`] without an active project.
    pub async fn toggle_selected(&self, id: EntryId) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let filtered = state.filtered_ids(&project_id);
        state.selection.toggle(id, &filtered);
        Ok(())
    }

    /// Select every filtered entry (`on`) or none (`!on`), regardless
    /// of pagination.
    ///
    /// # Errors
    /// [`WorkbenchError::NoActiveProject`] without an active project.
    pub async fn select_all(&self, on: bool) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let filtered = state.filtered_ids(&project_id);
        state.selection.select_all(on, &filtered);
        Ok(())
    }

    /// Selected ids in ascending order.
    pub async fn selected_ids(&self) -> Vec<EntryId> {
        self.state.lock().await.selection.sorted_ids()
    }

    // --- single-cell edit ------------------------------------------------

    /// Open an edit session on `entry_id` for the active language,
    /// seeded with the entry's current value.
    ///
    /// # Errors
    /// [`WorkbenchError::UnknownEntry`] when the entry is not in the
    /// loaded set, [`WorkbenchError::Edit`] when a save is in flight.
    pub async fn begin_edit(&self, entry_id: EntryId) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;
        let language = self.active_language().await?;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let current = state
            .entries
            .data(project_id.as_str())
            .and_then(|entries| entries.iter().find(|entry| entry.id == entry_id))
            .ok_or(WorkbenchError::UnknownEntry(entry_id))?
            .value_for(&language)
            .unwrap_or_default()
            .to_string();

        state.session.begin_edit(entry_id, &language, &current)?;
        Ok(())
    }

    /// Replace the cell draft.
    ///
    /// # Errors
    /// [`WorkbenchError::Edit`] outside an editable session state.
    pub async fn update_edit_draft(&self, value: &str) -> Result<(), WorkbenchError> {
        self.state.lock().await.session.update_draft(value)?;
        Ok(())
    }

    /// Persist the cell draft: merge, call the client, and on success
    /// refresh the cache. On failure the session returns to `Editing`
    /// with the draft intact for retry.
    ///
    /// # Errors
    /// [`WorkbenchError::Edit`] outside `Editing`,
    /// [`WorkbenchError::UnknownEntry`] when the entry vanished from
    /// the cache, [`WorkbenchError::Sync`] when the client call fails.
    pub async fn save_edit(&self) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;

        let payload = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;

            let entry_id = match state.session.draft() {
                Some(draft) => draft.entry_id,
                None => return Err(EditError::NotEditing.into()),
            };
            let existing = state
                .entries
                .data(project_id.as_str())
                .and_then(|entries| entries.iter().find(|entry| entry.id == entry_id))
                .map(|entry| entry.translations.clone())
                .ok_or(WorkbenchError::UnknownEntry(entry_id))?;

            state.session.begin_save(&existing, &self.editor, Utc::now())?
        };

        let entry_id = payload.entry_id;
        match self.client.update_entry(&project_id, entry_id, payload.translations).await {
            Ok(_updated) => {
                {
                    let mut guard = self.state.lock().await;
                    guard.session.finish_save(Ok(()));
                    guard.entries.invalidate(project_id.as_str());
                }
                tracing::info!(entry_id, "cell edit persisted");
                self.refresh_entries().await
            }
            Err(error) => {
                self.state.lock().await.session.finish_save(Err(error.clone()));
                Err(error.into())
            }
        }
    }

    /// Discard the cell draft.
    ///
    /// # Errors
    /// [`WorkbenchError::Edit`] outside `Editing`.
    pub async fn cancel_edit(&self) -> Result<(), WorkbenchError> {
        self.state.lock().await.session.cancel()?;
        Ok(())
    }

    /// Snapshot of the cell draft, while one exists.
    pub async fn edit_draft(&self) -> Option<EditDraft> {
        self.state.lock().await.session.draft().cloned()
    }

    // --- batch edit ------------------------------------------------------

    /// Open a bulk edit over the current selection for the active
    /// language.
    ///
    /// # Errors
    /// [`WorkbenchError::Batch`] on an empty selection or outside
    /// `Closed`, [`WorkbenchError::NoActiveLanguage`] without an active
    /// language.
    pub async fn open_batch(&self) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;
        let language = self.active_language().await?;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let selected = state.selection.sorted_ids();
        let entries = state.entries.data(project_id.as_str()).map_or(&[][..], Vec::as_slice);
        state.batch.open(&selected, &language, entries)?;
        Ok(())
    }

    /// Replace the draft value of one batched entry.
    ///
    /// # Errors
    /// [`WorkbenchError::Batch`] outside `Open` or for an id outside
    /// the session.
    pub async fn update_batch_draft(&self, id: EntryId, value: &str) -> Result<(), WorkbenchError> {
        self.state.lock().await.batch.update_draft(id, value)?;
        Ok(())
    }

    /// Persist the whole batch as one client call. On success the
    /// selection is cleared and the cache refreshed; on failure every
    /// draft and the selection survive for retry.
    ///
    /// # Errors
    /// [`WorkbenchError::Batch`] outside `Open`,
    /// [`WorkbenchError::Sync`] when the client call fails.
    pub async fn save_batch(&self) -> Result<(), WorkbenchError> {
        let project_id = self.active_project_id().await?;

        let changes = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;

            let entries = state.entries.data(project_id.as_str()).map_or(&[][..], Vec::as_slice);
            state.batch.begin_save(entries, &self.editor, Utc::now())?
        };

        let count = changes.len();
        match self.client.update_entries_batch(&project_id, changes).await {
            Ok(()) => {
                {
                    let mut guard = self.state.lock().await;
                    guard.batch.finish_save(Ok(()));
                    guard.selection.clear();
                    guard.entries.invalidate(project_id.as_str());
                }
                tracing::info!(count, "batch edit persisted");
                self.refresh_entries().await
            }
            Err(error) => {
                self.state.lock().await.batch.finish_save(Err(error.clone()));
                Err(error.into())
            }
        }
    }

    /// Discard the batch drafts. The selection stays as it was.
    ///
    /// # Errors
    /// [`WorkbenchError::Batch`] outside `Open`.
    pub async fn cancel_batch(&self) -> Result<(), WorkbenchError> {
        self.state.lock().await.batch.cancel()?;
        Ok(())
    }

    /// Snapshot of the batch drafts, while a session exists.
    pub async fn batch_draft(&self) -> Option<BatchDraft> {
        self.state.lock().await.batch.draft().cloned()
    }

    // --- creation and pickers --------------------------------------------

    /// Create a new entry and refresh the cache.
    ///
    /// # Errors
    /// [`SyncError::Validation`] when no translation is provided,
    /// [`WorkbenchError::Sync`] when the client call fails.
    pub async fn create_entry(&self, entry: NewEntry) -> Result<LocalizationEntry, WorkbenchError> {
        if entry.translations.is_empty() {
            return Err(
                SyncError::Validation("at least one translation is required".to_string()).into()
            );
        }
        let project_id = self.active_project_id().await?;

        let created = match self.client.create_entry(&project_id, entry).await {
            Ok(created) => created,
            Err(error) => {
                tracing::error!(%error, "entry creation failed");
                return Err(error.into());
            }
        };

        tracing::info!(entry_id = created.id, "entry created");
        self.state.lock().await.entries.invalidate(project_id.as_str());
        self.refresh_entries().await?;
        Ok(created)
    }

    /// Switch the active project. Persists the choice, resets page and
    /// selection, and discards an editable session; a `Saving` session
    /// is left to complete and its late outcome only refreshes the
    /// cache.
    ///
    /// # Errors
    /// [`WorkbenchError::Store`] when the write-through fails.
    pub async fn set_active_project(&self, project: Project) -> Result<(), WorkbenchError> {
        tracing::info!(project_id = %project.id, "active project changed");
        self.projects.lock().await.set_active(project)?;

        let mut guard = self.state.lock().await;
        guard.filter.reset_page();
        guard.selection.clear();
        if guard.session.is_editing() {
            guard.session.cancel()?;
        }
        if guard.batch.is_open() {
            guard.batch.cancel()?;
        }
        Ok(())
    }

    /// Switch the active language column. Open sessions keep the
    /// language they were seeded with.
    ///
    /// # Errors
    /// [`WorkbenchError::Store`] when the write-through fails.
    pub async fn set_active_language(&self, language: Language) -> Result<(), WorkbenchError> {
        tracing::info!(code = %language.code, "active language changed");
        self.languages.lock().await.set_active(language)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{
        FakeSyncClient,
        MemoryStorage,
        entry,
    };

    async fn workbench(
        entries: Vec<LocalizationEntry>,
    ) -> (Arc<FakeSyncClient>, MatrixWorkbench<FakeSyncClient, MemoryStorage>) {
        let client = Arc::new(FakeSyncClient::with_entries(entries));

        let mut projects = crate::store::ProjectStore::load(MemoryStorage::default()).unwrap();
        projects
            .set_active(Project { id: "proj-1".to_string(), name: "Website".to_string() })
            .unwrap();
        let mut languages = crate::store::LanguageStore::load(MemoryStorage::default()).unwrap();
        languages
            .set_active(Language { code: "en".to_string(), name: "English".to_string() })
            .unwrap();
        let categories = crate::store::CategoryStore::load(MemoryStorage::default()).unwrap();

        let workbench =
            MatrixWorkbench::new(Arc::clone(&client), "alice", projects, languages, categories);
        workbench.refresh_entries().await.unwrap();
        (client, workbench)
    }

    fn sample_entries() -> Vec<LocalizationEntry> {
        vec![
            entry(1, "greeting.hello", "common", &[("en", "Hello"), ("fr", "Bonjour")]),
            entry(2, "greeting.bye", "common", &[("en", "Goodbye")]),
            entry(3, "errors.notFound", "errors", &[("fr", "Introuvable")]),
        ]
    }

    #[tokio::test]
    async fn refresh_loads_entries_and_categories() {
        let (_client, workbench) = workbench(sample_entries()).await;

        let page = workbench.page().await.unwrap();
        assert_eq!(page.state, LoadState::Loaded);
        assert_eq!(page.filtered_count, 3);

        let categories = workbench.category_store();
        let categories = categories.lock().await;
        assert_eq!(
            categories.categories(),
            ["all".to_string(), "common".to_string(), "errors".to_string()]
        );
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_as_failed_state() {
        let (client, workbench) = workbench(sample_entries()).await;
        *client.fail_fetch.lock().unwrap() = true;

        let result = workbench.refresh_entries().await;

        assert!(result.is_err());
        let page = workbench.page().await.unwrap();
        assert_eq!(page.state, LoadState::Failed("transport error: fetch failed".to_string()));
    }

    #[tokio::test]
    async fn save_edit_preserves_other_languages() {
        let (client, workbench) = workbench(sample_entries()).await;

        workbench.begin_edit(1).await.unwrap();
        workbench.update_edit_draft("Hi").await.unwrap();
        workbench.save_edit().await.unwrap();

        // one update call, carrying the untouched fr value
        let updates = client.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let (entry_id, translations) = updates.first().unwrap();
        assert_eq!(*entry_id, 1);
        assert_eq!(translations.get("en").map(|t| t.value.as_str()), Some("Hi"));
        assert_eq!(translations.get("fr").map(|t| t.value.as_str()), Some("Bonjour"));
        drop(updates);

        // session closed, cache refreshed with the new value
        assert!(workbench.edit_draft().await.is_none());
        let page = workbench.page().await.unwrap();
        let edited = page.entries.iter().find(|entry| entry.id == 1).unwrap();
        assert_eq!(edited.value_for("en"), Some("Hi"));
    }

    #[tokio::test]
    async fn failed_save_keeps_draft_for_retry() {
        let (client, workbench) = workbench(sample_entries()).await;
        *client.fail_update.lock().unwrap() = true;

        workbench.begin_edit(1).await.unwrap();
        workbench.update_edit_draft("Hi").await.unwrap();
        let result = workbench.save_edit().await;

        assert!(result.is_err());
        let draft = workbench.edit_draft().await.unwrap();
        assert_eq!(draft.value, "Hi");
        assert!(draft.error.is_some());

        // retry succeeds once the backend recovers
        *client.fail_update.lock().unwrap() = false;
        workbench.save_edit().await.unwrap();
        assert!(workbench.edit_draft().await.is_none());
    }

    #[tokio::test]
    async fn begin_edit_unknown_entry_is_rejected() {
        let (_client, workbench) = workbench(sample_entries()).await;

        let result = workbench.begin_edit(99).await;

        assert!(matches!(result, Err(WorkbenchError::UnknownEntry(99))));
    }

    #[tokio::test]
    async fn select_all_spans_every_page() {
        let entries: Vec<_> =
            (1..=25).map(|id| entry(id, &format!("key.{id}"), "common", &[])).collect();
        let (_client, workbench) = workbench(entries).await;

        workbench.select_all(true).await.unwrap();

        assert_eq!(workbench.selected_ids().await.len(), 25);
        let page = workbench.page().await.unwrap();
        assert_eq!(page.page_count, 3);
        assert_eq!(page.entries.len(), 10);
    }

    #[tokio::test]
    async fn search_matches_other_language_and_resets_selection() {
        let (_client, workbench) = workbench(sample_entries()).await;
        workbench.toggle_selected(1).await.unwrap();

        workbench.set_search("bonjour").await;

        let page = workbench.page().await.unwrap();
        assert_eq!(page.filtered_count, 1);
        assert_eq!(page.entries.first().map(|entry| entry.id), Some(1));
        assert!(workbench.selected_ids().await.is_empty());
    }

    #[tokio::test]
    async fn category_change_resets_page_and_selection() {
        let entries: Vec<_> =
            (1..=25).map(|id| entry(id, &format!("key.{id}"), "common", &[])).collect();
        let (_client, workbench) = workbench(entries).await;
        workbench.set_page(3).await.unwrap();
        workbench.toggle_selected(21).await.unwrap();

        workbench.set_category("common").await.unwrap();

        let page = workbench.page().await.unwrap();
        assert_eq!(page.page, 1);
        assert!(workbench.selected_ids().await.is_empty());

        // the choice is written through to the persisted store
        let categories = workbench.category_store();
        assert_eq!(categories.lock().await.active(), "common");
    }

    #[tokio::test]
    async fn page_change_clears_selection() {
        let entries: Vec<_> =
            (1..=25).map(|id| entry(id, &format!("key.{id}"), "common", &[])).collect();
        let (_client, workbench) = workbench(entries).await;
        workbench.toggle_selected(1).await.unwrap();

        workbench.set_page(2).await.unwrap();

        assert!(workbench.selected_ids().await.is_empty());
    }

    #[tokio::test]
    async fn same_page_keeps_selection() {
        let (_client, workbench) = workbench(sample_entries()).await;
        workbench.toggle_selected(1).await.unwrap();

        workbench.set_page(1).await.unwrap();

        assert_eq!(workbench.selected_ids().await, vec![1]);
    }

    #[tokio::test]
    async fn batch_save_submits_one_call_with_full_maps() {
        let (client, workbench) = workbench(sample_entries()).await;
        workbench.toggle_selected(1).await.unwrap();
        workbench.toggle_selected(3).await.unwrap();

        workbench.open_batch().await.unwrap();
        workbench.update_batch_draft(1, "Hi").await.unwrap();
        workbench.update_batch_draft(3, "Not found").await.unwrap();
        workbench.save_batch().await.unwrap();

        let batches = client.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let changes = batches.first().unwrap();
        assert_eq!(changes.len(), 2);
        let third = changes.iter().find(|change| change.id == 3).unwrap();
        assert_eq!(third.translations.get("en").map(|t| t.value.as_str()), Some("Not found"));
        assert_eq!(third.translations.get("fr").map(|t| t.value.as_str()), Some("Introuvable"));
        drop(batches);

        // success clears selection and drafts
        assert!(workbench.selected_ids().await.is_empty());
        assert!(workbench.batch_draft().await.is_none());
    }

    #[tokio::test]
    async fn failed_batch_keeps_selection_and_drafts() {
        let (client, workbench) = workbench(sample_entries()).await;
        *client.fail_batch.lock().unwrap() = true;
        workbench.select_all(true).await.unwrap();

        workbench.open_batch().await.unwrap();
        workbench.update_batch_draft(1, "Hi").await.unwrap();
        let result = workbench.save_batch().await;

        assert!(result.is_err());
        assert_eq!(workbench.selected_ids().await, vec![1, 2, 3]);
        let draft = workbench.batch_draft().await.unwrap();
        assert_eq!(draft.values.get(&1).map(String::as_str), Some("Hi"));
        assert!(draft.error.is_some());

        // retry without re-entering values
        *client.fail_batch.lock().unwrap() = false;
        workbench.save_batch().await.unwrap();
        assert!(workbench.selected_ids().await.is_empty());
    }

    #[tokio::test]
    async fn cancel_batch_keeps_selection() {
        let (_client, workbench) = workbench(sample_entries()).await;
        workbench.toggle_selected(1).await.unwrap();
        workbench.open_batch().await.unwrap();

        workbench.cancel_batch().await.unwrap();

        assert!(workbench.batch_draft().await.is_none());
        assert_eq!(workbench.selected_ids().await, vec![1]);
    }

    #[tokio::test]
    async fn open_batch_requires_selection() {
        let (_client, workbench) = workbench(sample_entries()).await;

        let result = workbench.open_batch().await;

        assert!(matches!(result, Err(WorkbenchError::Batch(BatchError::EmptySelection))));
    }

    #[tokio::test]
    async fn create_entry_rejects_empty_translations() {
        let (client, workbench) = workbench(sample_entries()).await;

        let result = workbench
            .create_entry(NewEntry {
                key: "empty.key".to_string(),
                category: "common".to_string(),
                description: None,
                translations: std::collections::HashMap::new(),
            })
            .await;

        assert!(matches!(result, Err(WorkbenchError::Sync(SyncError::Validation(_)))));
        assert_eq!(client.entries.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn create_entry_refreshes_cache() {
        let (_client, workbench) = workbench(sample_entries()).await;

        let created = workbench
            .create_entry(NewEntry {
                key: "greeting.welcome".to_string(),
                category: "common".to_string(),
                description: None,
                translations: std::collections::HashMap::from([(
                    "en".to_string(),
                    crate::model::NewTranslation { value: "Welcome".to_string() },
                )]),
            })
            .await
            .unwrap();

        let page = workbench.page().await.unwrap();
        assert_eq!(page.filtered_count, 4);
        assert!(page.entries.iter().any(|entry| entry.id == created.id));
    }

    #[tokio::test]
    async fn project_switch_resets_view_state() {
        let (_client, workbench) = workbench(sample_entries()).await;
        workbench.toggle_selected(1).await.unwrap();
        workbench.begin_edit(1).await.unwrap();

        workbench
            .set_active_project(Project { id: "proj-2".to_string(), name: "Mobile".to_string() })
            .await
            .unwrap();

        assert!(workbench.selected_ids().await.is_empty());
        assert!(workbench.edit_draft().await.is_none());
    }
}
