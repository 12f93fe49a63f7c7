//! Derivation of the visible entry set: category filter, free-text
//! search, and pagination.

use crate::model::LocalizationEntry;
use crate::store::ALL_CATEGORY;

/// Fixed number of rows per page.
pub const PAGE_SIZE: usize = 10;

/// User-set view state of the matrix: category, search query, page.
///
/// The state is pure; it owns no entries. Callers pass the full entry
/// list into [`FilterState::filtered`] and page over the result.
#[derive(Debug, Clone)]
pub struct FilterState {
    active_category: String,
    search_query: String,
    page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORY.to_string(),
            search_query: String::new(),
            page: 1,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Requested page, before clamping against the filtered count.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Set the category filter. Resets the page to 1.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.active_category = category.into();
        self.page = 1;
    }

    /// Set the search query. Resets the page to 1.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.page = 1;
    }

    /// Move to `page`, clamped to the valid range for `filtered_count`
    /// entries (page 1 when the filtered set is empty).
    pub fn set_page(&mut self, page: usize, filtered_count: usize) {
        self.page = clamp_page(page, filtered_count);
    }

    /// Return to the first page without touching category or query.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Entries passing the category and search predicates, in input
    /// order.
    #[must_use]
    pub fn filtered<'a>(&self, entries: &'a [LocalizationEntry]) -> Vec<&'a LocalizationEntry> {
        let needle = self.search_query.to_lowercase();
        entries
            .iter()
            .filter(|entry| self.category_matches(entry) && search_matches(entry, &needle))
            .collect()
    }

    /// The current page of the filtered sequence, clamped.
    #[must_use]
    pub fn page_slice<'a>(
        &self,
        filtered: &[&'a LocalizationEntry],
    ) -> Vec<&'a LocalizationEntry> {
        let page = clamp_page(self.page, filtered.len());
        filtered.iter().skip((page - 1) * PAGE_SIZE).take(PAGE_SIZE).copied().collect()
    }

    fn category_matches(&self, entry: &LocalizationEntry) -> bool {
        self.active_category == ALL_CATEGORY || entry.category == self.active_category
    }
}

/// Case-insensitive substring match against the key, the description,
/// and every translation value regardless of language. `needle` must
/// already be lowercased; an empty needle matches everything.
fn search_matches(entry: &LocalizationEntry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if entry.key.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(description) = &entry.description
        && description.to_lowercase().contains(needle)
    {
        return true;
    }
    entry.translations.values().any(|translation| translation.value.to_lowercase().contains(needle))
}

/// Number of pages for `filtered_count` entries. 0 when the set is
/// empty.
#[must_use]
pub const fn page_count(filtered_count: usize) -> usize {
    filtered_count.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page to `[1, page_count]`, with 1 as the floor for
/// an empty set.
#[must_use]
pub const fn clamp_page(page: usize, filtered_count: usize) -> usize {
    let count = page_count(filtered_count);
    let upper = if count == 0 { 1 } else { count };
    if page < 1 {
        1
    } else if page > upper {
        upper
    } else {
        page
    }
}
