//! Saved searches persisted as one JSON array in key-value storage.

use std::sync::Arc;

use uuid::Uuid;

use blogdash_core::posts::{validate_search_name, SavedSearch, SearchFilters, SAVED_SEARCHES_KEY};
use blogdash_core::storage::KeyValueStorage;

use super::SearchError;

/// Named search filters over a [`KeyValueStorage`] backend.
#[derive(Clone)]
pub struct SavedSearchStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SavedSearchStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Reads every saved search. A missing key is empty.
    pub fn load(&self) -> Result<Vec<SavedSearch>, SearchError> {
        let Some(raw) = self.storage.get_item(SAVED_SEARCHES_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| SearchError::Corrupt(e.to_string()))
    }

    fn save(&self, searches: &[SavedSearch]) -> Result<(), SearchError> {
        let raw =
            serde_json::to_string(searches).map_err(|e| SearchError::Encode(e.to_string()))?;
        self.storage.set_item(SAVED_SEARCHES_KEY, &raw)?;
        Ok(())
    }

    /// Stores `filters` under `name`, replacing the filters of an existing
    /// search with the same name.
    pub fn save_search(
        &self,
        name: &str,
        filters: SearchFilters,
    ) -> Result<SavedSearch, SearchError> {
        validate_search_name(name)?;
        let name = name.trim();

        let mut searches = self.load()?;
        let saved = match searches.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                existing.filters = filters;
                existing.clone()
            }
            None => {
                let search = SavedSearch {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    filters,
                };
                searches.push(search.clone());
                search
            }
        };
        self.save(&searches)?;

        tracing::debug!(id = %saved.id, name = %saved.name, "Search saved");
        Ok(saved)
    }

    pub fn find(&self, name: &str) -> Result<Option<SavedSearch>, SearchError> {
        let name = name.trim();
        Ok(self.load()?.into_iter().find(|s| s.name == name))
    }

    /// Removes the search called `name`. Returns `false` when none existed.
    pub fn delete_search(&self, name: &str) -> Result<bool, SearchError> {
        let name = name.trim();
        let mut searches = self.load()?;
        let before = searches.len();
        searches.retain(|s| s.name != name);
        if searches.len() == before {
            return Ok(false);
        }
        self.save(&searches)?;
        Ok(true)
    }
}
