use anyhow::{Context, Result};

use crate::storage::Storage;

pub const WATCHLIST_KEY: &str = "watchlist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered list of saved titles, stored as a JSON array of strings.
///
/// Duplicates are detected by exact, case-sensitive comparison, so
/// "Parasite" and "Parasite (2019)" are two entries.
pub struct Watchlist<S> {
    store: S,
}

impl<S: Storage> Watchlist<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn items(&self) -> Result<Vec<String>> {
        match self.store.get(WATCHLIST_KEY)? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to parse stored watchlist"),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self, items: &[String]) -> Result<()> {
        let json = serde_json::to_string(items).context("Failed to serialize watchlist")?;
        self.store.set(WATCHLIST_KEY, &json)
    }

    /// Appends `title` unless an identical entry exists.
    pub fn save(&mut self, title: &str) -> Result<SaveOutcome> {
        let mut items = self.items()?;
        if items.iter().any(|item| item == title) {
            tracing::debug!(title, "title already in watchlist");
            return Ok(SaveOutcome::AlreadyPresent);
        }
        items.push(title.to_string());
        self.persist(&items)?;
        tracing::info!(title, total = items.len(), "added title to watchlist");
        Ok(SaveOutcome::Added)
    }

    /// Manual entry: input is trimmed and blank input is ignored.
    pub fn add_manual(&mut self, title: &str) -> Result<Option<SaveOutcome>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        self.save(title).map(Some)
    }

    pub fn remove(&mut self, index: usize) -> Result<String> {
        let mut items = self.items()?;
        if index >= items.len() {
            anyhow::bail!(
                "No watchlist entry at position {} (watchlist has {} items)",
                index + 1,
                items.len()
            );
        }
        let removed = items.remove(index);
        self.persist(&items)?;
        tracing::info!(title = %removed, "removed title from watchlist");
        Ok(removed)
    }

    /// Entries whose title contains `term` case-insensitively, with their
    /// position in the full list.
    pub fn search(&self, term: &str) -> Result<Vec<(usize, String)>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .items()?
            .into_iter()
            .enumerate()
            .filter(|(_, item)| item.to_lowercase().contains(&needle))
            .collect())
    }
}
