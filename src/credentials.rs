use anyhow::Result;

use crate::storage::Storage;

pub const CREDENTIAL_KEY: &str = "groq_api_key";

/// API key saved through `setup-key`, used when `GROQ_API_KEY` is unset.
pub struct Credentials<S> {
    store: S,
}

impl<S: Storage> Credentials<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(CREDENTIAL_KEY)?
            .filter(|key| !key.trim().is_empty()))
    }

    pub fn set(&mut self, api_key: &str) -> Result<()> {
        self.store.set(CREDENTIAL_KEY, api_key.trim())
    }

    pub fn clear(&mut self) -> Result<bool> {
        Ok(self.store.remove(CREDENTIAL_KEY)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn set_get_clear() {
        let mut creds = Credentials::new(MemoryStore::new());
        assert_eq!(creds.get().unwrap(), None);

        creds.set("  gsk_test  ").unwrap();
        assert_eq!(creds.get().unwrap().as_deref(), Some("gsk_test"));

        assert!(creds.clear().unwrap());
        assert!(!creds.clear().unwrap());
        assert_eq!(creds.get().unwrap(), None);
    }

    #[test]
    fn shares_store_with_watchlist_without_clobbering() {
        use crate::watchlist::Watchlist;

        let mut store = MemoryStore::new();
        Credentials::new(&mut store).set("gsk_test").unwrap();
        Watchlist::new(&mut store).save("Dark").unwrap();
        assert_eq!(store.list().unwrap(), vec![CREDENTIAL_KEY, "watchlist"]);
    }
}
