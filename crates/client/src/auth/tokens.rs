//! Bearer credential persistence.

use secrecy::SecretString;

use crate::gateway::TokenPair;
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key names for the credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenKeys {
    /// Key holding the access token.
    pub access: String,
    /// Key holding the refresh token.
    pub refresh: String,
}

impl Default for TokenKeys {
    fn default() -> Self {
        Self {
            access: "access_token".to_string(),
            refresh: "refresh_token".to_string(),
        }
    }
}

/// Bearer credential storage over a [`KeyValueStore`].
///
/// Tokens are handed out wrapped in [`SecretString`] so they are redacted
/// from `Debug` output and only exposed deliberately at the request boundary.
pub struct TokenStore<S> {
    storage: S,
    keys: TokenKeys,
}

impl<S: KeyValueStore> TokenStore<S> {
    /// Create a token store with the default key names.
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, TokenKeys::default())
    }

    /// Create a token store with custom key names.
    pub const fn with_keys(storage: S, keys: TokenKeys) -> Self {
        Self { storage, keys }
    }

    /// The stored access token, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    pub fn access_token(&self) -> StorageResult<Option<SecretString>> {
        Ok(self
            .storage
            .get(&self.keys.access)?
            .map(SecretString::from))
    }

    /// The stored refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    pub fn refresh_token(&self) -> StorageResult<Option<SecretString>> {
        Ok(self
            .storage
            .get(&self.keys.refresh)?
            .map(SecretString::from))
    }

    /// Persist both tokens of a pair.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written.
    pub fn store(&self, pair: &TokenPair) -> StorageResult<()> {
        self.storage.set(&self.keys.access, &pair.access_token)?;
        self.storage.set(&self.keys.refresh, &pair.refresh_token)?;
        Ok(())
    }

    /// Remove both stored tokens.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(&self.keys.access)?;
        self.storage.remove(&self.keys.refresh)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use secrecy::ExposeSecret;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-xyz".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(3600),
        }
    }

    #[test]
    fn test_store_and_read_back() {
        let store = TokenStore::new(MemoryStore::new());
        assert!(store.access_token().unwrap().is_none());

        store.store(&pair()).unwrap();
        assert_eq!(
            store.access_token().unwrap().unwrap().expose_secret(),
            "access-abc"
        );
        assert_eq!(
            store.refresh_token().unwrap().unwrap().expose_secret(),
            "refresh-xyz"
        );
    }

    #[test]
    fn test_clear_removes_both_tokens() {
        let store = TokenStore::new(MemoryStore::new());
        store.store(&pair()).unwrap();

        store.clear().unwrap();
        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
    }

    #[test]
    fn test_custom_keys() {
        let storage = MemoryStore::new();
        let keys = TokenKeys {
            access: "jwt".to_string(),
            refresh: "jwt_refresh".to_string(),
        };
        let store = TokenStore::with_keys(storage.clone(), keys);

        store.store(&pair()).unwrap();
        assert_eq!(storage.get("jwt").unwrap(), Some("access-abc".to_string()));
        assert_eq!(storage.get("access_token").unwrap(), None);
    }
}
