//! Key-Value store wrapper with automatic serialization.

use crate::{CacheError, Storage};
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over any [`Storage`] backend.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Values are stored as JSON text, so the
/// raw entries stay readable by anything else sharing the backend.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: Storage> Cache<S> {
    /// Wrap a storage backend.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::new(MemoryStorage::new());
    /// ```
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and a
    /// [`CacheError::SerializeError`] if the stored text is not a valid `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("turbo-cart:cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get_item(key)? {
            Some(text) => {
                let value: T = serde_json::from_str(&text)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get the raw stored text for a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.store.get_item(key)
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("turbo-cart:cart", &cart)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let text = serde_json::to_string(value)?;
        self.store.set_item(key, &text)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove_item(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.get_item(key)?.is_some())
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }

    /// Borrow the underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: u64,
        amount: u32,
    }

    #[test]
    fn test_set_then_get() {
        let cache = Cache::new(MemoryStorage::new());
        let lines = vec![Line { id: 1, amount: 2 }];

        cache.set("cart", &lines).unwrap();
        let loaded: Option<Vec<Line>> = cache.get("cart").unwrap();
        assert_eq!(loaded, Some(lines));
        assert_eq!(
            cache.get_raw("cart").unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":2}]"#)
        );
    }

    #[test]
    fn test_get_missing() {
        let cache = Cache::new(MemoryStorage::new());
        let loaded: Option<Vec<Line>> = cache.get("cart").unwrap();
        assert!(loaded.is_none());
        assert!(!cache.exists("cart").unwrap());
    }

    #[test]
    fn test_get_wrong_shape_is_serialize_error() {
        let cache = Cache::new(MemoryStorage::with_items([("cart", "{\"oops\":true}")]));
        let result: Result<Option<Vec<Line>>, _> = cache.get("cart");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_delete() {
        let cache = Cache::new(MemoryStorage::new());
        cache.set("cart", &Vec::<Line>::new()).unwrap();
        assert!(cache.exists("cart").unwrap());

        cache.delete("cart").unwrap();
        assert!(!cache.exists("cart").unwrap());
        assert!(cache.keys().unwrap().is_empty());
    }
}
