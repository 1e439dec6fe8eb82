use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};

use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// JSON file-backed document store.
///
/// Keeps a `HashMap<K, V>` in memory behind an async `RwLock` and
/// persists it to a JSON file after every mutation. The write lock is
/// held across both the in-memory change and the file write, so a
/// multi-step mutation passed to [`DocumentStore::mutate`] applies
/// together-or-not-at-all and is never observed half-done.
#[derive(Clone)]
pub struct DocumentStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> DocumentStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`, creating an empty file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, encode(&empty)?)
                    .await
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    /// Run a read-only closure over the map.
    pub async fn read<R>(&self, f: impl FnOnce(&HashMap<K, V>) -> R) -> R {
        let map = self.inner.read().await;
        f(&map)
    }

    /// Get a value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.mutate(|map| {
            map.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        self.mutate(|map| Ok(map.remove(key).is_some())).await
    }

    /// Apply a fallible mutation and persist the result atomically.
    ///
    /// The closure's error aborts the whole operation: nothing is
    /// changed in memory or on disk. On success the updated map is
    /// written to the backing file before the lock is released.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut HashMap<K, V>) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut map = self.inner.write().await;
        let mut staged = map.clone();
        let out = f(&mut staged)?;
        let data = encode(&staged)?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        *map = staged;
        Ok(out)
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(value).map_err(|e| ServiceError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("doc_store_{tag}_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn crud_persists_across_reload() -> Result<(), anyhow::Error> {
        let path = temp_path("crud");
        let store = DocumentStore::<String, u32>::open(&path).await?;

        store.insert("a".into(), 1).await?;
        store.insert("b".into(), 2).await?;
        assert_eq!(store.get(&"a".into()).await, Some(1));
        assert!(store.remove(&"b".into()).await?);

        let reloaded = DocumentStore::<String, u32>::open(&path).await?;
        assert_eq!(reloaded.read(|m| m.len()).await, 1);
        assert_eq!(reloaded.get(&"a".into()).await, Some(1));

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_leaves_store_untouched() -> Result<(), anyhow::Error> {
        let path = temp_path("abort");
        let store = DocumentStore::<String, u32>::open(&path).await?;
        store.insert("keep".into(), 7).await?;

        let res = store
            .mutate(|map| {
                map.insert("doomed".into(), 9);
                Err::<(), _>(ServiceError::Storage("boom".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(store.get(&"doomed".into()).await, None);
        assert_eq!(store.get(&"keep".into()).await, Some(7));

        let reloaded = DocumentStore::<String, u32>::open(&path).await?;
        assert_eq!(reloaded.read(|m| m.len()).await, 1);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn mutate_returns_closure_value() -> Result<(), anyhow::Error> {
        let path = temp_path("ret");
        let store = DocumentStore::<String, u32>::open(&path).await?;
        let doubled = store
            .mutate(|map| {
                map.insert("x".into(), 21);
                Ok(map["x"] * 2)
            })
            .await?;
        assert_eq!(doubled, 42);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
