use crate::core::error::StoreError;
use fjall::PartitionHandle;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// A typed view over one fjall partition. Values are stored as JSON
/// documents; keys are plain strings.
#[derive(Clone)]
pub struct Collection {
    partition: PartitionHandle,
}

impl Collection {
    pub(crate) fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.partition.get(key)? {
            Some(bytes) => {
                debug!("Document HIT for key: {}", key);
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                debug!("Document MISS for key: {}", key);
                Ok(None)
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.partition.insert(key, serde_json::to_vec(value)?)?;
        debug!("Document PUT for key: {}", key);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.partition.remove(key)?;
        debug!("Document REMOVE for key: {}", key);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.partition.contains_key(key)?)
    }

    /// All keys starting with `prefix`, in key order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for item in self.partition.prefix(prefix) {
            let (key, _) = item?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    /// All values under keys starting with `prefix`.
    pub fn scan_prefix<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        let mut values = Vec::new();
        for item in self.partition.prefix(prefix) {
            let (_, value) = item?;
            values.push(serde_json::from_slice(&value)?);
        }
        Ok(values)
    }
}
