pub mod accounts;
pub mod caching;
pub mod disk;
pub mod memory;

use crate::core::error::StoreError;
use disk::Collection;
use fjall::{Config, Keyspace, PartitionCreateOptions};
use std::path::Path;

/// Local document store; one keyspace under the data directory, one
/// partition per collection.
pub struct Documents {
    keyspace: Keyspace,
}

impl Documents {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path)?;
        let keyspace = Config::new(path).open()?;
        Ok(Self { keyspace })
    }

    pub fn collection(&self, name: &str) -> Result<Collection, StoreError> {
        let partition = self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())?;
        Ok(Collection::new(partition))
    }
}
