use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{SlotName, Storage, StorageError};

/// Process-local storage, the stand-in for browser local storage.
/// Clones share the same slots.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStorage {
    slots: Arc<RwLock<HashMap<SlotName, String>>>,
    quota_bytes: Option<usize>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes that would grow total stored bytes (names + values) past `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: Arc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// total bytes currently stored, slot names included
    pub fn used_bytes(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        used_bytes(&slots)
    }
}

fn used_bytes(slots: &HashMap<SlotName, String>) -> usize {
    slots
        .iter()
        .map(|(name, value)| name.as_ref().len() + value.len())
        .sum()
}

impl Storage for InMemoryStorage {
    async fn get(&self, slot: &SlotName) -> Result<Option<String>, StorageError> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(slot).cloned())
    }

    async fn set(&self, slot: &SlotName, value: String) -> Result<(), StorageError> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota_bytes {
            let replaced = slots
                .get(slot)
                .map(|old| slot.as_ref().len() + old.len())
                .unwrap_or(0);
            let needed = used_bytes(&slots) - replaced + slot.as_ref().len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    slot: slot.to_string(),
                    limit,
                });
            }
        }

        slots.insert(slot.clone(), value);
        Ok(())
    }

    async fn delete(&self, slot: &SlotName) -> Result<(), StorageError> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.remove(slot);
        Ok(())
    }
}
