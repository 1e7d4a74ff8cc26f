use super::{SlotError, SlotResult, SlotStorage};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Process-local slot storage.
///
/// Useful as a stand-in for durable storage in tests; write failures can be
/// switched on to exercise persistence error paths.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `set`/`remove` calls fail with `SlotError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Writes a raw value, bypassing failure injection.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.slots.borrow_mut().insert(key.into(), value.into());
    }

    fn check_writable(&self) -> SlotResult<()> {
        if self.fail_writes.get() {
            return Err(SlotError::Unavailable("write rejected".to_string()));
        }
        Ok(())
    }
}

impl SlotStorage for MemorySlotStorage {
    fn get(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SlotResult<()> {
        self.check_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SlotResult<bool> {
        self.check_writable()?;
        Ok(self.slots.borrow_mut().remove(key).is_some())
    }
}
