//! InMemory KeyValueStore 実装
//!
//! プロセス終了で内容が失われるため、テストと一時的な実行でのみ使用します。

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::domain::{KeyValueStore, StorageError};

/// インメモリ KeyValueStore 実装
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_overwrites() {
        // テスト項目: 同じキーへの書き込みは最後の値で上書きされる
        // given (前提条件):
        let store = InMemoryStore::new();

        // when (操作):
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();

        // then (期待する結果):
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("missing").unwrap(), None);
    }
}
