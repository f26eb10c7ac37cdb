use crate::chord::types::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory key/value map of a single node, safe to share between the
/// tasks serving concurrent requests. The map itself is never handed out.
#[derive(Debug, Default)]
pub struct Store {
    data: RwLock<HashMap<String, Value>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.data.read().await.get(key).cloned()
    }

    /// Stores `value`, returning the value it replaced
    pub async fn set(&self, key: &str, value: Value) -> Option<Value> {
        self.data.write().await.insert(key.to_owned(), value)
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }
}
