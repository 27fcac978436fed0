use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lesson_core::model::ChatId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes handlers per chat.
///
/// Holding the returned guard for the whole read-modify-deliver cycle keeps
/// two messages from the same chat from interleaving, whatever the host's
/// task layout.
#[derive(Clone, Default)]
pub struct ChatGate {
    locks: Arc<Mutex<HashMap<ChatId, Arc<AsyncMutex<()>>>>>,
}

impl ChatGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut guard = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(guard.entry(chat_id).or_default())
        };
        lock.lock_owned().await
    }
}
