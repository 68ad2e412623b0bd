//! Conversation history: an append-only, capped turn log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::{Store, CONVERSATION_KEY};

/// Maximum turns retained; the oldest is evicted first (FIFO, not LRU).
pub const HISTORY_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// One committed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// The ordered turn sequence, persisted whole after every commit.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnLog {
    turns: Vec<ConversationTurn>,
}

impl TurnLog {
    /// Load the persisted log, or start empty when absent or corrupt.
    pub fn load(store: &Store) -> Self {
        store.get_json(CONVERSATION_KEY).unwrap_or_default()
    }

    /// Append a turn, evicting from the front once over the cap.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        while self.turns.len() > HISTORY_CAP {
            self.turns.remove(0);
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Write the log whole to its document key.
    pub fn persist(&self, store: &Arc<Store>) {
        if let Err(e) = store.put_json(CONVERSATION_KEY, self) {
            tracing::warn!(error = %e, "failed to persist conversation history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(text: &str, sender: Sender) -> ConversationTurn {
        ConversationTurn {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn push_appends_in_order() {
        let mut log = TurnLog::default();
        log.push(turn("hello", Sender::User));
        log.push(turn("hi there", Sender::Assistant));

        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[0].text, "hello");
        assert_eq!(log.turns()[1].sender, Sender::Assistant);
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let mut log = TurnLog::default();
        for i in 0..(HISTORY_CAP + 3) {
            log.push(turn(&format!("message {i}"), Sender::User));
        }

        assert_eq!(log.len(), HISTORY_CAP);
        assert_eq!(log.turns()[0].text, "message 3");
        assert_eq!(
            log.turns().last().unwrap().text,
            format!("message {}", HISTORY_CAP + 2)
        );
    }

    #[test]
    fn round_trips_through_store() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let mut log = TurnLog::default();
        log.push(turn("remember me", Sender::User));
        log.persist(&store);

        let reloaded = TurnLog::load(&store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.turns()[0].text, "remember me");
        assert_eq!(reloaded.turns()[0].sender, Sender::User);
    }

    #[test]
    fn corrupt_history_loads_empty() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        store
            .put_json(CONVERSATION_KEY, &serde_json::json!({"not": "a list"}))
            .unwrap();

        let log = TurnLog::load(&store);
        assert!(log.is_empty());
    }
}
