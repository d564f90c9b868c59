//! Strongly-typed identifiers for punchclock

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a chat the bot talks to (the reminder key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Row id of a work session, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i64);

impl SessionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_order_by_creation() {
        let older = SessionId::new(3);
        let newer = SessionId::new(7);
        assert!(newer > older);
        assert_eq!(newer.to_string(), "#7");
    }

    #[test]
    fn chat_id_serializes_as_plain_number() {
        let chat = ChatId::new(-100123);
        let json = serde_json::to_string(&chat).unwrap();
        assert_eq!(json, "-100123");

        let parsed: ChatId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, chat);
    }
}
