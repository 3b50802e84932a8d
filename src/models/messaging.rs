use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Audience, Id};
use crate::storage::entity::{require_text, Entity};
use crate::storage::{MemStorage, MemTable, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub school_id: Id,
    pub sender_id: Id,
    pub receiver_id: Option<Id>,
    pub receiver_role: Audience,
    pub subject: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub school_id: Id,
    pub sender_id: Id,
    pub receiver_id: Option<Id>,
    pub receiver_role: Audience,
    pub subject: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
}

impl Entity for Message {
    type New = NewMessage;
    const COLLECTION: &'static str = "messages";
    const READONLY_FIELDS: &'static [&'static str] = &["created_at"];

    fn build(id: Id, new: NewMessage) -> Self {
        Self {
            id,
            school_id: new.school_id,
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            receiver_role: new.receiver_role,
            subject: new.subject,
            content: new.content,
            is_read: new.is_read,
            created_at: Utc::now(),
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.messages
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "content", &self.content)
    }
}

/// A post on a class notice board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMessage {
    pub id: Id,
    pub class_id: Id,
    pub sender_id: Id,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClassMessage {
    pub class_id: Id,
    pub sender_id: Id,
    pub content: String,
}

impl Entity for ClassMessage {
    type New = NewClassMessage;
    const COLLECTION: &'static str = "class_messages";
    const READONLY_FIELDS: &'static [&'static str] = &["created_at"];

    fn build(id: Id, new: NewClassMessage) -> Self {
        Self {
            id,
            class_id: new.class_id,
            sender_id: new.sender_id,
            content: new.content,
            created_at: Utc::now(),
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.class_messages
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "content", &self.content)
    }
}
