//! Domain types shared by the filter pipeline, chart engine and views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

pub type RecordId = String;

/// Relationship state of a contact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// An entry in the contacts directory.
///
/// `name`, `email`, `company` and `role` are the searchable fields.
/// `last_contact` is display text ("2 days ago"); ordering by recency uses
/// `added_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub avatar: String,
    pub is_starred: bool,
    pub last_contact: String,
    pub status: ContactStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    pub interactions: u32,
    pub added_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Open,
    Pending,
    Resolved,
}

/// Kind of assistance the AI flagged on a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AiSuggestion {
    Reply,
    Categorize,
    Escalate,
}

impl FromStr for ContactStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            other => Err(Error::NotFound(format!("contact status '{other}'"))),
        }
    }
}

impl FromStr for ConversationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            other => Err(Error::NotFound(format!("conversation status '{other}'"))),
        }
    }
}

impl FromStr for AiSuggestion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reply" => Ok(Self::Reply),
            "categorize" => Ok(Self::Categorize),
            "escalate" => Ok(Self::Escalate),
            other => Err(Error::NotFound(format!("AI suggestion '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationUser {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A customer conversation as shown in the inbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: RecordId,
    pub user: ConversationUser,
    pub subject: String,
    pub preview: String,
    pub timestamp: String,
    pub status: ConversationStatus,
    #[serde(default)]
    pub is_unread: bool,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<AiSuggestion>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The older list-item shape some feeds still emit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConversation {
    pub id: RecordId,
    pub contact_name: String,
    pub last_message: String,
    pub timestamp: String,
    #[serde(default)]
    pub unread: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_priority: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A conversation as it arrives at the ingestion boundary.
///
/// Decoded once and normalized into [`Conversation`]; nothing past
/// ingestion sees the legacy shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConversationItem {
    Current(Conversation),
    Legacy(LegacyConversation),
}

impl From<LegacyConversation> for Conversation {
    fn from(legacy: LegacyConversation) -> Self {
        Self {
            id: legacy.id,
            user: ConversationUser { name: legacy.contact_name, email: String::new() },
            subject: legacy.last_message.clone(),
            preview: legacy.last_message,
            timestamp: legacy.timestamp,
            status: ConversationStatus::Open,
            is_unread: legacy.unread > 0 || legacy.is_new,
            is_starred: legacy.is_priority,
            assignee: None,
            ai_suggestion: None,
            tags: Vec::new(),
        }
    }
}

impl From<ConversationItem> for Conversation {
    fn from(item: ConversationItem) -> Self {
        match item {
            ConversationItem::Current(conversation) => conversation,
            ConversationItem::Legacy(legacy) => legacy.into(),
        }
    }
}

/// Decode a JSON array of conversation items in either shape.
pub fn ingest_conversations(json: &str) -> crate::error::Result<Vec<Conversation>> {
    let items: Vec<ConversationItem> = serde_json::from_str(json)?;
    let legacy = items.iter().filter(|i| matches!(i, ConversationItem::Legacy(_))).count();
    if legacy > 0 {
        tracing::debug!(legacy, total = items.len(), "normalized legacy conversation items");
    }
    Ok(items.into_iter().map(Conversation::from).collect())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Agent,
    System,
}

/// One message in a conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Detailed,
    Question,
    Simple,
}

/// A canned reply offered by the AI panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

/// Daily conversation and response counts on the reports page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationDataItem {
    pub name: String,
    pub conversations: u32,
    pub responses: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseTimeItem {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SatisfactionItem {
    pub name: String,
    pub count: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub conversations: u32,
    pub avg_time: String,
    pub satisfaction: f64,
}
