//! Built-in demo data set.
//!
//! Everything here stands in for what a backend would serve; views clone
//! from it on construction and never write back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{
    ingest_conversations, Contact, Conversation, ConversationDataItem, Message, ResponseTimeItem,
    SatisfactionItem, Suggestion, TeamMember,
};

const CONTACTS: &str = include_str!("../data/contacts.json");
const CONVERSATIONS: &str = include_str!("../data/conversations.json");
const THREADS: &str = include_str!("../data/threads.json");
const REPORTS: &str = include_str!("../data/reports.json");

/// Message history per conversation id, plus the canned AI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSeed {
    pub threads: BTreeMap<String, Vec<Message>>,
    pub suggestions: Vec<Suggestion>,
    pub canned_reply: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EngagementPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSeed {
    pub weekly_conversations: Vec<f64>,
    pub weekdays: Vec<String>,
    pub user_engagement: Vec<EngagementPoint>,
    pub conversation_data: Vec<ConversationDataItem>,
    pub response_times: Vec<ResponseTimeItem>,
    pub satisfaction: Vec<SatisfactionItem>,
    pub team: Vec<TeamMember>,
}

pub fn contacts() -> Result<Vec<Contact>> {
    Ok(serde_json::from_str(CONTACTS)?)
}

pub fn conversations() -> Result<Vec<Conversation>> {
    ingest_conversations(CONVERSATIONS)
}

pub fn threads() -> Result<ThreadSeed> {
    Ok(serde_json::from_str(THREADS)?)
}

pub fn reports() -> Result<ReportSeed> {
    Ok(serde_json::from_str(REPORTS)?)
}
