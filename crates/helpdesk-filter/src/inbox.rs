//! Inbox query: text search plus multi-select status, agent and AI filters.
//!
//! Every multi-select set means "all" when empty. The AI set only
//! restricts while AI features are enabled.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

use helpdesk_core::types::{AiSuggestion, Conversation, ConversationStatus};

use crate::collate::locale_cmp;
use crate::pipeline::{Criterion, Query, SortKey};

pub type InboxQuery = Query<InboxFilter, InboxSort>;

/// One option of the status multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusOption {
    Open,
    Pending,
    Resolved,
    /// Conversations nobody is assigned to.
    Unassigned,
}

impl StatusOption {
    fn matches(self, conversation: &Conversation) -> bool {
        match self {
            Self::Open => conversation.status == ConversationStatus::Open,
            Self::Pending => conversation.status == ConversationStatus::Pending,
            Self::Resolved => conversation.status == ConversationStatus::Resolved,
            Self::Unassigned => conversation.assignee.is_none(),
        }
    }
}

impl FromStr for StatusOption {
    type Err = helpdesk_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "unassigned" => Ok(Self::Unassigned),
            other => Err(helpdesk_core::Error::NotFound(format!("status option '{other}'"))),
        }
    }
}

/// Agent option id for an assignee display name: lowercased, first space
/// replaced with `_` ("Sarah Williams" -> "sarah_williams").
pub fn agent_id(name: &str) -> String {
    name.to_lowercase().replacen(' ', "_", 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxFilter {
    pub statuses: BTreeSet<StatusOption>,
    pub agents: BTreeSet<String>,
    pub ai: BTreeSet<AiSuggestion>,
    pub ai_enabled: bool,
}

impl Default for InboxFilter {
    fn default() -> Self {
        Self {
            statuses: BTreeSet::new(),
            agents: BTreeSet::new(),
            ai: BTreeSet::new(),
            ai_enabled: true,
        }
    }
}

impl InboxFilter {
    /// Build a filter from raw option strings. Unknown status and AI
    /// values are dropped.
    pub fn from_selection<S: AsRef<str>>(statuses: &[S], agents: &[S], ai: &[S], ai_enabled: bool) -> Self {
        let statuses = statuses
            .iter()
            .filter_map(|s| match s.as_ref().parse() {
                Ok(option) => Some(option),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring status option");
                    None
                }
            })
            .collect();
        let ai = ai
            .iter()
            .filter_map(|s| match s.as_ref().parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring AI option");
                    None
                }
            })
            .collect();
        Self {
            statuses,
            agents: agents.iter().map(|a| a.as_ref().to_string()).collect(),
            ai,
            ai_enabled,
        }
    }

    pub fn clear(&mut self) {
        self.statuses.clear();
        self.agents.clear();
        self.ai.clear();
    }

    fn status_matches(&self, c: &Conversation) -> bool {
        self.statuses.is_empty() || self.statuses.iter().any(|s| s.matches(c))
    }

    fn agent_matches(&self, c: &Conversation) -> bool {
        self.agents.is_empty()
            || c.assignee.as_deref().is_some_and(|name| self.agents.contains(&agent_id(name)))
    }

    fn ai_matches(&self, c: &Conversation) -> bool {
        !self.ai_enabled
            || self.ai.is_empty()
            || c.ai_suggestion.is_some_and(|kind| self.ai.contains(&kind))
    }
}

impl Criterion<Conversation> for InboxFilter {
    fn matches(&self, c: &Conversation) -> bool {
        self.status_matches(c) && self.agent_matches(c) && self.ai_matches(c)
    }

    fn is_restrictive(&self) -> bool {
        !self.statuses.is_empty() || !self.agents.is_empty() || (self.ai_enabled && !self.ai.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboxSort {
    /// Feed order.
    #[default]
    Natural,
    Subject,
    Sender,
}

impl FromStr for InboxSort {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "subject" => Self::Subject,
            "sender" | "name" => Self::Sender,
            _ => Self::Natural,
        })
    }
}

impl SortKey<Conversation> for InboxSort {
    fn compare(&self, a: &Conversation, b: &Conversation) -> Ordering {
        match self {
            Self::Natural => Ordering::Equal,
            Self::Subject => locale_cmp(&a.subject, &b.subject),
            Self::Sender => locale_cmp(&a.user.name, &b.user.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::types::ConversationUser;

    fn conv(id: &str, status: ConversationStatus, assignee: Option<&str>, ai: Option<AiSuggestion>) -> Conversation {
        Conversation {
            id: id.to_string(),
            user: ConversationUser { name: format!("User {id}"), email: String::new() },
            subject: String::new(),
            preview: String::new(),
            timestamp: String::new(),
            status,
            is_unread: false,
            is_starred: false,
            assignee: assignee.map(str::to_string),
            ai_suggestion: ai,
            tags: Vec::new(),
        }
    }

    #[test]
    fn agent_id_replaces_only_first_space() {
        assert_eq!(agent_id("Sarah Williams"), "sarah_williams");
        assert_eq!(agent_id("Mary Ann Lee"), "mary_ann lee");
        assert_eq!(agent_id("Bot"), "bot");
    }

    #[test]
    fn empty_sets_match_everything() {
        let f = InboxFilter::default();
        assert!(f.matches(&conv("1", ConversationStatus::Resolved, None, None)));
        assert!(!f.is_restrictive());
    }

    #[test]
    fn unassigned_matches_missing_assignee() {
        let f = InboxFilter::from_selection(&["unassigned"], &[], &[], true);
        assert!(f.matches(&conv("1", ConversationStatus::Open, None, None)));
        assert!(!f.matches(&conv("2", ConversationStatus::Open, Some("Sarah Williams"), None)));
    }

    #[test]
    fn status_options_combine_with_or() {
        let f = InboxFilter::from_selection(&["open", "unassigned"], &[], &[], true);
        assert!(f.matches(&conv("1", ConversationStatus::Open, Some("A B"), None)));
        assert!(f.matches(&conv("2", ConversationStatus::Resolved, None, None)));
        assert!(!f.matches(&conv("3", ConversationStatus::Pending, Some("A B"), None)));
    }

    #[test]
    fn ai_filter_ignored_when_disabled() {
        let mut f = InboxFilter::from_selection(&[], &[], &["escalate"], true);
        let plain = conv("1", ConversationStatus::Open, None, None);
        assert!(!f.matches(&plain));
        f.ai_enabled = false;
        assert!(f.matches(&plain));
        assert!(!f.is_restrictive());
    }

    #[test]
    fn unknown_options_are_dropped() {
        let f = InboxFilter::from_selection(&["bogus"], &[], &["nope"], true);
        assert!(f.statuses.is_empty());
        assert!(f.ai.is_empty());
    }

    #[test]
    fn unknown_sort_is_natural() {
        assert_eq!("priority".parse::<InboxSort>(), Ok(InboxSort::Natural));
    }
}
