use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use helpdesk_core::config::DelayConfig;
use helpdesk_core::seed::{self, ThreadSeed};
use helpdesk_core::types::{Conversation, Message, MessageKind, Suggestion};
use helpdesk_core::{Error, Result};

use crate::deferred::{Deferred, Overlap, Step};

/// Display name used for messages sent from this console.
pub const AGENT_NAME: &str = "Sarah Williams";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub is_typing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionState {
    pub suggestions: Vec<Suggestion>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

/// Handles for the simulated customer reply and the suggestion reload it
/// triggers.
#[derive(Debug)]
pub struct ReplyHandles {
    pub reply: JoinHandle<bool>,
    pub suggestions: JoinHandle<bool>,
}

#[derive(Debug, Clone, Copy)]
struct ThreadDelays {
    typing_start: Duration,
    typing_reply: Duration,
    suggestions: Duration,
}

/// One open conversation: message history, composer draft and the AI
/// suggestion panel. Must be opened inside a tokio runtime.
#[derive(Debug)]
pub struct ConversationThread {
    conversation: Conversation,
    draft: String,
    chat: Deferred<ChatState>,
    suggestions: Deferred<SuggestionState>,
    feedback: HashMap<String, Feedback>,
    canned_suggestions: Vec<Suggestion>,
    canned_reply: String,
    delays: ThreadDelays,
}

impl ConversationThread {
    /// Open conversation `id` from the seed data set.
    pub fn open(id: &str, delays: &DelayConfig) -> Result<Self> {
        let conversation = seed::conversations()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("conversation '{id}'")))?;
        Ok(Self::with_seed(conversation, seed::threads()?, delays))
    }

    /// Open `conversation` with history and canned AI output from `seed`.
    /// Starts the initial suggestion load.
    pub fn with_seed(conversation: Conversation, seed: ThreadSeed, delays: &DelayConfig) -> Self {
        let ThreadSeed { mut threads, suggestions, canned_reply } = seed;
        let messages = threads.remove(&conversation.id).unwrap_or_default();
        let overlap = Overlap::from_supersede(delays.supersede);
        let mut thread = Self {
            conversation,
            draft: String::new(),
            chat: Deferred::new("thread.chat", ChatState { messages, is_typing: false }, Overlap::Independent),
            suggestions: Deferred::new("thread.suggestions", SuggestionState::default(), overlap),
            feedback: HashMap::new(),
            canned_suggestions: suggestions,
            canned_reply,
            delays: ThreadDelays {
                typing_start: Duration::from_millis(delays.typing_start_ms),
                typing_reply: Duration::from_millis(delays.typing_reply_ms),
                suggestions: Duration::from_millis(delays.suggestions_ms),
            },
        };
        thread.regenerate_suggestions();
        thread
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> Vec<Message> {
        self.chat.borrow().messages.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.chat.borrow().is_typing
    }

    pub fn suggestions(&self) -> SuggestionState {
        self.suggestions.get()
    }

    pub fn subscribe_chat(&self) -> watch::Receiver<ChatState> {
        self.chat.subscribe()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<SuggestionState> {
        self.suggestions.subscribe()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Copy suggestion `id` into the composer.
    pub fn select_suggestion(&mut self, id: &str) -> Result<()> {
        let content = self
            .suggestions
            .borrow()
            .suggestions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.content.clone())
            .ok_or_else(|| Error::NotFound(format!("suggestion '{id}'")))?;
        self.draft = content;
        Ok(())
    }

    pub fn give_feedback(&mut self, suggestion_id: &str, feedback: Feedback) {
        self.feedback.insert(suggestion_id.to_string(), feedback);
    }

    pub fn feedback(&self, suggestion_id: &str) -> Option<Feedback> {
        self.feedback.get(suggestion_id).copied()
    }

    /// Append the draft as an agent message and start the simulated customer
    /// reply, followed by a suggestion reload. Every send gets its own reply;
    /// neither the reply nor the reload cancels earlier scheduled work. A
    /// blank draft sends nothing.
    pub fn send_message(&mut self) -> Option<ReplyHandles> {
        if self.draft.trim().is_empty() {
            return None;
        }
        let content = std::mem::take(&mut self.draft);
        self.chat.update_now(|chat| {
            let id = format!("m{}", chat.messages.len() + 1);
            chat.messages.push(Message {
                id,
                content,
                sender: AGENT_NAME.to_string(),
                timestamp: "Just now".to_string(),
                kind: MessageKind::Agent,
            });
        });

        let reply_text = self.canned_reply.clone();
        let customer = self.conversation.user.name.clone();
        let reply = self.chat.schedule_steps(vec![
            Step::new(self.delays.typing_start, |chat: &mut ChatState| chat.is_typing = true),
            Step::new(self.delays.typing_reply, move |chat: &mut ChatState| {
                chat.is_typing = false;
                let id = format!("m{}", chat.messages.len() + 1);
                chat.messages.push(Message {
                    id,
                    content: reply_text,
                    sender: customer,
                    timestamp: "Just now".to_string(),
                    kind: MessageKind::User,
                });
            }),
        ]);

        let canned = self.canned_suggestions.clone();
        let suggestions = self.suggestions.schedule_steps_with(Overlap::Independent, vec![
            Step::new(self.delays.typing_start + self.delays.typing_reply, |s: &mut SuggestionState| s.is_loading = true),
            Step::new(self.delays.suggestions, move |s: &mut SuggestionState| {
                s.suggestions = canned;
                s.is_loading = false;
            }),
        ]);
        tracing::info!(conversation = %self.conversation.id, "agent message sent");
        Some(ReplyHandles { reply, suggestions })
    }

    /// Show the loading state now and swap in fresh suggestions after the
    /// suggestion delay.
    pub fn regenerate_suggestions(&mut self) -> JoinHandle<bool> {
        self.suggestions.update_now(|s| s.is_loading = true);
        let canned = self.canned_suggestions.clone();
        self.suggestions.schedule_update(self.delays.suggestions, move |s| {
            s.suggestions = canned;
            s.is_loading = false;
        })
    }
}
