use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use helpdesk_core::config::DelayConfig;
use helpdesk_core::seed;
use helpdesk_core::types::{AiSuggestion, Conversation};
use helpdesk_core::Result;
use helpdesk_filter::facets::{all_tags, FilterSummary};
use helpdesk_filter::{filter_and_sort, InboxFilter, InboxQuery, InboxSort, StatusOption};

use crate::deferred::{Deferred, Overlap};

fn toggle<T: Ord>(set: &mut std::collections::BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Inbox page state.
///
/// Filter selections edit a draft query; `apply_filters` computes the
/// result list immediately and publishes it after the search delay.
#[derive(Debug)]
pub struct InboxView {
    conversations: Vec<Conversation>,
    query: InboxQuery,
    results: Deferred<Vec<Conversation>>,
    refreshes: Deferred<u32>,
    search_delay: Duration,
    refresh_delay: Duration,
}

impl InboxView {
    pub fn new(conversations: Vec<Conversation>, delays: &DelayConfig) -> Self {
        let overlap = Overlap::from_supersede(delays.supersede);
        Self {
            results: Deferred::new("inbox.results", conversations.clone(), overlap),
            refreshes: Deferred::new("inbox.refresh", 0, overlap),
            conversations,
            query: InboxQuery::default(),
            search_delay: Duration::from_millis(delays.search_ms),
            refresh_delay: Duration::from_millis(delays.refresh_ms),
        }
    }

    pub fn from_seed(delays: &DelayConfig) -> Result<Self> {
        Ok(Self::new(seed::conversations()?, delays))
    }

    pub fn query(&self) -> &InboxQuery {
        &self.query
    }

    pub fn filter_mut(&mut self) -> &mut InboxFilter {
        &mut self.query.category
    }

    pub fn toggle_status(&mut self, status: StatusOption) {
        toggle(&mut self.query.category.statuses, status);
    }

    pub fn toggle_agent(&mut self, agent_id: &str) {
        toggle(&mut self.query.category.agents, agent_id.to_string());
    }

    pub fn toggle_ai(&mut self, kind: AiSuggestion) {
        toggle(&mut self.query.category.ai, kind);
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.query.toggle_tag(tag);
    }

    pub fn set_sort(&mut self, sort: InboxSort) {
        self.query.sort = sort;
    }

    pub fn ai_enabled(&self) -> bool {
        self.query.category.ai_enabled
    }

    /// Turning AI off stops the AI filter from restricting results.
    pub fn set_ai_enabled(&mut self, enabled: bool) -> JoinHandle<bool> {
        self.query.category.ai_enabled = enabled;
        self.apply_filters()
    }

    pub fn search(&mut self, text: impl Into<String>) -> JoinHandle<bool> {
        self.query.text = text.into();
        self.apply_filters()
    }

    pub fn apply_filters(&mut self) -> JoinHandle<bool> {
        let filtered = filter_and_sort(&self.conversations, &self.query);
        tracing::info!(shown = filtered.len(), total = self.conversations.len(), "inbox filters applied");
        self.results.schedule(self.search_delay, filtered)
    }

    /// Reset search and every selection, keeping the AI toggle and sort.
    pub fn clear_all_filters(&mut self) -> JoinHandle<bool> {
        let ai_enabled = self.query.category.ai_enabled;
        self.query = InboxQuery::new(InboxFilter { ai_enabled, ..InboxFilter::default() }, self.query.sort);
        self.apply_filters()
    }

    /// Simulated refetch: shows the loading state for the refresh delay.
    pub fn refresh(&mut self) -> JoinHandle<bool> {
        self.refreshes.schedule_update(self.refresh_delay, |n| *n += 1)
    }

    pub fn refresh_count(&self) -> u32 {
        self.refreshes.get()
    }

    pub fn is_loading(&self) -> bool {
        self.results.is_pending() || self.refreshes.is_pending()
    }

    pub fn results(&self) -> Vec<Conversation> {
        self.results.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Conversation>> {
        self.results.subscribe()
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.conversations)
    }

    pub fn unread_count(&self) -> usize {
        self.conversations.iter().filter(|c| c.is_unread).count()
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary::new(self.results.borrow().len(), self.conversations.len(), self.query.is_filtered::<Conversation>())
    }
}
