use helpdesk_core::seed;
use helpdesk_core::types::Contact;
use helpdesk_core::{Error, Result};
use helpdesk_filter::contacts::{contact_stats, ContactStats};
use helpdesk_filter::facets::{all_tags, FilterSummary};
use helpdesk_filter::{filter_and_sort, ContactFilter, ContactQuery, ContactSort};

/// Contacts directory state. Filtering is synchronous; the visible list is
/// recomputed from the current query on every read.
#[derive(Debug, Clone)]
pub struct ContactsView {
    contacts: Vec<Contact>,
    query: ContactQuery,
}

impl ContactsView {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts, query: ContactQuery::new(ContactFilter::All, ContactSort::Name) }
    }

    pub fn from_seed() -> Result<Self> {
        Ok(Self::new(seed::contacts()?))
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn query(&self) -> &ContactQuery {
        &self.query
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_filter(&mut self, filter: ContactFilter) {
        self.query.category = filter;
    }

    pub fn set_sort(&mut self, sort: ContactSort) {
        self.query.sort = sort;
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.query.toggle_tag(tag);
    }

    /// Reset text, category and tags. The sort order is kept.
    pub fn clear_filters(&mut self) {
        self.query = ContactQuery::new(ContactFilter::All, self.query.sort);
    }

    pub fn visible(&self) -> Vec<Contact> {
        filter_and_sort(&self.contacts, &self.query)
    }

    /// Flip the starred flag of contact `id`; returns the new value.
    pub fn toggle_star(&mut self, id: &str) -> Result<bool> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("contact '{id}'")))?;
        contact.is_starred = !contact.is_starred;
        tracing::debug!(id, starred = contact.is_starred, "toggled star");
        Ok(contact.is_starred)
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.contacts)
    }

    pub fn stats(&self) -> ContactStats {
        contact_stats(&self.contacts)
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary::new(self.visible().len(), self.contacts.len(), self.query.is_filtered::<Contact>())
    }
}
