use crate::types::{Contact, Conversation};

/// Something the list pipeline can search and tag-filter.
///
/// Implementors expose a fixed set of free-text fields; the pipeline only
/// ever reads them.
pub trait Record {
    fn id(&self) -> &str;
    fn search_fields(&self) -> Vec<&str>;
    fn tags(&self) -> &[String];
}

impl Record for Contact {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.company.as_str(), self.role.as_str()]
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Record for Conversation {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.subject.as_str(),
            self.preview.as_str(),
            self.user.name.as_str(),
            self.user.email.as_str(),
        ]
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}
