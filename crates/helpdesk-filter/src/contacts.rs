use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

use helpdesk_core::types::{Contact, ContactStatus};

use crate::collate::locale_cmp;
use crate::pipeline::{Criterion, Query, SortKey};

pub type ContactQuery = Query<ContactFilter, ContactSort>;

/// The single-select category dropdown of the contacts directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFilter {
    #[default]
    All,
    Starred,
    Active,
    Inactive,
    Pending,
}

impl FromStr for ContactFilter {
    type Err = Infallible;

    /// Unknown values mean "no restriction".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "starred" => Self::Starred,
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "pending" => Self::Pending,
            "all" | "" => Self::All,
            other => {
                tracing::debug!(filter = other, "unknown contact filter; showing all");
                Self::All
            }
        })
    }
}

impl Criterion<Contact> for ContactFilter {
    fn matches(&self, contact: &Contact) -> bool {
        match self {
            Self::All => true,
            Self::Starred => contact.is_starred,
            Self::Active => contact.status == ContactStatus::Active,
            Self::Inactive => contact.status == ContactStatus::Inactive,
            Self::Pending => contact.status == ContactStatus::Pending,
        }
    }

    fn is_restrictive(&self) -> bool {
        *self != Self::All
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactSort {
    #[default]
    Name,
    Company,
    /// Most recently added first.
    LastContact,
    /// Most interactions first.
    Interactions,
    /// Input order.
    Natural,
}

impl FromStr for ContactSort {
    type Err = Infallible;

    /// Unknown keys fall back to input order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => Self::Name,
            "company" => Self::Company,
            "lastContact" | "last_contact" | "recent" => Self::LastContact,
            "interactions" => Self::Interactions,
            "natural" => Self::Natural,
            other => {
                tracing::debug!(sort = other, "unknown contact sort; keeping input order");
                Self::Natural
            }
        })
    }
}

impl SortKey<Contact> for ContactSort {
    fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        match self {
            Self::Name => locale_cmp(&a.name, &b.name),
            Self::Company => locale_cmp(&a.company, &b.company),
            Self::LastContact => b.added_date.cmp(&a.added_date),
            Self::Interactions => b.interactions.cmp(&a.interactions),
            Self::Natural => Ordering::Equal,
        }
    }
}

/// Header counters of the contacts directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContactStats {
    pub total: usize,
    pub active: usize,
    pub starred: usize,
}

pub fn contact_stats(contacts: &[Contact]) -> ContactStats {
    ContactStats {
        total: contacts.len(),
        active: contacts.iter().filter(|c| c.status == ContactStatus::Active).count(),
        starred: contacts.iter().filter(|c| c.is_starred).count(),
    }
}
