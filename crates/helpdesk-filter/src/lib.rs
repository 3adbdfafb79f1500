//! helpdesk-filter
//!
//! The list pipeline shared by the contacts directory and the inbox: text
//! search, per-view category criteria, tag filtering and stable sorting.
//! See `pipeline` for the generic core and `contacts`/`inbox` for the two
//! concrete query shapes.

pub mod collate;
pub mod contacts;
pub mod facets;
pub mod inbox;
pub mod pipeline;

pub use contacts::{ContactFilter, ContactQuery, ContactSort};
pub use inbox::{InboxFilter, InboxQuery, InboxSort, StatusOption};
pub use pipeline::{filter_and_sort, Criterion, Query, SortKey};
