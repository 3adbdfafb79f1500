//! helpdesk-views
//!
//! Explicit per-page state for the dashboard. Each view owns its records and
//! selections, calls into the filter pipeline and chart engine, and models
//! simulated backend latency with [`deferred::Deferred`] updates.
//!
//! Views that schedule updates must be driven from inside a tokio runtime.

pub mod contacts;
pub mod conversation;
pub mod dashboard;
pub mod deferred;
pub mod inbox;
pub mod reports;

pub use contacts::ContactsView;
pub use conversation::{ConversationThread, ReplyHandles};
pub use dashboard::Dashboard;
pub use deferred::{Deferred, Overlap, Step};
pub use inbox::InboxView;
pub use reports::{Metric, Period, ReportsView};
