//! Bounded retry with a fixed delay.
//!
//! [`RetryPolicy`] decides whether a failed attempt is tried again and how
//! long to wait; [`fetch_with_retry`] drives a [`crate::fetch::Fetcher`]
//! through that policy and turns the last result into an
//! [`crate::outcome::ItemOutcome`].

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::fetch_with_retry;
