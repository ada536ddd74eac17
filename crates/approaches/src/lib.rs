//! Answering approaches for grounded.
//!
//! This crate provides:
//! - The `Approach` trait and the retrieve-then-read implementation
//! - Per-request `Overrides`, caller `AuthClaims` and `ApproachContext`
//! - OData filter construction (`FilterBuilder`, `SecurityFilterBuilder`)
//! - Source formatting and citation helpers
//! - `ThoughtStep` trace records

pub mod approach;
pub mod filter;
pub mod overrides;
pub mod retrieve_then_read;
pub mod sources;
pub mod thought;

pub use approach::Approach;
pub use filter::{FilterBuilder, SecurityFilterBuilder};
pub use overrides::{ApproachContext, AuthClaims, Overrides, RetrievalMode};
pub use retrieve_then_read::RetrieveThenReadApproach;
pub use thought::{DataPoints, ResponseContext, ThoughtStep};
