//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`report`] — Builders for report and user documents with chosen
//!   creation instants.
//! - [`store`] — [`ScriptedStore`](store::ScriptedStore), a `DocumentStore`
//!   whose hubs are driven directly by the test.

pub mod report;
pub mod store;
