//! Use cases (application services)
//!
//! Use cases orchestrate the domain logic and coordinate with external
//! systems through ports.

pub mod aggregate_results;
pub mod analyze_group;
pub mod group_questions;
pub mod run_pipeline;
pub(crate) mod shared;
