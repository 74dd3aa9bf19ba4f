//! Prompt domain
//!
//! Templates for the prompts sent to the chat oracle.

mod template;

pub use template::{ANALYSIS_EXAMPLE_JSON, PromptTemplate, RESOURCES_EXAMPLE_JSON};
