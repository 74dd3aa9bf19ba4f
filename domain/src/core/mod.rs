//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the text-generation model consulted as the oracle
//! - [`question::Question`]: an ingested question with its identifier
//! - [`string::truncate`]: UTF-8 safe truncation for diagnostics

pub mod model;
pub mod question;
pub mod string;
