//! Question sources.
//!
//! Both readers return a flat, ordered list of question texts ready for
//! [`Question::from_texts`](insight_domain::Question::from_texts).

mod conversation_export;
mod lines;

pub use conversation_export::{parse_conversation_export, read_conversation_export};
pub use lines::{parse_question_lines, read_questions_file};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid conversation export {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
