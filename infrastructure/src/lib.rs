//! Infrastructure layer for question-insight
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod embedding;
pub mod ingest;
pub mod oracle;
pub mod records;

#[cfg(test)]
pub(crate) mod test_server;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileClusteringConfig, FileConfig, FileEmbeddingConfig, FileOracleConfig,
    FileOutputConfig, FilePipelineConfig, FileRetryConfig,
};
pub use embedding::{
    EmbedderSettings, EmbeddingBackend, EmbeddingSettings, HashingEmbedder, HttpEmbedder,
};
pub use ingest::{
    IngestError, parse_conversation_export, parse_question_lines, read_conversation_export,
    read_questions_file,
};
pub use oracle::{HttpChatOracle, OracleBackend, OracleSettings};
pub use records::{JsonlRecordWriter, RecordWriterError, read_records};
