//! Analysis record persistence.

mod jsonl_writer;

pub use jsonl_writer::{JsonlRecordWriter, RecordWriterError, read_records};
