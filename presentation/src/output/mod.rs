//! Output formatting for pipeline results

pub mod console;
pub mod formatter;
