//! One-question-per-line text files.

use super::IngestError;
use std::path::Path;

/// Split text into questions: one per line, trimmed, blank lines and
/// `#` comments skipped.
pub fn parse_question_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn read_questions_file(path: impl AsRef<Path>) -> Result<Vec<String>, IngestError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_question_lines(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_lines() {
        let text = "# support backlog\nWhere is my refund?\n\n   How do I reset my password?  \r\n";
        assert_eq!(
            parse_question_lines(text),
            vec!["Where is my refund?", "How do I reset my password?"]
        );
    }

    #[test]
    fn test_read_questions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.txt");
        std::fs::write(&path, "first\nsecond\n").unwrap();

        assert_eq!(read_questions_file(&path).unwrap(), vec!["first", "second"]);
    }
}
