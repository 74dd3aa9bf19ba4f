//! Chat conversation export reader
//!
//! The export is a JSON array of conversations. Each conversation has a
//! `mapping` object of node id to node; a node may carry a `message` whose
//! author role and content parts identify what the user typed.

use super::IngestError;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Conversation {
    #[serde(deserialize_with = "nodes_in_file_order")]
    mapping: Vec<Node>,
}

#[derive(Debug, Deserialize)]
struct Node {
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    author: Author,
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Author {
    role: String,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<serde_json::Value>,
}

impl Message {
    /// First content part of a user message, if it is non-empty text.
    fn user_text(self) -> Option<String> {
        if self.author.role != "user" {
            return None;
        }
        match self.content?.parts.into_iter().next()? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Collect the node values of `mapping` in document order.
///
/// `serde_json::Map` sorts its keys, which would reorder the conversation.
fn nodes_in_file_order<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    struct NodesVisitor;

    impl<'de> Visitor<'de> for NodesVisitor {
        type Value = Vec<Node>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of node id to node")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut nodes = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_id, node)) = map.next_entry::<serde::de::IgnoredAny, Node>()? {
                nodes.push(node);
            }
            Ok(nodes)
        }
    }

    deserializer.deserialize_map(NodesVisitor)
}

/// Extract every user question from a conversation export document.
pub fn parse_conversation_export(json: &str) -> Result<Vec<String>, serde_json::Error> {
    let conversations: Vec<Conversation> = serde_json::from_str(json)?;
    let conversation_count = conversations.len();

    let questions: Vec<String> = conversations
        .into_iter()
        .flat_map(|conversation| conversation.mapping)
        .filter_map(|node| node.message?.user_text())
        .collect();

    debug!(
        "Extracted {} user questions from {} conversations",
        questions.len(),
        conversation_count
    );
    Ok(questions)
}

/// Read and parse a conversation export file.
pub fn read_conversation_export(path: impl AsRef<Path>) -> Result<Vec<String>, IngestError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_conversation_export(&json).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXPORT: &str = r#"[
      {
        "title": "Python help",
        "mapping": {
          "zz-root": {"id": "zz-root", "message": null, "children": ["b"]},
          "b": {
            "id": "b",
            "message": {
              "author": {"role": "user"},
              "content": {"content_type": "text", "parts": ["How do I reverse a list?"]}
            }
          },
          "a": {
            "id": "a",
            "message": {
              "author": {"role": "assistant"},
              "content": {"content_type": "text", "parts": ["Use reversed()."]}
            }
          },
          "c": {
            "id": "c",
            "message": {
              "author": {"role": "user"},
              "content": {"content_type": "text", "parts": ["And sort it?", "ignored"]}
            }
          }
        }
      },
      {
        "title": "Billing",
        "mapping": {
          "x": {
            "message": {
              "author": {"role": "user"},
              "content": {"parts": ["Where is my refund?"]}
            }
          },
          "y": {
            "message": {
              "author": {"role": "system"},
              "content": {"parts": [""]}
            }
          }
        }
      }
    ]"#;

    #[test]
    fn test_collects_user_questions_in_file_order() {
        let questions = parse_conversation_export(EXPORT).unwrap();
        assert_eq!(
            questions,
            vec![
                "How do I reverse a list?",
                "And sort it?",
                "Where is my refund?"
            ]
        );
    }

    #[test]
    fn test_skips_non_text_and_empty_parts() {
        let json = r#"[{"mapping": {
            "a": {"message": {"author": {"role": "user"}, "content": {"parts": [{"asset": "img.png"}]}}},
            "b": {"message": {"author": {"role": "user"}, "content": {"parts": ["   "]}}},
            "c": {"message": {"author": {"role": "user"}, "content": {"parts": []}}},
            "d": {"message": {"author": {"role": "user"}}},
            "e": {}
        }}]"#;
        assert!(parse_conversation_export(json).unwrap().is_empty());
    }

    #[test]
    fn test_empty_export() {
        assert!(parse_conversation_export("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_array_document() {
        assert!(parse_conversation_export(r#"{"mapping": {}}"#).is_err());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let questions = read_conversation_export(file.path()).unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_conversation_export(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
