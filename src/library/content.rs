//! Content files and the engines that play them.
//!
//! Every content file declares a `type`; the type decides which engine the
//! player hands the file to.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::IndexError;

/// Type of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Pair items with each other
    Match,

    /// Step through an ordered sequence
    Flow,

    /// Sort items into categories
    Classification,
}

impl ContentType {
    /// Engine responsible for this content type
    pub fn engine(self) -> Engine {
        match self {
            ContentType::Match => Engine::MatchEngine,
            ContentType::Flow => Engine::FlowEngine,
            ContentType::Classification => Engine::ClassificationEngine,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Match => "match",
            ContentType::Flow => "flow",
            ContentType::Classification => "classification",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "match" => Ok(ContentType::Match),
            "flow" => Ok(ContentType::Flow),
            "classification" => Ok(ContentType::Classification),
            _ => anyhow::bail!("Unknown content type: {}", s),
        }
    }
}

/// Engine that processes a content type.
///
/// Serialized under the engine's class name (`MatchEngine`, ...), which is
/// what the player looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engine {
    MatchEngine,
    FlowEngine,
    ClassificationEngine,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::MatchEngine => write!(f, "MatchEngine"),
            Engine::FlowEngine => write!(f, "FlowEngine"),
            Engine::ClassificationEngine => write!(f, "ClassificationEngine"),
        }
    }
}

/// The indexed fields of one content file.
///
/// `title` and `description` are kept as whatever JSON value the file holds;
/// only their presence is required.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentFile {
    pub content_type: ContentType,
    pub title: Value,
    pub description: Value,
}

impl ContentFile {
    /// Parse a content file's JSON.
    ///
    /// `path` is only used to label errors. Unknown fields are ignored and a
    /// repeated key keeps its last value.
    pub fn parse(path: &Path, json: &str) -> Result<Self, IndexError> {
        let malformed = |reason: String| IndexError::MalformedContent {
            file: path.to_path_buf(),
            reason,
        };

        let mut fields: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;

        let mut take = |key: &str| {
            fields
                .remove(key)
                .ok_or_else(|| malformed(format!("missing field `{}`", key)))
        };
        let content_type = take("type")?;
        let title = take("title")?;
        let description = take("description")?;

        let content_type = match &content_type {
            Value::String(s) => s.parse::<ContentType>().ok(),
            _ => None,
        }
        .ok_or_else(|| IndexError::UnknownType {
            file: path.to_path_buf(),
            content_type: match content_type {
                Value::String(s) => s,
                other => other.to_string(),
            },
        })?;

        Ok(Self {
            content_type,
            title,
            description,
        })
    }

    /// Read and parse a content file from disk
    pub async fn load(path: &Path) -> Result<Self, IndexError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::InvalidData => IndexError::MalformedContent {
                    file: path.to_path_buf(),
                    reason: source.to_string(),
                },
                _ => IndexError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        Self::parse(path, &json)
    }

    pub fn engine(&self) -> Engine {
        self.content_type.engine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_mapping() {
        assert_eq!(ContentType::Match.engine(), Engine::MatchEngine);
        assert_eq!(ContentType::Flow.engine(), Engine::FlowEngine);
        assert_eq!(
            ContentType::Classification.engine(),
            Engine::ClassificationEngine
        );
    }

    #[test]
    fn test_content_type_is_case_sensitive() {
        assert_eq!("flow".parse::<ContentType>().unwrap(), ContentType::Flow);
        assert!("Flow".parse::<ContentType>().is_err());
        assert!("quiz".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&ContentType::Classification).unwrap(),
            "\"classification\""
        );
        assert_eq!(
            serde_json::to_string(&Engine::MatchEngine).unwrap(),
            "\"MatchEngine\""
        );
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let json = r#"{
            "type": "match",
            "title": "Capitais",
            "description": "Ligue o país à capital",
            "pairs": [["Brasil", "Brasília"]]
        }"#;

        let content = ContentFile::parse(Path::new("geo/capitais.json"), json).unwrap();
        assert_eq!(content.content_type, ContentType::Match);
        assert_eq!(content.title, "Capitais");
        assert_eq!(content.description, "Ligue o país à capital");
        assert_eq!(content.engine(), Engine::MatchEngine);
    }

    #[test]
    fn test_parse_unknown_type() {
        let json = r#"{"type": "unknown", "title": "t", "description": "d"}"#;

        match ContentFile::parse(Path::new("x.json"), json) {
            Err(IndexError::UnknownType { content_type, .. }) => {
                assert_eq!(content_type, "unknown");
            }
            other => panic!("Expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_field() {
        let json = r#"{"type": "flow", "title": "t"}"#;

        let result = ContentFile::parse(Path::new("x.json"), json);
        assert!(matches!(result, Err(IndexError::MalformedContent { .. })));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = ContentFile::parse(Path::new("x.json"), "{ not json");
        assert!(matches!(result, Err(IndexError::MalformedContent { .. })));
    }

    #[test]
    fn test_parse_keeps_non_string_title() {
        let json = r#"{"type": "flow", "title": 3, "description": null}"#;

        let content = ContentFile::parse(Path::new("x.json"), json).unwrap();
        assert_eq!(content.title, Value::from(3));
        assert_eq!(content.description, Value::Null);
    }

    #[test]
    fn test_parse_null_title() {
        let json = r#"{"type": "match", "title": null, "description": "d"}"#;

        let content = ContentFile::parse(Path::new("x.json"), json).unwrap();
        assert!(content.title.is_null());
        assert_eq!(content.engine(), Engine::MatchEngine);
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let json = r#"{"type": "match", "title": "a", "title": "b", "description": "d"}"#;

        let content = ContentFile::parse(Path::new("x.json"), json).unwrap();
        assert_eq!(content.title, "b");
    }

    #[test]
    fn test_parse_non_string_type_is_unknown() {
        let json = r#"{"type": 7, "title": "t", "description": "d"}"#;

        match ContentFile::parse(Path::new("x.json"), json) {
            Err(IndexError::UnknownType { content_type, .. }) => {
                assert_eq!(content_type, "7");
            }
            other => panic!("Expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_object() {
        let result = ContentFile::parse(Path::new("x.json"), "[1, 2]");
        assert!(matches!(result, Err(IndexError::MalformedContent { .. })));
    }
}
