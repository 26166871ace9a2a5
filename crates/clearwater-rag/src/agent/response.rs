//! Agent response payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured answer to a data question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// SQL the model proposes or ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,

    /// Result rows or any other data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Natural-language explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// What the agent answered
///
/// Serialized untagged: plain text is a JSON string, structured results are a JSON
/// object, which is the shape the chat UI renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentResponse {
    /// Free-form text
    Text(String),
    /// SQL / data / explanation bundle
    Structured(StructuredResult),
}

const STRUCTURED_KEYS: [&str; 3] = ["sql_query", "data", "explanation"];

impl AgentResponse {
    /// Create a text response
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Interpret raw model output
    ///
    /// A JSON object (optionally inside a ```json fence) carrying any of `sql_query`,
    /// `data` or `explanation` becomes [`AgentResponse::Structured`]; anything else is
    /// kept verbatim as text.
    pub fn parse(raw: &str) -> Self {
        let candidate = strip_code_fence(raw.trim());
        if candidate.starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
                if STRUCTURED_KEYS.iter().any(|k| map.contains_key(*k)) {
                    if let Ok(result) =
                        serde_json::from_value::<StructuredResult>(Value::Object(map))
                    {
                        return Self::Structured(result);
                    }
                }
            }
        }
        Self::Text(raw.to_string())
    }

    /// Text form, used when recording the exchange in memory
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(result) => serde_json::to_string(result).unwrap_or_default(),
        }
    }
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_stays_text() {
        assert_eq!(AgentResponse::parse("42 units"), AgentResponse::text("42 units"));
        assert_eq!(
            AgentResponse::parse("{not json"),
            AgentResponse::text("{not json")
        );
    }

    #[test]
    fn test_structured_result() {
        let raw = r#"{"sql_query": "SELECT SUM(quantity) FROM inventory", "data": [{"sum": 42}], "explanation": "Total stock"}"#;
        match AgentResponse::parse(raw) {
            AgentResponse::Structured(result) => {
                assert_eq!(
                    result.sql_query.as_deref(),
                    Some("SELECT SUM(quantity) FROM inventory")
                );
                assert_eq!(result.data, Some(json!([{"sum": 42}])));
                assert_eq!(result.explanation.as_deref(), Some("Total stock"));
            }
            other => panic!("expected structured result, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_structured_result() {
        let raw = "```json\n{\"explanation\": \"No SQL needed\"}\n```";
        assert!(matches!(
            AgentResponse::parse(raw),
            AgentResponse::Structured(StructuredResult { sql_query: None, .. })
        ));
    }

    #[test]
    fn test_unrelated_object_is_text() {
        let raw = r#"{"table_name": "orders"}"#;
        assert_eq!(AgentResponse::parse(raw), AgentResponse::text(raw));
    }

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            serde_json::to_value(AgentResponse::text("hi")).unwrap(),
            json!("hi")
        );
        let structured = AgentResponse::Structured(StructuredResult {
            sql_query: Some("SELECT 1".into()),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(structured).unwrap(),
            json!({"sql_query": "SELECT 1"})
        );
    }
}
