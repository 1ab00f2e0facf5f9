use serde_json::Value;

use crate::models::{ArtifactKind, ArtifactValue, GraphDoc, InsightsDoc, MinutesDoc, SummaryDoc};

/// How a raw artifact payload should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Structured,
    Text,
}

/// Decide whether a payload is a structured record or free text.
///
/// A keyed record without a `text` field is structured. Insights payloads
/// additionally honor an explicit `format: "text"` marker: the producer may
/// wrap a text body in a record for metadata purposes, and that wrapper must
/// still render as text. The rules are per-kind configuration; they are
/// deliberately not unified.
pub fn classify(kind: ArtifactKind, value: &Value) -> Shape {
    let shape = match value.as_object() {
        Some(map) => {
            let forced_text = kind.spec().text_format_override
                && map.get("format").and_then(Value::as_str) == Some("text");
            if map.contains_key("text") || forced_text {
                Shape::Text
            } else {
                Shape::Structured
            }
        }
        None => Shape::Text,
    };
    tracing::debug!(kind = kind.spec().route, ?shape, "classified artifact payload");
    shape
}

/// Classify and validate a raw payload into a renderable value.
///
/// A structured payload that does not match its kind's schema, or a text
/// payload with no extractable body, is rejected with a message; the caller
/// turns that into the error state rather than degrading to a raw dump.
pub fn interpret(kind: ArtifactKind, value: Value) -> Result<ArtifactValue, String> {
    if kind == ArtifactKind::KnowledgeGraph {
        return serde_json::from_value::<GraphDoc>(value)
            .map(ArtifactValue::Graph)
            .map_err(|e| format!("Malformed knowledge graph payload: {e}"));
    }

    match classify(kind, &value) {
        Shape::Structured => parse_structured(kind, value),
        Shape::Text => extract_text(kind, value),
    }
}

fn parse_structured(kind: ArtifactKind, value: Value) -> Result<ArtifactValue, String> {
    let parsed = match kind {
        ArtifactKind::Summary => {
            serde_json::from_value::<SummaryDoc>(value).map(ArtifactValue::Summary)
        }
        ArtifactKind::Minutes => {
            serde_json::from_value::<MinutesDoc>(value).map(ArtifactValue::Minutes)
        }
        ArtifactKind::Insights => {
            serde_json::from_value::<InsightsDoc>(value).map(ArtifactValue::Insights)
        }
        ArtifactKind::KnowledgeGraph => unreachable!("graph payloads are handled above"),
    };
    parsed.map_err(|e| format!("Malformed {} payload: {e}", kind.spec().route))
}

fn extract_text(kind: ArtifactKind, value: Value) -> Result<ArtifactValue, String> {
    match value {
        Value::String(s) => Ok(ArtifactValue::Text(s)),
        Value::Object(map) => match map.get("text").and_then(Value::as_str) {
            Some(s) => Ok(ArtifactValue::Text(s.to_string())),
            None => Err(format!(
                "Malformed {} payload: text-shaped record has no text body",
                kind.spec().route
            )),
        },
        _ => Err(format!(
            "Malformed {} payload: expected a record or a text document",
            kind.spec().route
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_with_text_field_is_unstructured() {
        let value = json!({ "text": "plain markdown body" });
        assert_eq!(classify(ArtifactKind::Summary, &value), Shape::Text);
        assert_eq!(classify(ArtifactKind::Minutes, &value), Shape::Text);
    }

    #[test]
    fn keyed_record_without_text_is_structured() {
        let value = json!({ "executive_summary": "short", "key_points": [] });
        assert_eq!(classify(ArtifactKind::Summary, &value), Shape::Structured);
    }

    #[test]
    fn plain_string_is_unstructured() {
        assert_eq!(classify(ArtifactKind::Minutes, &json!("# notes")), Shape::Text);
    }

    #[test]
    fn insights_format_marker_forces_text() {
        let value = json!({ "format": "text", "overview": { "a": 1 } });
        assert_eq!(classify(ArtifactKind::Insights, &value), Shape::Text);
        // The override is an insights rule only
        assert_eq!(classify(ArtifactKind::Summary, &value), Shape::Structured);
    }

    #[test]
    fn interpret_parses_structured_summary() {
        let value = json!({
            "executive_summary": "We shipped.",
            "key_points": [{ "point": "Launch went fine", "importance": "high" }],
            "decisions": [],
        });
        match interpret(ArtifactKind::Summary, value).unwrap() {
            ArtifactValue::Summary(doc) => {
                assert_eq!(doc.executive_summary.as_deref(), Some("We shipped."));
                assert_eq!(doc.key_points.len(), 1);
                assert!(doc.decisions.is_empty());
            }
            other => panic!("expected structured summary, got {other:?}"),
        }
    }

    #[test]
    fn interpret_extracts_text_body() {
        let value = json!({ "text": "## Minutes\nshort" });
        match interpret(ArtifactKind::Minutes, value).unwrap() {
            ArtifactValue::Text(s) => assert!(s.starts_with("## Minutes")),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn schema_violation_is_rejected_not_dumped() {
        // key_points must be a list; a scalar is a producer contract breach
        let value = json!({ "key_points": "not a list" });
        let err = interpret(ArtifactKind::Summary, value).unwrap_err();
        assert!(err.contains("Malformed summary payload"));
    }

    #[test]
    fn text_marker_without_body_is_rejected() {
        let value = json!({ "format": "text", "overview": { "a": 1 } });
        let err = interpret(ArtifactKind::Insights, value).unwrap_err();
        assert!(err.contains("no text body"));
    }

    #[test]
    fn scalar_garbage_is_rejected() {
        let err = interpret(ArtifactKind::Insights, json!(42)).unwrap_err();
        assert!(err.contains("Malformed insights payload"));
    }

    #[test]
    fn graph_payload_parses_nodes_and_edges() {
        let value = json!({
            "nodes": [{ "id": "n1", "label": "Budget", "type": "topic" }],
            "edges": [{ "source": "n1", "target": "n2", "label": "raised_by" }],
        });
        match interpret(ArtifactKind::KnowledgeGraph, value).unwrap() {
            ArtifactValue::Graph(g) => {
                assert_eq!(g.nodes.len(), 1);
                assert_eq!(g.edges.len(), 1);
            }
            other => panic!("expected graph, got {other:?}"),
        }
    }
}
