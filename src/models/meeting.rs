use serde::Deserialize;
use serde_json::Value;

use super::artifact::ArtifactKind;

/// Meeting read model returned by `GET /meetings/{id}`.
///
/// Timestamps stay as raw JSON values; the API ships them in more than one
/// encoding and `models::timestamp` owns their interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meeting {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: MeetingStatus,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub participants: Vec<Value>,
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub ended_at: Value,
    /// Opaque transcript payload; rendered as-is and forwarded verbatim to
    /// knowledge-graph generation.
    #[serde(default)]
    pub transcript: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub minutes: Option<Value>,
    #[serde(default)]
    pub insights: Option<Value>,
}

impl Meeting {
    /// Last known raw value for an artifact kind, used to seed its
    /// controller at mount. The knowledge graph is never embedded in the
    /// meeting payload.
    pub fn artifact_seed(&self, kind: ArtifactKind) -> Option<Value> {
        let seed = match kind {
            ArtifactKind::Summary => self.summary.as_ref(),
            ArtifactKind::Minutes => self.minutes.as_ref(),
            ArtifactKind::Insights => self.insights.as_ref(),
            ArtifactKind::KnowledgeGraph => None,
        };
        seed.filter(|v| !v.is_null()).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Completed,
    Recording,
    Processing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MeetingStatus {
    pub fn label(self) -> &'static str {
        match self {
            MeetingStatus::Completed => "completed",
            MeetingStatus::Recording => "recording",
            MeetingStatus::Processing => "processing",
            MeetingStatus::Unknown => "unknown",
        }
    }
}

/// Sentinel folder id for the default/unfiled bucket.
pub const DEFAULT_FOLDER_ID: &str = "recent";

#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

/// Resolve a meeting's folder reference against the fetched folder listing.
pub fn folder_name(folder_id: Option<&str>, folders: &[Folder]) -> String {
    match folder_id {
        None => "Recent".to_string(),
        Some(id) if id == DEFAULT_FOLDER_ID => "Recent".to_string(),
        Some(id) => folders
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn folder_resolution_handles_sentinel_and_unknown() {
        let folders = vec![Folder {
            id: "f1".to_string(),
            name: "Product".to_string(),
        }];
        assert_eq!(folder_name(None, &folders), "Recent");
        assert_eq!(folder_name(Some("recent"), &folders), "Recent");
        assert_eq!(folder_name(Some("f1"), &folders), "Product");
        assert_eq!(folder_name(Some("missing"), &folders), "Unknown");
    }

    #[test]
    fn artifact_seed_ignores_null_values() {
        let meeting: Meeting = serde_json::from_value(json!({
            "title": "Standup",
            "status": "completed",
            "summary": null,
            "minutes": {"text": "short notes"},
        }))
        .unwrap();

        assert!(meeting.artifact_seed(ArtifactKind::Summary).is_none());
        assert!(meeting.artifact_seed(ArtifactKind::Minutes).is_some());
        assert!(meeting.artifact_seed(ArtifactKind::KnowledgeGraph).is_none());
    }

    #[test]
    fn unknown_status_deserializes_to_catchall() {
        let meeting: Meeting =
            serde_json::from_value(json!({ "status": "archived" })).unwrap();
        assert_eq!(meeting.status, MeetingStatus::Unknown);
    }
}
