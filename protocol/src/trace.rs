use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::mutation::MutationClass;

/// A single append-only entry in the trace journal.
///
/// Records are serialized one-per-line as JSON (see `governor_core::trace_store`)
/// and are never rewritten once appended. Readers must tolerate unknown
/// fields so the schema can grow without breaking old journals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    pub uuid: Uuid,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub vcs: VcsSnapshot,
    pub files: Vec<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_class: Option<MutationClass>,
    #[serde(default)]
    pub metadata: TraceMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsSnapshot {
    pub revision_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,
}

impl VcsSnapshot {
    pub fn unknown() -> Self {
        Self {
            revision_id: "unknown".to_string(),
            branch: None,
            dirty: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub relative_path: String,
    pub conversations: Vec<TraceConversation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConversation {
    pub contributor: Contributor,
    pub ranges: Vec<Range>,
    #[serde(default)]
    pub related: Vec<Related>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub kind: ContributorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ContributorKind {
    Human,
    Ai,
    Mixed,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Range {
    pub start_line: u32,
    pub end_line: u32,
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_class: Option<MutationClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Related {
    pub kind: RelatedKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    Specification,
    Issue,
    Pr,
    Discussion,
    DesignDoc,
    ContentHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let record = TraceRecord {
            uuid: Uuid::nil(),
            timestamp: "2026-08-01T00:00:00Z".to_string(),
            vcs: VcsSnapshot::unknown(),
            files: vec![FileEntry {
                relative_path: "src/api/weather/fetch.ts".to_string(),
                conversations: vec![TraceConversation {
                    contributor: Contributor {
                        kind: ContributorKind::Ai,
                        model_id: None,
                        session_id: Some("sess-1".to_string()),
                    },
                    ranges: vec![Range {
                        start_line: 1,
                        end_line: 1,
                        content_hash: "abc123".to_string(),
                        mutation_class: None,
                        confidence: None,
                    }],
                    related: vec![Related {
                        kind: RelatedKind::Specification,
                        value: "INT-001".to_string(),
                        url: None,
                    }],
                }],
            }],
            mutation_class: None,
            metadata: TraceMetadata::default(),
        };

        let line = serde_json::to_string(&record).expect("serialize");
        let back: TraceRecord = serde_json::from_str(&line).expect("deserialize");
        assert_eq!(back.files[0].relative_path, "src/api/weather/fetch.ts");
        assert_eq!(back.files[0].conversations[0].related[0].value, "INT-001");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let line = r#"{"uuid":"00000000-0000-0000-0000-000000000000","timestamp":"t","vcs":{"revision_id":"unknown"},"files":[],"future_field":42}"#;
        let record: TraceRecord = serde_json::from_str(line).expect("deserialize");
        assert!(record.files.is_empty());
    }
}
