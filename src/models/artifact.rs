use serde::Deserialize;
use serde_json::Value;

/// The four derived artifacts a meeting can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Summary,
    Minutes,
    Insights,
    KnowledgeGraph,
}

/// Per-kind behavior. The controllers are otherwise identical; everything
/// that differs between the four artifact views lives here.
pub struct KindSpec {
    /// API route segment for load/generate.
    pub route: &'static str,
    /// Field of the response body the artifact arrives under.
    pub response_field: &'static str,
    pub label: &'static str,
    /// Error message when the server fails without saying why.
    pub default_error: &'static str,
    /// A not-found retrieval result triggers generation instead of the
    /// empty state. Only the knowledge graph behaves this way.
    pub auto_generate_on_missing: bool,
    /// An explicit `format: "text"` marker forces unstructured
    /// interpretation even for a keyed record. Only insights carries this
    /// rule; do not unify it with the others.
    pub text_format_override: bool,
    /// Generation requests carry the meeting transcript in the body.
    pub sends_transcript: bool,
}

const SUMMARY_SPEC: KindSpec = KindSpec {
    route: "summary",
    response_field: "summary",
    label: "Summary",
    default_error: "Failed to generate summary",
    auto_generate_on_missing: false,
    text_format_override: false,
    sends_transcript: false,
};

const MINUTES_SPEC: KindSpec = KindSpec {
    route: "minutes",
    response_field: "minutes",
    label: "Minutes",
    default_error: "Failed to generate minutes",
    auto_generate_on_missing: false,
    text_format_override: false,
    sends_transcript: false,
};

const INSIGHTS_SPEC: KindSpec = KindSpec {
    route: "insights",
    response_field: "insights",
    label: "Insights",
    default_error: "Failed to generate insights",
    auto_generate_on_missing: false,
    text_format_override: true,
    sends_transcript: false,
};

const KNOWLEDGE_GRAPH_SPEC: KindSpec = KindSpec {
    route: "knowledge-graph",
    response_field: "graph",
    label: "Knowledge Graph",
    default_error: "Failed to generate knowledge graph",
    auto_generate_on_missing: true,
    text_format_override: false,
    sends_transcript: true,
};

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Summary,
        ArtifactKind::Minutes,
        ArtifactKind::Insights,
        ArtifactKind::KnowledgeGraph,
    ];

    pub fn spec(self) -> &'static KindSpec {
        match self {
            ArtifactKind::Summary => &SUMMARY_SPEC,
            ArtifactKind::Minutes => &MINUTES_SPEC,
            ArtifactKind::Insights => &INSIGHTS_SPEC,
            ArtifactKind::KnowledgeGraph => &KNOWLEDGE_GRAPH_SPEC,
        }
    }
}

/// The four mutually exclusive states an artifact view can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Generating,
    Ready,
    Error,
}

/// A classified, validated artifact payload.
#[derive(Debug, Clone)]
pub enum ArtifactValue {
    Summary(SummaryDoc),
    Minutes(MinutesDoc),
    Insights(InsightsDoc),
    Text(String),
    Graph(GraphDoc),
}

// Structured documents. Every field is optional and extras are tolerated;
// a type mismatch is a schema violation and fails deserialization.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryDoc {
    #[serde(default)]
    pub metrics: Option<SummaryMetrics>,
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
    #[serde(default)]
    pub decisions: Vec<SummaryDecision>,
    #[serde(default)]
    pub action_items: Vec<SummaryActionItem>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub key_quotes: Vec<KeyQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryMetrics {
    #[serde(default)]
    pub total_topics: Option<u32>,
    #[serde(default)]
    pub decisions_made: Option<u32>,
    #[serde(default)]
    pub action_items: Option<u32>,
    #[serde(default)]
    pub risks: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyPoint {
    #[serde(default)]
    pub point: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryDecision {
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryActionItem {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuote {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinutesDoc {
    #[serde(default)]
    pub meeting_info: Option<MeetingInfo>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub agenda_items: Vec<AgendaItem>,
    #[serde(default)]
    pub discussion_points: Vec<DiscussionPoint>,
    #[serde(default)]
    pub decisions: Vec<MinutesDecision>,
    #[serde(default)]
    pub action_items: Vec<MinutesActionItem>,
    #[serde(default)]
    pub parking_lot: Vec<String>,
    #[serde(default)]
    pub next_meeting: Option<NextMeeting>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingInfo {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attendee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgendaItem {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub presenter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscussionPoint {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub presenter: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinutesDecision {
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub decision_maker: Option<String>,
    #[serde(default)]
    pub affected_parties: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinutesActionItem {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextMeeting {
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsDoc {
    /// Producer-specific preamble; rendered only when it is plain text.
    #[serde(default)]
    pub overview: Option<Value>,
    #[serde(default)]
    pub metrics: Option<SummaryMetrics>,
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub key_themes: Vec<KeyTheme>,
    #[serde(default)]
    pub participation_analysis: Option<ParticipationAnalysis>,
    #[serde(default)]
    pub sentiment_analysis: Option<SentimentAnalysis>,
    #[serde(default)]
    pub follow_up_recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub risks_and_concerns: Vec<Risk>,
    #[serde(default)]
    pub interesting_observations: Vec<String>,
    #[serde(default)]
    pub key_metrics: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyTheme {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipationAnalysis {
    #[serde(default)]
    pub most_active_speakers: Vec<SpeakerShare>,
    #[serde(default)]
    pub speaking_distribution: Option<String>,
    #[serde(default)]
    pub quiet_participants: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakerShare {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contribution_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(default)]
    pub overall_tone: Option<String>,
    #[serde(default)]
    pub positive_moments: Vec<SentimentMoment>,
    #[serde(default)]
    pub concerns_raised: Vec<Concern>,
    #[serde(default)]
    pub agreements: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentimentMoment {
    #[serde(default)]
    pub moment: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Concern {
    #[serde(default)]
    pub concern: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Risk {
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub mitigation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphDoc {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
}

impl GraphNode {
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("(unnamed)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Server-side report rendering formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Json,
    Txt,
}

impl ExportFormat {
    /// Route segment and file extension, which happen to coincide.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
        }
    }
}
