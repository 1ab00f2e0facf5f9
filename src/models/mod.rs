mod artifact;
mod meeting;
pub mod timestamp;

pub use artifact::{
    AgendaItem, ArtifactKind, ArtifactValue, Attendee, Concern, DiscussionPoint, ExportFormat,
    GraphDoc, GraphEdge, GraphNode, InsightsDoc, KeyPoint, KeyQuote, KeyTheme, KindSpec,
    MeetingInfo, MinutesActionItem, MinutesDecision, MinutesDoc, NextMeeting,
    ParticipationAnalysis, Recommendation, Risk, SentimentAnalysis, SentimentMoment,
    SpeakerShare, SummaryActionItem, SummaryDecision, SummaryDoc, SummaryMetrics, ViewState,
};
pub use meeting::{folder_name, Folder, Meeting, MeetingStatus, DEFAULT_FOLDER_ID};
