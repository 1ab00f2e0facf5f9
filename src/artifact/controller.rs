use serde_json::Value;

use super::classify::interpret;
use crate::models::{ArtifactKind, ArtifactValue, ViewState};

/// Network action the host must issue after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    Load,
    Generate,
}

/// Result of a retrieval call, as seen by the state machine.
#[derive(Debug)]
pub enum LoadOutcome {
    Found(Value),
    /// The server has no stored artifact (404 or a null/absent field).
    Missing,
    Failed(String),
}

/// Lifecycle owner for one (meeting, kind) artifact.
///
/// The controller is a pure state machine: transition methods return the
/// network action the host must issue, and the host feeds completions back
/// in. Gating on the current state guarantees at most one generation
/// request in flight per instance; there is nothing to deduplicate at the
/// transport layer.
pub struct ArtifactController {
    kind: ArtifactKind,
    state: ViewState,
    value: Option<ArtifactValue>,
    last_error: Option<String>,
}

impl ArtifactController {
    pub fn new(kind: ArtifactKind) -> Self {
        Self {
            kind,
            state: ViewState::Empty,
            value: None,
            last_error: None,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn value(&self) -> Option<&ArtifactValue> {
        self.value.as_ref()
    }

    /// Present only in the error state.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Mount with the last known raw value, if any.
    ///
    /// An existing value renders immediately with no network call. With no
    /// value, kinds that auto-generate on missing start a retrieval under a
    /// single continuous generating period; everything else waits in the
    /// empty state for an explicit user request.
    pub fn mount(&mut self, existing: Option<Value>) -> Option<FetchAction> {
        match existing.filter(|v| !v.is_null()) {
            Some(raw) => {
                self.finish(Ok(raw));
                None
            }
            None if self.kind.spec().auto_generate_on_missing => {
                self.transition(ViewState::Generating);
                Some(FetchAction::Load)
            }
            None => None,
        }
    }

    /// User-requested generation, regeneration, or retry. Returns false when
    /// a request is already pending and this one is coalesced away.
    pub fn begin_generate(&mut self) -> bool {
        if self.state == ViewState::Generating {
            tracing::debug!(kind = self.kind.spec().route, "generation already pending, ignoring");
            return false;
        }
        self.transition(ViewState::Generating);
        true
    }

    /// Apply a retrieval result. A missing artifact either settles into the
    /// empty state or, for auto-generating kinds, demands a follow-up
    /// generation while the view stays in its one generating period.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> Option<FetchAction> {
        match outcome {
            LoadOutcome::Found(raw) => {
                self.finish(Ok(raw));
                None
            }
            LoadOutcome::Missing if self.kind.spec().auto_generate_on_missing => {
                Some(FetchAction::Generate)
            }
            LoadOutcome::Missing => {
                self.value = None;
                self.transition(ViewState::Empty);
                None
            }
            LoadOutcome::Failed(msg) => {
                self.fail(msg);
                None
            }
        }
    }

    /// Apply a generation result; the value is replaced wholesale.
    pub fn apply_generation(&mut self, result: Result<Value, String>) {
        self.finish(result);
    }

    fn finish(&mut self, result: Result<Value, String>) {
        match result.and_then(|raw| interpret(self.kind, raw)) {
            Ok(value) => {
                self.value = Some(value);
                self.last_error = None;
                self.transition(ViewState::Ready);
            }
            Err(msg) => self.fail(msg),
        }
    }

    fn fail(&mut self, msg: String) {
        let msg = if msg.trim().is_empty() {
            self.kind.spec().default_error.to_string()
        } else {
            msg
        };
        self.last_error = Some(msg);
        self.transition(ViewState::Error);
    }

    fn transition(&mut self, next: ViewState) {
        tracing::debug!(
            kind = self.kind.spec().route,
            from = ?self.state,
            to = ?next,
            "artifact state transition"
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured_summary() -> Value {
        json!({
            "executive_summary": "Quarterly review went long.",
            "key_points": [{ "point": "Budget overrun", "importance": "high" }],
        })
    }

    #[test]
    fn mount_with_existing_value_is_ready_without_network() {
        for kind in [ArtifactKind::Summary, ArtifactKind::Minutes, ArtifactKind::Insights] {
            let mut ctrl = ArtifactController::new(kind);
            let action = ctrl.mount(Some(json!({ "text": "notes" })));
            assert_eq!(action, None);
            assert_eq!(ctrl.state(), ViewState::Ready);
        }
    }

    #[test]
    fn mount_without_value_waits_for_user() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Summary);
        assert_eq!(ctrl.mount(None), None);
        assert_eq!(ctrl.state(), ViewState::Empty);
        assert!(ctrl.value().is_none());
    }

    #[test]
    fn null_seed_counts_as_absent() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Minutes);
        assert_eq!(ctrl.mount(Some(Value::Null)), None);
        assert_eq!(ctrl.state(), ViewState::Empty);
    }

    #[test]
    fn knowledge_graph_mount_loads_under_one_generating_period() {
        let mut ctrl = ArtifactController::new(ArtifactKind::KnowledgeGraph);
        assert_eq!(ctrl.mount(None), Some(FetchAction::Load));
        assert_eq!(ctrl.state(), ViewState::Generating);

        // Not found: the follow-up generation is demanded with no state flicker
        let follow_up = ctrl.apply_load(LoadOutcome::Missing);
        assert_eq!(follow_up, Some(FetchAction::Generate));
        assert_eq!(ctrl.state(), ViewState::Generating);

        ctrl.apply_generation(Ok(json!({ "nodes": [], "edges": [] })));
        assert_eq!(ctrl.state(), ViewState::Ready);
    }

    #[test]
    fn knowledge_graph_load_failure_is_recoverable() {
        let mut ctrl = ArtifactController::new(ArtifactKind::KnowledgeGraph);
        ctrl.mount(None);
        ctrl.apply_load(LoadOutcome::Failed("boom".to_string()));
        assert_eq!(ctrl.state(), ViewState::Error);
        assert_eq!(ctrl.last_error(), Some("boom"));
        assert!(ctrl.begin_generate());
    }

    #[test]
    fn missing_artifact_settles_empty_for_plain_kinds() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Summary);
        assert_eq!(ctrl.apply_load(LoadOutcome::Missing), None);
        assert_eq!(ctrl.state(), ViewState::Empty);
    }

    #[test]
    fn second_generate_while_pending_is_coalesced() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Insights);
        assert!(ctrl.begin_generate());
        // Rapid second press: no second network call
        assert!(!ctrl.begin_generate());
        assert_eq!(ctrl.state(), ViewState::Generating);
    }

    #[test]
    fn failure_surfaces_server_message_verbatim_and_retry_recovers() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Summary);
        assert!(ctrl.begin_generate());
        ctrl.apply_generation(Err("rate limited".to_string()));
        assert_eq!(ctrl.state(), ViewState::Error);
        assert_eq!(ctrl.last_error(), Some("rate limited"));

        // Retry succeeds with a structured payload
        assert!(ctrl.begin_generate());
        assert_eq!(ctrl.state(), ViewState::Generating);
        ctrl.apply_generation(Ok(structured_summary()));
        assert_eq!(ctrl.state(), ViewState::Ready);
        assert!(ctrl.last_error().is_none());
        assert!(matches!(ctrl.value(), Some(ArtifactValue::Summary(_))));
    }

    #[test]
    fn empty_server_message_falls_back_to_kind_default() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Minutes);
        ctrl.begin_generate();
        ctrl.apply_generation(Err(String::new()));
        assert_eq!(ctrl.last_error(), Some("Failed to generate minutes"));
    }

    #[test]
    fn regeneration_replaces_the_value_wholesale() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Summary);
        ctrl.mount(Some(json!({ "text": "old free-text summary" })));
        assert!(matches!(ctrl.value(), Some(ArtifactValue::Text(_))));

        assert!(ctrl.begin_generate());
        ctrl.apply_generation(Ok(structured_summary()));
        assert!(matches!(ctrl.value(), Some(ArtifactValue::Summary(_))));
        assert_eq!(ctrl.state(), ViewState::Ready);
    }

    #[test]
    fn malformed_payload_is_an_error_state() {
        let mut ctrl = ArtifactController::new(ArtifactKind::Summary);
        ctrl.begin_generate();
        ctrl.apply_generation(Ok(json!({ "key_points": "not a list" })));
        assert_eq!(ctrl.state(), ViewState::Error);
        assert!(ctrl.last_error().unwrap().contains("Malformed"));
    }
}
