use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::api::{ApiClient, ExportScope};
use crate::artifact::{ArtifactController, FetchAction, LoadOutcome};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{folder_name, ArtifactKind, ExportFormat, Folder, Meeting, ViewState};
use crate::tui::AppAction;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Completion of a background artifact request.
pub struct ArtifactEvent {
    meeting_id: String,
    epoch: u64,
    kind: ArtifactKind,
    outcome: ArtifactOutcome,
}

enum ArtifactOutcome {
    Loaded(LoadOutcome),
    Generated(std::result::Result<Value, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transcript,
    Summary,
    Minutes,
    Insights,
    KnowledgeGraph,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Transcript,
        Tab::Summary,
        Tab::Minutes,
        Tab::Insights,
        Tab::KnowledgeGraph,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Transcript => "Transcript",
            Tab::Summary => "Summary",
            Tab::Minutes => "Minutes",
            Tab::Insights => "Insights",
            Tab::KnowledgeGraph => "Knowledge Graph",
        }
    }

    pub fn kind(self) -> Option<ArtifactKind> {
        match self {
            Tab::Transcript => None,
            Tab::Summary => Some(ArtifactKind::Summary),
            Tab::Minutes => Some(ArtifactKind::Minutes),
            Tab::Insights => Some(ArtifactKind::Insights),
            Tab::KnowledgeGraph => Some(ArtifactKind::KnowledgeGraph),
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

pub struct App {
    // Data
    pub meeting_id: String,
    pub meeting: Option<Meeting>,
    pub folders: Vec<Folder>,
    pub load_error: Option<String>,

    // UI state
    pub active_tab: Tab,
    pub show_help: bool,
    pub export_menu_active: bool,
    pub scroll: u16,
    pub status_message: Option<String>,
    spinner_frame: usize,

    // Async state
    epoch: u64,
    kg_mounted: bool,
    controllers: Vec<ArtifactController>,
    artifact_rx: mpsc::Receiver<ArtifactEvent>,
    artifact_tx: mpsc::Sender<ArtifactEvent>,

    // Services
    client: Arc<ApiClient>,
    config: Config,
}

impl App {
    pub async fn new(config: Config, meeting_id: String) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config)?);
        let (artifact_tx, artifact_rx) = mpsc::channel(8);

        let mut app = Self {
            meeting_id,
            meeting: None,
            folders: Vec::new(),
            load_error: None,
            active_tab: Tab::Transcript,
            show_help: false,
            export_menu_active: false,
            scroll: 0,
            status_message: None,
            spinner_frame: 0,
            epoch: 0,
            kg_mounted: false,
            controllers: Vec::new(),
            artifact_rx,
            artifact_tx,
            client,
            config,
        };

        app.load_meeting().await;
        Ok(app)
    }

    pub fn controller(&self, kind: ArtifactKind) -> &ArtifactController {
        &self.controllers[kind as usize]
    }

    pub fn folder_label(&self) -> String {
        let folder_id = self.meeting.as_ref().and_then(|m| m.folder_id.as_deref());
        folder_name(folder_id, &self.folders)
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Advance the spinner while any background work is pending.
    pub fn tick_spinner(&mut self) {
        let busy = self
            .controllers
            .iter()
            .any(|c| c.state() == ViewState::Generating);
        if busy {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Fetch the meeting and folder listing, then seed fresh controllers
    /// from the last known artifact values. Results of requests issued
    /// before this call are invalidated by the epoch bump.
    pub async fn load_meeting(&mut self) {
        self.epoch += 1;
        self.load_error = None;
        self.kg_mounted = false;
        self.scroll = 0;
        self.controllers = ArtifactKind::ALL
            .into_iter()
            .map(ArtifactController::new)
            .collect();

        let (meeting, folders) = tokio::join!(
            self.client.fetch_meeting(&self.meeting_id),
            self.client.fetch_folders(),
        );

        match folders {
            Ok(folders) => self.folders = folders,
            Err(e) => tracing::warn!("Failed to fetch folders: {e}"),
        }

        match meeting {
            Ok(meeting) => {
                for kind in [
                    ArtifactKind::Summary,
                    ArtifactKind::Minutes,
                    ArtifactKind::Insights,
                ] {
                    let seed = meeting.artifact_seed(kind);
                    if let Some(action) = self.controllers[kind as usize].mount(seed) {
                        self.dispatch(kind, action);
                    }
                }
                self.meeting = Some(meeting);
            }
            Err(e) => {
                tracing::error!("Failed to fetch meeting {}: {e}", self.meeting_id);
                self.meeting = None;
                self.load_error = Some(e.to_string());
            }
        }

        if self.active_tab == Tab::KnowledgeGraph {
            self.mount_knowledge_graph();
        }
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextTab => self.switch_tab(self.active_tab.next()),
            AppAction::PrevTab => self.switch_tab(self.active_tab.prev()),
            AppAction::SelectTab(index) => {
                if let Some(tab) = Tab::ALL.get(index) {
                    self.switch_tab(*tab);
                }
            }

            AppAction::Generate => self.request_generation(),

            AppAction::Refresh => {
                self.status_message = None;
                self.load_meeting().await;
            }

            AppAction::OpenInBrowser => {
                let url = format!(
                    "{}/meeting/{}",
                    self.config.web_app_url.trim_end_matches('/'),
                    self.meeting_id
                );
                let _ = open::that(&url);
            }

            AppAction::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            AppAction::ScrollDown => self.scroll = self.scroll.saturating_add(1),

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::ExportMenuOpen => {
                if self.meeting.is_some() {
                    self.export_menu_active = true;
                }
            }
            AppAction::ExportMenuCancel => self.export_menu_active = false,

            AppAction::ExportCurrent(format) => {
                self.export_menu_active = false;
                let scope = match self.active_tab.kind() {
                    // The knowledge graph has no server-side report; fall
                    // back to the whole-meeting export like the transcript
                    Some(ArtifactKind::KnowledgeGraph) | None => ExportScope::Meeting,
                    Some(kind) => ExportScope::Kind(kind),
                };
                self.spawn_export(scope, format);
            }
            AppAction::ExportComprehensive(format) => {
                self.export_menu_active = false;
                self.spawn_export(ExportScope::Comprehensive, format);
            }
        }

        Ok(false)
    }

    fn switch_tab(&mut self, tab: Tab) {
        if tab != self.active_tab {
            self.active_tab = tab;
            self.scroll = 0;
            self.status_message = None;
        }
        if tab == Tab::KnowledgeGraph {
            self.mount_knowledge_graph();
        }
    }

    /// First visit to the knowledge-graph tab starts its retrieval; a
    /// missing stored graph then generates without further user input.
    fn mount_knowledge_graph(&mut self) {
        if self.kg_mounted || self.meeting.is_none() {
            return;
        }
        self.kg_mounted = true;
        let kind = ArtifactKind::KnowledgeGraph;
        if let Some(action) = self.controllers[kind as usize].mount(None) {
            self.dispatch(kind, action);
        }
    }

    fn request_generation(&mut self) {
        let Some(kind) = self.active_tab.kind() else {
            return;
        };
        if self.meeting.is_none() {
            return;
        }
        if self.controllers[kind as usize].begin_generate() {
            self.dispatch(kind, FetchAction::Generate);
        }
    }

    fn dispatch(&self, kind: ArtifactKind, action: FetchAction) {
        match action {
            FetchAction::Load => self.spawn_load(kind),
            FetchAction::Generate => self.spawn_generate(kind),
        }
    }

    fn spawn_load(&self, kind: ArtifactKind) {
        let client = Arc::clone(&self.client);
        let tx = self.artifact_tx.clone();
        let meeting_id = self.meeting_id.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let outcome = match client.fetch_artifact(kind, &meeting_id).await {
                Ok(Some(raw)) => LoadOutcome::Found(raw),
                Ok(None) => LoadOutcome::Missing,
                Err(e) => LoadOutcome::Failed(api_error_text(e)),
            };
            let _ = tx
                .send(ArtifactEvent {
                    meeting_id,
                    epoch,
                    kind,
                    outcome: ArtifactOutcome::Loaded(outcome),
                })
                .await;
        });
    }

    fn spawn_generate(&self, kind: ArtifactKind) {
        let client = Arc::clone(&self.client);
        let tx = self.artifact_tx.clone();
        let meeting_id = self.meeting_id.clone();
        let epoch = self.epoch;
        let transcript = if kind.spec().sends_transcript {
            self.meeting.as_ref().and_then(|m| m.transcript.clone())
        } else {
            None
        };

        tokio::spawn(async move {
            let result = client
                .generate_artifact(kind, &meeting_id, transcript)
                .await
                .map_err(api_error_text);
            let _ = tx
                .send(ArtifactEvent {
                    meeting_id,
                    epoch,
                    kind,
                    outcome: ArtifactOutcome::Generated(result),
                })
                .await;
        });
    }

    /// Export is fire-and-forget: failures are logged and never touch the
    /// artifact view state.
    fn spawn_export(&mut self, scope: ExportScope, format: ExportFormat) {
        let what = match scope {
            ExportScope::Meeting => "meeting report".to_string(),
            ExportScope::Comprehensive => "complete report".to_string(),
            ExportScope::Kind(kind) => kind.spec().label.to_lowercase(),
        };
        self.status_message = Some(format!("Exporting {what} as {}...", format.as_str()));

        let client = Arc::clone(&self.client);
        let meeting_id = self.meeting_id.clone();
        let export_dir = PathBuf::from(&self.config.export_dir);

        tokio::spawn(async move {
            match client
                .export_report(&meeting_id, scope, format, &export_dir)
                .await
            {
                Ok(path) => tracing::info!("Exported report to {}", path.display()),
                Err(e) => tracing::error!("Failed to export report: {e}"),
            }
        });
    }

    /// Apply completed artifact results (non-blocking). Results from a
    /// previous meeting or a superseded load are dropped on arrival.
    pub fn poll_artifact_results(&mut self) {
        while let Ok(event) = self.artifact_rx.try_recv() {
            if event.epoch != self.epoch || event.meeting_id != self.meeting_id {
                tracing::debug!(
                    kind = event.kind.spec().route,
                    "Discarding artifact result for a disposed view"
                );
                continue;
            }

            let kind = event.kind;
            match event.outcome {
                ArtifactOutcome::Loaded(outcome) => {
                    if let Some(action) = self.controllers[kind as usize].apply_load(outcome) {
                        self.dispatch(kind, action);
                    }
                }
                ArtifactOutcome::Generated(result) => {
                    self.controllers[kind as usize].apply_generation(result);
                }
            }
        }
    }
}

/// Message shown to the user for a failed API call. An application error
/// may legitimately be empty (server omitted the message); the controller
/// substitutes its kind-specific default in that case.
fn api_error_text(error: AppError) -> String {
    match error {
        AppError::Api(msg) => msg,
        AppError::Http(e) if e.is_connect() || e.is_timeout() => {
            "Network error occurred".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps_both_ways() {
        assert_eq!(Tab::Transcript.prev(), Tab::KnowledgeGraph);
        assert_eq!(Tab::KnowledgeGraph.next(), Tab::Transcript);

        let mut tab = Tab::Transcript;
        for _ in 0..Tab::ALL.len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Transcript);
    }

    #[test]
    fn api_error_text_passes_server_message_through() {
        assert_eq!(
            api_error_text(AppError::Api("rate limited".to_string())),
            "rate limited"
        );
        // Empty message stays empty so the kind default can apply
        assert_eq!(api_error_text(AppError::Api(String::new())), "");
    }
}
