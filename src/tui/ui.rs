use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};
use serde_json::Value;

use crate::app::{App, Tab};
use crate::artifact::{
    graph_sections, insights_sections, minutes_sections, summary_sections, Section,
};
use crate::models::{timestamp, ArtifactKind, ArtifactValue, MeetingStatus, ViewState};

pub fn draw(frame: &mut Frame, app: &App) {
    if app.meeting.is_none() {
        match &app.load_error {
            Some(error) => render_load_error(frame, error),
            None => render_centered_notice(frame, "Loading meeting details..."),
        }
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_content(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);

    if app.export_menu_active {
        render_export_menu(frame);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_load_error(frame: &mut Frame, error: &str) {
    let area = centered_rect(60, 30, frame.area());
    let block = Block::default()
        .title(" Error Loading Meeting ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = format!("{error}\n\nr:retry  q:quit");
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_centered_notice(frame: &mut Frame, message: &str) {
    let area = centered_rect(50, 20, frame.area());
    let paragraph = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(meeting) = &app.meeting else {
        return;
    };

    let status_color = match meeting.status {
        MeetingStatus::Completed => Color::Green,
        MeetingStatus::Recording => Color::Red,
        MeetingStatus::Processing => Color::Yellow,
        MeetingStatus::Unknown => Color::DarkGray,
    };

    let title = meeting.title.as_deref().unwrap_or("Untitled Meeting");
    let language = meeting.language.as_deref().unwrap_or("en-US");

    let mut lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", meeting.status.label()),
                Style::default().fg(status_color),
            ),
            Span::styled(
                format!("  {language}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("Date: ", Style::default().fg(Color::DarkGray)),
            Span::raw(timestamp::display_date(&meeting.created_at)),
            Span::styled("  Duration: ", Style::default().fg(Color::DarkGray)),
            Span::raw(timestamp::duration_label(
                &meeting.created_at,
                &meeting.ended_at,
                meeting.status,
            )),
            Span::styled("  Participants: ", Style::default().fg(Color::DarkGray)),
            Span::raw(meeting.participants.len().to_string()),
            Span::styled("  Folder: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.folder_label()),
        ]),
    ];

    if let Some(description) = meeting.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(
            description.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }

    let block = Block::default()
        .title(" Meeting Lens ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.active_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.active_tab.kind() {
        None => render_transcript(frame, app, area),
        Some(kind) => render_artifact(frame, app, kind, area),
    }
}

fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let text = app
        .meeting
        .as_ref()
        .and_then(|m| m.transcript.as_ref())
        .map(transcript_text)
        .unwrap_or_else(|| "No transcript available.".to_string());

    let block = Block::default().title(" Transcript ").borders(Borders::ALL);
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Best-effort text view of the opaque transcript payload.
fn transcript_text(transcript: &Value) -> String {
    match transcript {
        Value::String(s) => s.clone(),
        Value::Array(segments) => segments
            .iter()
            .map(|segment| match segment {
                Value::Object(map) => {
                    let text = map.get("text").and_then(Value::as_str).unwrap_or_default();
                    match map.get("speaker").and_then(Value::as_str) {
                        Some(speaker) => format!("{speaker}: {text}"),
                        None => text.to_string(),
                    }
                }
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

fn render_artifact(frame: &mut Frame, app: &App, kind: ArtifactKind, area: Rect) {
    let controller = app.controller(kind);
    let label = kind.spec().label;

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let text: Text = match controller.state() {
        ViewState::Empty => Text::from(format!(
            "No {label} available.\n\n{}\n\nPress g to generate.",
            empty_prompt(kind)
        )),
        ViewState::Generating => Text::from(format!(
            "{} Generating {}...\n\nThe transcript is being analyzed. This can take a moment.",
            app.spinner(),
            label.to_lowercase()
        )),
        ViewState::Error => Text::from(format!(
            "Failed to load {}.\n\n{}\n\nPress g to retry.",
            label.to_lowercase(),
            controller.last_error().unwrap_or("Unknown error")
        )),
        ViewState::Ready => match controller.value() {
            Some(ArtifactValue::Text(body)) => Text::from(body.clone()),
            Some(ArtifactValue::Summary(doc)) => sections_text(&summary_sections(doc)),
            Some(ArtifactValue::Minutes(doc)) => {
                let (date, duration) = minutes_fallbacks(app);
                sections_text(&minutes_sections(doc, Some(&date), Some(&duration)))
            }
            Some(ArtifactValue::Insights(doc)) => sections_text(&insights_sections(doc)),
            Some(ArtifactValue::Graph(doc)) => sections_text(&graph_sections(doc)),
            None => Text::from(format!("No {label} available.")),
        },
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn empty_prompt(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Summary => {
            "Generate an AI-powered summary of this meeting's key points and decisions."
        }
        ArtifactKind::Minutes => {
            "Generate the official minutes of the meeting from the transcript."
        }
        ArtifactKind::Insights => {
            "Generate AI-powered insights covering themes, participation, sentiment, and metrics."
        }
        ArtifactKind::KnowledgeGraph => {
            "Generate a knowledge graph of topics, people, and concepts from this meeting."
        }
    }
}

/// Header-derived values the minutes meeting-info block falls back to.
fn minutes_fallbacks(app: &App) -> (String, String) {
    match &app.meeting {
        Some(meeting) => (
            timestamp::display_date(&meeting.created_at),
            timestamp::duration_label(&meeting.created_at, &meeting.ended_at, meeting.status),
        ),
        None => ("N/A".to_string(), "N/A".to_string()),
    }
}

fn sections_text(sections: &[Section]) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            section.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for line in &section.lines {
            lines.push(Line::from(line.clone()));
        }
    }
    Text::from(lines)
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match &app.status_message {
        Some(message) => message.clone(),
        None => "tab:switch  j/k:scroll  g:generate  e:export  r:refresh  o:open  ?:help  q:quit"
            .to_string(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_export_menu(frame: &mut Frame) {
    let area = centered_rect(50, 25, frame.area());

    let block = Block::default()
        .title(" Export ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = vec![
        "",
        " Current tab:      p PDF   j JSON   t TXT",
        " Complete report:  P PDF   J JSON   T TXT",
        "",
        " Esc to cancel",
    ];

    let paragraph = Paragraph::new(text.join("\n")).block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   Tab / l / →   Next tab",
        "   S-Tab / h / ← Previous tab",
        "   1-5           Jump to tab",
        "   j / ↓         Scroll down",
        "   k / ↑         Scroll up",
        "",
        " Actions:",
        "   g / Enter     Generate / regenerate / retry",
        "   e             Export menu",
        "   r             Reload meeting",
        "   o             Open in browser",
        "",
        " General:",
        "   ?             Toggle this help",
        "   q             Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
