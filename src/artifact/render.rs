use serde_json::Value;

use crate::models::{GraphDoc, InsightsDoc, MinutesDoc, SummaryDoc, SummaryMetrics};

/// One renderable block of a structured artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: &str, lines: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            lines,
        }
    }
}

// The section walkers below share one contract: a section whose collection
// is absent or empty is omitted entirely, never rendered as a placeholder.

pub fn summary_sections(doc: &SummaryDoc) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(metrics) = &doc.metrics {
        push_metrics(&mut sections, metrics);
    }

    if let Some(text) = non_empty(&doc.executive_summary) {
        sections.push(Section::new("Executive Summary", vec![text.to_string()]));
    }

    let points: Vec<String> = doc
        .key_points
        .iter()
        .filter_map(|p| {
            let point = non_empty(&p.point)?;
            Some(match non_empty(&p.importance) {
                Some(importance) => format!("• {point} [{importance} priority]"),
                None => format!("• {point}"),
            })
        })
        .collect();
    if !points.is_empty() {
        sections.push(Section::new("Key Discussion Points", points));
    }

    let mut decisions = Vec::new();
    for d in &doc.decisions {
        if let Some(decision) = non_empty(&d.decision) {
            decisions.push(format!("• {decision}"));
            if let Some(context) = non_empty(&d.context) {
                decisions.push(format!("    {context}"));
            }
        }
    }
    if !decisions.is_empty() {
        sections.push(Section::new("Decisions Made", decisions));
    }

    let mut actions = Vec::new();
    for item in &doc.action_items {
        if let Some(task) = non_empty(&item.task) {
            actions.push(match non_empty(&item.priority) {
                Some(priority) => format!("• {task} [{priority}]"),
                None => format!("• {task}"),
            });
            let mut meta = Vec::new();
            if let Some(owner) = non_empty(&item.owner) {
                meta.push(format!("owner: {owner}"));
            }
            if let Some(deadline) = non_empty(&item.deadline) {
                meta.push(format!("due: {deadline}"));
            }
            if !meta.is_empty() {
                actions.push(format!("    {}", meta.join("  ")));
            }
        }
    }
    if !actions.is_empty() {
        sections.push(Section::new("Action Items", actions));
    }

    let steps: Vec<String> = doc
        .next_steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect();
    if !steps.is_empty() {
        sections.push(Section::new("Next Steps", steps));
    }

    let mut quotes = Vec::new();
    for q in &doc.key_quotes {
        if let Some(quote) = non_empty(&q.quote) {
            quotes.push(format!("\"{quote}\""));
            if let Some(speaker) = non_empty(&q.speaker) {
                quotes.push(format!("    - {speaker}"));
            }
        }
    }
    if !quotes.is_empty() {
        sections.push(Section::new("Notable Quotes", quotes));
    }

    sections
}

/// Minutes sections. The meeting-info block prefers the producer's own
/// fields and falls back to the normalized header date/duration when the
/// document omits them.
pub fn minutes_sections(
    doc: &MinutesDoc,
    fallback_date: Option<&str>,
    fallback_duration: Option<&str>,
) -> Vec<Section> {
    let mut sections = Vec::new();

    let info = doc.meeting_info.clone().unwrap_or_default();
    let mut info_lines = Vec::new();
    if let Some(date) = non_empty(&info.date).or(fallback_date) {
        info_lines.push(format!("Date: {date}"));
    }
    if let Some(time) = non_empty(&info.time) {
        info_lines.push(format!("Time: {time}"));
    }
    if let Some(duration) = non_empty(&info.duration).or(fallback_duration) {
        info_lines.push(format!("Duration: {duration}"));
    }
    if let Some(location) = non_empty(&info.location) {
        info_lines.push(format!("Location: {location}"));
    }
    if !info_lines.is_empty() {
        sections.push(Section::new("Meeting Information", info_lines));
    }

    let attendees: Vec<String> = doc
        .attendees
        .iter()
        .filter_map(|a| {
            let name = non_empty(&a.name)?;
            Some(match non_empty(&a.role) {
                Some(role) => format!("• {name} ({role})"),
                None => format!("• {name}"),
            })
        })
        .collect();
    if !attendees.is_empty() {
        sections.push(Section::new("Attendees", attendees));
    }

    let agenda: Vec<String> = doc
        .agenda_items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let title = non_empty(&item.item)?;
            let mut line = format!("{}. {title}", i + 1);
            if let Some(presenter) = non_empty(&item.presenter) {
                line.push_str(&format!(" ({presenter})"));
            }
            if let Some(duration) = non_empty(&item.duration) {
                line.push_str(&format!(" [{duration}]"));
            }
            Some(line)
        })
        .collect();
    if !agenda.is_empty() {
        sections.push(Section::new("Agenda", agenda));
    }

    let mut discussion = Vec::new();
    for point in &doc.discussion_points {
        if let Some(topic) = non_empty(&point.topic) {
            discussion.push(match non_empty(&point.presenter) {
                Some(presenter) => format!("• {topic} ({presenter})"),
                None => format!("• {topic}"),
            });
            if let Some(summary) = non_empty(&point.summary) {
                discussion.push(format!("    {summary}"));
            }
            for kp in &point.key_points {
                discussion.push(format!("      - {kp}"));
            }
        }
    }
    if !discussion.is_empty() {
        sections.push(Section::new("Discussion Points", discussion));
    }

    let mut decisions = Vec::new();
    for d in &doc.decisions {
        if let Some(decision) = non_empty(&d.decision) {
            decisions.push(format!("• {decision}"));
            if let Some(rationale) = non_empty(&d.rationale) {
                decisions.push(format!("    {rationale}"));
            }
            let mut meta = Vec::new();
            if let Some(maker) = non_empty(&d.decision_maker) {
                meta.push(format!("by: {maker}"));
            }
            if !d.affected_parties.is_empty() {
                meta.push(format!("affects: {}", d.affected_parties.join(", ")));
            }
            if !meta.is_empty() {
                decisions.push(format!("    {}", meta.join("  ")));
            }
        }
    }
    if !decisions.is_empty() {
        sections.push(Section::new("Decisions Made", decisions));
    }

    let mut actions = Vec::new();
    for item in &doc.action_items {
        if let Some(task) = non_empty(&item.task) {
            actions.push(match non_empty(&item.priority) {
                Some(priority) => format!("• {task} [{priority}]"),
                None => format!("• {task}"),
            });
            let mut meta = Vec::new();
            if let Some(assignee) = non_empty(&item.assignee) {
                meta.push(format!("assignee: {assignee}"));
            }
            if let Some(deadline) = non_empty(&item.deadline) {
                meta.push(format!("due: {deadline}"));
            }
            if let Some(status) = non_empty(&item.status) {
                meta.push(format!("status: {status}"));
            }
            if !meta.is_empty() {
                actions.push(format!("    {}", meta.join("  ")));
            }
        }
    }
    if !actions.is_empty() {
        sections.push(Section::new("Action Items", actions));
    }

    let parking: Vec<String> = doc.parking_lot.iter().map(|p| format!("• {p}")).collect();
    if !parking.is_empty() {
        sections.push(Section::new("Parking Lot", parking));
    }

    if let Some(next) = doc.next_meeting.as_ref().filter(|n| n.scheduled) {
        let mut lines = Vec::new();
        if let Some(date) = non_empty(&next.date) {
            lines.push(format!("Date: {date}"));
        }
        if let Some(agenda) = non_empty(&next.agenda) {
            lines.push(agenda.to_string());
        }
        if !lines.is_empty() {
            sections.push(Section::new("Next Meeting", lines));
        }
    }

    sections
}

pub fn insights_sections(doc: &InsightsDoc) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(metrics) = &doc.metrics {
        push_metrics(&mut sections, metrics);
    }

    if let Some(text) = non_empty(&doc.executive_summary) {
        sections.push(Section::new("Executive Summary", vec![text.to_string()]));
    }

    if let Some(Value::String(overview)) = &doc.overview {
        if !overview.trim().is_empty() {
            sections.push(Section::new("Overview", vec![overview.clone()]));
        }
    }

    let mut themes = Vec::new();
    for theme in &doc.key_themes {
        if let Some(name) = non_empty(&theme.theme) {
            let mut tags = Vec::new();
            if let Some(importance) = non_empty(&theme.importance) {
                tags.push(importance.to_string());
            }
            if let Some(freq) = theme.frequency {
                tags.push(format!("{freq}x"));
            }
            themes.push(if tags.is_empty() {
                format!("• {name}")
            } else {
                format!("• {name} [{}]", tags.join(", "))
            });
            if let Some(desc) = non_empty(&theme.description) {
                themes.push(format!("    {desc}"));
            }
        }
    }
    if !themes.is_empty() {
        sections.push(Section::new("Key Themes & Patterns", themes));
    }

    if let Some(participation) = &doc.participation_analysis {
        let mut lines = Vec::new();
        for speaker in &participation.most_active_speakers {
            if let Some(name) = non_empty(&speaker.name) {
                lines.push(match speaker.contribution_percentage {
                    Some(pct) => format!("• {name}: {pct:.0}%"),
                    None => format!("• {name}"),
                });
            }
        }
        if let Some(dist) = non_empty(&participation.speaking_distribution) {
            lines.push(format!("Distribution: {dist}"));
        }
        if !participation.quiet_participants.is_empty() {
            lines.push(format!(
                "Quiet participants: {}",
                participation.quiet_participants.join(", ")
            ));
        }
        if !lines.is_empty() {
            sections.push(Section::new("Participation Analysis", lines));
        }
    }

    if let Some(sentiment) = &doc.sentiment_analysis {
        let mut lines = Vec::new();
        if let Some(tone) = non_empty(&sentiment.overall_tone) {
            lines.push(format!("Overall tone: {tone}"));
        }
        for moment in &sentiment.positive_moments {
            if let Some(text) = non_empty(&moment.moment) {
                lines.push(match non_empty(&moment.timestamp) {
                    Some(ts) => format!("+ {text} ({ts})"),
                    None => format!("+ {text}"),
                });
            }
        }
        for concern in &sentiment.concerns_raised {
            if let Some(text) = non_empty(&concern.concern) {
                lines.push(match non_empty(&concern.severity) {
                    Some(severity) => format!("! {text} [{severity} severity]"),
                    None => format!("! {text}"),
                });
            }
        }
        for agreement in &sentiment.agreements {
            lines.push(format!("✓ {agreement}"));
        }
        for conflict in &sentiment.conflicts {
            lines.push(format!("✗ {conflict}"));
        }
        if !lines.is_empty() {
            sections.push(Section::new("Sentiment Analysis", lines));
        }
    }

    let mut recs = Vec::new();
    for rec in &doc.follow_up_recommendations {
        if let Some(text) = non_empty(&rec.recommendation) {
            recs.push(match non_empty(&rec.priority) {
                Some(priority) => format!("• {text} [{priority}]"),
                None => format!("• {text}"),
            });
            if let Some(rationale) = non_empty(&rec.rationale) {
                recs.push(format!("    {rationale}"));
            }
        }
    }
    if !recs.is_empty() {
        sections.push(Section::new("Follow-up Recommendations", recs));
    }

    let mut risks = Vec::new();
    for risk in &doc.risks_and_concerns {
        if let Some(text) = non_empty(&risk.risk) {
            risks.push(match non_empty(&risk.impact) {
                Some(impact) => format!("• {text} [{impact} impact]"),
                None => format!("• {text}"),
            });
            if let Some(mitigation) = non_empty(&risk.mitigation) {
                risks.push(format!("    Mitigation: {mitigation}"));
            }
        }
    }
    if !risks.is_empty() {
        sections.push(Section::new("Risks & Concerns", risks));
    }

    let observations: Vec<String> = doc
        .interesting_observations
        .iter()
        .map(|o| format!("• {o}"))
        .collect();
    if !observations.is_empty() {
        sections.push(Section::new("Interesting Observations", observations));
    }

    if let Some(metrics) = doc.key_metrics.as_ref().filter(|m| !m.is_empty()) {
        let lines = metrics
            .iter()
            .map(|(key, value)| format!("• {}: {}", key.replace('_', " "), scalar_label(value)))
            .collect();
        sections.push(Section::new("Key Metrics", lines));
    }

    sections
}

pub fn graph_sections(doc: &GraphDoc) -> Vec<Section> {
    let mut sections = Vec::new();

    let nodes: Vec<String> = doc
        .nodes
        .iter()
        .map(|n| match n.node_type.as_deref() {
            Some(t) => format!("• {} ({t})", n.display_label()),
            None => format!("• {}", n.display_label()),
        })
        .collect();
    if !nodes.is_empty() {
        sections.push(Section::new(&format!("Nodes ({})", nodes.len()), nodes));
    }

    let edges: Vec<String> = doc
        .edges
        .iter()
        .filter_map(|e| {
            let source = e.source.as_deref()?;
            let target = e.target.as_deref()?;
            Some(match e.label.as_deref() {
                Some(label) => format!("• {source} -[{label}]-> {target}"),
                None => format!("• {source} -> {target}"),
            })
        })
        .collect();
    if !edges.is_empty() {
        sections.push(Section::new(&format!("Connections ({})", edges.len()), edges));
    }

    sections
}

fn push_metrics(sections: &mut Vec<Section>, metrics: &SummaryMetrics) {
    let mut lines = Vec::new();
    if let Some(n) = metrics.total_topics {
        lines.push(format!("Topics discussed: {n}"));
    }
    if let Some(n) = metrics.decisions_made {
        lines.push(format!("Decisions made: {n}"));
    }
    if let Some(n) = metrics.action_items {
        lines.push(format!("Action items: {n}"));
    }
    if let Some(n) = metrics.risks {
        lines.push(format!("Risks identified: {n}"));
    }
    if !lines.is_empty() {
        sections.push(Section::new("Metrics", lines));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn scalar_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn empty_decisions_list_renders_no_section() {
        let doc: SummaryDoc = serde_json::from_value(json!({
            "executive_summary": "All good.",
            "decisions": [],
        }))
        .unwrap();
        assert!(!titles(&summary_sections(&doc)).contains(&"Decisions Made"));
    }

    #[test]
    fn absent_decisions_key_also_renders_no_section() {
        let doc: SummaryDoc =
            serde_json::from_value(json!({ "executive_summary": "All good." })).unwrap();
        assert!(!titles(&summary_sections(&doc)).contains(&"Decisions Made"));
    }

    #[test]
    fn summary_sections_follow_the_fixed_order() {
        let doc: SummaryDoc = serde_json::from_value(json!({
            "metrics": { "total_topics": 3 },
            "executive_summary": "Busy week.",
            "key_points": [{ "point": "Scope grew" }],
            "decisions": [{ "decision": "Cut feature X", "context": "No time" }],
            "action_items": [{ "task": "Update roadmap", "priority": "high", "owner": "Sam" }],
            "next_steps": ["Ship it"],
            "key_quotes": [{ "quote": "Let's move", "speaker": "Alex" }],
        }))
        .unwrap();
        assert_eq!(
            titles(&summary_sections(&doc)),
            vec![
                "Metrics",
                "Executive Summary",
                "Key Discussion Points",
                "Decisions Made",
                "Action Items",
                "Next Steps",
                "Notable Quotes",
            ]
        );
    }

    #[test]
    fn minutes_info_falls_back_to_normalized_header_values() {
        let doc = MinutesDoc::default();
        let sections = minutes_sections(&doc, Some("January 1, 2024 10:00 AM"), Some("45m"));
        assert_eq!(sections[0].title, "Meeting Information");
        assert_eq!(
            sections[0].lines,
            vec!["Date: January 1, 2024 10:00 AM", "Duration: 45m"]
        );

        // Producer fields win over fallbacks
        let doc: MinutesDoc = serde_json::from_value(json!({
            "meeting_info": { "date": "2024-02-02", "duration": "30m" },
        }))
        .unwrap();
        let sections = minutes_sections(&doc, Some("ignored"), Some("ignored"));
        assert_eq!(sections[0].lines, vec!["Date: 2024-02-02", "Duration: 30m"]);
    }

    #[test]
    fn unscheduled_next_meeting_is_omitted() {
        let doc: MinutesDoc = serde_json::from_value(json!({
            "next_meeting": { "scheduled": false, "date": "2024-03-03" },
        }))
        .unwrap();
        assert!(minutes_sections(&doc, None, None).is_empty());
    }

    #[test]
    fn insights_key_metrics_render_as_pairs() {
        let doc: InsightsDoc = serde_json::from_value(json!({
            "key_metrics": { "engagement_score": 8, "energy_level": "high" },
        }))
        .unwrap();
        let sections = insights_sections(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Key Metrics");
        assert!(sections[0].lines.contains(&"• engagement score: 8".to_string()));
        assert!(sections[0].lines.contains(&"• energy level: high".to_string()));
    }

    #[test]
    fn graph_sections_list_nodes_and_connections() {
        let doc: GraphDoc = serde_json::from_value(json!({
            "nodes": [
                { "id": "n1", "label": "Budget", "type": "topic" },
                { "id": "n2" },
            ],
            "edges": [{ "source": "n1", "target": "n2", "label": "owned_by" }],
        }))
        .unwrap();
        let sections = graph_sections(&doc);
        assert_eq!(titles(&sections), vec!["Nodes (2)", "Connections (1)"]);
        assert_eq!(sections[0].lines[0], "• Budget (topic)");
        assert_eq!(sections[0].lines[1], "• n2");
        assert_eq!(sections[1].lines[0], "• n1 -[owned_by]-> n2");
    }
}
