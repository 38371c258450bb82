//! Plain-text layout of the dashboard views.

use comfy_table::{Cell, Table};
use pulse_core::domain::Recommendation;
use pulse_core::view::analysis_detail::{self, AnalysisDetailView, RecommendationsView};
use pulse_core::view::analysis_list::{self, AnalysisListView};
use pulse_core::view::campaign_table::{self, CampaignTableView};
use pulse_core::view::format;

pub fn campaign_table(table: &CampaignTableView) -> String {
    let mut out = Table::new();
    out.set_header(campaign_table::COLUMNS);
    for row in &table.rows {
        out.add_row(row.cells());
    }
    out.to_string()
}

pub fn recommendations(items: &[Recommendation]) -> String {
    let mut table = Table::new();
    table.set_header(["ID", "Analysis", "Created", "Recommendation"]);
    for item in items {
        table.add_row(vec![
            Cell::new(optional(item.id)),
            Cell::new(optional(item.analysis_id)),
            Cell::new(
                item.created_at
                    .map(|at| format::date(at.date_naive()))
                    .unwrap_or_else(|| format::MISSING_VALUE.to_string()),
            ),
            Cell::new(&item.content),
        ]);
    }
    table.to_string()
}

fn optional(id: Option<i64>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| format::MISSING_VALUE.to_string())
}

pub fn analysis_list(list: &AnalysisListView) -> String {
    let mut out = vec![analysis_list::HEADING.to_string()];
    match list {
        AnalysisListView::Empty { message } => out.push(message.to_string()),
        AnalysisListView::Cards(cards) => {
            for card in cards {
                let mut title = format!(
                    "[{}] #{} {} ({})",
                    card.badge, card.id, card.metric, card.color.as_str()
                );
                if card.notified {
                    title.push_str(" - ");
                    title.push_str(analysis_list::NOTIFIED);
                }
                out.push(title);
                out.push(format!("    {}", card.description));
                out.push(format!("    Value: {}  Expected: {}", card.value, card.expected));
            }
        }
    }
    out.join("\n")
}

pub fn analysis_detail(detail: &AnalysisDetailView) -> String {
    let mut out = vec![
        format!("{} #{}", analysis_detail::TITLE, detail.id),
        detail.severity_label.clone(),
        detail.description.clone(),
        format!("Type: {}", detail.kind),
        format!("Metric: {}", detail.metric),
        format!("Current Value: {}", detail.current_value),
        format!("Expected Value: {}", detail.expected_value),
    ];
    if let Some(range) = &detail.date_range {
        out.push(format!("Date Range: {range}"));
    }
    out.push(format!("Notification: {}", detail.notification));
    out.push(String::new());
    out.push(analysis_detail::RECOMMENDATIONS_HEADING.to_string());
    match &detail.recommendations {
        RecommendationsView::List(items) => {
            out.extend(items.iter().map(|item| format!("- {item}")));
        }
        RecommendationsView::Empty {
            message,
            analysis_id,
        } => {
            out.push(message.to_string());
            out.push(format!("Run `recommend {analysis_id}` to generate one."));
        }
    }
    if !detail.notified {
        out.push(String::new());
        out.push(format!("Run `notify {}` to send the notification email.", detail.id));
    }
    out.join("\n")
}
