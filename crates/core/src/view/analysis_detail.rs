use crate::domain::{AnalysisWithRecommendations, SeverityColor};
use crate::view::format;
use serde::Serialize;

pub const TITLE: &str = "Analysis Details";
pub const RECOMMENDATIONS_HEADING: &str = "AI Recommendations";
pub const NO_RECOMMENDATIONS: &str = "No recommendations available.";
pub const NOTIFICATION_SENT: &str = "Notification sent";
pub const NOTIFICATION_NOT_SENT: &str = "No notification sent yet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationsView {
    List(Vec<String>),
    /// Nothing generated yet; offers generation for `analysis_id`.
    Empty {
        message: &'static str,
        analysis_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisDetailView {
    pub id: i64,
    pub color: SeverityColor,
    pub severity_label: String,
    pub description: String,
    pub kind: String,
    pub metric: String,
    pub current_value: String,
    pub expected_value: String,
    pub date_range: Option<String>,
    pub notified: bool,
    pub notification: &'static str,
    pub recommendations: RecommendationsView,
}

impl AnalysisDetailView {
    /// `None` unless something is selected and the modal is open.
    pub fn build(selected: Option<&AnalysisWithRecommendations>, open: bool) -> Option<Self> {
        let selected = selected.filter(|_| open)?;
        let a = &selected.analysis;

        let recommendations = if selected.recommendations.is_empty() {
            RecommendationsView::Empty {
                message: NO_RECOMMENDATIONS,
                analysis_id: a.id,
            }
        } else {
            RecommendationsView::List(
                selected
                    .recommendations
                    .iter()
                    .map(|r| r.content.clone())
                    .collect(),
            )
        };

        Some(Self {
            id: a.id,
            color: a.severity.color(),
            severity_label: format!("{} Severity", a.severity.label()),
            description: a.description.clone(),
            kind: a.kind.clone(),
            metric: a.metric.clone(),
            current_value: format::metric(a.value),
            expected_value: format::metric(a.expected_value),
            date_range: a
                .date_range()
                .map(|(start, end)| format::date_range(start, end)),
            notified: a.notified,
            notification: if a.notified {
                NOTIFICATION_SENT
            } else {
                NOTIFICATION_NOT_SENT
            },
            recommendations,
        })
    }
}
