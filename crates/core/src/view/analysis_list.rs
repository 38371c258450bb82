use crate::domain::{Analysis, SeverityColor};
use crate::view::format;
use serde::Serialize;
use std::cmp::Ordering;

pub const HEADING: &str = "Analysis Results";
pub const EMPTY_MESSAGE: &str =
    "No analysis results found. Click \"Run Analysis\" to generate insights.";
pub const NOTIFIED: &str = "Notified";

/// Most severe first; newest first within the same severity. Unranked severities go last.
pub fn compare(a: &Analysis, b: &Analysis) -> Ordering {
    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn sort_analyses(analyses: &[Analysis]) -> Vec<&Analysis> {
    let mut sorted: Vec<&Analysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisCard {
    pub id: i64,
    pub color: SeverityColor,
    pub metric: String,
    pub badge: String,
    pub description: String,
    pub value: String,
    pub expected: String,
    pub notified: bool,
}

impl AnalysisCard {
    pub fn from_analysis(a: &Analysis) -> Self {
        Self {
            id: a.id,
            color: a.severity.color(),
            metric: a.metric.clone(),
            badge: a.severity.label(),
            description: a.description.clone(),
            value: format::metric(a.value),
            expected: format::metric(a.expected_value),
            notified: a.notified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisListView {
    Empty { message: &'static str },
    Cards(Vec<AnalysisCard>),
}

impl AnalysisListView {
    pub fn build(analyses: &[Analysis]) -> Self {
        if analyses.is_empty() {
            return AnalysisListView::Empty {
                message: EMPTY_MESSAGE,
            };
        }
        AnalysisListView::Cards(
            sort_analyses(analyses)
                .into_iter()
                .map(AnalysisCard::from_analysis)
                .collect(),
        )
    }
}
