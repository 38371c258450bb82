use crate::domain::severity::Severity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A backend-detected finding about campaign metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub metric: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub expected_value: Option<f64>,
    #[serde(default)]
    pub date_range_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_range_end: Option<NaiveDate>,
    #[serde(with = "crate::domain::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notified: bool,
}

impl Analysis {
    /// Both bounds, or nothing.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.date_range_start?, self.date_range_end?))
    }
}

/// Free-text guidance attached to one analysis.
///
/// The single-analysis endpoint embeds recommendations with only `content`, so the
/// identifiers and timestamp are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub analysis_id: Option<i64>,
    pub content: String,
    #[serde(default, with = "crate::domain::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisWithRecommendations {
    #[serde(flatten)]
    pub analysis: Analysis,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisWithRecommendations {
    pub fn id(&self) -> i64 {
        self.analysis.id
    }
}
