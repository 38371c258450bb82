use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of advertising performance for a campaign on a given date, platform and region.
/// `ctr`, `cpc` and `cpa` are derived by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub campaign_name: String,
    pub platform: String,
    pub region: String,
    pub date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub spend: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    #[serde(with = "crate::domain::timestamp")]
    pub created_at: DateTime<Utc>,
}
