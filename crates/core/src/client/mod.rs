pub mod error;
pub mod http;

use crate::domain::{Analysis, AnalysisWithRecommendations, Campaign};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use error::ApiError;
pub use http::HttpAnalyticsClient;

/// The backend calls the dashboard depends on.
#[async_trait::async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn get_campaigns(&self) -> Result<Vec<Campaign>>;

    async fn get_analyses(&self) -> Result<Vec<Analysis>>;

    async fn get_analysis(&self, id: i64) -> Result<AnalysisWithRecommendations>;

    /// Starts an analysis run on the backend.
    async fn run_analysis(&self) -> Result<ActionAck>;

    async fn generate_recommendation(&self, analysis_id: i64) -> Result<ActionAck>;

    /// Queues the backend's notification email for one analysis.
    async fn send_notification(&self, analysis_id: i64) -> Result<ActionAck>;
}

#[async_trait::async_trait]
impl<T: AnalyticsApi + ?Sized> AnalyticsApi for Arc<T> {
    async fn get_campaigns(&self) -> Result<Vec<Campaign>> {
        (**self).get_campaigns().await
    }

    async fn get_analyses(&self) -> Result<Vec<Analysis>> {
        (**self).get_analyses().await
    }

    async fn get_analysis(&self, id: i64) -> Result<AnalysisWithRecommendations> {
        (**self).get_analysis(id).await
    }

    async fn run_analysis(&self) -> Result<ActionAck> {
        (**self).run_analysis().await
    }

    async fn generate_recommendation(&self, analysis_id: i64) -> Result<ActionAck> {
        (**self).generate_recommendation(analysis_id).await
    }

    async fn send_notification(&self, analysis_id: i64) -> Result<ActionAck> {
        (**self).send_notification(analysis_id).await
    }
}

/// Body of the trigger endpoints. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Server-side filters and paging for `GET /campaigns`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Server-side filters and paging for `GET /analyses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// Paging and filter for `GET /recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<i64>,
}
