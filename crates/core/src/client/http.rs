use crate::client::{
    ActionAck, AnalysisQuery, AnalyticsApi, ApiError, CampaignQuery, RecommendationQuery,
};
use crate::config::Settings;
use crate::domain::{Analysis, AnalysisWithRecommendations, Campaign, Recommendation};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// `reqwest` implementation of [`AnalyticsApi`] against the backend's `/api/v1` routes.
///
/// No retries and no caching: every failure goes straight back to the caller.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAnalyticsClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.api_base_url, settings.api_timeout())
    }

    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim();
        anyhow::ensure!(!base_url.is_empty(), "api base url must be non-empty");

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build analytics api http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut req = self.http.get(self.url(path));
        if let Some(query) = query {
            req = req.query(query);
        }

        tracing::debug!(path, "GET");
        let res = req
            .send()
            .await
            .map_err(|e| ApiError::transport("GET", path, &e))?;
        let (status, text) = read_success_body("GET", path, res).await?;

        serde_json::from_str::<T>(&text).map_err(|e| {
            ApiError {
                method: "GET",
                path: path.to_string(),
                status: Some(status),
                detail: format!("response does not match the expected shape: {e}"),
            }
            .into()
        })
    }

    async fn post_ack(&self, path: &str) -> Result<ActionAck> {
        tracing::debug!(path, "POST");
        let res = self
            .http
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::transport("POST", path, &e))?;
        let (_, text) = read_success_body("POST", path, res).await?;

        // The trigger endpoints' bodies are informational; an odd body is not a failure.
        let ack = match serde_json::from_str::<ActionAck>(&text) {
            Ok(ack) => ack,
            Err(err) => {
                tracing::debug!(path, error = %err, "ignoring non-ack response body");
                ActionAck::default()
            }
        };
        Ok(ack)
    }

    pub async fn list_campaigns(&self, query: &CampaignQuery) -> Result<Vec<Campaign>> {
        self.get_json("/campaigns", Some(query)).await
    }

    pub async fn get_campaign(&self, id: i64) -> Result<Campaign> {
        self.get_json::<_, ()>(&format!("/campaigns/{id}"), None)
            .await
    }

    pub async fn list_analyses(&self, query: &AnalysisQuery) -> Result<Vec<Analysis>> {
        self.get_json("/analyses", Some(query)).await
    }

    pub async fn get_recommendation(&self, id: i64) -> Result<Recommendation> {
        self.get_json::<_, ()>(&format!("/recommendations/{id}"), None)
            .await
    }

    pub async fn list_recommendations(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<Recommendation>> {
        self.get_json("/recommendations", Some(query)).await
    }
}

/// Returns the status code with the body so decode errors can report it.
async fn read_success_body(
    method: &'static str,
    path: &str,
    res: reqwest::Response,
) -> Result<(u16, String)> {
    let status = res.status();
    let text = res
        .text()
        .await
        .map_err(|e| ApiError::transport(method, path, &e))
        .with_context(|| format!("failed to read response body for {method} {path}"))?;

    if !status.is_success() {
        return Err(ApiError {
            method,
            path: path.to_string(),
            status: Some(status.as_u16()),
            detail: error_detail(&text),
        }
        .into());
    }

    Ok((status.as_u16(), text))
}

/// FastAPI reports errors as `{"detail": ...}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait::async_trait]
impl AnalyticsApi for HttpAnalyticsClient {
    async fn get_campaigns(&self) -> Result<Vec<Campaign>> {
        self.get_json::<_, ()>("/campaigns", None).await
    }

    async fn get_analyses(&self) -> Result<Vec<Analysis>> {
        self.get_json::<_, ()>("/analyses", None).await
    }

    async fn get_analysis(&self, id: i64) -> Result<AnalysisWithRecommendations> {
        self.get_json::<_, ()>(&format!("/analyses/{id}"), None)
            .await
    }

    async fn run_analysis(&self) -> Result<ActionAck> {
        self.post_ack("/analyses/run").await
    }

    async fn generate_recommendation(&self, analysis_id: i64) -> Result<ActionAck> {
        self.post_ack(&format!("/recommendations/generate/{analysis_id}"))
            .await
    }

    async fn send_notification(&self, analysis_id: i64) -> Result<ActionAck> {
        self.post_ack(&format!("/analyses/{analysis_id}/notify"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = HttpAnalyticsClient::new("http://localhost:8000/api/v1/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            client.url("/analyses/run"),
            "http://localhost:8000/api/v1/analyses/run"
        );
        assert_eq!(client.url("campaigns"), "http://localhost:8000/api/v1/campaigns");
    }

    #[test]
    fn rejects_blank_base_url() {
        assert!(HttpAnalyticsClient::new("  ", None).is_err());
    }

    #[test]
    fn extracts_fastapi_detail() {
        assert_eq!(error_detail(r#"{"detail":"Analysis not found"}"#), "Analysis not found");
        assert_eq!(error_detail("upstream exploded\n"), "upstream exploded");
        assert_eq!(
            error_detail(r#"{"detail":[{"msg":"bad id"}]}"#),
            r#"[{"msg":"bad id"}]"#
        );
    }
}
