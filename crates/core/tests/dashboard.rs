use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use pulse_core::client::{ActionAck, AnalyticsApi};
use pulse_core::dashboard::{Dashboard, Outcome, ToastQueue};
use pulse_core::domain::{Analysis, AnalysisWithRecommendations, Campaign, Recommendation, Severity};
use tokio::sync::Notify;

#[derive(Default)]
struct MockApi {
    campaigns: Vec<Campaign>,
    analyses: Mutex<Vec<Analysis>>,
    details: Mutex<HashMap<i64, AnalysisWithRecommendations>>,
    failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<i64, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    fn seeded() -> Self {
        let analyses = vec![analysis(1, "low"), analysis(2, "high")];
        let details = analyses
            .iter()
            .map(|a| {
                (
                    a.id,
                    AnalysisWithRecommendations {
                        analysis: a.clone(),
                        recommendations: Vec::new(),
                    },
                )
            })
            .collect();
        Self {
            campaigns: vec![campaign(10), campaign(11)],
            analyses: Mutex::new(analyses),
            details: Mutex::new(details),
            ..Default::default()
        }
    }

    fn fail(&self, call: &'static str) {
        self.failing.lock().unwrap().insert(call);
    }

    fn gate(&self, id: i64) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(id, gate.clone());
        gate
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str, arg: Option<i64>) -> anyhow::Result<()> {
        let label = match arg {
            Some(id) => format!("{call}:{id}"),
            None => call.to_string(),
        };
        self.calls.lock().unwrap().push(label);
        if self.failing.lock().unwrap().contains(call) {
            anyhow::bail!("{call} rejected by backend");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AnalyticsApi for MockApi {
    async fn get_campaigns(&self) -> anyhow::Result<Vec<Campaign>> {
        self.enter("get_campaigns", None)?;
        Ok(self.campaigns.clone())
    }

    async fn get_analyses(&self) -> anyhow::Result<Vec<Analysis>> {
        self.enter("get_analyses", None)?;
        Ok(self.analyses.lock().unwrap().clone())
    }

    async fn get_analysis(&self, id: i64) -> anyhow::Result<AnalysisWithRecommendations> {
        self.enter("get_analysis", Some(id))?;
        let gate = self.gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("analysis {id} not found"))
    }

    async fn run_analysis(&self) -> anyhow::Result<ActionAck> {
        self.enter("run_analysis", None)?;
        self.analyses.lock().unwrap().push(analysis(3, "medium"));
        Ok(ActionAck {
            message: Some("Analysis started in background".to_string()),
            id: None,
        })
    }

    async fn generate_recommendation(&self, analysis_id: i64) -> anyhow::Result<ActionAck> {
        self.enter("generate_recommendation", Some(analysis_id))?;
        let mut details = self.details.lock().unwrap();
        let entry = details
            .get_mut(&analysis_id)
            .ok_or_else(|| anyhow::anyhow!("analysis {analysis_id} not found"))?;
        entry.recommendations.push(Recommendation {
            id: Some(100),
            analysis_id: Some(analysis_id),
            content: "Reallocate spend toward the best-converting region".to_string(),
            created_at: None,
        });
        Ok(ActionAck {
            message: Some("Recommendation generated successfully".to_string()),
            id: Some(100),
        })
    }

    async fn send_notification(&self, analysis_id: i64) -> anyhow::Result<ActionAck> {
        self.enter("send_notification", Some(analysis_id))?;
        let mut analyses = self.analyses.lock().unwrap();
        let analysis = analyses
            .iter_mut()
            .find(|a| a.id == analysis_id)
            .ok_or_else(|| anyhow::anyhow!("analysis {analysis_id} not found"))?;
        analysis.notified = true;
        Ok(ActionAck {
            message: Some("Notification queued for sending".to_string()),
            id: None,
        })
    }
}

fn campaign(id: i64) -> Campaign {
    Campaign {
        id,
        campaign_name: format!("Campaign {id}"),
        platform: "Google".to_string(),
        region: "US".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        impressions: 1000,
        clicks: 25,
        conversions: 2,
        spend: 50.0,
        ctr: 0.025,
        cpc: 2.0,
        cpa: 25.0,
        created_at: Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap(),
    }
}

fn analysis(id: i64, severity: &str) -> Analysis {
    Analysis {
        id,
        kind: "anomaly".to_string(),
        metric: "ctr".to_string(),
        description: format!("finding {id}"),
        severity: Severity::from(severity),
        value: Some(0.01),
        expected_value: Some(0.02),
        date_range_start: None,
        date_range_end: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 7, 0, 0, id as u32).unwrap(),
        notified: false,
    }
}

fn dashboard(api: MockApi) -> Dashboard<MockApi, ToastQueue> {
    Dashboard::new(api, ToastQueue::new())
}

#[tokio::test]
async fn load_fetches_both_lists() {
    let dash = dashboard(MockApi::seeded());
    assert_eq!(dash.load().await, Outcome::Applied);

    let state = dash.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.campaigns.len(), 2);
    assert_eq!(state.analyses.len(), 2);
    assert!(dash.notifier().drain().is_empty());
}

#[tokio::test]
async fn load_failure_clears_loading_and_keeps_lists_empty() {
    let api = MockApi::seeded();
    api.fail("get_campaigns");
    api.fail("get_analyses");
    let dash = dashboard(api);

    assert_eq!(dash.load().await, Outcome::Failed);

    let state = dash.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch data"));
    assert!(state.campaigns.is_empty());
    assert!(state.analyses.is_empty());
    assert_eq!(dash.notifier().drain(), vec!["Failed to fetch data."]);
}

#[tokio::test]
async fn load_is_all_or_nothing() {
    let api = MockApi::seeded();
    api.fail("get_analyses");
    let dash = dashboard(api);

    assert_eq!(dash.load().await, Outcome::Failed);
    assert!(dash.state().campaigns.is_empty());
}

#[tokio::test]
async fn run_analysis_refetches_list() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;

    assert_eq!(dash.run_analysis().await, Outcome::Applied);

    let state = dash.state();
    assert_eq!(state.analyses.len(), 3);
    assert!(!state.loading);
    assert_eq!(
        dash.api().calls(),
        vec!["get_campaigns", "get_analyses", "run_analysis", "get_analyses"]
    );
    assert_eq!(
        dash.notifier().drain(),
        vec![
            "Running data analysis...",
            "Analysis completed successfully. Email notifications sent for high-severity findings."
        ]
    );
}

#[tokio::test]
async fn run_analysis_failure_keeps_previous_list() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;
    dash.api().fail("run_analysis");

    assert_eq!(dash.run_analysis().await, Outcome::Failed);

    let state = dash.state();
    assert_eq!(state.analyses.len(), 2);
    assert_eq!(state.error.as_deref(), Some("Failed to run analysis"));
    assert!(!state.loading);
    assert_eq!(
        dash.notifier().drain(),
        vec!["Running data analysis...", "Failed to run analysis."]
    );
}

#[tokio::test]
async fn view_details_selects_and_opens() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;

    assert_eq!(dash.view_details(2).await, Outcome::Applied);

    let state = dash.state();
    assert!(state.modal_open);
    assert_eq!(state.selected.map(|s| s.id()), Some(2));
}

#[tokio::test]
async fn rejected_view_details_leaves_modal_and_selection() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;
    dash.view_details(1).await;
    dash.close_modal();

    assert_eq!(dash.view_details(99).await, Outcome::Failed);

    let state = dash.state();
    assert!(!state.modal_open);
    assert_eq!(state.selected.map(|s| s.id()), Some(1));
    assert_eq!(state.error.as_deref(), Some("Failed to fetch analysis details"));
    assert_eq!(dash.notifier().drain(), vec!["Failed to fetch analysis details."]);
}

#[tokio::test]
async fn generate_recommendation_refreshes_selection_in_place() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;
    dash.view_details(1).await;
    assert!(dash.state().selected.unwrap().recommendations.is_empty());

    assert_eq!(dash.generate_recommendation(1).await, Outcome::Applied);

    let state = dash.state();
    assert!(state.modal_open);
    let selected = state.selected.unwrap();
    assert_eq!(selected.id(), 1);
    assert_eq!(selected.recommendations.len(), 1);

    let calls = dash.api().calls();
    assert_eq!(
        calls[calls.len() - 2..].to_vec(),
        vec!["generate_recommendation:1", "get_analysis:1"]
    );
    assert_eq!(
        dash.notifier().drain(),
        vec![
            "Generating AI recommendation...",
            "AI recommendation generated successfully."
        ]
    );
}

#[tokio::test]
async fn generate_recommendation_failure_sets_error() {
    let dash = dashboard(MockApi::seeded());
    dash.view_details(1).await;
    dash.api().fail("generate_recommendation");

    assert_eq!(dash.generate_recommendation(1).await, Outcome::Failed);

    let state = dash.state();
    assert_eq!(state.error.as_deref(), Some("Failed to generate recommendation"));
    assert!(state.selected.unwrap().recommendations.is_empty());
    assert_eq!(
        dash.notifier().drain(),
        vec!["Generating AI recommendation...", "Failed to generate recommendation."]
    );
}

#[tokio::test]
async fn superseded_view_details_does_not_overwrite_newer_selection() {
    let api = MockApi::seeded();
    let gate = api.gate(1);
    let dash = dashboard(api);

    let (first, second) = tokio::join!(dash.view_details(1), async {
        let outcome = dash.view_details(2).await;
        gate.notify_one();
        outcome
    });

    assert_eq!(first, Outcome::Superseded);
    assert_eq!(second, Outcome::Applied);
    assert_eq!(dash.state().selected.map(|s| s.id()), Some(2));
}

#[tokio::test]
async fn loading_stays_set_while_any_action_is_pending() {
    let api = MockApi::seeded();
    let gate = api.gate(1);
    let dash = dashboard(api);

    let (_, _) = tokio::join!(dash.view_details(1), async {
        assert!(dash.state().loading);
        dash.load().await;
        assert!(dash.state().loading);
        gate.notify_one();
    });

    assert!(!dash.state().loading);
    assert_eq!(dash.state().campaigns.len(), 2);
}

#[tokio::test]
async fn closing_modal_drops_pending_details() {
    let api = MockApi::seeded();
    let gate = api.gate(1);
    let dash = dashboard(api);

    let (outcome, _) = tokio::join!(dash.view_details(1), async {
        dash.close_modal();
        gate.notify_one();
    });

    assert_eq!(outcome, Outcome::Superseded);
    let state = dash.state();
    assert!(!state.modal_open);
    assert!(state.selected.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn cancelled_action_releases_loading() {
    let api = MockApi::seeded();
    let _gate = api.gate(1);
    let dash = dashboard(api);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), dash.view_details(1)).await;
    assert!(timed_out.is_err());

    let state = dash.state();
    assert!(!state.loading);
    assert!(!state.modal_open);
    assert!(state.selected.is_none());

    assert_eq!(dash.load().await, Outcome::Applied);
    assert!(!dash.state().loading);
}

#[tokio::test]
async fn cancelled_action_keeps_other_pending_actions_loading() {
    let api = MockApi::seeded();
    let gate = api.gate(1);
    let _stuck = api.gate(2);
    let dash = dashboard(api);

    let (outcome, _) = tokio::join!(dash.view_details(1), async {
        let cancelled =
            tokio::time::timeout(Duration::from_millis(20), dash.view_details(2)).await;
        assert!(cancelled.is_err());
        assert!(dash.state().loading);
        gate.notify_one();
    });

    // The cancelled request took the selection slot last, so the earlier one is dropped.
    assert_eq!(outcome, Outcome::Superseded);
    assert!(!dash.state().loading);
}

#[tokio::test]
async fn send_notification_refreshes_notified_flag() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;
    dash.view_details(2).await;
    assert!(dash.state().analyses.iter().all(|a| !a.notified));

    assert_eq!(dash.send_notification(2).await, Outcome::Applied);

    let state = dash.state();
    let notified: Vec<i64> = state
        .analyses
        .iter()
        .filter(|a| a.notified)
        .map(|a| a.id)
        .collect();
    assert_eq!(notified, vec![2]);
    assert!(state.modal_open);
    assert!(state.selected.unwrap().analysis.notified);
    assert_eq!(
        dash.api().calls()[3..].to_vec(),
        vec!["send_notification:2", "get_analyses"]
    );
    assert_eq!(
        dash.notifier().drain(),
        vec!["Sending notification...", "Notification queued for sending."]
    );
}

#[tokio::test]
async fn send_notification_failure_sets_error() {
    let dash = dashboard(MockApi::seeded());
    dash.load().await;

    assert_eq!(dash.send_notification(99).await, Outcome::Failed);

    let state = dash.state();
    assert_eq!(state.error.as_deref(), Some("Failed to send notification"));
    assert!(!state.loading);
    assert_eq!(state.analyses.len(), 2);
    assert_eq!(
        dash.notifier().drain(),
        vec!["Sending notification...", "Failed to send notification."]
    );
}
