//! Dashboard orchestration: owns the state, runs user actions against the backend and decides
//! what each outcome does to the state.
//!
//! Every action follows the same shape. It takes a [`Ticket`] for the slots it will write,
//! bumps the in-flight count, awaits the backend without holding the state lock, then applies
//! its result only to slots no later action has claimed since. Failures become a flat error
//! string plus a toast and an error log line.
//!
//! The in-flight count is held by a guard, so an action whose future is dropped mid-await
//! still clears `loading`.

pub mod notifier;
pub mod state;

pub use notifier::{Notifier, ToastQueue};
pub use state::{DashboardState, Slot, Ticket};

use crate::client::{ActionAck, AnalyticsApi};
use crate::domain::{Analysis, AnalysisWithRecommendations};
use anyhow::Context;
use state::Generations;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    RunAnalysis,
    ViewDetails,
    GenerateRecommendation,
    SendNotification,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::RunAnalysis => "run_analysis",
            Action::ViewDetails => "view_details",
            Action::GenerateRecommendation => "generate_recommendation",
            Action::SendNotification => "send_notification",
        }
    }

    fn slots(self) -> &'static [Slot] {
        match self {
            Action::Load => &[Slot::Campaigns, Slot::Analyses],
            Action::RunAnalysis | Action::SendNotification => &[Slot::Analyses],
            Action::ViewDetails | Action::GenerateRecommendation => &[Slot::Selection],
        }
    }

    pub fn start_message(self) -> Option<&'static str> {
        match self {
            Action::RunAnalysis => Some("Running data analysis..."),
            Action::GenerateRecommendation => Some("Generating AI recommendation..."),
            Action::SendNotification => Some("Sending notification..."),
            Action::Load | Action::ViewDetails => None,
        }
    }

    pub fn success_message(self) -> Option<&'static str> {
        match self {
            Action::RunAnalysis => Some(
                "Analysis completed successfully. Email notifications sent for high-severity findings.",
            ),
            Action::GenerateRecommendation => Some("AI recommendation generated successfully."),
            Action::SendNotification => Some("Notification queued for sending."),
            Action::Load | Action::ViewDetails => None,
        }
    }

    /// Stored in [`DashboardState::error`].
    pub fn error_message(self) -> &'static str {
        match self {
            Action::Load => "Failed to fetch data",
            Action::RunAnalysis => "Failed to run analysis",
            Action::ViewDetails => "Failed to fetch analysis details",
            Action::GenerateRecommendation => "Failed to generate recommendation",
            Action::SendNotification => "Failed to send notification",
        }
    }

    /// Toast shown on failure.
    pub fn failure_message(self) -> &'static str {
        match self {
            Action::Load => "Failed to fetch data.",
            Action::RunAnalysis => "Failed to run analysis.",
            Action::ViewDetails => "Failed to fetch analysis details.",
            Action::GenerateRecommendation => "Failed to generate recommendation.",
            Action::SendNotification => "Failed to send notification.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Failed,
    /// A later action claimed every slot this one would have written; its result was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct Inner {
    state: DashboardState,
    in_flight: usize,
    generations: Generations,
}

pub struct Dashboard<A, N> {
    api: A,
    notifier: N,
    inner: Mutex<Inner>,
}

impl<A: AnalyticsApi, N: Notifier> Dashboard<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn state(&self) -> DashboardState {
        self.lock().state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    /// Initial fetch: campaigns and analyses concurrently. Both must succeed for either to land.
    pub async fn load(&self) -> Outcome {
        let (pending, ticket) = self.begin(Action::Load);
        let outcome = tokio::try_join!(self.api.get_campaigns(), self.api.get_analyses());
        self.finish(
            Action::Load,
            pending,
            &ticket,
            outcome,
            |state, (campaigns, analyses), fresh| {
                if fresh.contains(&Slot::Campaigns) {
                    state.campaigns = campaigns;
                }
                if fresh.contains(&Slot::Analyses) {
                    state.analyses = analyses;
                }
            },
        )
    }

    pub async fn run_analysis(&self) -> Outcome {
        let (pending, ticket) = self.begin(Action::RunAnalysis);
        let outcome = self.run_and_refetch().await;
        self.finish(Action::RunAnalysis, pending, &ticket, outcome, |state, analyses, _| {
            state.analyses = analyses;
        })
    }

    /// Fetches one analysis, selects it and opens the modal. A failure leaves both untouched.
    pub async fn view_details(&self, analysis_id: i64) -> Outcome {
        let (pending, ticket) = self.begin(Action::ViewDetails);
        let outcome = self
            .api
            .get_analysis(analysis_id)
            .await
            .with_context(|| format!("fetch analysis {analysis_id}"));
        self.finish(Action::ViewDetails, pending, &ticket, outcome, |state, analysis, _| {
            state.selected = Some(analysis);
            state.modal_open = true;
        })
    }

    /// Generates, then re-fetches the same analysis so the selection carries the new list.
    /// The modal flag is left as it is.
    pub async fn generate_recommendation(&self, analysis_id: i64) -> Outcome {
        let (pending, ticket) = self.begin(Action::GenerateRecommendation);
        let outcome = self.generate_and_refetch(analysis_id).await;
        self.finish(
            Action::GenerateRecommendation,
            pending,
            &ticket,
            outcome,
            |state, analysis, _| {
                state.selected = Some(analysis);
            },
        )
    }

    /// Asks the backend to email a notification for one analysis, then refreshes the list so
    /// its `notified` flag is current. An open selection of the same analysis picks up the
    /// flag too.
    pub async fn send_notification(&self, analysis_id: i64) -> Outcome {
        let (pending, ticket) = self.begin(Action::SendNotification);
        let outcome = self.notify_and_refetch(analysis_id).await;
        self.finish(
            Action::SendNotification,
            pending,
            &ticket,
            outcome,
            |state, analyses, _| {
                if let Some(selected) = state.selected.as_mut() {
                    if let Some(fresh) = analyses.iter().find(|a| a.id == selected.id()) {
                        selected.analysis.notified = fresh.notified;
                    }
                }
                state.analyses = analyses;
            },
        )
    }

    /// Closes the modal. The selection stays until the next `view_details`, but results still
    /// in flight for it are dropped so a late response cannot reopen the modal.
    pub fn close_modal(&self) {
        let mut inner = self.lock();
        inner.state.modal_open = false;
        inner.generations.bump(Slot::Selection);
    }

    async fn run_and_refetch(&self) -> anyhow::Result<Vec<Analysis>> {
        let ack = self.api.run_analysis().await.context("trigger analysis run")?;
        log_ack(Action::RunAnalysis, &ack);
        self.api.get_analyses().await.context("refetch analyses")
    }

    async fn notify_and_refetch(&self, analysis_id: i64) -> anyhow::Result<Vec<Analysis>> {
        let ack = self
            .api
            .send_notification(analysis_id)
            .await
            .with_context(|| format!("send notification for analysis {analysis_id}"))?;
        log_ack(Action::SendNotification, &ack);
        self.api.get_analyses().await.context("refetch analyses")
    }

    async fn generate_and_refetch(
        &self,
        analysis_id: i64,
    ) -> anyhow::Result<AnalysisWithRecommendations> {
        let ack = self
            .api
            .generate_recommendation(analysis_id)
            .await
            .with_context(|| format!("generate recommendation for analysis {analysis_id}"))?;
        log_ack(Action::GenerateRecommendation, &ack);
        self.api
            .get_analysis(analysis_id)
            .await
            .with_context(|| format!("refetch analysis {analysis_id}"))
    }

    fn begin(&self, action: Action) -> (InFlight<'_>, Ticket) {
        let ticket = {
            let mut inner = self.lock();
            inner.in_flight += 1;
            inner.state.loading = true;
            Ticket::issue(&mut inner.generations, action.slots())
        };
        tracing::debug!(action = action.name(), "dashboard action started");
        if let Some(message) = action.start_message() {
            self.notifier.notify(message);
        }
        (InFlight { inner: &self.inner }, ticket)
    }

    fn finish<T>(
        &self,
        action: Action,
        pending: InFlight<'_>,
        ticket: &Ticket,
        outcome: anyhow::Result<T>,
        apply: impl FnOnce(&mut DashboardState, T, &[Slot]),
    ) -> Outcome {
        let mut inner = self.lock();
        pending.release(&mut inner);

        let fresh = ticket.fresh_slots(&inner.generations);
        if fresh.is_empty() {
            drop(inner);
            match &outcome {
                Ok(_) => tracing::debug!(action = action.name(), "dropping superseded result"),
                Err(err) => tracing::debug!(
                    action = action.name(),
                    error = %format!("{err:#}"),
                    "dropping superseded failure"
                ),
            }
            return Outcome::Superseded;
        }

        match outcome {
            Ok(value) => {
                apply(&mut inner.state, value, &fresh);
                drop(inner);
                tracing::debug!(action = action.name(), "dashboard action applied");
                if let Some(message) = action.success_message() {
                    self.notifier.notify(message);
                }
                Outcome::Applied
            }
            Err(err) => {
                inner.state.error = Some(action.error_message().to_string());
                drop(inner);
                tracing::error!(
                    action = action.name(),
                    error = %format!("{err:#}"),
                    "dashboard action failed"
                );
                self.notifier.notify(action.failure_message());
                Outcome::Failed
            }
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One pending action in the in-flight count. Released by `finish`, or on drop when the
/// action's future is cancelled first.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
}

impl InFlight<'_> {
    fn release(self, inner: &mut Inner) {
        inner.end_action();
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.inner).end_action();
        tracing::debug!("dashboard action cancelled");
    }
}

impl Inner {
    fn end_action(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.loading = self.in_flight > 0;
    }
}

fn log_ack(action: Action, ack: &ActionAck) {
    tracing::info!(
        action = action.name(),
        message = ack.message.as_deref().unwrap_or(""),
        id = ?ack.id,
        "backend accepted request"
    );
}
