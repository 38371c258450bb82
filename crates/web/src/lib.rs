//! Browser front end for the dashboard: one HTML page plus form posts for each user action.

pub mod render;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use pulse_core::client::AnalyticsApi;
use pulse_core::dashboard::{Dashboard, ToastQueue};
use pulse_core::view::{CampaignFilters, DashboardView};
use render::Renderer;
use tower_http::trace::TraceLayer;

pub type SharedDashboard = Arc<Dashboard<Arc<dyn AnalyticsApi>, ToastQueue>>;

/// A single dashboard is shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(api: Arc<dyn AnalyticsApi>) -> anyhow::Result<Self> {
        Ok(Self {
            dashboard: Arc::new(Dashboard::new(api, ToastQueue::new())),
            renderer: Arc::new(Renderer::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/reload", post(reload))
        .route("/analyses/run", post(run_analysis))
        .route("/analyses/:id/details", post(view_details))
        .route("/analyses/:id/recommendations", post(generate_recommendation))
        .route("/analyses/:id/notify", post(send_notification))
        .route("/modal/close", post(close_modal))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index(
    State(state): State<AppState>,
    Query(filters): Query<CampaignFilters>,
) -> Result<Html<String>, StatusCode> {
    let view = DashboardView::build(&state.dashboard.state(), &filters);
    let toasts = state.dashboard.notifier().drain();
    state.renderer.page(&view, &toasts).map(Html).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %format!("{e:#}"), "dashboard render failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn reload(State(state): State<AppState>) -> Redirect {
    state.dashboard.load().await;
    Redirect::to("/")
}

async fn run_analysis(State(state): State<AppState>) -> Redirect {
    state.dashboard.run_analysis().await;
    Redirect::to("/")
}

async fn view_details(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    state.dashboard.view_details(id).await;
    Redirect::to("/")
}

async fn generate_recommendation(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    state.dashboard.generate_recommendation(id).await;
    Redirect::to("/")
}

async fn send_notification(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    state.dashboard.send_notification(id).await;
    Redirect::to("/")
}

async fn close_modal(State(state): State<AppState>) -> Redirect {
    state.dashboard.close_modal();
    Redirect::to("/")
}
