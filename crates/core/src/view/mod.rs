//! Derived, render-ready views of dashboard state.
//!
//! Everything here is pure: state in, formatted strings out. The web and terminal front ends
//! only lay these out.

pub mod analysis_detail;
pub mod analysis_list;
pub mod campaign_table;
pub mod format;

pub use analysis_detail::{AnalysisDetailView, RecommendationsView};
pub use analysis_list::{AnalysisCard, AnalysisListView};
pub use campaign_table::{CampaignFilters, CampaignRow, CampaignTableView, FilterOptions};

use crate::dashboard::DashboardState;

pub const TITLE: &str = "Marketing Analytics Dashboard";
pub const RUN_ANALYSIS: &str = "Run Analysis";
pub const CAMPAIGNS_HEADING: &str = "Campaign Data";
pub const ANALYSES_HEADING: &str = "Recent Analyses";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub loading: bool,
    pub error: Option<String>,
    pub campaigns: CampaignTableView,
    pub analyses: AnalysisListView,
    pub detail: Option<AnalysisDetailView>,
}

impl DashboardView {
    pub fn build(state: &DashboardState, filters: &CampaignFilters) -> Self {
        Self {
            loading: state.loading,
            error: state.error.clone(),
            campaigns: CampaignTableView::build(&state.campaigns, filters),
            analyses: AnalysisListView::build(&state.analyses),
            detail: AnalysisDetailView::build(state.selected.as_ref(), state.modal_open),
        }
    }
}
