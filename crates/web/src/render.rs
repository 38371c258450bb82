//! Server-side HTML for the dashboard page, rendered with tera. Templates are compiled once
//! at startup; `.html` names get tera's autoescaping.

use anyhow::Context as _;
use pulse_core::view::analysis_detail::{self, AnalysisDetailView, RecommendationsView};
use pulse_core::view::analysis_list::{self, AnalysisCard, AnalysisListView};
use pulse_core::view::campaign_table::{self, CampaignRow};
use pulse_core::view::{self, DashboardView};
use serde::Serialize;
use tera::{Context, Tera};

const PAGE: &str = "dashboard.html";

const TEMPLATES: [(&str, &str); 4] = [
    (PAGE, include_str!("../templates/dashboard.html")),
    (
        "campaign_table.html",
        include_str!("../templates/campaign_table.html"),
    ),
    (
        "analysis_list.html",
        include_str!("../templates/analysis_list.html"),
    ),
    (
        "analysis_modal.html",
        include_str!("../templates/analysis_modal.html"),
    ),
];

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .context("failed to compile dashboard templates")?;
        Ok(Self { tera })
    }

    pub fn page(&self, view: &DashboardView, toasts: &[String]) -> anyhow::Result<String> {
        let context = Context::from_serialize(Page::new(view, toasts))
            .context("failed to build template context")?;
        self.tera
            .render(PAGE, &context)
            .context("failed to render dashboard page")
    }
}

#[derive(Serialize)]
struct Page<'a> {
    title: &'static str,
    run_label: &'static str,
    campaigns_heading: &'static str,
    analyses_heading: &'static str,
    list_heading: &'static str,
    notified_label: &'static str,
    loading: bool,
    error: Option<&'a str>,
    toasts: &'a [String],
    columns: [&'static str; 11],
    selects: [FilterSelect<'a>; 3],
    rows: &'a [CampaignRow],
    cards: &'a [AnalysisCard],
    empty_message: Option<&'static str>,
    detail: Option<Modal<'a>>,
}

/// One `<select>` of the campaign filter form.
#[derive(Serialize)]
struct FilterSelect<'a> {
    label: &'static str,
    name: &'static str,
    all_label: &'static str,
    options: &'a [String],
    selected: &'a str,
}

#[derive(Serialize)]
struct Modal<'a> {
    title: &'static str,
    recommendations_heading: &'static str,
    view: &'a AnalysisDetailView,
    recommendations: &'a [String],
    empty_message: Option<&'static str>,
}

impl<'a> Page<'a> {
    fn new(view: &'a DashboardView, toasts: &'a [String]) -> Self {
        let table = &view.campaigns;
        let (cards, empty_message) = match &view.analyses {
            AnalysisListView::Empty { message } => (&[][..], Some(*message)),
            AnalysisListView::Cards(cards) => (cards.as_slice(), None),
        };

        Self {
            title: view::TITLE,
            run_label: view::RUN_ANALYSIS,
            campaigns_heading: view::CAMPAIGNS_HEADING,
            analyses_heading: view::ANALYSES_HEADING,
            list_heading: analysis_list::HEADING,
            notified_label: analysis_list::NOTIFIED,
            loading: view.loading,
            error: view.error.as_deref(),
            toasts,
            columns: campaign_table::COLUMNS,
            selects: [
                FilterSelect {
                    label: "Campaign",
                    name: "campaign",
                    all_label: campaign_table::ALL_CAMPAIGNS,
                    options: &table.options.campaigns,
                    selected: &table.filters.campaign,
                },
                FilterSelect {
                    label: "Platform",
                    name: "platform",
                    all_label: campaign_table::ALL_PLATFORMS,
                    options: &table.options.platforms,
                    selected: &table.filters.platform,
                },
                FilterSelect {
                    label: "Region",
                    name: "region",
                    all_label: campaign_table::ALL_REGIONS,
                    options: &table.options.regions,
                    selected: &table.filters.region,
                },
            ],
            rows: &table.rows,
            cards,
            empty_message,
            detail: view.detail.as_ref().map(Modal::new),
        }
    }
}

impl<'a> Modal<'a> {
    fn new(view: &'a AnalysisDetailView) -> Self {
        let (recommendations, empty_message) = match &view.recommendations {
            RecommendationsView::List(items) => (items.as_slice(), None),
            RecommendationsView::Empty { message, .. } => (&[][..], Some(*message)),
        };
        Self {
            title: analysis_detail::TITLE,
            recommendations_heading: analysis_detail::RECOMMENDATIONS_HEADING,
            view,
            recommendations,
            empty_message,
        }
    }
}
