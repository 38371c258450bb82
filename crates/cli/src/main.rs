use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pulse_core::client::{AnalysisQuery, CampaignQuery, HttpAnalyticsClient, RecommendationQuery};
use pulse_core::config::Settings;
use pulse_core::dashboard::{Dashboard, Notifier};
use pulse_core::view::{
    AnalysisDetailView, AnalysisListView, CampaignFilters, CampaignTableView, DashboardView,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Debug, Parser)]
#[command(name = "pulse", about = "Marketing Analytics Dashboard in the terminal")]
struct Args {
    /// Backend base URL. Overrides PULSE_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the campaign table.
    Campaigns(CampaignArgs),
    /// Print one campaign by id.
    Campaign { id: i64 },
    /// Print analyses, most severe first.
    Analyses(AnalysisArgs),
    /// Print one analysis with its recommendations.
    Show { id: i64 },
    /// Trigger an analysis run and print the refreshed list.
    Run,
    /// Generate a recommendation for an analysis and print the result.
    Recommend { id: i64 },
    /// Send the notification email for an analysis and print the refreshed list.
    Notify { id: i64 },
    /// List stored recommendations.
    Recommendations(RecommendationArgs),
    /// Print one recommendation by id.
    Recommendation { id: i64 },
}

/// Name, platform and region filter the loaded table. Dates and paging query the backend.
#[derive(Debug, Default, clap::Args)]
struct CampaignArgs {
    #[arg(long)]
    campaign: Option<String>,
    #[arg(long)]
    platform: Option<String>,
    #[arg(long)]
    region: Option<String>,
    /// First day to include (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD).
    #[arg(long)]
    end_date: Option<NaiveDate>,
    #[arg(long)]
    skip: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl CampaignArgs {
    fn filters(&self) -> CampaignFilters {
        CampaignFilters {
            campaign: self.campaign.clone().unwrap_or_default(),
            platform: self.platform.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
        }
    }

    /// `None` when every flag can be answered from the loaded table.
    fn query(&self) -> Option<CampaignQuery> {
        let server_side = self.start_date.is_some()
            || self.end_date.is_some()
            || self.skip.is_some()
            || self.limit.is_some();
        server_side.then(|| CampaignQuery {
            skip: self.skip,
            limit: self.limit,
            campaign_name: self.campaign.clone(),
            platform: self.platform.clone(),
            region: self.region.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Any flag sends the query to the backend instead of listing the loaded analyses.
#[derive(Debug, Default, clap::Args)]
struct AnalysisArgs {
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    metric: Option<String>,
    #[arg(long)]
    severity: Option<String>,
    #[arg(long)]
    skip: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl AnalysisArgs {
    fn query(&self) -> Option<AnalysisQuery> {
        let query = AnalysisQuery {
            skip: self.skip,
            limit: self.limit,
            kind: self.kind.clone(),
            metric: self.metric.clone(),
            severity: self.severity.clone(),
        };
        (query != AnalysisQuery::default()).then_some(query)
    }
}

#[derive(Debug, Default, clap::Args)]
struct RecommendationArgs {
    #[arg(long)]
    analysis_id: Option<i64>,
    #[arg(long)]
    skip: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl RecommendationArgs {
    fn query(&self) -> RecommendationQuery {
        RecommendationQuery {
            skip: self.skip,
            limit: self.limit,
            analysis_id: self.analysis_id,
        }
    }
}

type TerminalDashboard = Dashboard<HttpAnalyticsClient, ConsoleNotifier>;

/// Toasts go to stderr so stdout stays the rendered view.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("» {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = Settings::from_env()?;
    if let Some(url) = args.api_url.clone() {
        settings = settings.with_api_base_url(url);
    }
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let client = HttpAnalyticsClient::from_settings(&settings)?;
    tracing::debug!(api = client.base_url(), "using analytics backend");
    let dashboard = Dashboard::new(client, ConsoleNotifier);

    let result = run(&dashboard, args.command).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run(dashboard: &TerminalDashboard, command: Command) -> anyhow::Result<()> {
    let api = dashboard.api();

    match command {
        Command::Campaigns(args) => {
            let table = match args.query() {
                Some(query) => {
                    let campaigns = api
                        .list_campaigns(&query)
                        .await
                        .context("failed to query campaigns")?;
                    CampaignTableView::build(&campaigns, &CampaignFilters::default())
                }
                None => {
                    dashboard.load().await;
                    CampaignTableView::build(&dashboard.state().campaigns, &args.filters())
                }
            };
            println!("{}", render::campaign_table(&table));
        }
        Command::Campaign { id } => {
            let campaign = api
                .get_campaign(id)
                .await
                .with_context(|| format!("failed to fetch campaign {id}"))?;
            let table = CampaignTableView::build(&[campaign], &CampaignFilters::default());
            println!("{}", render::campaign_table(&table));
        }
        Command::Analyses(args) => match args.query() {
            Some(query) => {
                let analyses = api
                    .list_analyses(&query)
                    .await
                    .context("failed to query analyses")?;
                println!("{}", render::analysis_list(&AnalysisListView::build(&analyses)));
            }
            None => {
                dashboard.load().await;
                print_analyses(dashboard);
            }
        },
        Command::Run => {
            dashboard.load().await;
            dashboard.run_analysis().await;
            print_analyses(dashboard);
        }
        Command::Show { id } => {
            dashboard.load().await;
            dashboard.view_details(id).await;
            print_selection(dashboard);
        }
        Command::Recommend { id } => {
            dashboard.load().await;
            dashboard.generate_recommendation(id).await;
            print_selection(dashboard);
        }
        Command::Notify { id } => {
            dashboard.load().await;
            dashboard.send_notification(id).await;
            print_analyses(dashboard);
        }
        Command::Recommendations(args) => {
            let items = api
                .list_recommendations(&args.query())
                .await
                .context("failed to list recommendations")?;
            println!("{}", render::recommendations(&items));
        }
        Command::Recommendation { id } => {
            let item = api
                .get_recommendation(id)
                .await
                .with_context(|| format!("failed to fetch recommendation {id}"))?;
            println!("{}", render::recommendations(&[item]));
        }
    }

    match dashboard.state().error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}

fn print_analyses(dashboard: &TerminalDashboard) {
    let view = DashboardView::build(&dashboard.state(), &CampaignFilters::default());
    println!("{}", render::analysis_list(&view.analyses));
}

/// Each invocation is its own session, so the selection is shown whether or not a modal
/// would be open.
fn print_selection(dashboard: &TerminalDashboard) {
    let state = dashboard.state();
    if let Some(detail) = AnalysisDetailView::build(state.selected.as_ref(), true) {
        println!("{}", render::analysis_detail(&detail));
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
