use crate::domain::Campaign;
use crate::view::format;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const COLUMNS: [&str; 11] = [
    "Date",
    "Campaign",
    "Platform",
    "Region",
    "Impressions",
    "Clicks",
    "Conversions",
    "Spend",
    "CTR",
    "CPC",
    "CPA",
];

pub const ALL_CAMPAIGNS: &str = "All Campaigns";
pub const ALL_PLATFORMS: &str = "All Platforms";
pub const ALL_REGIONS: &str = "All Regions";

/// Exact-match filters, AND-combined. An empty value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CampaignFilters {
    pub campaign: String,
    pub platform: String,
    pub region: String,
}

impl CampaignFilters {
    pub fn matches(&self, campaign: &Campaign) -> bool {
        matches_field(&self.campaign, &campaign.campaign_name)
            && matches_field(&self.platform, &campaign.platform)
            && matches_field(&self.region, &campaign.region)
    }
}

fn matches_field(filter: &str, value: &str) -> bool {
    filter.is_empty() || filter == value
}

/// Distinct values for each filter dimension, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub campaigns: Vec<String>,
    pub platforms: Vec<String>,
    pub regions: Vec<String>,
}

impl FilterOptions {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        Self {
            campaigns: distinct(campaigns.iter().map(|c| c.campaign_name.as_str())),
            platforms: distinct(campaigns.iter().map(|c| c.platform.as_str())),
            regions: distinct(campaigns.iter().map(|c| c.region.as_str())),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

pub fn filter_campaigns<'a>(campaigns: &'a [Campaign], filters: &CampaignFilters) -> Vec<&'a Campaign> {
    campaigns.iter().filter(|c| filters.matches(c)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRow {
    pub id: i64,
    pub date: String,
    pub campaign: String,
    pub platform: String,
    pub region: String,
    pub impressions: String,
    pub clicks: String,
    pub conversions: String,
    pub spend: String,
    pub ctr: String,
    pub cpc: String,
    pub cpa: String,
}

impl CampaignRow {
    pub fn from_campaign(c: &Campaign) -> Self {
        Self {
            id: c.id,
            date: format::date(c.date),
            campaign: c.campaign_name.clone(),
            platform: c.platform.clone(),
            region: c.region.clone(),
            impressions: format::count(c.impressions),
            clicks: format::count(c.clicks),
            conversions: format::count(c.conversions),
            spend: format::currency(c.spend),
            ctr: format::percent(c.ctr),
            cpc: format::currency(c.cpc),
            cpa: format::currency(c.cpa),
        }
    }

    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 11] {
        [
            &self.date,
            &self.campaign,
            &self.platform,
            &self.region,
            &self.impressions,
            &self.clicks,
            &self.conversions,
            &self.spend,
            &self.ctr,
            &self.cpc,
            &self.cpa,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignTableView {
    pub filters: CampaignFilters,
    pub options: FilterOptions,
    pub rows: Vec<CampaignRow>,
}

impl CampaignTableView {
    pub fn build(campaigns: &[Campaign], filters: &CampaignFilters) -> Self {
        Self {
            filters: filters.clone(),
            options: FilterOptions::from_campaigns(campaigns),
            rows: filter_campaigns(campaigns, filters)
                .into_iter()
                .map(CampaignRow::from_campaign)
                .collect(),
        }
    }
}
