use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Workspace {
    pub id: u64,
    pub name: String,
    pub profile: i64,
    pub premium: bool,
    pub admin: bool,
    pub default_hourly_rate: f64,
    pub default_currency: String,
    pub only_admins_may_create_projects: bool,
    pub only_admins_see_billable_rates: bool,
    pub only_admins_see_team_dashboard: bool,
    pub projects_billable_by_default: bool,
    pub rounding: i64,
    pub rounding_minutes: i64,
    pub api_token: String,
    pub at: Option<DateTime<FixedOffset>>,
    pub ical_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Dashboard {
    pub most_active_user: Vec<ActiveUser>,
    pub activity: Vec<Activity>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActiveUser {
    pub user_id: u64,
    pub duration: i64,
}

/// A recent time entry on the dashboard. `duration` is negative while the
/// entry is still running.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Activity {
    pub user_id: u64,
    pub project_id: Option<u64>,
    pub duration: i64,
    pub description: String,
    pub stop: Option<DateTime<FixedOffset>>,
    pub tid: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetailedReport {
    pub total_grand: Option<i64>,
    pub total_billable: Option<i64>,
    pub total_count: u64,
    pub per_page: u64,
    pub total_currencies: Vec<CurrencyTotal>,
    pub data: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrencyTotal {
    pub currency: Option<String>,
    pub amount: Option<f64>,
}

/// One time entry in a detailed report. Durations are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportEntry {
    pub id: u64,
    pub pid: Option<u64>,
    pub tid: Option<u64>,
    pub uid: u64,
    pub description: String,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
    pub dur: i64,
    pub user: String,
    pub use_stop: bool,
    pub client: Option<String>,
    pub project: Option<String>,
    pub task: Option<String>,
    pub billable: Option<f64>,
    pub is_billable: bool,
    pub cur: Option<String>,
    pub tags: Vec<String>,
}

/// Query for `TogglClient::fetch_detailed_report`. An empty `user_agent` is
/// replaced with `DEFAULT_USER_AGENT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedReportRequest {
    pub workspace_id: u64,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub user_agent: String,
}
