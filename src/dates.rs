use chrono::NaiveDate;

pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive day range for a detailed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl ReportRange {
    pub fn from_options(
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, String> {
        match (since, until) {
            (Some(since), Some(until)) => Self::checked(since, until),
            (Some(since), None) => Self::checked(since, today),
            (None, None) => Ok(Self {
                since: today,
                until: today,
            }),
            (None, Some(_)) => Err("End date requires a start date.".to_string()),
        }
    }

    fn checked(since: NaiveDate, until: NaiveDate) -> Result<Self, String> {
        if since > until {
            return Err("Start date cannot be after end date.".to_string());
        }
        Ok(Self { since, until })
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, REPORT_DATE_FORMAT)
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD.".to_string())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}
