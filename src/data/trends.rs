//! Google Trends web API integration.
//!
//! A series query is a two-step exchange:
//!
//! 1. `explore` resolves a keyword + time window into widget descriptors; the
//!    `TIMESERIES` widget carries a signed `token` and a `request` payload.
//! 2. `widgetdata/multiline` returns the interest-over-time points for that widget.
//!
//! Both responses start with an anti-XSSI guard (`)]}'`) that must be stripped
//! before the JSON can be parsed.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::ProviderSettings;
use crate::data::fetcher::TrendSource;
use crate::domain::{Observation, ObservationSeries, TimeWindow};
use crate::error::AppError;

const HOME_URL: &str = "https://trends.google.com/";
const EXPLORE_URL: &str = "https://trends.google.com/trends/api/explore";
const MULTILINE_URL: &str = "https://trends.google.com/trends/api/widgetdata/multiline";

const TIMESERIES_WIDGET: &str = "TIMESERIES";
/// Category 0 is "all categories".
const CATEGORY_ALL: u32 = 0;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) keyword-trends/0.1";

pub struct TrendsClient {
    client: Client,
    provider: ProviderSettings,
}

impl TrendsClient {
    /// Build a client and pick up the session cookies the API expects.
    pub fn connect(provider: ProviderSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::provider(format!("Failed to build HTTP client: {e}")))?;

        let resp = client
            .get(HOME_URL)
            .query(&[("geo", provider.geo.as_str())])
            .send()
            .map_err(|e| AppError::provider(format!("Trends session request failed: {e}")))?;
        log::debug!("Trends session status: {}", resp.status());

        Ok(Self { client, provider })
    }

    fn explore(&self, keyword: &str, window: &TimeWindow) -> Result<TimeseriesWidget, AppError> {
        let req = json!({
            "comparisonItem": [{
                "keyword": keyword,
                "time": window.as_str(),
                "geo": self.provider.geo,
            }],
            "category": CATEGORY_ALL,
            "property": "",
        });

        let body = self.get_text(
            EXPLORE_URL,
            &[
                ("hl", self.provider.hl.clone()),
                ("tz", self.provider.tz.to_string()),
                ("req", req.to_string()),
            ],
        )?;
        parse_explore(&body)
    }

    fn multiline(&self, keyword: &str, widget: &TimeseriesWidget) -> Result<ObservationSeries, AppError> {
        let body = self.get_text(
            MULTILINE_URL,
            &[
                ("hl", self.provider.hl.clone()),
                ("tz", self.provider.tz.to_string()),
                ("req", widget.request.to_string()),
                ("token", widget.token.clone()),
            ],
        )?;
        parse_multiline(keyword, &body)
    }

    fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| AppError::provider(format!("Trends request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::provider(format!(
                "Trends request failed with status {}.",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| AppError::provider(format!("Failed to read Trends response: {e}")))
    }
}

impl TrendSource for TrendsClient {
    fn interest_over_time(&self, keyword: &str, window: &TimeWindow) -> Result<ObservationSeries, AppError> {
        let widget = self.explore(keyword, window)?;
        self.multiline(keyword, &widget)
    }
}

/// Token + request payload of the `TIMESERIES` widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesWidget {
    pub token: String,
    pub request: Value,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Deserialize)]
struct ExploreWidget {
    #[serde(default)]
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: TimelineBlock,
}

#[derive(Debug, Deserialize)]
struct TimelineBlock {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<i64>,
    /// Completeness flag for the latest bucket; read but not kept.
    #[serde(rename = "isPartial", default)]
    is_partial: bool,
}

/// Drop the anti-XSSI guard that precedes the JSON document.
fn strip_guard(body: &str) -> &str {
    match body.find('{') {
        Some(start) => &body[start..],
        None => body,
    }
}

pub fn parse_explore(body: &str) -> Result<TimeseriesWidget, AppError> {
    let parsed: ExploreResponse = serde_json::from_str(strip_guard(body))
        .map_err(|e| AppError::provider(format!("Failed to parse Trends explore response: {e}")))?;

    let widget = parsed
        .widgets
        .into_iter()
        .find(|w| w.id == TIMESERIES_WIDGET)
        .ok_or_else(|| AppError::provider("Trends explore response has no TIMESERIES widget."))?;

    match (widget.token, widget.request) {
        (Some(token), Some(request)) => Ok(TimeseriesWidget { token, request }),
        _ => Err(AppError::provider(
            "Trends TIMESERIES widget is missing its token or request.",
        )),
    }
}

pub fn parse_multiline(keyword: &str, body: &str) -> Result<ObservationSeries, AppError> {
    let parsed: MultilineResponse = serde_json::from_str(strip_guard(body))
        .map_err(|e| AppError::provider(format!("Failed to parse Trends series response: {e}")))?;

    let mut points = Vec::with_capacity(parsed.default.timeline_data.len());
    for p in parsed.default.timeline_data {
        let Some(&value) = p.value.first() else {
            continue;
        };
        if p.is_partial {
            log::debug!("'{keyword}': latest point ({}) is partial", p.time);
        }
        points.push(Observation {
            date: parse_unix_date(&p.time)?,
            value,
        });
    }

    Ok(ObservationSeries {
        keyword: keyword.to_string(),
        points,
    })
}

fn parse_unix_date(raw: &str) -> Result<NaiveDate, AppError> {
    let secs = raw
        .trim()
        .parse::<i64>()
        .map_err(|e| AppError::provider(format!("Invalid Trends timestamp '{raw}': {e}")))?;
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| AppError::provider(format!("Trends timestamp out of range: {raw}")))
}
