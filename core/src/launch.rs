//! Launch-data model and query builder.
//!
//! Everything here is pure: upstream JSON goes in, flat records come out.
//! The HTTP side lives in [`crate::providers::launch_library`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mission name used when the upstream record has no missions.
pub const SECRET_MISSION: &str = "secret";

/// Pad name used when the upstream location lists no pads.
pub const UNKNOWN_PAD: &str = "an undisclosed launch site";

/// Opaque identifier handed out by the launch-data API.
///
/// Upstream uses numbers, but conversational platforms are free to echo
/// context parameters back as strings, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum UpstreamId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for UpstreamId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(UpstreamId::Number)
                .ok_or_else(|| D::Error::custom(format!("invalid id: {n}"))),
            Value::String(s) => Ok(UpstreamId::Text(s)),
            Value::Null => Ok(UpstreamId::unknown()),
            other => Err(D::Error::custom(format!("invalid id: {other}"))),
        }
    }
}

impl UpstreamId {
    /// The `0` sentinel used for records the upstream did not provide.
    pub fn unknown() -> Self {
        UpstreamId::Number(0)
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            UpstreamId::Number(n) => *n == 0,
            UpstreamId::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "0"
            }
        }
    }
}

impl Default for UpstreamId {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for UpstreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamId::Number(n) => write!(f, "{n}"),
            UpstreamId::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<i64> for UpstreamId {
    fn from(n: i64) -> Self {
        UpstreamId::Number(n)
    }
}

impl From<&str> for UpstreamId {
    fn from(s: &str) -> Self {
        UpstreamId::Text(s.to_string())
    }
}

/// Flat view of one upstream launch record.
///
/// Built once from a query result and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchFact {
    pub launch_id: UpstreamId,
    pub agency_id: UpstreamId,
    pub rocket_id: UpstreamId,
    pub mission_id: UpstreamId,
    pub pad_id: UpstreamId,
    pub rocket_name: String,
    /// `None` when the upstream record carries no missions.
    pub mission_name: Option<String>,
    pub window_start: String,
    pub window_start_ms: i64,
    pub window_secs: i64,
    pub pad_name: String,
    pub livestream_url: Option<String>,
}

impl LaunchFact {
    /// Mission name for display, falling back to the secret sentinel.
    pub fn mission_label(&self) -> &str {
        self.mission_name.as_deref().unwrap_or(SECRET_MISSION)
    }

    fn from_raw(raw: RawLaunch) -> Self {
        let mission = raw.missions.unwrap_or_default().into_iter().next();
        let agency_id = raw
            .rocket
            .agencies
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|a| a.id)
            .unwrap_or_default();
        let pad = raw
            .location
            .and_then(|l| l.pads)
            .unwrap_or_default()
            .into_iter()
            .next();
        let livestream_url = raw
            .vid_urls
            .unwrap_or_default()
            .into_iter()
            .find(|u| !u.trim().is_empty())
            .or(raw.vid_url.filter(|u| !u.trim().is_empty()));

        Self {
            launch_id: raw.id,
            agency_id,
            rocket_id: raw.rocket.id,
            mission_id: mission.as_ref().map(|m| m.id.clone()).unwrap_or_default(),
            pad_id: pad.as_ref().map(|p| p.id.clone()).unwrap_or_default(),
            rocket_name: raw.rocket.name,
            mission_name: mission.map(|m| m.name).filter(|n| !n.trim().is_empty()),
            window_start: raw.windowstart,
            window_start_ms: raw.wsstamp.saturating_mul(1000),
            window_secs: (raw.westamp - raw.wsstamp).max(0),
            pad_name: pad
                .map(|p| p.name)
                .unwrap_or_else(|| UNKNOWN_PAD.to_string()),
            livestream_url,
        }
    }
}

/// Parse a `launch?...` list response into launch facts, preserving order.
pub fn parse_launches(body: Value) -> serde_json::Result<Vec<LaunchFact>> {
    let list: LaunchListResponse = serde_json::from_value(body)?;
    Ok(list.launches.into_iter().map(LaunchFact::from_raw).collect())
}

#[derive(Debug, Deserialize)]
struct LaunchListResponse {
    #[serde(default)]
    launches: Vec<RawLaunch>,
}

#[derive(Debug, Deserialize)]
struct RawLaunch {
    id: UpstreamId,
    #[serde(default)]
    windowstart: String,
    #[serde(default)]
    wsstamp: i64,
    #[serde(default)]
    westamp: i64,
    rocket: RawRocketRef,
    #[serde(default)]
    missions: Option<Vec<RawNamed>>,
    #[serde(default)]
    location: Option<RawLocation>,
    #[serde(default, rename = "vidURLs")]
    vid_urls: Option<Vec<String>>,
    #[serde(default, rename = "vidURL")]
    vid_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRocketRef {
    #[serde(default)]
    id: UpstreamId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    agencies: Option<Vec<RawNamed>>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    #[serde(default)]
    pads: Option<Vec<RawNamed>>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    #[serde(default)]
    id: UpstreamId,
    #[serde(default)]
    name: String,
}

// ---------------------------------------------------------------------------
// Query builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Which side of "now" the query is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    /// `startdate=<date-hour>`
    Start(String),
    /// `enddate=<date-hour>`
    End(String),
}

/// A `launch?...` list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchQuery {
    pub limit: u32,
    pub sort: SortOrder,
    pub bound: DateBound,
    pub skip: u64,
}

impl LaunchQuery {
    /// Query for the single launch at `offset` relative to `now`.
    ///
    /// Non-negative offsets look forward from now, skipping `offset`
    /// launches. Negative offsets look backwards; `-1` is the most recent
    /// past launch, so `|offset| - 1` launches are skipped.
    pub fn for_offset(offset: i64, now: DateTime<Utc>) -> Self {
        let stamp = date_hour(now);
        if offset >= 0 {
            Self {
                limit: 1,
                sort: SortOrder::Ascending,
                bound: DateBound::Start(stamp),
                skip: offset.unsigned_abs(),
            }
        } else {
            Self {
                limit: 1,
                sort: SortOrder::Descending,
                bound: DateBound::End(stamp),
                skip: offset.unsigned_abs() - 1,
            }
        }
    }

    /// Query for the next `count` launches from now.
    pub fn upcoming(count: u32, now: DateTime<Utc>) -> Self {
        Self {
            limit: count,
            sort: SortOrder::Ascending,
            bound: DateBound::Start(date_hour(now)),
            skip: 0,
        }
    }

    /// Query-string pairs in the order the upstream documents them.
    pub fn params(&self, agency: &str) -> Vec<(&'static str, String)> {
        let (date_key, date) = match &self.bound {
            DateBound::Start(d) => ("startdate", d.clone()),
            DateBound::End(d) => ("enddate", d.clone()),
        };
        vec![
            ("limit", self.limit.to_string()),
            ("agency", agency.to_string()),
            ("mode", "verbose".to_string()),
            ("sort", self.sort.as_str().to_string()),
            (date_key, date),
            ("offset", self.skip.to_string()),
        ]
    }
}

/// `YYYY-MM-DD-HH` in UTC, the granularity the upstream date filters accept.
pub fn date_hour(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d-%H").to_string()
}

// ---------------------------------------------------------------------------
// Info records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKind {
    Mission,
    Rocket,
    Pad,
    Agency,
}

impl InfoKind {
    /// Path segment of the by-id endpoint.
    pub fn path(self) -> &'static str {
        match self {
            InfoKind::Mission => "mission",
            InfoKind::Rocket => "rocket",
            InfoKind::Pad => "pad",
            InfoKind::Agency => "agency",
        }
    }

    /// Key of the collection wrapping by-id results.
    pub fn collection(self) -> &'static str {
        match self {
            InfoKind::Mission => "missions",
            InfoKind::Rocket => "rockets",
            InfoKind::Pad => "pads",
            InfoKind::Agency => "agencies",
        }
    }
}

impl fmt::Display for InfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Mission, rocket, pad or agency details.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfoRecord {
    pub name: String,
    pub description: Option<String>,
    pub type_name: Option<String>,
    pub family: Option<String>,
    pub agency: Option<String>,
    pub abbrev: Option<String>,
    pub country_code: Option<String>,
    pub wiki_url: Option<String>,
    pub info_urls: Vec<String>,
}

impl InfoRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Parse a by-id response (`{"rockets": [...]}` etc.), taking the first entry.
///
/// Returns `Ok(None)` when the collection is missing or empty.
pub fn parse_info(kind: InfoKind, body: Value) -> serde_json::Result<Option<InfoRecord>> {
    let first = match body.get(kind.collection()).and_then(Value::as_array) {
        Some(items) => match items.first() {
            Some(item) => item.clone(),
            None => return Ok(None),
        },
        None => return Ok(None),
    };
    let raw: RawInfo = serde_json::from_value(first)?;

    let mut info_urls: Vec<String> = raw.info_urls.unwrap_or_default();
    if let Some(u) = raw.info_url {
        if !info_urls.contains(&u) {
            info_urls.push(u);
        }
    }
    info_urls.retain(|u| !u.trim().is_empty());

    let family = non_empty(raw.familyname).or_else(|| {
        raw.family
            .as_ref()
            .and_then(|f| f.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .and_then(|s| non_empty(Some(s)))
    });
    let agency = raw
        .agencies
        .as_ref()
        .and_then(first_agency_name)
        .or_else(|| {
            raw.family
                .as_ref()
                .and_then(|f| f.get("agencies"))
                .and_then(first_agency_name)
        });

    Ok(Some(InfoRecord {
        name: raw.name.unwrap_or_default(),
        description: non_empty(raw.description),
        type_name: non_empty(raw.type_name),
        family,
        agency,
        abbrev: non_empty(raw.abbrev),
        country_code: non_empty(raw.country_code),
        wiki_url: non_empty(raw.wiki_url),
        info_urls,
    }))
}

fn first_agency_name(agencies: &Value) -> Option<String> {
    agencies
        .as_array()?
        .iter()
        .filter_map(|a| a.get("name").and_then(Value::as_str))
        .find(|n| !n.trim().is_empty())
        .map(str::to_string)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Union of the fields the four by-id endpoints return.
#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "typeName")]
    type_name: Option<String>,
    #[serde(default)]
    familyname: Option<String>,
    #[serde(default)]
    family: Option<Value>,
    #[serde(default)]
    agencies: Option<Value>,
    #[serde(default)]
    abbrev: Option<String>,
    #[serde(default, rename = "countryCode")]
    country_code: Option<String>,
    #[serde(default, rename = "wikiURL")]
    wiki_url: Option<String>,
    #[serde(default, rename = "infoURLs")]
    info_urls: Option<Vec<String>>,
    #[serde(default, rename = "infoURL")]
    info_url: Option<String>,
}
