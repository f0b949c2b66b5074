#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use liftoff_core::launch::parse_launches;
use liftoff_core::{
    AssistantConfig, InfoKind, InfoRecord, LaunchAssistant, LaunchFact, LaunchQuery,
    LaunchSource, LiftoffError, Result, SummarySource,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// 2017-06-25 20:25:00 UTC
pub const IRIDIUM_WSSTAMP: i64 = 1_498_422_300;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap()
}

pub fn iridium_json() -> Value {
    json!({
        "id": 1234,
        "name": "Falcon 9 Full Thrust | Iridium NEXT 2",
        "windowstart": "June 25, 2017 20:25:00 UTC",
        "windowend": "June 25, 2017 20:25:00 UTC",
        "net": "June 25, 2017 20:25:00 UTC",
        "wsstamp": IRIDIUM_WSSTAMP,
        "westamp": IRIDIUM_WSSTAMP,
        "vidURLs": ["https://www.youtube.com/watch?v=iridium"],
        "rocket": {
            "id": 58,
            "name": "Falcon 9 Full Thrust",
            "agencies": [{ "id": 121, "name": "SpaceX", "abbrev": "SpX" }]
        },
        "missions": [{ "id": 600, "name": "Iridium NEXT 2", "typeName": "Communications" }],
        "location": {
            "id": 16,
            "name": "Vandenberg AFB, CA, USA",
            "pads": [{ "id": 87, "name": "SLC-4E, Vandenberg Air Force Base, CA" }]
        }
    })
}

pub fn secret_json() -> Value {
    json!({
        "id": 1300,
        "windowstart": "July 2, 2017 23:36:00 UTC",
        "wsstamp": 1_499_038_560,
        "westamp": 1_499_047_560,
        "rocket": { "id": 58, "name": "Falcon 9 Full Thrust", "agencies": [] },
        "missions": null,
        "location": {
            "pads": [{ "id": 85, "name": "LC-39A, Kennedy Space Center, FL" }]
        }
    })
}

pub fn facts(launches: Vec<Value>) -> Vec<LaunchFact> {
    parse_launches(json!({ "launches": launches })).unwrap()
}

pub fn iridium() -> LaunchFact {
    facts(vec![iridium_json()]).remove(0)
}

pub fn secret() -> LaunchFact {
    facts(vec![secret_json()]).remove(0)
}

/// Launch source that records every query and answers from canned data.
#[derive(Default)]
pub struct FakeLaunches {
    pub queries: Mutex<Vec<LaunchQuery>>,
    pub info_calls: Mutex<Vec<(InfoKind, String)>>,
    pub launches: Vec<LaunchFact>,
    pub records: HashMap<(InfoKind, String), InfoRecord>,
    pub fail: bool,
}

impl FakeLaunches {
    pub fn with_launches(launches: Vec<LaunchFact>) -> Self {
        Self {
            launches,
            ..Default::default()
        }
    }

    pub fn with_record(mut self, kind: InfoKind, id: &str, record: InfoRecord) -> Self {
        self.records.insert((kind, id.to_string()), record);
        self
    }

    pub fn last_query(&self) -> Option<LaunchQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LaunchSource for FakeLaunches {
    async fn launches(&self, query: &LaunchQuery) -> Result<Vec<LaunchFact>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(LiftoffError::Upstream("launch api down".into()));
        }
        Ok(self
            .launches
            .iter()
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn info(&self, kind: InfoKind, id: &str) -> Result<Option<InfoRecord>> {
        self.info_calls
            .lock()
            .unwrap()
            .push((kind, id.to_string()));
        Ok(self.records.get(&(kind, id.to_string())).cloned())
    }
}

#[derive(Default)]
pub struct FakeSummaries {
    pub summaries: HashMap<String, String>,
}

impl FakeSummaries {
    pub fn with(title: &str, summary: &str) -> Self {
        let mut summaries = HashMap::new();
        summaries.insert(title.to_string(), summary.to_string());
        Self { summaries }
    }
}

#[async_trait]
impl SummarySource for FakeSummaries {
    async fn summary(&self, title: &str) -> Result<Option<String>> {
        Ok(self.summaries.get(title).cloned())
    }
}

/// Fixed settings; the env-driven defaults must not leak into assertions.
pub fn settings() -> AssistantConfig {
    AssistantConfig {
        agency_name: "SpaceX".into(),
        context_lifespan: 5,
        soon_window_hours: 10,
        upcoming_default: 5,
        upcoming_max: 10,
        source: "com.jamiepitts.space-chatbot".into(),
    }
}

pub fn assistant(launches: Arc<FakeLaunches>, summaries: FakeSummaries) -> LaunchAssistant {
    LaunchAssistant::new(launches, Arc::new(summaries), settings()).with_clock(fixed_now)
}
