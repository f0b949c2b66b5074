//! Response formatting: launch facts and info records into speech/display text.
//!
//! Nothing in here touches the network; callers fetch first and hand the
//! records (and the current time) in.

use crate::config::AssistantConfig;
use crate::context::NavigationContext;
use crate::launch::{InfoKind, InfoRecord, LaunchFact};

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Default half-width of the "happening soon" window.
pub const SOON_WINDOW_MS: i64 = 10 * HOUR_MS;

const SOON_SUFFIX: &str = "This launch is happening soon!";

/// True iff the launch falls within ±10 hours of now, bounds included.
pub fn is_launch_soon(launch_ms: i64, now_ms: i64) -> bool {
    is_launch_soon_within(launch_ms, now_ms, SOON_WINDOW_MS)
}

pub fn is_launch_soon_within(launch_ms: i64, now_ms: i64, window_ms: i64) -> bool {
    now_ms.saturating_sub(window_ms) <= launch_ms && launch_ms <= now_ms.saturating_add(window_ms)
}

/// "an instantaneous window" or "a window of 10.0 minutes".
pub fn window_phrase(window_secs: i64) -> String {
    if window_secs == 0 {
        "an instantaneous window".to_string()
    } else {
        format!("a window of {:.1} minutes", window_secs as f64 / 60.0)
    }
}

/// Rendered answer about a single launch.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchReply {
    /// Short card title, e.g. "Iridium-4 on Falcon 9".
    pub title: String,
    pub speech: String,
    pub display: String,
    pub soon: bool,
    pub livestream_url: Option<String>,
    pub context: NavigationContext,
}

/// Rendered answer about a mission, rocket, pad or agency.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoReply {
    pub kind: InfoKind,
    pub subject: String,
    pub speech: String,
    pub display: String,
    /// A continuation exists and was not requested yet.
    pub more_available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingReply {
    pub count: usize,
    pub speech: String,
    pub display: String,
}

/// Turns records into text. Holds only phrasing settings.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    agency_name: String,
    context_lifespan: u32,
    soon_window_ms: i64,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new("SpaceX", 5)
    }
}

impl ResponseFormatter {
    pub fn new(agency_name: impl Into<String>, context_lifespan: u32) -> Self {
        Self {
            agency_name: agency_name.into(),
            context_lifespan,
            soon_window_ms: SOON_WINDOW_MS,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self {
            agency_name: config.agency_name.clone(),
            context_lifespan: config.context_lifespan,
            soon_window_ms: config.soon_window_hours.saturating_mul(HOUR_MS),
        }
    }

    pub fn context_lifespan(&self) -> u32 {
        self.context_lifespan
    }

    fn intro_and_tense(&self, offset: i64, is_after: bool) -> (String, &'static str) {
        let agency = &self.agency_name;
        if offset == 0 {
            (
                format!("The next {agency} launch will be the"),
                "is planned for",
            )
        } else if offset > 0 {
            let intro = if is_after {
                format!("After that, the next {agency} launch will be the")
            } else {
                format!("Before that, the next {agency} launch will be the")
            };
            (intro, "is planned for")
        } else {
            let intro = if is_after {
                format!("After that, the next {agency} launch was the")
            } else {
                format!("Before that, the previous {agency} launch was the")
            };
            (intro, "happened on")
        }
    }

    /// Describe `fact` as the launch at `offset`, reached by moving forward
    /// (`is_after`) or backward from the previous one.
    pub fn launch(&self, fact: &LaunchFact, offset: i64, is_after: bool, now_ms: i64) -> LaunchReply {
        let (intro, tense) = self.intro_and_tense(offset, is_after);
        let mission = match &fact.mission_name {
            Some(name) => format!("the {name}"),
            None => "a secret".to_string(),
        };
        let sentence = format!(
            "{} {} rocket, performing {} mission. The launch {} {}, with {}, flying from {}.",
            intro,
            fact.rocket_name,
            mission,
            tense,
            fact.window_start,
            window_phrase(fact.window_secs),
            fact.pad_name
        );

        let soon = is_launch_soon_within(fact.window_start_ms, now_ms, self.soon_window_ms);
        let mut speech = sentence.clone();
        let mut display = sentence;
        if soon {
            speech.push(' ');
            speech.push_str(SOON_SUFFIX);
            display.push_str("\n\n");
            display.push_str(SOON_SUFFIX);
            if let Some(url) = &fact.livestream_url {
                display.push_str(&format!("\nWatch it live: {url}"));
            }
        }

        LaunchReply {
            title: format!("{} on {}", fact.mission_label(), fact.rocket_name),
            speech,
            display,
            soon,
            livestream_url: fact.livestream_url.clone(),
            context: NavigationContext::for_launch(fact, offset, self.context_lifespan),
        }
    }

    /// Describe an info record, preferring the Wikipedia summary when one was found.
    ///
    /// The summary's first line is the short answer; the remaining lines are
    /// the continuation returned when `more_requested` is set.
    pub fn info(
        &self,
        kind: InfoKind,
        record: &InfoRecord,
        summary: Option<&str>,
        more_requested: bool,
    ) -> InfoReply {
        let lines: Vec<&str> = summary
            .map(|s| {
                s.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let (text, more_available) = match lines.split_first() {
            Some((first, rest)) => {
                if more_requested {
                    if rest.is_empty() {
                        (format!("That's all I know about {}.", record.name), false)
                    } else {
                        (rest.join("\n"), false)
                    }
                } else {
                    (first.to_string(), !rest.is_empty())
                }
            }
            None => (templated_description(kind, record), false),
        };

        let mut display = text.clone();
        if !record.info_urls.is_empty() {
            display.push_str("\n\nMore info: ");
            display.push_str(&record.info_urls.join(" "));
        }

        InfoReply {
            kind,
            subject: record.name.clone(),
            speech: text,
            display,
            more_available,
        }
    }

    /// Enumerate upcoming launches, or say there are none.
    pub fn upcoming(&self, facts: &[LaunchFact]) -> UpcomingReply {
        let agency = &self.agency_name;
        if facts.is_empty() {
            let text = format!("There are no upcoming {agency} launches right now.");
            return UpcomingReply {
                count: 0,
                speech: text.clone(),
                display: text,
            };
        }

        let header = if facts.len() == 1 {
            format!("Here is the next {agency} launch.")
        } else {
            format!("Here are the next {} {agency} launches.", facts.len())
        };
        let entries: Vec<String> = facts
            .iter()
            .enumerate()
            .map(|(i, f)| {
                format!(
                    "{}. The {} mission on the {} rocket, flying from {} on {}.",
                    i + 1,
                    f.mission_label(),
                    f.rocket_name,
                    f.pad_name,
                    f.window_start
                )
            })
            .collect();

        UpcomingReply {
            count: facts.len(),
            speech: format!("{} {}", header, entries.join(" ")),
            display: format!("{}\n\n{}", header, entries.join("\n\n")),
        }
    }
}

/// Fallback description built from the record's own fields.
pub fn templated_description(kind: InfoKind, record: &InfoRecord) -> String {
    let name = &record.name;
    match kind {
        InfoKind::Mission => {
            if let Some(d) = &record.description {
                d.clone()
            } else if let Some(t) = &record.type_name {
                format!("{name} is a {t} mission.")
            } else if let Some(a) = &record.agency {
                format!("{name} is a {a} mission.")
            } else {
                format!("{name} is a mission.")
            }
        }
        InfoKind::Rocket => {
            let mut s = format!("The {name} is a rocket");
            if let Some(f) = &record.family {
                s.push_str(&format!(" from the {f} family"));
            }
            if let Some(a) = &record.agency {
                s.push_str(&format!(", built by {a}"));
            }
            s.push('.');
            s
        }
        InfoKind::Pad => match &record.agency {
            Some(a) => format!("{name} is a launch site operated by {a}."),
            None => format!("{name} is a launch site."),
        },
        InfoKind::Agency => {
            let mut s = name.clone();
            if let Some(abbrev) = &record.abbrev {
                s.push_str(&format!(" ({abbrev})"));
            }
            s.push_str(" is a launch provider");
            if let Some(c) = &record.country_code {
                s.push_str(&format!(" based in {c}"));
            }
            s.push('.');
            s
        }
    }
}
