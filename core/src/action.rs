use std::fmt;
use std::str::FromStr;

use crate::launch::InfoKind;

/// Suffix asking for the continuation of an info answer.
const MORE_SUFFIX: &str = "More";

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NextLaunch,
    UpcomingLaunches,
    LaunchAfter,
    LaunchBefore,
    Info(InfoKind),
}

impl Action {
    /// Webhook action name.
    pub fn name(self) -> &'static str {
        match self {
            Action::NextLaunch => "nextLaunch",
            Action::UpcomingLaunches => "upcomingLaunches",
            Action::LaunchAfter => "launchAfter",
            Action::LaunchBefore => "launchBefore",
            Action::Info(InfoKind::Mission) => "missionInfo",
            Action::Info(InfoKind::Rocket) => "rocketInfo",
            Action::Info(InfoKind::Pad) => "padInfo",
            Action::Info(InfoKind::Agency) => "agencyInfo",
        }
    }

    /// Whether the action resolves its subject from a stored launch context.
    pub fn needs_context(self) -> bool {
        matches!(
            self,
            Action::LaunchAfter | Action::LaunchBefore | Action::Info(_)
        )
    }

    const ALL: [Action; 8] = [
        Action::NextLaunch,
        Action::UpcomingLaunches,
        Action::LaunchAfter,
        Action::LaunchBefore,
        Action::Info(InfoKind::Mission),
        Action::Info(InfoKind::Rocket),
        Action::Info(InfoKind::Pad),
        Action::Info(InfoKind::Agency),
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An action plus whether the continuation ("tell me more") was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    pub wants_more: bool,
    /// Requested list length for `upcomingLaunches`.
    pub count: Option<u32>,
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            wants_more: false,
            count: None,
        }
    }

    pub fn more(action: Action) -> Self {
        Self {
            wants_more: true,
            ..Self::new(action)
        }
    }

    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    /// Parse a webhook action name such as `rocketInfo` or `rocketInfoMore`.
    ///
    /// The `More` suffix is only accepted on info actions.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(action) = Action::ALL.iter().find(|a| a.name() == name) {
            return Some(Self::new(*action));
        }
        let base = name.strip_suffix(MORE_SUFFIX)?;
        Action::ALL
            .iter()
            .find(|a| a.name() == base && matches!(a, Action::Info(_)))
            .map(|a| Self::more(*a))
    }

    /// Map a voice-assistant intent name onto the same action space.
    pub fn from_intent(intent: &str) -> Option<Self> {
        let req = match intent {
            "NextLaunchIntent" => Self::new(Action::NextLaunch),
            "UpcomingLaunchesIntent" => Self::new(Action::UpcomingLaunches),
            "LaunchAfterIntent" => Self::new(Action::LaunchAfter),
            "LaunchBeforeIntent" => Self::new(Action::LaunchBefore),
            "MissionDetailIntent" => Self::new(Action::Info(InfoKind::Mission)),
            "RocketDetailIntent" => Self::new(Action::Info(InfoKind::Rocket)),
            "PadDetailIntent" => Self::new(Action::Info(InfoKind::Pad)),
            "AgencyDetailIntent" => Self::new(Action::Info(InfoKind::Agency)),
            "MissionDetailMoreIntent" => Self::more(Action::Info(InfoKind::Mission)),
            "RocketDetailMoreIntent" => Self::more(Action::Info(InfoKind::Rocket)),
            "PadDetailMoreIntent" => Self::more(Action::Info(InfoKind::Pad)),
            "AgencyDetailMoreIntent" => Self::more(Action::Info(InfoKind::Agency)),
            _ => return None,
        };
        Some(req)
    }
}

impl FromStr for ActionRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown action: {s}"))
    }
}
