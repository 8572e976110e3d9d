//! Theme lifecycle: status codes, allowed transitions and priority rules.

use std::fmt;
use std::str::FromStr;

/// Lowest priority a theme can have.
pub const PRIORITY_MIN: i32 = 10;
/// Highest priority a theme can have.
pub const PRIORITY_MAX: i32 = 50;
/// Amount a single up/down adjustment moves the priority.
pub const PRIORITY_STEP: i32 = 10;
/// Priority given to newly submitted themes.
pub const PRIORITY_DEFAULT: i32 = 30;

/// Lifecycle stage of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeStatus {
    /// Being discussed right now
    Current,
    /// Queued, ordered by priority
    Regular,
    /// Archived after discussion
    Discussed,
}

/// How a status group is ordered when listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    Unordered,
    PriorityDesc,
    UpdatedAsc,
}

/// A stored status code that is not one of `c`, `r`, `d`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme status: {0}")]
pub struct UnknownStatus(pub String);

impl ThemeStatus {
    pub const ALL: [ThemeStatus; 3] = [
        ThemeStatus::Current,
        ThemeStatus::Regular,
        ThemeStatus::Discussed,
    ];

    /// Single-character code stored in the `status` column.
    pub fn code(self) -> &'static str {
        match self {
            ThemeStatus::Current => "c",
            ThemeStatus::Regular => "r",
            ThemeStatus::Discussed => "d",
        }
    }

    /// Parse a stored status code.
    pub fn from_code(code: &str) -> Result<Self, UnknownStatus> {
        match code {
            "c" => Ok(ThemeStatus::Current),
            "r" => Ok(ThemeStatus::Regular),
            "d" => Ok(ThemeStatus::Discussed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }

    /// Name used in URLs and templates.
    pub fn name(self) -> &'static str {
        match self {
            ThemeStatus::Current => "current",
            ThemeStatus::Regular => "regular",
            ThemeStatus::Discussed => "discussed",
        }
    }

    /// Statuses a theme may move into `self` from.
    pub fn sources(self) -> &'static [ThemeStatus] {
        match self {
            ThemeStatus::Current => &[ThemeStatus::Regular],
            ThemeStatus::Regular => &[ThemeStatus::Current, ThemeStatus::Discussed],
            ThemeStatus::Discussed => &[ThemeStatus::Current, ThemeStatus::Regular],
        }
    }

    pub fn can_transition(from: ThemeStatus, to: ThemeStatus) -> bool {
        to.sources().contains(&from)
    }

    pub fn listing_order(self) -> ListingOrder {
        match self {
            ThemeStatus::Current => ListingOrder::Unordered,
            ThemeStatus::Regular => ListingOrder::PriorityDesc,
            ThemeStatus::Discussed => ListingOrder::UpdatedAsc,
        }
    }
}

impl fmt::Display for ThemeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemeStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(ThemeStatus::Current),
            "regular" => Ok(ThemeStatus::Regular),
            "discussed" => Ok(ThemeStatus::Discussed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Direction of a priority adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityAction {
    Up,
    Down,
}

impl PriorityAction {
    /// Parse the `up` / `down` path segment. Anything else is `None`.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "up" => Some(PriorityAction::Up),
            "down" => Some(PriorityAction::Down),
            _ => None,
        }
    }

    pub fn delta(self) -> i32 {
        match self {
            PriorityAction::Up => PRIORITY_STEP,
            PriorityAction::Down => -PRIORITY_STEP,
        }
    }

    /// Priority after applying this action, clamped to the allowed range.
    pub fn apply(self, priority: i32) -> i32 {
        priority
            .saturating_add(self.delta())
            .clamp(PRIORITY_MIN, PRIORITY_MAX)
    }
}
