//! Point-in-time selectors for the `at` query parameter
//!
//! The service accepts two forms:
//! - absolute: an RFC 3339 timestamp, e.g. `2024-01-01T15:04:05Z`
//! - relative: `now`, optionally followed by a signed duration built from
//!   integer-prefixed `h`/`m`/`s` units, e.g. `now-2h` or `now+1h30m`

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

fn relative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    PATTERN.get_or_init(|| {
        Regex::new(r"^now(?:([+-])((?:[0-9]+[hms])+))?$").expect("relative date pattern is valid")
    })
}

fn unit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    PATTERN.get_or_init(|| Regex::new(r"([0-9]+)([hms])").expect("duration unit pattern is valid"))
}

/// Returns true if `s` is an acceptable `at` value
///
/// # Examples
///
/// ```
/// use infrahub_client::target_date::is_valid_target_date_format;
///
/// assert!(is_valid_target_date_format("2024-01-01T15:04:05Z"));
/// assert!(is_valid_target_date_format("now-2h"));
/// assert!(!is_valid_target_date_format("yesterday"));
/// ```
#[must_use]
pub fn is_valid_target_date_format(s: &str) -> bool {
    TimeSelector::from_str(s).is_ok()
}

/// A validated `at` value
///
/// Only values matching one of the two grammars can be constructed; the
/// original text is kept so the selector is sent exactly as supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSelector {
    raw: String,
    kind: SelectorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SelectorKind {
    Absolute(DateTime<FixedOffset>),
    Relative(TimeDelta),
}

/// The value is neither an RFC 3339 timestamp nor a `now±duration` expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target date {0:?}: expected RFC 3339 timestamp or now[+-]<duration>")]
pub struct InvalidTargetDate(
    /// The rejected value
    pub String,
);

impl TimeSelector {
    /// The selector text as supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True for the `now±duration` form
    pub fn is_relative(&self) -> bool {
        matches!(self.kind, SelectorKind::Relative(_))
    }

    /// Offset from "now" for relative selectors
    pub fn offset(&self) -> Option<TimeDelta> {
        match self.kind {
            SelectorKind::Relative(offset) => Some(offset),
            SelectorKind::Absolute(_) => None,
        }
    }

    /// The instant this selector denotes, taking `now` as the anchor for
    /// relative selectors
    ///
    /// Returns `None` if the offset moves `now` outside the representable range.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.kind {
            SelectorKind::Absolute(at) => Some(at.with_timezone(&Utc)),
            SelectorKind::Relative(offset) => now.checked_add_signed(offset),
        }
    }
}

fn parse_relative(s: &str) -> Option<TimeDelta> {
    let caps = relative_pattern().captures(s)?;
    let (Some(sign), Some(units)) = (caps.get(1), caps.get(2)) else {
        // bare "now"
        return Some(TimeDelta::zero());
    };

    let mut total_secs: i64 = 0;
    for unit in unit_pattern().captures_iter(units.as_str()) {
        let amount: i64 = unit[1].parse().ok()?;
        let scale = match &unit[2] {
            "h" => 3600,
            "m" => 60,
            _ => 1,
        };
        total_secs = total_secs.checked_add(amount.checked_mul(scale)?)?;
    }
    if sign.as_str() == "-" {
        total_secs = -total_secs;
    }
    TimeDelta::try_seconds(total_secs)
}

impl FromStr for TimeSelector {
    type Err = InvalidTargetDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            SelectorKind::Absolute(at)
        } else if let Some(offset) = parse_relative(s) {
            SelectorKind::Relative(offset)
        } else {
            return Err(InvalidTargetDate(s.to_string()));
        };
        Ok(Self {
            raw: s.to_string(),
            kind,
        })
    }
}

impl TryFrom<String> for TimeSelector {
    type Error = InvalidTargetDate;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSelector> for String {
    fn from(selector: TimeSelector) -> Self {
        selector.raw
    }
}

impl std::fmt::Display for TimeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
