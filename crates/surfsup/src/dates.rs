use serde::Deserialize;
use std::{fmt, str::FromStr};
use time::{macros::format_description, Date, Month};

/// Shape and calendar validation failure for a `YYYY-MM-DD` token
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date '{token}', expected format YYYY-MM-DD")]
pub struct DateParseError {
    pub token: String,
}

/// The trailing window floor does not exist on the calendar
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("No date one year before {anchor}, the anchor is a leap day")]
pub struct WindowError {
    pub anchor: Date,
}

/// Parse a strict `YYYY-MM-DD` token into a calendar date.
///
/// Impossible dates such as `2017-02-30` are rejected rather than rolled over.
pub fn parse_date(token: &str) -> Result<Date, DateParseError> {
    let invalid = || DateParseError {
        token: token.to_owned(),
    };

    if !has_iso_date_shape(token) {
        return Err(invalid());
    }

    Date::parse(token, format_description!("[year]-[month]-[day]")).map_err(|_| invalid())
}

/// Render a date as `YYYY-MM-DD`, the inverse of [`parse_date`].
pub fn format_date(date: Date) -> String {
    date.to_string()
}

fn has_iso_date_shape(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// How to derive a window floor from a February 29 anchor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeapDayPolicy {
    /// Fail the request, the floor date does not exist
    #[default]
    Reject,
    /// Use February 28 of the previous year
    Clamp,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown leap day policy '{0}', expected 'reject' or 'clamp'")]
pub struct UnknownLeapDayPolicy(pub String);

impl FromStr for LeapDayPolicy {
    type Err = UnknownLeapDayPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(LeapDayPolicy::Reject),
            "clamp" => Ok(LeapDayPolicy::Clamp),
            _ => Err(UnknownLeapDayPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for LeapDayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeapDayPolicy::Reject => write!(f, "reject"),
            LeapDayPolicy::Clamp => write!(f, "clamp"),
        }
    }
}

/// Trailing twelve month span `[floor, most_recent]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub most_recent: Date,
    pub floor: Date,
}

impl DateWindow {
    /// Anchor a window on the latest observation date, the floor keeps month and day
    /// and moves back one year.
    pub fn ending_at(most_recent: Date, policy: LeapDayPolicy) -> Result<Self, WindowError> {
        let previous_year = most_recent.year() - 1;
        let floor = match most_recent.replace_year(previous_year) {
            Ok(floor) => floor,
            Err(_) if policy == LeapDayPolicy::Clamp => {
                Date::from_calendar_date(previous_year, Month::February, 28)
                    .map_err(|_| WindowError {
                        anchor: most_recent,
                    })?
            }
            Err(_) => {
                return Err(WindowError {
                    anchor: most_recent,
                })
            }
        };

        Ok(Self { most_recent, floor })
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.floor && date <= self.most_recent
    }
}
