//! Natural-language resolution of past-time expressions.
//!
//! Accepted shapes: `N minutes|hours|days|weeks ago`, `yesterday
//! [HH:MM]`, `today HH:MM`, bare `HH:MM` (earlier today) and
//! `YYYY-MM-DD [HH:MM]`. Anything else is a parse error and aborts the
//! invocation before any store mutation.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("relative pattern is valid")
});
static YESTERDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^yesterday(?:\s+(\d{1,2}):(\d{2}))?$").expect("yesterday pattern is valid")
});
static TODAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^today\s+(\d{1,2}):(\d{2})$").expect("today pattern is valid"));
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("clock pattern is valid"));
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:\s+(\d{1,2}):(\d{2}))?$")
        .expect("date pattern is valid")
});

#[derive(Debug)]
pub enum WhenError {
    /// The expression matched no supported shape or held invalid values.
    Unparseable(String),
    /// The expression parsed but resolves to a future moment.
    Future(String),
}

impl Display for WhenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unparseable(expr) => {
                write!(f, "could not make sense of `{expr}` as a past time")
            }
            Self::Future(expr) => write!(f, "`{expr}` resolves to a moment in the future"),
        }
    }
}

impl Error for WhenError {}

/// Resolves `expr` to epoch seconds relative to `now`.
///
/// Taking `now` as a parameter keeps the resolver deterministic under
/// test; the CLI passes `Local::now()`.
pub fn resolve(expr: &str, now: DateTime<Local>) -> Result<i64, WhenError> {
    let normalized = expr.trim().to_ascii_lowercase();
    let unparseable = || WhenError::Unparseable(expr.trim().to_string());

    let timestamp = if let Some(caps) = RELATIVE_RE.captures(&normalized) {
        let amount: i64 = caps[1].parse().map_err(|_| unparseable())?;
        let unit_seconds = match &caps[2] {
            "minute" => 60,
            "hour" => 3_600,
            "day" => 86_400,
            "week" => 604_800,
            _ => return Err(unparseable()),
        };
        let offset = amount.checked_mul(unit_seconds).ok_or_else(unparseable)?;
        now.timestamp().checked_sub(offset).ok_or_else(unparseable)?
    } else if let Some(caps) = YESTERDAY_RE.captures(&normalized) {
        let date = now.date_naive().pred_opt().ok_or_else(unparseable)?;
        let time = match (caps.get(1), caps.get(2)) {
            (Some(hour), Some(minute)) => clock_time(hour.as_str(), minute.as_str())
                .ok_or_else(unparseable)?,
            _ => now.time(),
        };
        local_timestamp(date.and_time(time), &now).ok_or_else(unparseable)?
    } else if let Some(caps) = TODAY_RE.captures(&normalized) {
        let time = clock_time(&caps[1], &caps[2]).ok_or_else(unparseable)?;
        local_timestamp(now.date_naive().and_time(time), &now).ok_or_else(unparseable)?
    } else if let Some(caps) = CLOCK_RE.captures(&normalized) {
        let time = clock_time(&caps[1], &caps[2]).ok_or_else(unparseable)?;
        local_timestamp(now.date_naive().and_time(time), &now).ok_or_else(unparseable)?
    } else if let Some(caps) = DATE_RE.captures(&normalized) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().map_err(|_| unparseable())?,
            caps[2].parse().map_err(|_| unparseable())?,
            caps[3].parse().map_err(|_| unparseable())?,
        )
        .ok_or_else(unparseable)?;
        let time = match (caps.get(4), caps.get(5)) {
            (Some(hour), Some(minute)) => clock_time(hour.as_str(), minute.as_str())
                .ok_or_else(unparseable)?,
            _ => NaiveTime::MIN,
        };
        local_timestamp(date.and_time(time), &now).ok_or_else(unparseable)?
    } else {
        return Err(unparseable());
    };

    if timestamp > now.timestamp() {
        return Err(WhenError::Future(expr.trim().to_string()));
    }
    Ok(timestamp)
}

fn clock_time(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

fn local_timestamp(naive: NaiveDateTime, now: &DateTime<Local>) -> Option<i64> {
    match now.timezone().from_local_datetime(&naive) {
        LocalResult::Single(resolved) => Some(resolved.timestamp()),
        // DST gap repeats; pick the earlier reading.
        LocalResult::Ambiguous(earlier, _) => Some(earlier.timestamp()),
        LocalResult::None => None,
    }
}
