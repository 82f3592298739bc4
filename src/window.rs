use crate::model::TimeWindow;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    All,
    Days(u32),
    Hours(u32),
    Invalid(String),
}

impl Specifier {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return Specifier::All;
        }
        let (count, unit) = input.split_at(input.len() - input.chars().last().map_or(0, char::len_utf8));
        match (count.parse::<u32>(), unit) {
            (Ok(n), "d") => Specifier::Days(n),
            (Ok(n), "h") => Specifier::Hours(n),
            _ => Specifier::Invalid(input.to_string()),
        }
    }

    /// Integers are a day count. Anything that is neither null, a string
    /// nor an integer is invalid.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Specifier::All,
            Value::String(s) => Self::parse(s),
            Value::Number(n) => match n.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(days) => Specifier::Days(days),
                None => Specifier::Invalid(n.to_string()),
            },
            other => Specifier::Invalid(other.to_string()),
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let span = match self {
            Specifier::All | Specifier::Invalid(_) => return None,
            Specifier::Days(n) => Duration::try_days(i64::from(*n))?,
            Specifier::Hours(n) => Duration::try_hours(i64::from(*n))?,
        };
        now.checked_sub_signed(span)
    }
}

/// Resolves every configured window against the same reference instant.
/// Malformed specifiers become unbounded windows.
pub fn resolve_windows(timeframes: &Map<String, Value>, now: DateTime<Utc>) -> Vec<TimeWindow> {
    timeframes
        .iter()
        .map(|(label, value)| {
            let specifier = Specifier::from_value(value);
            if let Specifier::Invalid(raw) = &specifier {
                warn!(window = %label, specifier = %raw, "unrecognized timeframe, using all history");
            }
            TimeWindow::new(label.clone(), specifier.cutoff(now))
        })
        .collect()
}

pub fn resolve_windows_now(timeframes: &Map<String, Value>) -> Vec<TimeWindow> {
    resolve_windows(timeframes, Utc::now())
}
