use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{error, info};

/// Default lookback in minutes, sized to the refresh cadence of the
/// upstream service group (every 60 minutes).
pub const DEFAULT_SPAN_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub minutes: i64,
    pub used_default: bool,
}

/// Resolve the `span` query parameter into a lookback in minutes.
///
/// Missing, empty or unparseable values fall back to
/// [`DEFAULT_SPAN_MINUTES`]; anything that parses as an integer is taken
/// verbatim, including zero and negative values.
pub fn resolve_span(raw: Option<&str>) -> ResolvedSpan {
    let Some(value) = raw.filter(|value| !value.is_empty()) else {
        info!("span is empty");
        return ResolvedSpan {
            minutes: DEFAULT_SPAN_MINUTES,
            used_default: true,
        };
    };

    match value.parse::<i64>() {
        Ok(minutes) => ResolvedSpan {
            minutes,
            used_default: false,
        },
        Err(_) => {
            error!(span = %value, "Failed to set span because of invalid value");
            ResolvedSpan {
                minutes: DEFAULT_SPAN_MINUTES,
                used_default: true,
            }
        }
    }
}

/// Inclusive time interval one ingestion pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PassWindow {
    /// Window reaching `minutes` back from `now`. A negative span yields an
    /// inverted window that contains nothing; arithmetic saturates instead
    /// of overflowing for absurd spans.
    pub fn trailing(now: DateTime<Utc>, minutes: i64) -> Self {
        let span = ChronoDuration::try_minutes(minutes).unwrap_or(if minutes.is_negative() {
            ChronoDuration::MIN
        } else {
            ChronoDuration::MAX
        });
        let start = now
            .checked_sub_signed(span)
            .unwrap_or(if minutes.is_negative() {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            });

        Self { start, end: now }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}
