use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Parse a provider timestamp into UTC.
///
/// Accepts bare `YYYY-MM-DD`, RFC 3339, ISO-8601 with compact offsets such
/// as `+0000` (Jira/Confluence emit these), and naive `YYYY-MM-DDTHH:MM:SS`
/// which is taken as UTC.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(Error::Validation(format!(
        "Invalid date '{s}', expected YYYY-MM-DD or ISO-8601"
    )))
}

/// Signed hour count between two instants. Callers decide whether a
/// negative result (end before start) is meaningful or discarded.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

/// An inclusive calendar-day range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Parse strict `YYYY-MM-DD` bounds. An inverted range is rejected
    /// before any network call is made.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = NaiveDate::parse_from_str(from, "%Y-%m-%d").map_err(|_| {
            Error::Validation(format!("Invalid from_date '{from}', expected YYYY-MM-DD"))
        })?;
        let to = NaiveDate::parse_from_str(to, "%Y-%m-%d").map_err(|_| {
            Error::Validation(format!("Invalid to_date '{to}', expected YYYY-MM-DD"))
        })?;
        if from > to {
            return Err(Error::Validation(format!(
                "from_date {from} is after to_date {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Midnight UTC at the start of the range.
    pub fn start(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.from.and_time(NaiveTime::MIN))
    }

    /// Midnight UTC of the day after `to`. Providers compare on exact
    /// timestamps, so the exclusive upper bound is one day past `to` to
    /// keep the whole `to` calendar day inside the range.
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        let next = self.to + Duration::days(1);
        Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN))
    }

    /// Whether a timestamp falls inside the inclusive range.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start() && ts < self.end_exclusive()
    }

    /// Calendar days spanned; 0 for a same-day range.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Weeks in the range with a denominator floor of 1, so weekly rates
    /// never divide by zero on short ranges.
    pub fn weeks(&self) -> f64 {
        (self.days() as f64 / 7.0).max(1.0)
    }

    /// GitHub search qualifier `field:from..to+1d`.
    pub fn query_fragment(&self, field: &str) -> String {
        let upper = self.to + Duration::days(1);
        format!(
            "{field}:{}..{}",
            self.from.format("%Y-%m-%d"),
            upper.format("%Y-%m-%d")
        )
    }

    /// Lower bound rendered for JQL/CQL clauses.
    pub fn lower_bound(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    /// Exclusive upper bound (`to + 1 day`) rendered for JQL/CQL clauses.
    pub fn upper_bound_exclusive(&self) -> String {
        (self.to + Duration::days(1)).format("%Y-%m-%d").to_string()
    }
}
