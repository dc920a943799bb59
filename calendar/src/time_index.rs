/*
MIT License
Copyright (c) 2021 Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use crate::{CalendarError, Float, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc};

/// An ordered axis of UTC timestamps.
///
/// Construction is the only place where time zones are checked, so
/// anything holding a `TimeIndex` can assume UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeIndex {
    stamps: Vec<DateTime<Utc>>,
}

impl TimeIndex {
    /// Builds a `TimeIndex` from offset-aware timestamps. Any timestamp
    /// whose offset is not zero is rejected.
    pub fn new(stamps: Vec<DateTime<FixedOffset>>) -> Result<Self> {
        for (position, t) in stamps.iter().enumerate() {
            let offset_seconds = t.offset().local_minus_utc();
            if offset_seconds != 0 {
                return Err(CalendarError::NonUtcTimestamp {
                    position,
                    offset_seconds,
                });
            }
        }
        Self::from_utc(stamps.iter().map(|t| t.with_timezone(&Utc)).collect())
    }

    /// Builds a `TimeIndex` from timestamps that are already in UTC.
    pub fn from_utc(stamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if let Some(i) = stamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CalendarError::Unsorted(i + 1));
        }
        Ok(Self { stamps })
    }

    /// Parses RFC 3339 strings (e.g., `"2000-01-01T12:00:00+00:00"`).
    pub fn parse_rfc3339<S: AsRef<str>>(stamps: &[S]) -> Result<Self> {
        let parsed = stamps
            .iter()
            .map(|s| {
                DateTime::parse_from_rfc3339(s.as_ref())
                    .map_err(|_| CalendarError::InvalidTimestamp(s.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed)
    }

    /// `n` consecutive hours, starting at `start`
    pub fn hourly(start: DateTime<Utc>, n: usize) -> Self {
        let stamps = (0..n).map(|i| start + Duration::hours(i as i64)).collect();
        Self { stamps }
    }

    /// `n` consecutive days, starting at `start`
    pub fn daily(start: DateTime<Utc>, n: usize) -> Self {
        let stamps = (0..n).map(|i| start + Duration::days(i as i64)).collect();
        Self { stamps }
    }

    /// The 24 hours of each of the given days, in order.
    ///
    /// Days have to be strictly increasing; repeated days would
    /// produce repeated timestamps.
    pub fn hours_of_days(days: &[NaiveDate]) -> Result<Self> {
        let stamps = days
            .iter()
            .flat_map(|d| {
                let midnight = d.and_time(chrono::NaiveTime::MIN).and_utc();
                (0..24).map(move |h| midnight + Duration::hours(h))
            })
            .collect();
        Self::from_utc(stamps)
    }

    /// Number of timestamps
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Whether there are no timestamps at all
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Iterates the timestamps
    pub fn iter(&self) -> std::slice::Iter<'_, DateTime<Utc>> {
        self.stamps.iter()
    }

    /// Borrows the timestamps
    pub fn as_slice(&self) -> &[DateTime<Utc>] {
        &self.stamps
    }

    /// Gets the `i`th timestamp
    pub fn get(&self, i: usize) -> Option<DateTime<Utc>> {
        self.stamps.get(i).copied()
    }

    /// The distinct UTC calendar days covered, sorted.
    pub fn unique_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self.stamps.iter().map(|t| t.date_naive()).collect();
        days.dedup();
        days
    }
}

impl<'a> IntoIterator for &'a TimeIndex {
    type Item = &'a DateTime<Utc>;
    type IntoIter = std::slice::Iter<'a, DateTime<Utc>>;

    fn into_iter(self) -> Self::IntoIter {
        self.stamps.iter()
    }
}

/// Number of days in a month (`month` from 1 to 12)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(this), Some(next)) => (next - this).num_days() as u32,
        _ => 30,
    }
}

/// First day of the meteorological season (DJF, MAM, JJA, SON)
/// containing `date`. January and February belong to the season
/// that started on December 1st of the previous year.
pub fn season_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = match date.month() {
        12 => (date.year(), 12),
        1 | 2 => (date.year() - 1, 12),
        m => (date.year(), 3 * (m / 3)),
    };
    // Day 1 of months 3, 6, 9 and 12 always exists
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// The hour of the day of `t`, with minutes and seconds as decimals
pub fn fractional_hour(t: DateTime<Utc>) -> Float {
    t.hour() as Float + t.minute() as Float / 60. + t.second() as Float / 3600.
}

/// The day of the year (January 1st is 1), including the
/// fraction of the day elapsed at `t`
pub fn day_of_year(t: DateTime<Utc>) -> Float {
    t.ordinal() as Float + fractional_hour(t) / 24.
}
