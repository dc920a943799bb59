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

use super::Solar;
use crate::{Float, Location};
use calendar::TimeIndex;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use tracing::debug;

/// Apparent altitude of the upper limb of the sun at rise and set,
/// including atmospheric refraction (in degrees)
const HORIZON_DEGREES: Float = -0.833;

/// Number of refinements of the rise/set estimate. Each of them
/// recomputes declination and equation of time at the previous guess.
const ITERATIONS: usize = 3;

/// Decimal hour used when the sun does not rise on a certain day
pub const NO_SUNRISE_HOURS: Float = 0.0;

/// Decimal hour used when the sun does not set on a certain day
pub const NO_SUNSET_HOURS: Float = 23.999;

/// Either of the two daily events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The upper limb of the sun appears
    Sunrise,
    /// The upper limb of the sun disappears
    Sunset,
}

/// The UTC hour of a timestamp, with minutes as decimals
/// (seconds are ignored). E.g., 4:12 becomes `4.2`
pub fn decimal_hours(t: DateTime<Utc>) -> Float {
    t.hour() as Float + t.minute() as Float / 60.
}

/// Sunrise and sunset of one UTC calendar day.
///
/// Each event is the first one happening after 00:00 UTC of
/// `date`, so (depending on the longitude) the sunset may fall
/// before the sunrise or even on the following day. Either of them
/// is `None` when the sun stays above or below the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiseSet {
    /// The UTC calendar day
    pub date: NaiveDate,
    /// Next sunrise after the start of the day
    pub sunrise: Option<DateTime<Utc>>,
    /// Next sunset after the start of the day
    pub sunset: Option<DateTime<Utc>>,
}

impl RiseSet {
    /// Sunrise in decimal hours, or [`NO_SUNRISE_HOURS`]
    pub fn sunrise_hours(&self) -> Float {
        self.sunrise.map(decimal_hours).unwrap_or(NO_SUNRISE_HOURS)
    }

    /// Sunset in decimal hours, or [`NO_SUNSET_HOURS`]
    pub fn sunset_hours(&self) -> Float {
        self.sunset.map(decimal_hours).unwrap_or(NO_SUNSET_HOURS)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl Solar {
    /// Time of the event (in hours since 00:00 UTC of `date`) for the
    /// solar day centred on `date`. The result may be negative or
    /// beyond 24 for locations far from Greenwich. Returns `None` if
    /// the sun does not cross the horizon.
    fn event_hours(&self, date: NaiveDate, event: Event) -> Option<Float> {
        let sign = match event {
            Event::Sunrise => -1.,
            Event::Sunset => 1.,
        };
        let (sin_phi, cos_phi) = self.latitude.sin_cos();
        let sin_h0 = HORIZON_DEGREES.to_radians().sin();
        let lon = self.longitude.to_degrees();

        let mut t: Float = 12.;
        for _ in 0..ITERATIONS {
            let n = date.ordinal() as Float + t / 24.;
            let delta = self.declination(n);
            let noon = 12. - lon / 15. - self.equation_of_time(n) / 60.;
            let cos_w = (sin_h0 - sin_phi * delta.sin()) / (cos_phi * delta.cos());
            if !cos_w.is_finite() || cos_w.abs() > 1. {
                return None;
            }
            t = noon + sign * cos_w.acos().to_degrees() / 15.;
        }
        Some(t)
    }

    /// The next event after 00:00 UTC of `date`, looking at the solar
    /// days before, on and after `date`. `None` if the sun does not
    /// cross the horizon in any of them, so the first sunrise after a
    /// polar night may be reported on the day before it happens.
    pub fn next_event(&self, date: NaiveDate, event: Event) -> Option<DateTime<Utc>> {
        let start = midnight(date);
        let to_time = |d: NaiveDate, hours: Float| {
            midnight(d) + Duration::milliseconds((hours * 3_600_000.).round() as i64)
        };

        [date.pred_opt(), Some(date), date.succ_opt()]
            .into_iter()
            .flatten()
            .filter_map(|d| self.event_hours(d, event).map(|h| to_time(d, h)))
            .filter(|t| *t >= start)
            .min()
    }

    /// Sunrise and sunset of `date`
    pub fn rise_set(&self, date: NaiveDate) -> RiseSet {
        RiseSet {
            date,
            sunrise: self.next_event(date, Event::Sunrise),
            sunset: self.next_event(date, Event::Sunset),
        }
    }
}

/// Sunrises and sunsets for a sequence of days, sorted by date.
///
/// Read-only once built, so it can be shared by every stage of a
/// pipeline that needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiseSetTable {
    days: Vec<RiseSet>,
}

impl RiseSetTable {
    /// Computes the table for some days. Repeated days are ignored.
    pub fn for_days(days: &[NaiveDate], location: &Location) -> Self {
        let solar = location.get_solar();
        let mut days = days.to_vec();
        days.sort_unstable();
        days.dedup();
        let days: Vec<RiseSet> = days.into_iter().map(|d| solar.rise_set(d)).collect();
        let polar = days
            .iter()
            .filter(|r| r.sunrise.is_none() || r.sunset.is_none())
            .count();
        if polar > 0 {
            debug!(
                "sun does not rise or set on {} of {} days at lat {}",
                polar,
                days.len(),
                location.latitude
            );
        }
        Self { days }
    }

    /// Finds the record of a certain day
    pub fn get(&self, date: NaiveDate) -> Option<&RiseSet> {
        self.days
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.days[i])
    }

    /// Finds the record of a certain day, calculating it if it
    /// was not in the table
    pub fn get_or_compute(&self, date: NaiveDate, solar: &Solar) -> RiseSet {
        match self.get(date) {
            Some(r) => *r,
            None => solar.rise_set(date),
        }
    }

    /// Iterates the records
    pub fn iter(&self) -> std::slice::Iter<'_, RiseSet> {
        self.days.iter()
    }

    /// Number of days in the table
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Sunrise and sunset for each unique UTC day in `times`
pub fn sun_rise_set(times: &TimeIndex, location: &Location) -> RiseSetTable {
    RiseSetTable::for_days(&times.unique_days(), location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn zurich() -> Location {
        Location::new(47.36, 8.55).unwrap()
    }

    fn minutes_between(a: DateTime<Utc>, b: DateTime<Utc>) -> Float {
        ((a - b).num_seconds() as Float / 60.).abs()
    }

    #[test]
    fn test_zurich_winter() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let r = zurich().get_solar().rise_set(d);
        let sunrise = r.sunrise.unwrap();
        let sunset = r.sunset.unwrap();
        let expected_rise = Utc.with_ymd_and_hms(2000, 1, 1, 7, 13, 4).unwrap();
        let expected_set = Utc.with_ymd_and_hms(2000, 1, 1, 15, 45, 13).unwrap();
        assert!(minutes_between(sunrise, expected_rise) < 1.0, "{}", sunrise);
        assert!(minutes_between(sunset, expected_set) < 1.0, "{}", sunset);
    }

    #[test]
    fn test_zurich_summer() {
        let d = NaiveDate::from_ymd_opt(2000, 7, 15).unwrap();
        let r = zurich().get_solar().rise_set(d);
        let expected_rise = Utc.with_ymd_and_hms(2000, 7, 15, 3, 44, 38).unwrap();
        let expected_set = Utc.with_ymd_and_hms(2000, 7, 15, 19, 18, 18).unwrap();
        assert!(minutes_between(r.sunrise.unwrap(), expected_rise) < 1.0);
        assert!(minutes_between(r.sunset.unwrap(), expected_set) < 1.0);
    }

    #[test]
    fn test_polar() {
        let solar = Location::new(78.22, 15.65).unwrap().get_solar();

        // Polar night
        let r = solar.rise_set(NaiveDate::from_ymd_opt(2001, 12, 21).unwrap());
        assert!(r.sunrise.is_none());
        assert!(r.sunset.is_none());
        assert_eq!(r.sunrise_hours(), NO_SUNRISE_HOURS);
        assert_eq!(r.sunset_hours(), NO_SUNSET_HOURS);

        // Midnight sun
        let r = solar.rise_set(NaiveDate::from_ymd_opt(2001, 6, 21).unwrap());
        assert!(r.sunrise.is_none());
        assert!(r.sunset.is_none());
    }

    #[test]
    fn test_next_event_after_midnight() {
        // Far West: the sunset of the solar day is after
        // midnight UTC, so the one reported for a date is the
        // one from the previous evening
        let solar = Location::new(20., -160.).unwrap().get_solar();
        let d = NaiveDate::from_ymd_opt(2001, 3, 10).unwrap();
        let r = solar.rise_set(d);
        let sunset = r.sunset.unwrap();
        let sunrise = r.sunrise.unwrap();
        assert_eq!(sunset.date_naive(), d);
        assert!(sunset < sunrise);
        assert!(sunset >= midnight(d));
    }

    #[test]
    fn test_end_of_polar_night() {
        let solar = Location::new(78.22, 15.65).unwrap().get_solar();
        let mut d = NaiveDate::from_ymd_opt(2001, 1, 15).unwrap();
        let last = NaiveDate::from_ymd_opt(2001, 3, 15).unwrap();
        let mut found = false;
        while d < last {
            let next = d.succ_opt().unwrap();
            if solar.event_hours(d, Event::Sunrise).is_none()
                && solar.event_hours(next, Event::Sunrise).is_some()
            {
                // No sunrise today, but there is one tomorrow
                let t = solar.next_event(d, Event::Sunrise).unwrap();
                assert_eq!(t.date_naive(), next);
                found = true;
                break;
            }
            d = next;
        }
        assert!(found);
    }

    #[test]
    fn test_decimal_hours() {
        let check = |h, m, expected: Float| {
            let t = Utc.with_ymd_and_hms(2000, 1, 1, h, m, 0).unwrap();
            assert!((decimal_hours(t) - expected).abs() < 1e-9);
        };
        check(4, 12, 4.2);
        check(6, 15, 6.25);
        check(15, 30, 15.5);
        check(20, 48, 20.8);
    }

    #[test]
    fn test_table() {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let times = TimeIndex::hourly(start, 72);
        let table = sun_rise_set(&times, &zurich());
        assert_eq!(table.len(), 3);
        let d = NaiveDate::from_ymd_opt(2000, 1, 2).unwrap();
        assert_eq!(table.get(d).unwrap().date, d);
        let missing = NaiveDate::from_ymd_opt(2000, 1, 9).unwrap();
        assert!(table.get(missing).is_none());
        let computed = table.get_or_compute(missing, &zurich().get_solar());
        assert_eq!(computed.date, missing);
        assert!(computed.sunrise.is_some());
    }
}
