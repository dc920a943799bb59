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

use crate::{days_in_month, season_start, CalendarError, Result, TimeIndex};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The temporal resolution of an irradiance series
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// One value per year (`A`)
    Annual,
    /// One value per meteorological season (`S`)
    Seasonal,
    /// One value per month (`M`)
    Monthly,
    /// One value per day (`D`)
    Daily,
    /// One value per hour (`H`)
    Hourly,
}

impl Frequency {
    /// The one-letter code of this frequency
    pub fn code(&self) -> char {
        match self {
            Self::Annual => 'A',
            Self::Seasonal => 'S',
            Self::Monthly => 'M',
            Self::Daily => 'D',
            Self::Hourly => 'H',
        }
    }

    /// Number of calendar months covered by one period, for
    /// the frequencies that span whole months
    pub fn months_in_period(&self) -> Option<u32> {
        match self {
            Self::Annual => Some(12),
            Self::Seasonal => Some(3),
            Self::Monthly => Some(1),
            Self::Daily | Self::Hourly => None,
        }
    }

    /// Unit of the energy produced at this frequency
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Hourly => "Wh",
            _ => "Wh/day",
        }
    }

    /// Infers the frequency from the typical spacing of the
    /// timestamps. Returns `None` when there are fewer than two
    /// timestamps or when the spacing does not correspond to
    /// any known frequency.
    pub fn detect(index: &TimeIndex) -> Option<Self> {
        let mut gaps: Vec<i64> = index
            .as_slice()
            .windows(2)
            .map(|w| (w[1] - w[0]).num_minutes())
            .collect();
        if gaps.is_empty() {
            return None;
        }
        gaps.sort_unstable();
        let hours = gaps[gaps.len() / 2] as f64 / 60.;
        let days = hours / 24.;

        if (0.5..1.5).contains(&hours) {
            Some(Self::Hourly)
        } else if (0.9..1.1).contains(&days) {
            Some(Self::Daily)
        } else if (27.5..32.5).contains(&days) {
            Some(Self::Monthly)
        } else if (88.0..93.0).contains(&days) {
            Some(Self::Seasonal)
        } else if (364.0..367.0).contains(&days) {
            Some(Self::Annual)
        } else {
            None
        }
    }

    /// Combines a requested frequency with the one inferred from
    /// the data. A request that contradicts the data is an error,
    /// and so is having neither.
    pub fn resolve(requested: Option<Self>, index: &TimeIndex) -> Result<Self> {
        match (requested, Self::detect(index)) {
            (Some(r), Some(d)) if r == d => Ok(r),
            (Some(requested), Some(detected)) => Err(CalendarError::FrequencyMismatch {
                requested,
                detected,
            }),
            (Some(r), None) => Ok(r),
            (None, Some(d)) => Ok(d),
            (None, None) => Err(CalendarError::UndetectableFrequency),
        }
    }

    /// Moves a timestamp to the representative instant of its period:
    /// January 1st for annual data, the middle of the month for
    /// seasonal and monthly data and midnight for daily data. Hourly
    /// timestamps are left untouched.
    pub fn normalize(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let date = match self {
            Self::Hourly => return t,
            Self::Daily => t.date_naive(),
            Self::Annual => NaiveDate::from_ymd_opt(t.year(), 1, 1).unwrap_or(t.date_naive()),
            Self::Seasonal | Self::Monthly => {
                let day = (days_in_month(t.year(), t.month()) / 2).max(1);
                NaiveDate::from_ymd_opt(t.year(), t.month(), day).unwrap_or(t.date_naive())
            }
        };
        date.and_time(NaiveTime::MIN).and_utc()
    }

    /// First day of the period containing `t`. For hourly and daily
    /// data this is just the date of `t`.
    pub fn period_start(&self, t: DateTime<Utc>) -> NaiveDate {
        let date = t.date_naive();
        match self {
            Self::Hourly | Self::Daily => date,
            Self::Annual => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
            Self::Seasonal => season_start(date),
            Self::Monthly => date.with_day(1).unwrap_or(date),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Frequency {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "Y" => Ok(Self::Annual),
            "S" => Ok(Self::Seasonal),
            "M" => Ok(Self::Monthly),
            "D" => Ok(Self::Daily),
            "H" => Ok(Self::Hourly),
            _ => Err(CalendarError::UnknownFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_detect() {
        let index = TimeIndex::hourly(utc(2000, 1, 1, 0), 48);
        assert_eq!(Frequency::detect(&index), Some(Frequency::Hourly));

        let index = TimeIndex::daily(utc(2000, 1, 1, 0), 5);
        assert_eq!(Frequency::detect(&index), Some(Frequency::Daily));

        let months: Vec<_> = (1..=12).map(|m| utc(2001, m, 15, 0)).collect();
        let index = TimeIndex::from_utc(months).unwrap();
        assert_eq!(Frequency::detect(&index), Some(Frequency::Monthly));

        let seasons = vec![utc(2001, 1, 15, 0), utc(2001, 4, 15, 0), utc(2001, 7, 15, 0)];
        let index = TimeIndex::from_utc(seasons).unwrap();
        assert_eq!(Frequency::detect(&index), Some(Frequency::Seasonal));

        let years = vec![utc(2000, 1, 1, 0), utc(2001, 1, 1, 0), utc(2002, 1, 1, 0)];
        let index = TimeIndex::from_utc(years).unwrap();
        assert_eq!(Frequency::detect(&index), Some(Frequency::Annual));

        let weird = vec![utc(2000, 1, 1, 0), utc(2000, 1, 1, 0) + Duration::hours(7)];
        let index = TimeIndex::from_utc(weird).unwrap();
        assert_eq!(Frequency::detect(&index), None);

        let single = TimeIndex::from_utc(vec![utc(2000, 1, 1, 0)]).unwrap();
        assert_eq!(Frequency::detect(&single), None);
    }

    #[test]
    fn test_resolve() {
        let index = TimeIndex::daily(utc(2000, 1, 1, 0), 5);
        assert_eq!(Frequency::resolve(None, &index), Ok(Frequency::Daily));
        assert_eq!(
            Frequency::resolve(Some(Frequency::Monthly), &index),
            Err(CalendarError::FrequencyMismatch {
                requested: Frequency::Monthly,
                detected: Frequency::Daily
            })
        );

        let single = TimeIndex::from_utc(vec![utc(2000, 6, 1, 0)]).unwrap();
        assert_eq!(
            Frequency::resolve(Some(Frequency::Seasonal), &single),
            Ok(Frequency::Seasonal)
        );
        assert_eq!(
            Frequency::resolve(None, &single),
            Err(CalendarError::UndetectableFrequency)
        );
    }

    #[test]
    fn test_normalize() {
        let t = Utc.with_ymd_and_hms(2001, 2, 20, 13, 30, 0).unwrap();
        assert_eq!(Frequency::Hourly.normalize(t), t);
        assert_eq!(Frequency::Daily.normalize(t), utc(2001, 2, 20, 0));
        assert_eq!(Frequency::Monthly.normalize(t), utc(2001, 2, 14, 0));
        assert_eq!(Frequency::Seasonal.normalize(t), utc(2001, 2, 14, 0));
        assert_eq!(Frequency::Annual.normalize(t), utc(2001, 1, 1, 0));
        let t = utc(2001, 7, 3, 0);
        assert_eq!(Frequency::Monthly.normalize(t), utc(2001, 7, 15, 0));
    }

    #[test]
    fn test_period_start() {
        let t = utc(2001, 2, 20, 13);
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
        assert_eq!(Frequency::Annual.period_start(t), d(2001, 1, 1));
        assert_eq!(Frequency::Seasonal.period_start(t), d(2000, 12, 1));
        assert_eq!(Frequency::Monthly.period_start(t), d(2001, 2, 1));
        assert_eq!(Frequency::Daily.period_start(t), d(2001, 2, 20));
    }

    #[test]
    fn test_codes() {
        for f in [
            Frequency::Annual,
            Frequency::Seasonal,
            Frequency::Monthly,
            Frequency::Daily,
            Frequency::Hourly,
        ] {
            let parsed: Frequency = f.to_string().parse().unwrap();
            assert_eq!(parsed, f);
        }
        assert!("W".parse::<Frequency>().is_err());
        assert_eq!(Frequency::Hourly.unit(), "Wh");
        assert_eq!(Frequency::Monthly.unit(), "Wh/day");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let f: Frequency = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(f, Frequency::Monthly);
        assert!(serde_json::from_str::<Frequency>("\"Q\"").is_err());
    }
}
