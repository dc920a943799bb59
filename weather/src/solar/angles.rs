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

use super::{RiseSet, RiseSetTable, Solar};
use crate::{Float, Location, Result, SolarError, PI};
use calendar::TimeIndex;
use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

/// Default number of sub-steps per hour for [`IrradianceType::Cumulative`]
/// (i.e., one every 15 minutes)
pub const DEFAULT_SUBSTEPS: usize = 4;

/// Zenith angles above this (in degrees) are ignored when averaging
/// `1/cos(zenith)`, as it grows without bound close to the horizon
const MAX_CUMULATIVE_ZENITH: Float = 89.0;

/// What each irradiance value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IrradianceType {
    /// Irradiance at one point in time (or an hourly value
    /// best represented by the middle of the hour)
    #[default]
    Instantaneous,

    /// Running mean over the hour. The geometry is then
    /// averaged over `substeps` points within each hour.
    Cumulative {
        /// Number of points per hour
        substeps: usize,
    },
}

impl IrradianceType {
    /// Checks the number of sub-steps
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Cumulative { substeps: 0 } => Err(SolarError::InvalidSubsteps),
            _ => Ok(()),
        }
    }
}

/// Sun geometry representing one hour.
///
/// When the sun is below the horizon every field is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SunAngle {
    /// Altitude (Radians), never negative
    pub altitude: Float,

    /// Azimuth (Radians), clockwise from North
    pub azimuth: Float,

    /// Zenith (Radians), computed before clipping the altitude
    pub zenith: Float,

    /// Minutes of the hour during which the sun was up (0 to 60)
    pub duration: Float,

    /// Mean of `1/cos(zenith)` over the hour, for cumulative
    /// irradiance
    pub cumulative_factor: Option<Float>,
}

impl SunAngle {
    /// The sun is down
    pub fn dark() -> Self {
        Self {
            zenith: PI / 2.,
            ..Self::default()
        }
    }

    /// Was the sun up at some point during this hour?
    pub fn is_lit(&self) -> bool {
        self.duration > 0.
    }

    /// Factor that transforms direct horizontal irradiance into direct
    /// normal irradiance: the risen fraction of the hour divided by
    /// `cos(zenith)`, or the averaged factor for cumulative data.
    pub fn beam_factor(&self) -> Float {
        if !self.is_lit() {
            return 0.;
        }
        match self.cumulative_factor {
            Some(f) => f,
            None => {
                let cos_zenith = self.zenith.cos();
                if cos_zenith <= 0. {
                    0.
                } else {
                    self.duration / 60. / cos_zenith
                }
            }
        }
    }
}

/// Minutes between two instants
fn minutes(later: DateTime<Utc>, earlier: DateTime<Utc>) -> Float {
    (later - earlier).num_milliseconds() as Float / 60_000.
}

fn plus_minutes(t: DateTime<Utc>, m: Float) -> DateTime<Utc> {
    t + Duration::milliseconds((m * 60_000.).round() as i64)
}

/// Illuminated minutes of the hour starting at `hour_start` and the
/// instant at which the geometry should be evaluated
fn lit_span(hour_start: DateTime<Utc>, rise_set: &RiseSet) -> (Float, DateTime<Utc>) {
    let hour_end = hour_start + Duration::hours(1);
    let within = |t: Option<DateTime<Utc>>| t.filter(|t| *t >= hour_start && *t < hour_end);

    match (within(rise_set.sunrise), within(rise_set.sunset)) {
        (None, None) => (60., plus_minutes(hour_start, 30.)),
        (Some(rise), None) => {
            let duration = minutes(hour_end, rise);
            (duration, plus_minutes(rise, duration / 2.))
        }
        (None, Some(set)) => {
            let duration = minutes(set, hour_start);
            (duration, plus_minutes(hour_start, duration / 2.))
        }
        (Some(rise), Some(set)) if set > rise => {
            let duration = minutes(set, rise);
            (duration, plus_minutes(rise, duration / 2.))
        }
        // Set early in the hour and rose again before its end
        (Some(rise), Some(set)) => {
            let duration = 60. - minutes(rise, set);
            (duration, plus_minutes(hour_start, 30.))
        }
    }
}

/// Mean of `1/cos(zenith)` over `substeps` evenly spaced points
/// of the hour starting at `hour_start`
fn cumulative_factor(solar: &Solar, hour_start: DateTime<Utc>, substeps: usize) -> Float {
    let step = 60. / substeps as Float;
    let limit = MAX_CUMULATIVE_ZENITH.to_radians();
    let sum: Float = (0..substeps)
        .map(|i| {
            let t = plus_minutes(hour_start, (i as Float + 0.5) * step);
            let zenith = solar.sun_position(t).zenith();
            if zenith > limit {
                0.
            } else {
                1. / zenith.cos()
            }
        })
        .sum();
    sum / substeps as Float
}

/// Calculates the [`SunAngle`] of the hour containing each timestamp.
///
/// If no `rise_set` table is given (or a day is missing from it),
/// sunrise and sunset are calculated on the fly.
///
/// The geometry of each hour is evaluated at the middle of its lit
/// span. Hours in which that point is at or below the horizon are
/// dark, including sunrise and sunset hours in which the sun is up
/// for only a minute or two (sunrise is defined by the upper limb,
/// so the centre of the sun is still below the horizon then).
pub fn sun_angles(
    times: &TimeIndex,
    location: &Location,
    rise_set: Option<&RiseSetTable>,
    irradiance_type: IrradianceType,
) -> Result<Vec<SunAngle>> {
    irradiance_type.validate()?;
    let solar = location.get_solar();
    let computed;
    let table = match rise_set {
        Some(t) => t,
        None => {
            computed = RiseSetTable::for_days(&times.unique_days(), location);
            &computed
        }
    };

    times
        .iter()
        .map(|t| {
            let hour_start = t.duration_trunc(Duration::hours(1)).unwrap_or(*t);
            let rs = table.get_or_compute(t.date_naive(), &solar);
            let (duration, eval) = lit_span(hour_start, &rs);

            let position = solar.sun_position(eval);
            if position.altitude <= 0. || duration <= 0. {
                return Ok(SunAngle::dark());
            }
            let cumulative_factor = match irradiance_type {
                IrradianceType::Instantaneous => None,
                IrradianceType::Cumulative { substeps } => {
                    Some(cumulative_factor(&solar, hour_start, substeps))
                }
            };
            Ok(SunAngle {
                altitude: position.altitude,
                azimuth: position.azimuth,
                zenith: position.zenith(),
                duration,
                cumulative_factor,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn zurich() -> Location {
        Location::new(47.36, 8.55).unwrap()
    }

    fn winter_day() -> Vec<SunAngle> {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let times = TimeIndex::hourly(start, 24);
        sun_angles(&times, &zurich(), None, IrradianceType::Instantaneous).unwrap()
    }

    #[test]
    fn test_durations() {
        let angles = winter_day();
        // Sunrise at about 07:13
        assert!(angles[7].duration > 46.5 && angles[7].duration < 47.8, "{}", angles[7].duration);
        // Full hours
        assert_eq!(angles[12].duration, 60.);
        // Sunset at about 15:45
        assert!(angles[15].duration > 44.5 && angles[15].duration < 45.8, "{}", angles[15].duration);
        // Night
        assert_eq!(angles[16], SunAngle::dark());
        assert_eq!(angles[3], SunAngle::dark());
    }

    #[test]
    fn test_late_sunrise_is_dark() {
        let solar = zurich().get_solar();
        let mut day = chrono::NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let mut found = false;
        for _ in 0..365 {
            let sunrise = solar.rise_set(day).sunrise.unwrap();
            if sunrise.minute() >= 58 {
                let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
                let times = TimeIndex::hourly(start, 24);
                let angles = sun_angles(&times, &zurich(), None, IrradianceType::Instantaneous).unwrap();
                assert_eq!(angles[sunrise.hour() as usize], SunAngle::dark());
                assert!(angles[sunrise.hour() as usize + 1].is_lit());
                found = true;
                break;
            }
            day = day.succ_opt().unwrap();
        }
        assert!(found);
    }

    #[test]
    fn test_invariants() {
        let start = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let times = TimeIndex::hourly(start, 24 * 365);
        for lat in [-70., -33.4, 0., 47.36, 78.2] {
            let location = Location::new(lat, 100.).unwrap();
            let angles = sun_angles(&times, &location, None, IrradianceType::Instantaneous).unwrap();
            for a in angles {
                assert!(a.duration >= 0. && a.duration <= 60.);
                assert!(a.altitude >= 0.);
                if a.altitude <= 0. {
                    assert_eq!(a.duration, 0.);
                    assert_eq!(a.azimuth, 0.);
                }
                assert!((a.zenith - (PI / 2. - a.altitude)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_cumulative() {
        let start = Utc.with_ymd_and_hms(2000, 6, 21, 0, 0, 0).unwrap();
        let times = TimeIndex::hourly(start, 24);
        let cumulative = IrradianceType::Cumulative {
            substeps: DEFAULT_SUBSTEPS,
        };
        let angles = sun_angles(&times, &zurich(), None, cumulative).unwrap();
        let noon = angles[11];
        let factor = noon.cumulative_factor.unwrap();
        // Close to 1/cos(zenith) near noon
        assert!((factor - 1. / noon.zenith.cos()).abs() < 0.02);
        assert_eq!(noon.beam_factor(), factor);
        assert_eq!(angles[0].beam_factor(), 0.);

        let bad = IrradianceType::Cumulative { substeps: 0 };
        assert_eq!(
            sun_angles(&times, &zurich(), None, bad),
            Err(SolarError::InvalidSubsteps)
        );
    }

    #[test]
    fn test_beam_factor() {
        let angles = winter_day();
        let noon = angles[11];
        assert!((noon.beam_factor() - 1. / noon.zenith.cos()).abs() < 1e-12);
        let sunrise = angles[7];
        let expected = sunrise.duration / 60. / sunrise.zenith.cos();
        assert!((sunrise.beam_factor() - expected).abs() < 1e-12);
    }
}
