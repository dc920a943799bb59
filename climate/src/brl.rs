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

use crate::error::check_len;
use crate::{Float, Result};
use calendar::TimeIndex;
use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use serde::{Deserialize, Serialize};
use weather::{Location, RiseSetTable};

/// Coefficients of the BRL model:
///
/// `d = 1 / (1 + exp(a0 + a1·kt + b1·AST + b2·α + b3·Kt + b4·ψ))`
///
/// where `kt` is the hourly clearness index, `AST` the apparent solar
/// time (hours), `α` the altitude of the sun (degrees), `Kt` the daily
/// clearness index and `ψ` the persistence of the clearness index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrlParameters {
    /// Intercept
    pub a0: Float,
    /// Hourly clearness index
    pub a1: Float,
    /// Apparent solar time
    pub b1: Float,
    /// Solar altitude
    pub b2: Float,
    /// Daily clearness index
    pub b3: Float,
    /// Persistence
    pub b4: Float,
}

impl BrlParameters {
    /// Lauret, Boland and Ridley (2013), fitted over several sites
    /// in the southern and northern hemispheres
    pub const LAURET_2013: Self = Self {
        a0: -5.32,
        a1: 7.28,
        b1: -0.03,
        b2: -0.0047,
        b3: 1.72,
        b4: 1.08,
    };

    /// Ridley, Boland and Lauret (2010)
    pub const RIDLEY_2010: Self = Self {
        a0: -5.38,
        a1: 6.63,
        b1: 0.006,
        b2: -0.007,
        b3: 1.75,
        b4: 1.31,
    };

    /// Evaluates the logistic function
    pub fn diffuse_fraction(
        &self,
        kt: Float,
        solar_time: Float,
        altitude: Float,
        daily_kt: Float,
        persistence: Float,
    ) -> Float {
        let exponent = self.a0
            + self.a1 * kt
            + self.b1 * solar_time
            + self.b2 * altitude
            + self.b3 * daily_kt
            + self.b4 * persistence;
        1. / (1. + exponent.exp())
    }
}

impl Default for BrlParameters {
    fn default() -> Self {
        Self::LAURET_2013
    }
}

/// Mean of the finite values, NaN if there are none
fn nan_mean(values: &[Float]) -> Float {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0., 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        Float::NAN
    } else {
        sum / n as Float
    }
}

/// Persistence of the clearness index for each hour of a day.
///
/// During the day it is the average of the previous and the next
/// hour (or whichever of them is available). At the hours of sunrise
/// and sunset only the hour that is inside of the day counts. At
/// night it is zero. `sunset` may be earlier than `sunrise`, when the
/// day crosses midnight UTC.
pub fn persistence(ks: &[Float; 24], sunrise: usize, sunset: usize) -> [Float; 24] {
    let daylight = |h: usize| {
        if sunrise <= sunset {
            h > sunrise && h < sunset
        } else {
            h > sunrise || h < sunset
        }
    };

    let mut psi = [0.; 24];
    for (h, p) in psi.iter_mut().enumerate() {
        *p = if h == sunrise {
            if h < 23 {
                ks[h + 1]
            } else {
                ks[h]
            }
        } else if h == sunset {
            if h > 0 {
                ks[h - 1]
            } else {
                ks[h]
            }
        } else if daylight(h) {
            let prev = if h > 0 { ks[h - 1] } else { Float::NAN };
            let next = if h < 23 { ks[h + 1] } else { Float::NAN };
            let avg = (prev + next) / 2.;
            if !avg.is_nan() {
                avg
            } else if prev.is_nan() {
                next
            } else {
                prev
            }
        } else {
            0.
        };
    }
    psi
}

/// Estimates the diffuse fraction of each hour from its
/// clearness index `kt`.
///
/// Days are UTC days. Hours with NaN clearness index produce NaN
/// diffuse fractions, which are left for the caller to handle.
pub fn estimate_diffuse_fraction(
    times: &TimeIndex,
    kt: &[Float],
    location: &Location,
    rise_set: Option<&RiseSetTable>,
    parameters: &BrlParameters,
) -> Result<Vec<Float>> {
    check_len("clearness index", times.len(), kt.len())?;
    let solar = location.get_solar();
    let stamps = times.as_slice();
    let mut ret = Vec::with_capacity(kt.len());

    let mut start = 0;
    while start < stamps.len() {
        let date = stamps[start].date_naive();
        let end = stamps[start..]
            .iter()
            .position(|t| t.date_naive() != date)
            .map(|i| start + i)
            .unwrap_or(stamps.len());

        let day_kt = &kt[start..end];
        let daily_kt = nan_mean(day_kt);

        let mut ks = [Float::NAN; 24];
        for (t, k) in stamps[start..end].iter().zip(day_kt) {
            ks[t.hour() as usize] = *k;
        }

        let rs = match rise_set {
            Some(table) => table.get_or_compute(date, &solar),
            None => solar.rise_set(date),
        };
        let sunrise = rs.sunrise.map(|t| t.hour() as usize).unwrap_or(0);
        let sunset = rs.sunset.map(|t| t.hour() as usize).unwrap_or(23);
        let psi = persistence(&ks, sunrise, sunset);

        for (t, k) in stamps[start..end].iter().zip(day_kt) {
            if k.is_nan() {
                ret.push(Float::NAN);
                continue;
            }
            let top: DateTime<Utc> = t.duration_trunc(Duration::hours(1)).unwrap_or(*t);
            let solar_time = solar.solar_time(top);
            let altitude = solar.sun_position(top).altitude.max(0.).to_degrees();
            let d = parameters.diffuse_fraction(
                *k,
                solar_time,
                altitude,
                daily_kt,
                psi[t.hour() as usize],
            );
            ret.push(d);
        }
        start = end;
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use weather::solar::clearness_index_series;

    #[test]
    fn test_logistic() {
        let p = BrlParameters::default();
        // Clear sky around noon is mostly direct
        let clear = p.diffuse_fraction(0.75, 12., 60., 0.7, 0.75);
        assert!(clear < 0.25, "clear = {}", clear);
        // Overcast is mostly diffuse
        let overcast = p.diffuse_fraction(0.1, 12., 20., 0.15, 0.1);
        assert!(overcast > 0.9, "overcast = {}", overcast);

        let exp = (-5.32 + 7.28 * 0.5 - 0.03 * 10. - 0.0047 * 30. + 1.72 * 0.4 + 1.08 * 0.45 as Float).exp();
        let expected = 1. / (1. + exp);
        assert!((p.diffuse_fraction(0.5, 10., 30., 0.4, 0.45) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_persistence() {
        let mut ks = [Float::NAN; 24];
        for h in 6..19 {
            ks[h] = 0.1 * (h - 5) as Float;
        }
        let psi = persistence(&ks, 6, 18);
        // Night
        assert_eq!(psi[2], 0.);
        assert_eq!(psi[21], 0.);
        // Sunrise uses the next hour, sunset the previous one
        assert_eq!(psi[6], ks[7]);
        assert_eq!(psi[18], ks[17]);
        // Average of the neighbours
        assert!((psi[10] - (ks[9] + ks[11]) / 2.).abs() < 1e-12);

        // A missing neighbour is skipped
        ks[12] = Float::NAN;
        let psi = persistence(&ks, 6, 18);
        assert_eq!(psi[11], ks[10]);
        assert_eq!(psi[13], ks[14]);
    }

    #[test]
    fn test_persistence_edges() {
        let ks = [0.5; 24];
        // Sunrise at the last hour of the day and sunset at the first
        let psi = persistence(&ks, 23, 0);
        assert_eq!(psi[23], 0.5);
        assert_eq!(psi[0], 0.5);
        // Crossing midnight
        let psi = persistence(&ks, 20, 8);
        assert_eq!(psi[2], 0.5);
        assert_eq!(psi[12], 0.);
    }

    #[test]
    fn test_estimate() {
        let location = Location::new(47.36, 8.55).unwrap();
        let start = Utc.with_ymd_and_hms(2000, 6, 1, 0, 0, 0).unwrap();
        let times = TimeIndex::hourly(start, 48);
        let ghi: Vec<Float> = (0..48)
            .map(|i| {
                let h = (i % 24) as Float;
                if (5.0..19.0).contains(&h) {
                    if i < 24 {
                        700. * ((h - 4.) * std::f64::consts::PI as Float / 15.).sin()
                    } else {
                        80.
                    }
                } else {
                    0.
                }
            })
            .collect();
        let kt = clearness_index_series(&times, &ghi, &location, None).unwrap();
        let d = estimate_diffuse_fraction(&times, &kt, &location, None, &BrlParameters::default()).unwrap();
        assert_eq!(d.len(), 48);
        assert!(d[0].is_nan());
        for (k, f) in kt.iter().zip(d.iter()) {
            if k.is_nan() {
                assert!(f.is_nan());
            } else {
                assert!(*f >= 0. && *f <= 1.);
            }
        }
        // The clear day is less diffuse than the overcast one
        assert!(d[11] < d[35], "{} vs {}", d[11], d[35]);

        assert!(estimate_diffuse_fraction(&times, &kt[1..], &location, None, &BrlParameters::default()).is_err());
    }
}
