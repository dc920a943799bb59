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
use crate::{Float, Result, PI};
use calendar::TimeIndex;
use chrono::NaiveDate;
use weather::{Location, RiseSetTable};

/// Days shorter than this (in hours) put all their
/// energy in the hour of the sunrise
const MIN_DAY_LENGTH: Float = 1e-9;

/// Hourly values built out of daily ones
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticHours {
    /// 24 timestamps per day
    pub times: TimeIndex,
    /// One value per timestamp
    pub values: Vec<Float>,
    /// Sunrises and sunsets used for building the cycle, which
    /// are needed again further down the pipeline
    pub rise_set: RiseSetTable,
}

/// Integral of `sin(π(x - sunrise)/length)` between `a` and `b`
fn sine_integral(a: Float, b: Float, sunrise: Float, length: Float) -> Float {
    let k = PI / length;
    ((k * (a - sunrise)).cos() - (k * (b - sunrise)).cos()) / k
}

/// Fraction of the daily energy received during each hour of the day,
/// following half a sine wave between sunrise and sunset (decimal UTC
/// hours). The lit window may cross midnight, in which case its end is
/// wrapped to the beginning of the day.
fn daily_shape(sunrise: Float, sunset: Float) -> [Float; 24] {
    let mut shape = [0.; 24];
    let sunrise_bucket = (sunrise.floor().max(0.) as usize).min(23);

    let mut length = sunset - sunrise;
    if length < 0. {
        length += 24.;
    }
    if length < MIN_DAY_LENGTH {
        shape[sunrise_bucket] = 1.;
        return shape;
    }

    let end = sunrise + length;
    for (h, s) in shape.iter_mut().enumerate() {
        for offset in [0., 24.] {
            let a = (h as Float + offset).max(sunrise);
            let b = (h as Float + 1. + offset).min(end);
            if b > a {
                *s += sine_integral(a, b, sunrise, length);
            }
        }
    }

    let total: Float = shape.iter().sum();
    if total > 0. {
        shape.iter_mut().for_each(|s| *s /= total);
    } else {
        shape = [0.; 24];
        shape[sunrise_bucket] = 1.;
    }
    shape
}

/// Spreads a daily mean `value` over the 24 hours of a day.
///
/// The result is zero outside of the lit window, and its mean
/// is exactly `value`. Non-positive or non-finite values produce
/// a day of zeroes.
pub fn synthesize_day(value: Float, sunrise: Float, sunset: Float, factor: Float) -> [Float; 24] {
    let mut hourly = [0.; 24];
    if !value.is_finite() || value <= 0. {
        return hourly;
    }
    let shape = daily_shape(sunrise, sunset);
    for (v, s) in hourly.iter_mut().zip(shape.iter()) {
        *v = value * factor * s;
    }

    let mean = hourly.iter().sum::<Float>() / 24.;
    let correction = mean / value;
    if correction > 0. && correction.is_finite() {
        hourly.iter_mut().for_each(|v| *v /= correction);
    }
    hourly
}

/// Builds an hourly series out of one value per day.
///
/// `dates` must be strictly increasing. If `rise_set` does not
/// contain some of them, they are calculated.
pub fn synthesize_diurnal(
    dates: &[NaiveDate],
    values: &[Float],
    location: &Location,
    rise_set: Option<&RiseSetTable>,
    factor: Float,
) -> Result<SyntheticHours> {
    check_len("daily values", dates.len(), values.len())?;
    let times = TimeIndex::hours_of_days(dates)?;
    let rise_set = match rise_set {
        Some(t) => t.clone(),
        None => RiseSetTable::for_days(dates, location),
    };

    let solar = location.get_solar();
    let mut hourly = Vec::with_capacity(24 * dates.len());
    for (date, value) in dates.iter().zip(values) {
        let rs = rise_set.get_or_compute(*date, &solar);
        hourly.extend(synthesize_day(
            *value,
            rs.sunrise_hours(),
            rs.sunset_hours(),
            factor,
        ));
    }

    Ok(SyntheticHours {
        times,
        values: hourly,
        rise_set,
    })
}

/// Repeats each daily value 24 times (e.g., for temperatures,
/// which carry no information about the diurnal cycle)
pub fn broadcast_daily(values: &[Float]) -> Vec<Float> {
    values
        .iter()
        .flat_map(|v| std::iter::repeat(*v).take(24))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather::solar::{NO_SUNRISE_HOURS, NO_SUNSET_HOURS};

    fn mean(v: &[Float]) -> Float {
        v.iter().sum::<Float>() / v.len() as Float
    }

    #[test]
    fn test_preserves_mean() {
        for (value, sunrise, sunset) in [
            (250., 6.3, 18.1),
            (1., 4.2, 20.8),
            (733.3, 7.9, 8.4),
            (0.001, NO_SUNRISE_HOURS, NO_SUNSET_HOURS),
            (120., 21.8, 7.6),
        ] {
            let day = synthesize_day(value, sunrise, sunset, 24.);
            assert!((mean(&day) - value).abs() < 1e-10, "{} vs {}", mean(&day), value);
            assert!(day.iter().all(|v| *v >= 0.));
        }
    }

    #[test]
    fn test_shape() {
        let day = synthesize_day(300., 6.0, 18.0, 24.);
        // Dark outside the window
        assert!(day[..6].iter().all(|v| *v == 0.));
        assert!(day[18..].iter().all(|v| *v == 0.));
        // Symmetric around noon
        assert!((day[11] - day[12]).abs() < 1e-9);
        assert!((day[6] - day[17]).abs() < 1e-9);
        assert!(day[11] > day[8]);
    }

    #[test]
    fn test_crossing_midnight() {
        // Tokyo in winter: the sun rises before midnight UTC
        let day = synthesize_day(100., 21.8, 7.6, 24.);
        assert!(day[22] > 0.);
        assert!(day[3] > 0.);
        assert_eq!(day[12], 0.);
        assert!(day[2] > day[23]);
    }

    #[test]
    fn test_degenerate_day() {
        let day = synthesize_day(100., 5.2, 5.2, 24.);
        assert!((day[5] - 2400.).abs() < 1e-9);
        assert_eq!(day.iter().filter(|v| **v > 0.).count(), 1);
    }

    #[test]
    fn test_nothing_to_spread() {
        assert_eq!(synthesize_day(0., 6., 18., 24.), [0.; 24]);
        assert_eq!(synthesize_day(-3., 6., 18., 24.), [0.; 24]);
        assert_eq!(synthesize_day(Float::NAN, 6., 18., 24.), [0.; 24]);
    }

    #[test]
    fn test_synthesize_diurnal() {
        let location = Location::new(47.36, 8.55).unwrap();
        let dates: Vec<NaiveDate> = [(1, 15), (4, 15), (7, 15)]
            .iter()
            .map(|(m, d)| NaiveDate::from_ymd_opt(2001, *m, *d).unwrap())
            .collect();
        let values = [40., 180., 290.];
        let s = synthesize_diurnal(&dates, &values, &location, None, 24.).unwrap();
        assert_eq!(s.times.len(), 72);
        assert_eq!(s.values.len(), 72);
        assert_eq!(s.rise_set.len(), 3);
        for (i, v) in values.iter().enumerate() {
            let day = &s.values[24 * i..24 * (i + 1)];
            assert!((mean(day) - v).abs() < 1e-10);
            // Night at midnight UTC in Zurich
            assert_eq!(day[0], 0.);
        }

        assert!(synthesize_diurnal(&dates, &values[1..], &location, None, 24.).is_err());
    }

    #[test]
    fn test_broadcast() {
        let b = broadcast_daily(&[1., 2.]);
        assert_eq!(b.len(), 48);
        assert_eq!(b[23], 1.);
        assert_eq!(b[24], 2.);
    }
}
