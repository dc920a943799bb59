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

use super::RiseSetTable;
use crate::error::check_len;
use crate::{Float, Location, Result, PI};
use calendar::TimeIndex;
use chrono::{Datelike, Timelike};

/// W/m2
pub const SOLAR_CONSTANT: Float = 1367.;

/// Correction of the solar constant for the eccentricity of
/// the orbit of the Earth (Spencer, 1971). `n` is the day of
/// the year.
///
/// The last coefficient is Spencer's 0.000077. Some sources
/// print it as 0.00077, which shifts the result by up to 0.0007.
pub fn eccentricity_correction(n: Float) -> Float {
    let b = (n - 1.) * 2. * PI / 365.;
    1.000110
        + 0.034221 * b.cos()
        + 0.001280 * b.sin()
        + 0.000719 * (2. * b).cos()
        + 0.000077 * (2. * b).sin()
}

/// Declination (in Radians) according to Cooper (1969)
pub fn cooper_declination(n: Float) -> Float {
    (23.45 as Float).to_radians() * (2. * PI * (284. + n) / 365.).sin()
}

/// Ratio between the global horizontal irradiance and the
/// extraterrestrial irradiance on a horizontal surface during
/// a certain hour.
///
/// Solar noon is estimated from the sunrise (i.e., `sunrise_hours`
/// plus half the length of the day) and the hour angle is evaluated
/// in the middle of the hour. Returns NaN when the sun is below the
/// horizon according to this estimate.
///
/// * `latitude`: Radians
/// * `n`: day of the year
/// * `hour`: hour of the day (0 to 23)
/// * `eccentricity`: see [`eccentricity_correction`]
/// * `sunrise_hours`: decimal hour of the sunrise
pub fn hourly_clearness_index(
    solar_constant: Float,
    latitude: Float,
    n: Float,
    hour: Float,
    eccentricity: Float,
    sunrise_hours: Float,
    global_horizontal: Float,
) -> Float {
    let delta = cooper_declination(n);
    let (sin_phi, cos_phi) = latitude.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    // Sunset hour angle (Equation 1.6.10)
    let ws = (-latitude.tan() * delta.tan()).clamp(-1., 1.).acos();
    let noon = sunrise_hours + ws.to_degrees() / 15.;
    let omega = (15. * (hour + 0.5 - noon)).to_radians();

    let extraterrestrial =
        solar_constant * eccentricity * (cos_phi * cos_delta * omega.cos() + sin_phi * sin_delta);
    if extraterrestrial <= 0. {
        return Float::NAN;
    }
    global_horizontal / extraterrestrial
}

/// Hourly clearness index of a series of global horizontal irradiance.
///
/// The sunrise of each day is taken from `rise_set`, or
/// calculated if missing.
pub fn clearness_index_series(
    times: &TimeIndex,
    global_horizontal: &[Float],
    location: &Location,
    rise_set: Option<&RiseSetTable>,
) -> Result<Vec<Float>> {
    check_len("global horizontal irradiance", times.len(), global_horizontal.len())?;
    let solar = location.get_solar();
    let latitude = location.latitude.to_radians();
    Ok(times
        .iter()
        .zip(global_horizontal)
        .map(|(t, ghi)| {
            let date = t.date_naive();
            let sunrise = match rise_set {
                Some(table) => table.get_or_compute(date, &solar).sunrise_hours(),
                None => solar.rise_set(date).sunrise_hours(),
            };
            let n = t.ordinal() as Float;
            hourly_clearness_index(
                SOLAR_CONSTANT,
                latitude,
                n,
                t.hour() as Float,
                eccentricity_correction(n),
                sunrise,
                *ghi,
            )
        })
        .collect())
}
