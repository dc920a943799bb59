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

use crate::{Float, PI};
use calendar::{day_of_year, fractional_hour};
use chrono::{DateTime, Utc};

mod rise_set;
pub use rise_set::{
    decimal_hours, sun_rise_set, Event, RiseSet, RiseSetTable, NO_SUNRISE_HOURS,
    NO_SUNSET_HOURS,
};
mod angles;
pub use angles::{sun_angles, IrradianceType, SunAngle, DEFAULT_SUBSTEPS};
mod aperture;
pub use aperture::{
    direct_normal, direct_normal_series, incidence, project, project_series, Incidence,
    PanelOrientation, PlaneIrradiance, Tracking,
};
mod clearness;
pub use clearness::{
    clearness_index_series, cooper_declination, eccentricity_correction, hourly_clearness_index,
    SOLAR_CONSTANT,
};

/// Where the sun is at a certain instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Altitude above the horizon, in Radians. Negative at night.
    pub altitude: Float,

    /// Azimuth, clockwise from North, in Radians (between 0 and 2π)
    pub azimuth: Float,
}

impl SunPosition {
    /// The zenith angle (in Radians), i.e., `π/2 - altitude`
    pub fn zenith(&self) -> Float {
        PI / 2. - self.altitude
    }
}

/// Sun geometry for a specific point on Earth, referenced to UTC.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solar {
    /// Latitude in Radians. South is negative, North is positive.
    latitude: Float,

    /// Longitude (in Radians). East is positive, West is negative.
    longitude: Float,
}

impl Solar {
    /// Builds a Solar object from a Latitude and
    /// Longitude (in Radians)
    pub fn new(latitude: Float, longitude: Float) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in Radians
    pub fn latitude(&self) -> Float {
        self.latitude
    }

    /// Longitude in Radians
    pub fn longitude(&self) -> Float {
        self.longitude
    }

    /// The Equation of Time (in minutes) based on the day of year (can have decimals)
    pub fn equation_of_time(&self, n: Float) -> Float {
        let b = self.b(n);
        229.2
            * (0.000075 + 0.001868 * b.cos()
                - 0.032077 * b.sin()
                - 0.014615 * (2.0 * b).cos()
                - 0.04089 * (2.0 * b).sin())
    }

    /// Declination (in Radians), according to Equation 1.6.1B
    pub fn declination(&self, n: Float) -> Float {
        let b = self.b(n);

        0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2. * b).cos()
            + 0.000907 * (2. * b).sin()
            - 0.002697 * (3. * b).cos()
            + 0.001480 * (3. * b).sin()
    }

    /// Equation 1.4.2 in the Book.
    #[inline(always)]
    fn b(&self, n: Float) -> Float {
        (n - 1.0) * 2.0 * PI / 365.0
    }

    /// Normal extraterrestrial radiation (Gon)
    /// Equation 1.4.1b from Duffie and Beckman
    pub fn normal_extraterrestrial_radiation(&self, n: Float) -> Float {
        SOLAR_CONSTANT * eccentricity_correction(n)
    }

    /// Apparent solar time at `t`, in hours between 0 and 24
    pub fn solar_time(&self, t: DateTime<Utc>) -> Float {
        let n = day_of_year(t);
        let st = fractional_hour(t)
            + self.longitude.to_degrees() / 15.
            + self.equation_of_time(n) / 60.;
        st.rem_euclid(24.)
    }

    /// Returns the hour angle in Radians. Negative in the
    /// morning, positive in the afternoon
    pub fn hour_angle(&self, t: DateTime<Utc>) -> Float {
        ((self.solar_time(t) - 12.) * 15.).to_radians()
    }

    /// Calculates the position of the sun at a certain UTC instant.
    ///
    /// The altitude is not clipped, so it is negative when the
    /// sun is below the horizon.
    pub fn sun_position(&self, t: DateTime<Utc>) -> SunPosition {
        let n = day_of_year(t);
        let delta = self.declination(n);
        let omega = self.hour_angle(t);

        let (sin_phi, cos_phi) = self.latitude.sin_cos();
        let (sin_delta, cos_delta) = delta.sin_cos();
        let (sin_omega, cos_omega) = omega.sin_cos();

        // Equation 1.6.5, for Zenith
        let sin_alt = (sin_phi * sin_delta + cos_phi * cos_delta * cos_omega).clamp(-1., 1.);
        let altitude = sin_alt.asin();

        let y = -cos_delta * sin_omega;
        let x = sin_delta * cos_phi - cos_delta * cos_omega * sin_phi;
        let azimuth = y.atan2(x).rem_euclid(2. * PI);

        SunPosition { altitude, azimuth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn are_close(x: Float, y: Float, precision: Float) -> bool {
        if (x - y).abs() < precision {
            return true;
        }
        println!("x = {}, y = {}", x, y);
        false
    }

    #[test]
    fn test_declination() {
        fn check(n: Float, expected_d: Float) {
            let solar = Solar::new(0.0, 0.);
            let d = solar.declination(n);
            // Table 1.6.1 does not say at what hour these were
            // calculated, hence the 1.8 deg. margin
            assert!(are_close(d.to_degrees(), expected_d, 1.8));
        }

        // From table 1.6.1... declinations are in degrees
        check(17., -20.9);
        check(47., -13.0);
        check(75., -2.4);
        check(105., 9.4);
        check(135., 18.8);
        check(162., 23.1);
        check(198., 21.2);
        check(228., 13.5);
        check(258., 2.2);
        check(288., -9.6);
        check(318., -18.9);
        check(344., -23.0);
    }

    #[test]
    fn test_hour_angle() {
        // At longitude 0 the solar time only differs from UTC
        // in the equation of time (about -14 minutes on Feb 13)
        let solar = Solar::new(0., 0.);
        let t = Utc.with_ymd_and_hms(2001, 2, 13, 12, 14, 0).unwrap();
        assert!(are_close(solar.hour_angle(t).to_degrees(), 0., 0.25));

        // Moving east makes it later
        let solar = Solar::new(0., (15.0 as Float).to_radians());
        let t = Utc.with_ymd_and_hms(2001, 2, 13, 11, 14, 0).unwrap();
        assert!(are_close(solar.hour_angle(t).to_degrees(), 0., 0.25));
        let t = Utc.with_ymd_and_hms(2001, 2, 13, 12, 14, 0).unwrap();
        assert!(are_close(solar.hour_angle(t).to_degrees(), 15., 0.25));
    }

    #[test]
    fn test_sun_position() {
        // Zurich, close to solar noon on the summer solstice
        let solar = Solar::new((47.36 as Float).to_radians(), (8.55 as Float).to_radians());
        let t = Utc.with_ymd_and_hms(2000, 6, 21, 11, 26, 0).unwrap();
        let p = solar.sun_position(t);
        // 90 - 47.36 + 23.44
        assert!(are_close(p.altitude.to_degrees(), 66.08, 0.3));
        assert!(are_close(p.azimuth.to_degrees(), 180., 2.));
        assert!(are_close(p.zenith().to_degrees(), 90. - 66.08, 0.3));

        // Morning sun is in the East, afternoon sun is in the West
        let morning = solar.sun_position(Utc.with_ymd_and_hms(2000, 6, 21, 6, 0, 0).unwrap());
        assert!(morning.azimuth > 0. && morning.azimuth < PI);
        let afternoon = solar.sun_position(Utc.with_ymd_and_hms(2000, 6, 21, 16, 0, 0).unwrap());
        assert!(afternoon.azimuth > PI && afternoon.azimuth < 2. * PI);

        // Midnight... below the horizon
        let night = solar.sun_position(Utc.with_ymd_and_hms(2000, 6, 21, 23, 30, 0).unwrap());
        assert!(night.altitude < 0.);
    }

    #[test]
    fn test_southern_noon() {
        // At noon in the southern hemisphere the sun is in the North
        let solar = Solar::new((-33.45 as Float).to_radians(), (-70.66 as Float).to_radians());
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 16, 45, 0).unwrap();
        let p = solar.sun_position(t);
        assert!(p.azimuth < 0.3 || p.azimuth > 2. * PI - 0.3, "azimuth = {}", p.azimuth);
        assert!(p.altitude > 1.2);
    }

    #[test]
    fn test_solar_time() {
        let solar = Solar::new(0., (-90. as Float).to_radians());
        // 6 hours behind UTC (plus the equation of time), wrapped
        let t = Utc.with_ymd_and_hms(2001, 6, 11, 3, 0, 0).unwrap();
        let st = solar.solar_time(t);
        assert!(st > 20.5 && st < 21.5, "st = {}", st);
    }
}
