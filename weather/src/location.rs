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

use crate::{solar::Solar, Float, Result, SolarError};
use serde::{Deserialize, Serialize};

/// A point on Earth.
///
/// Unlike the angles computed by [`Solar`], coordinates are kept in
/// degrees, which is how they come in gridded datasets.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// The Latitude in Degrees.
    ///
    /// South is negative, North is Positive.
    pub latitude: Float,

    /// The Longitude in Degrees.
    ///
    /// West is Negative, East is Positive. Values between 180 and 360
    /// are accepted as well.
    pub longitude: Float,
}

impl Location {
    /// Builds a validated `Location`
    pub fn new(latitude: Float, longitude: Float) -> Result<Self> {
        let ret = Self {
            latitude,
            longitude,
        };
        ret.validate()?;
        Ok(ret)
    }

    /// Checks that the coordinates are within range
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=360.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(SolarError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Is this in the southern hemisphere?
    pub fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }

    /// Builds a [`Solar`] object corresponding to
    /// this location
    pub fn get_solar(&self) -> Solar {
        Solar::new(self.latitude.to_radians(), self.longitude.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Location::new(47.36, 8.55).is_ok());
        assert!(Location::new(-33.4, 289.2).is_ok());
        assert!(Location::new(90.5, 0.).is_err());
        assert!(Location::new(0., -181.).is_err());
        assert!(Location::new(Float::NAN, 0.).is_err());
    }

    #[test]
    fn test_serde() {
        let loc: Location = serde_json::from_str(r#"{"latitude": -33.4, "longitude": -70.7}"#).unwrap();
        assert!(loc.is_southern());
        assert!((loc.get_solar().latitude() - (-33.4 as Float).to_radians()).abs() < 1e-9);
    }
}
