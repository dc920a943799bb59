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

use super::SunAngle;
use crate::error::check_len;
use crate::{Float, Location, Result, SolarError, PI};
use serde::{Deserialize, Serialize};

/// How the panel follows the sun.
///
/// Serialized as the integers 0, 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "i64", into = "i64")]
pub enum Tracking {
    /// The panel does not move (0)
    #[default]
    Fixed,
    /// The panel rotates around one axis, defined by the
    /// tilt and azimuth of the panel (1)
    SingleAxis,
    /// The panel always faces the sun (2)
    DualAxis,
}

impl TryFrom<i64> for Tracking {
    type Error = SolarError;

    fn try_from(v: i64) -> Result<Self> {
        match v {
            0 => Ok(Self::Fixed),
            1 => Ok(Self::SingleAxis),
            2 => Ok(Self::DualAxis),
            _ => Err(SolarError::InvalidTracking(v)),
        }
    }
}

impl From<Tracking> for i64 {
    fn from(t: Tracking) -> Self {
        match t {
            Tracking::Fixed => 0,
            Tracking::SingleAxis => 1,
            Tracking::DualAxis => 2,
        }
    }
}

/// Orientation of the aperture of a panel (or of the tracking axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOrientation {
    /// Tilt in Radians. 0 is horizontal.
    pub tilt: Float,

    /// Azimuth in Radians, clockwise from North. π faces the equator
    /// (the hemisphere correction is applied when projecting).
    pub azimuth: Float,

    /// How the panel moves
    pub tracking: Tracking,

    /// Reflectance of the ground (0 to 1)
    pub albedo: Float,
}

impl PanelOrientation {
    /// Builds an orientation from tilt and azimuth in degrees
    pub fn from_degrees(tilt: Float, azimuth: Float, tracking: Tracking, albedo: Float) -> Self {
        Self {
            tilt: tilt.to_radians(),
            azimuth: azimuth.to_radians(),
            tracking,
            albedo,
        }
    }
}

/// Irradiance (W/m2) on the plane of the panel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneIrradiance {
    /// Direct (beam) component
    pub direct: Float,
    /// Sky diffuse plus ground reflected component
    pub diffuse: Float,
}

impl PlaneIrradiance {
    /// Direct plus diffuse
    pub fn total(&self) -> Float {
        self.direct + self.diffuse
    }
}

/// Angle of incidence of the beam on the panel and the tilt the panel
/// actually has at that moment (which differs from the configured one
/// when tracking). Both in Radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incidence {
    /// Angle between the beam and the normal of the panel
    pub angle: Float,
    /// Current tilt of the panel
    pub panel_tilt: Float,
}

fn non_negative(v: Float) -> Float {
    if v.is_finite() {
        v.max(0.)
    } else {
        0.
    }
}

/// Direct normal irradiance from direct horizontal irradiance
pub fn direct_normal(direct_horizontal: Float, angle: &SunAngle) -> Float {
    non_negative(direct_horizontal * angle.beam_factor())
}

/// Direct normal irradiance for a whole series
pub fn direct_normal_series(direct_horizontal: &[Float], angles: &[SunAngle]) -> Result<Vec<Float>> {
    check_len("sun angles", direct_horizontal.len(), angles.len())?;
    Ok(direct_horizontal
        .iter()
        .zip(angles)
        .map(|(d, a)| direct_normal(*d, a))
        .collect())
}

/// Incidence angle of the beam on a panel with tilt `tilt` and azimuth
/// `panel_azimuth` (already corrected for the hemisphere).
pub fn incidence(angle: &SunAngle, tilt: Float, panel_azimuth: Float, tracking: Tracking) -> Incidence {
    let alt = angle.altitude;
    let delta_az = angle.azimuth - panel_azimuth;

    match tracking {
        Tracking::Fixed => {
            let cos_inc = alt.sin() * tilt.cos() + alt.cos() * tilt.sin() * delta_az.cos();
            Incidence {
                angle: cos_inc.clamp(-1., 1.).acos(),
                panel_tilt: tilt,
            }
        }
        Tracking::SingleAxis if tilt.abs() < 1e-9 => {
            // Horizontal axis
            let x = alt.cos() * delta_az.cos();
            Incidence {
                angle: (1. - x * x).max(0.).sqrt().min(1.).acos(),
                panel_tilt: (delta_az.sin() / alt.tan()).atan(),
            }
        }
        Tracking::SingleAxis => {
            let x = (alt + tilt).cos() - tilt.cos() * alt.cos() * (1. - delta_az.cos());
            let numerator = alt.cos() * delta_az.sin();
            let denominator = (alt - tilt).sin() + tilt.sin() * alt.cos() * (1. - delta_az.cos());
            Incidence {
                angle: (1. - x * x).max(0.).sqrt().min(1.).acos(),
                panel_tilt: (numerator / denominator).atan(),
            }
        }
        Tracking::DualAxis => Incidence {
            angle: 0.,
            panel_tilt: angle.zenith,
        },
    }
}

/// Projects direct and diffuse horizontal irradiance onto the plane
/// of the panel, with an isotropic sky and ground reflection.
///
/// Results are never negative; NaN becomes zero.
pub fn project(
    direct_horizontal: Float,
    diffuse_horizontal: Float,
    location: &Location,
    orientation: &PanelOrientation,
    angle: &SunAngle,
) -> PlaneIrradiance {
    let mut panel_azimuth = orientation.azimuth;
    if location.is_southern() {
        panel_azimuth += PI;
    }

    let dni = direct_horizontal * angle.beam_factor();
    let inc = incidence(angle, orientation.tilt, panel_azimuth, orientation.tracking);

    let direct = non_negative(dni * inc.angle.cos());

    let cos_tilt = inc.panel_tilt.cos();
    let sky = diffuse_horizontal * (1. + cos_tilt) / 2.;
    let ground =
        orientation.albedo * (direct_horizontal + diffuse_horizontal) * (1. - cos_tilt) / 2.;
    let diffuse = non_negative(sky + ground);

    PlaneIrradiance { direct, diffuse }
}

/// [`project`] over aligned series
pub fn project_series(
    direct_horizontal: &[Float],
    diffuse_horizontal: &[Float],
    location: &Location,
    orientation: &PanelOrientation,
    angles: &[SunAngle],
) -> Result<Vec<PlaneIrradiance>> {
    let n = angles.len();
    check_len("direct horizontal irradiance", n, direct_horizontal.len())?;
    check_len("diffuse horizontal irradiance", n, diffuse_horizontal.len())?;
    Ok(angles
        .iter()
        .zip(direct_horizontal.iter().zip(diffuse_horizontal))
        .map(|(a, (dir, dif))| project(*dir, *dif, location, orientation, a))
        .collect())
}
