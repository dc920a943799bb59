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

#![deny(missing_docs)]

//! Sun geometry and plane-of-array irradiance for PV estimation.
//!
//! This crate knows where the sun is (rise and set times, altitude,
//! azimuth, how long it was up during each hour) and how much of the
//! irradiance measured on a horizontal surface reaches a tilted and
//! possibly tracking panel.
//!
//! All timestamps are UTC (see [`calendar::TimeIndex`]). Locations are
//! given in degrees, but every angle computed here is in Radians.

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(feature = "float")]
pub type Float = f32;

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(not(feature = "float"))]
pub type Float = f64;

#[cfg(feature = "float")]
const PI: Float = std::f32::consts::PI;

#[cfg(not(feature = "float"))]
const PI: Float = std::f64::consts::PI;

mod error;
pub use crate::error::{Result, SolarError};

/// Solar calculations. Based on Duffie and Beckman's excellent book,
/// but referenced to UTC instead of to a standard meridian.
///
/// Solar azimuth is measured clockwise from North (i.e., East is
/// π/2 and South is π), which is the convention used for
/// panel orientations as well.
pub mod solar;
pub use self::solar::{
    IrradianceType, PanelOrientation, PlaneIrradiance, RiseSet, RiseSetTable, Solar, SunAngle,
    SunPosition, Tracking,
};

/// Data associated to a specific Location
pub mod location;
pub use crate::location::Location;
