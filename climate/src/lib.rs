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

//! Turns coarse irradiance into hourly irradiance.
//!
//! * [`diurnal`] spreads a daily value over the hours of the day
//!   following a sinusoidal shape between sunrise and sunset.
//! * [`pdf`] draws realistic daily values for every day of a month,
//!   season or year from per-month probability distributions.
//! * [`brl`] estimates the diffuse fraction of hourly irradiance with the
//!   Boland-Ridley-Lauret logistic model.

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
pub use crate::error::{ClimateError, Result};

/// Synthetic diurnal cycles
pub mod diurnal;
pub use crate::diurnal::{broadcast_daily, synthesize_day, synthesize_diurnal, SyntheticHours};

/// Diffuse fraction estimation
pub mod brl;
pub use crate::brl::{estimate_diffuse_fraction, BrlParameters};

/// Sampling of daily values from probability distributions
pub mod pdf;
pub use crate::pdf::{sample_month, sample_period, MonthlyPdf, PdfCell, PdfDataset, PdfTable};
