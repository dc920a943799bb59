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

use crate::Float;
use calendar::CalendarError;
use thiserror::Error;

/// Errors raised by the geometry and projection routines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolarError {
    /// Latitude outside of [-90, 90] or longitude outside of [-180, 360]
    #[error("invalid location: latitude {latitude}, longitude {longitude} (degrees)")]
    InvalidLocation {
        /// Latitude, in degrees
        latitude: Float,
        /// Longitude, in degrees
        longitude: Float,
    },

    /// Tracking modes are 0 (fixed), 1 (single-axis) or 2 (dual-axis)
    #[error("invalid tracking mode {0}; expected 0 (fixed), 1 (single-axis) or 2 (dual-axis)")]
    InvalidTracking(i64),

    /// Cumulative irradiance needs at least one sub-step per hour
    #[error("cumulative irradiance needs at least one sub-step per hour")]
    InvalidSubsteps,

    /// Two series that should be aligned are not
    #[error("length mismatch in '{field}': expected {expected} values, found {found}")]
    LengthMismatch {
        /// Name of the offending series
        field: &'static str,
        /// Expected length
        expected: usize,
        /// Found length
        found: usize,
    },

    /// A problem with the time index
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Result type of this crate
pub type Result<T> = std::result::Result<T, SolarError>;

/// Checks that a series has the expected length
pub(crate) fn check_len(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SolarError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}
