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

use calendar::CalendarError;
use thiserror::Error;
use weather::SolarError;

/// Errors of the synthesis and sampling routines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClimateError {
    /// A PDF table needs one distribution per month
    #[error("a PDF table needs 12 monthly distributions, found {0}")]
    MonthCount(usize),

    /// `xk` and `pk` must have the same length
    #[error("distribution for month {month} has {values} values but {probabilities} probabilities")]
    MalformedDistribution {
        /// Month (1 to 12)
        month: usize,
        /// Length of `xk`
        values: usize,
        /// Length of `pk`
        probabilities: usize,
    },

    /// Bin centres must be finite and non-negative
    #[error("distribution for month {month} has an invalid value {value} at bin {index}")]
    InvalidBin {
        /// Month (1 to 12)
        month: usize,
        /// Position of the bin
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Coarse periods are months, seasons or years
    #[error("cannot sample days for frequency '{0}'")]
    UnsupportedFrequency(calendar::Frequency),

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

    /// Problem with the geometry
    #[error(transparent)]
    Solar(#[from] SolarError),

    /// Problem with the time index
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Result type of this crate
pub type Result<T> = std::result::Result<T, ClimateError>;

pub(crate) fn check_len(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ClimateError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}
