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

use crate::Frequency;
use thiserror::Error;

/// Everything that can go wrong when building or interpreting
/// a [`TimeIndex`](crate::TimeIndex)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalendarError {
    /// Solar geometry needs UTC timestamps. Any other offset is rejected
    /// instead of silently converted.
    #[error("timestamp at position {position} is not in UTC (it has an offset of {offset_seconds} seconds)")]
    NonUtcTimestamp {
        /// Position of the offending timestamp
        position: usize,
        /// Offset from UTC, in seconds
        offset_seconds: i32,
    },

    /// Timestamps must be strictly increasing
    #[error("time index is not strictly increasing at position {0}")]
    Unsorted(usize),

    /// A timestamp could not be parsed
    #[error("could not parse timestamp '{0}'")]
    InvalidTimestamp(String),

    /// The frequency requested by the user contradicts the one
    /// inferred from the data
    #[error("requested frequency '{requested}' does not match the '{detected}' spacing of the data")]
    FrequencyMismatch {
        /// What the user asked for
        requested: Frequency,
        /// What the spacing of the data says
        detected: Frequency,
    },

    /// Nothing was requested and nothing could be inferred
    #[error("could not infer the frequency of the time index; please specify it")]
    UndetectableFrequency,

    /// A frequency code other than A, S, M, D or H
    #[error("unknown frequency code '{0}'")]
    UnknownFrequency(String),
}

/// Result type of this crate
pub type Result<T> = std::result::Result<T, CalendarError>;
