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

//! Time handling for gridded irradiance series. Everything in here
//! works in UTC, because solar geometry is computed from UTC instants and
//! the rest of the workspace refuses to guess time zones.
//!
//! The two main pieces are the [`TimeIndex`] (an ordered, UTC-validated
//! axis of timestamps) and the [`Frequency`] of that axis, which can be
//! detected from the spacing of the timestamps.
//!
//! ```
//! use calendar::{Frequency, TimeIndex};
//! use chrono::{TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
//! let index = TimeIndex::daily(start, 10);
//! assert_eq!(Frequency::detect(&index), Some(Frequency::Daily));
//! ```
//!
//! # Interaction with Serde
//!
//! Enable the `serde` feature to (de)serialize [`Frequency`] as its
//! one-letter code (e.g., `"M"` for monthly).

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

mod error;
pub use crate::error::{CalendarError, Result};
mod time_index;
pub use crate::time_index::{
    day_of_year, days_in_month, fractional_hour, season_start, TimeIndex,
};
mod frequency;
pub use crate::frequency::Frequency;
