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
use thiserror::Error;

/// Errors in the configuration of a PV system
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PanelError {
    /// System losses are a fraction
    #[error("system_loss must be between 0 and 1, found {0}")]
    InvalidSystemLoss(Float),

    /// Capacities must be positive and finite
    #[error("{field} must be a positive number of Watts, found {value}")]
    InvalidCapacity {
        /// Which capacity
        field: &'static str,
        /// The offending value
        value: Float,
    },

    /// Parameters of the single-diode model that make no sense
    #[error("invalid single-diode parameter '{0}'")]
    InvalidDiodeParameter(&'static str),

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
}

/// Result type of this crate
pub type Result<T> = std::result::Result<T, PanelError>;
