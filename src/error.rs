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
use calendar::{CalendarError, Frequency};
use climate::ClimateError;
use pv::PanelError;
use thiserror::Error;
use weather::SolarError;

/// Everything that can go wrong while estimating PV output
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// PDF sampling was requested but no dataset was provided
    #[error("PDF sampling was requested, but no PDF dataset was given")]
    MissingPdfDataset,

    /// PDF sampling only makes sense for coarse data
    #[error("PDF sampling is only available for annual, seasonal or monthly data (found '{frequency}')")]
    PdfsNotSupported {
        /// Frequency of the data
        frequency: Frequency,
    },

    /// A field of the configuration has an invalid value
    #[error("invalid value for '{field}': {reason}")]
    InvalidConfig {
        /// Name of the field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A variable does not have the expected number of values
    #[error("length mismatch in '{field}': expected {expected} values, found {found}")]
    LengthMismatch {
        /// Name of the variable
        field: &'static str,
        /// Expected length
        expected: usize,
        /// Found length
        found: usize,
    },

    /// Could not parse a configuration
    #[error("could not parse configuration: {0}")]
    Parse(String),

    /// Time index or frequency
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Geometry
    #[error(transparent)]
    Solar(#[from] SolarError),

    /// Synthesis and sampling
    #[error(transparent)]
    Climate(#[from] ClimateError),

    /// Panel and inverter
    #[error(transparent)]
    Panel(#[from] PanelError),
}

impl Error {
    /// Whether this error is caused by the configuration or the
    /// shape of the inputs (and should therefore stop a run before
    /// anything is calculated), as opposed to a failure that only
    /// affects a single task.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::MissingPdfDataset
            | Self::PdfsNotSupported { .. }
            | Self::InvalidConfig { .. }
            | Self::LengthMismatch { .. }
            | Self::Parse(_)
            | Self::Panel(_) => true,
            Self::Calendar(e) => !matches!(e, CalendarError::Unsorted(_)),
            Self::Solar(e) => matches!(
                e,
                SolarError::InvalidTracking(_)
                    | SolarError::InvalidSubsteps
                    | SolarError::InvalidLocation { .. }
                    | SolarError::Calendar(CalendarError::NonUtcTimestamp { .. })
            ),
            Self::Climate(e) => matches!(
                e,
                ClimateError::MonthCount(_)
                    | ClimateError::MalformedDistribution { .. }
                    | ClimateError::InvalidBin { .. }
                    | ClimateError::UnsupportedFrequency(_)
            ),
        }
    }
}

/// Result type of this crate
pub type Result<T> = std::result::Result<T, Error>;

/// A grid cell whose calculation failed. Its siblings are not affected.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFailure {
    /// Position of the cell in the latitude axis
    pub lat_index: usize,
    /// Position of the cell in the longitude axis
    pub lon_index: usize,
    /// Latitude of the cell (degrees)
    pub latitude: Float,
    /// Longitude of the cell (degrees)
    pub longitude: Float,
    /// What went wrong
    pub error: Error,
}

impl std::fmt::Display for CellFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cell ({}, {}) at lat {}, lon {}: {}",
            self.lat_index, self.lon_index, self.latitude, self.longitude, self.error
        )
    }
}
