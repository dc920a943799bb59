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

//! Estimates the output of photovoltaic installations from gridded
//! (or point) irradiance data of any frequency, from hourly to annual.
//!
//! For each cell, coarse data is turned into hourly irradiance (either
//! one synthetic day per value or, for monthly and coarser data, every
//! day of the period drawn from probability distributions), the diffuse
//! fraction is estimated when missing, the irradiance is projected onto
//! the plane of the panels and a panel/inverter model turns it into
//! energy.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use pvgrid::{run_cell, CellSeries, PipelineOptions, StationConfig, TimeIndex};
//! use pvgrid::{Location, Technology, Tilt};
//! use rand::SeedableRng;
//!
//! let mut station = StationConfig::new(1000., Technology::CSi);
//! station.tilt = Tilt::Constant(35.);
//! let config = station
//!     .for_cell(&Location::new(47.36, 8.55).unwrap())
//!     .unwrap();
//!
//! let start = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
//! let series = CellSeries::new(TimeIndex::daily(start, 3), vec![250., 200., 300.]).unwrap();
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(0);
//! let out = run_cell(&series, &config, &PipelineOptions::default(), None, &mut rng).unwrap();
//! assert_eq!(out.unit(), "Wh/day");
//! ```

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
pub use crate::error::{CellFailure, Error, Result};

/// Configuration of the installation and of the processing
pub mod config;
pub use crate::config::{CellConfig, PipelineOptions, StationConfig, Tilt, TiltFunction};

/// From the inputs of a cell to its PV output
pub mod pipeline;
pub use crate::pipeline::{hourly_output, run_cell, CellOutput, CellSeries};

/// Runs the pipeline over every cell of a grid
pub mod grid;
pub use crate::grid::{run_grid, GridDataset, GridOutput};

// Re-exports
pub use calendar::{Frequency, TimeIndex};
pub use climate::{BrlParameters, MonthlyPdf, PdfCell, PdfDataset, PdfTable};
pub use pv::{DiodeParameters, Inverter, ModuleTemperature, PvSystem, Technology};
pub use weather::{IrradianceType, Location, Tracking};
