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

use crate::{run_cell, CellFailure, CellSeries, Error, Float, PipelineOptions, Result, StationConfig};
use calendar::{Frequency, TimeIndex};
use climate::{PdfDataset, PdfTable};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{info, warn};
use utils::ProgressCounter;
use weather::Location;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Irradiance (and optionally diffuse fraction and temperature) over
/// a regular latitude/longitude grid.
///
/// Variables are stored time-major: the value at time `t`, latitude
/// `i` and longitude `j` is at `(t * n_lat + i) * n_lon + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDataset {
    /// Timestamps, shared by every cell
    pub times: TimeIndex,
    /// Latitude axis (degrees)
    pub latitudes: Vec<Float>,
    /// Longitude axis (degrees)
    pub longitudes: Vec<Float>,
    /// Global horizontal irradiance (W/m2)
    pub global_horizontal: Vec<Float>,
    /// Diffuse fraction
    pub diffuse_fraction: Option<Vec<Float>>,
    /// Ambient temperature (C)
    pub temperature: Option<Vec<Float>>,
}

impl GridDataset {
    /// A grid with irradiance only
    pub fn new(
        times: TimeIndex,
        latitudes: Vec<Float>,
        longitudes: Vec<Float>,
        global_horizontal: Vec<Float>,
    ) -> Result<Self> {
        let ret = Self {
            times,
            latitudes,
            longitudes,
            global_horizontal,
            diffuse_fraction: None,
            temperature: None,
        };
        ret.validate()?;
        Ok(ret)
    }

    /// Adds the diffuse fraction
    pub fn with_diffuse_fraction(mut self, v: Vec<Float>) -> Result<Self> {
        self.diffuse_fraction = Some(v);
        self.validate()?;
        Ok(self)
    }

    /// Adds the temperature
    pub fn with_temperature(mut self, v: Vec<Float>) -> Result<Self> {
        self.temperature = Some(v);
        self.validate()?;
        Ok(self)
    }

    /// Number of values each variable should have
    fn expected_len(&self) -> usize {
        self.times.len() * self.n_cells()
    }

    /// Number of grid cells
    pub fn n_cells(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    /// Checks the shape of every variable and the coordinates
    pub fn validate(&self) -> Result<()> {
        let n = self.expected_len();
        let check = |field: &'static str, found: usize| -> Result<()> {
            if found == n {
                Ok(())
            } else {
                Err(Error::LengthMismatch {
                    field,
                    expected: n,
                    found,
                })
            }
        };
        check("global_horizontal", self.global_horizontal.len())?;
        if let Some(v) = &self.diffuse_fraction {
            check("diffuse_fraction", v.len())?;
        }
        if let Some(v) = &self.temperature {
            check("temperature", v.len())?;
        }
        for lat in &self.latitudes {
            for lon in &self.longitudes {
                Location::new(*lat, *lon)?;
            }
        }
        Ok(())
    }

    fn cell_values(&self, v: &[Float], i: usize, j: usize) -> Vec<Float> {
        let n_lat = self.latitudes.len();
        let n_lon = self.longitudes.len();
        (0..self.times.len())
            .map(|t| v[(t * n_lat + i) * n_lon + j])
            .collect()
    }

    /// The series of the cell at latitude `i` and longitude `j`, or
    /// `None` if there is no such cell
    pub fn cell_series(&self, i: usize, j: usize) -> Option<CellSeries> {
        if i >= self.latitudes.len() || j >= self.longitudes.len() {
            return None;
        }
        Some(CellSeries {
            times: self.times.clone(),
            global_horizontal: self.cell_values(&self.global_horizontal, i, j),
            diffuse_fraction: self
                .diffuse_fraction
                .as_ref()
                .map(|v| self.cell_values(v, i, j)),
            temperature: self.temperature.as_ref().map(|v| self.cell_values(v, i, j)),
        })
    }
}

/// The result of [`run_grid`]
#[derive(Debug, Clone, PartialEq)]
pub struct GridOutput {
    /// Timestamps
    pub times: TimeIndex,
    /// Latitude axis (degrees)
    pub latitudes: Vec<Float>,
    /// Longitude axis (degrees)
    pub longitudes: Vec<Float>,
    /// Frequency of the data
    pub frequency: Frequency,
    /// Energy per time step, time-major like [`GridDataset`]. Cells
    /// that failed are NaN.
    pub values: Vec<Float>,
    /// Cells that could not be calculated
    pub failures: Vec<CellFailure>,
}

impl GridOutput {
    /// Units of the values
    pub fn unit(&self) -> &'static str {
        self.frequency.unit()
    }

    /// Value at time `t`, latitude `i` and longitude `j`
    pub fn get(&self, t: usize, i: usize, j: usize) -> Option<Float> {
        if i >= self.latitudes.len() || j >= self.longitudes.len() {
            return None;
        }
        self.values
            .get((t * self.latitudes.len() + i) * self.longitudes.len() + j)
            .copied()
    }

    /// Did every cell succeed?
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One unit of work
struct Task<'a> {
    index: usize,
    lat_index: usize,
    lon_index: usize,
    location: Location,
    table: Option<&'a PdfTable>,
}

/// Calculates the PV output of every cell of a grid.
///
/// The configuration, the options and the shape of the data are
/// checked before anything is calculated; problems there are
/// returned as errors. After that, each cell is calculated
/// independently (in parallel with the `parallel` feature), and a
/// cell that fails is reported in [`GridOutput::failures`] without
/// affecting the others.
pub fn run_grid(
    data: &GridDataset,
    station: &StationConfig,
    options: &PipelineOptions,
    pdfs: Option<&PdfDataset>,
) -> Result<GridOutput> {
    station.validate()?;
    options.validate(pdfs.is_some())?;
    data.validate()?;
    let frequency = Frequency::resolve(options.frequency, &data.times)?;
    options.check_frequency(frequency)?;
    let options = PipelineOptions {
        frequency: Some(frequency),
        ..options.clone()
    };

    // Nearest distributions are found before dispatching
    let pdfs = match pdfs {
        Some(d) if options.use_pdfs => {
            if d.is_empty() {
                return Err(Error::MissingPdfDataset);
            }
            Some(d)
        }
        _ => None,
    };
    let n_lon = data.longitudes.len();
    let tasks: Vec<Task> = (0..data.n_cells())
        .map(|index| {
            let lat_index = index / n_lon;
            let lon_index = index % n_lon;
            let latitude = data.latitudes[lat_index];
            let longitude = data.longitudes[lon_index];
            Task {
                index,
                lat_index,
                lon_index,
                location: Location {
                    latitude,
                    longitude,
                },
                table: pdfs.and_then(|d| d.nearest(latitude, longitude)),
            }
        })
        .collect();

    #[cfg(feature = "parallel")]
    let mode = "parallel";
    #[cfg(not(feature = "parallel"))]
    let mode = "sequential";
    info!(
        "calculating {} cells ({} time steps, frequency '{}', {})",
        tasks.len(),
        data.times.len(),
        frequency,
        mode
    );

    let progress = ProgressCounter::new("pv", tasks.len());

    #[cfg(not(feature = "parallel"))]
    let aux_iter = tasks.iter();
    #[cfg(feature = "parallel")]
    let aux_iter = tasks.par_iter();

    let results: Vec<Result<Vec<Float>>> = aux_iter
        .map(|task| {
            let start = Instant::now();
            let r = run_task(data, station, &options, task);
            if let Some(budget) = options.max_task_duration {
                let elapsed = start.elapsed();
                if elapsed > budget {
                    warn!(
                        "cell at lat {}, lon {} took {:.2} seconds",
                        task.location.latitude,
                        task.location.longitude,
                        elapsed.as_secs_f64()
                    );
                }
            }
            progress.tic();
            r
        })
        .collect();
    progress.done();

    // Fan in
    let n_lat = data.latitudes.len();
    let mut values = vec![Float::NAN; data.expected_len()];
    let mut failures = Vec::new();
    for (task, result) in tasks.iter().zip(results) {
        match result {
            Ok(cell) => {
                for (t, v) in cell.into_iter().enumerate() {
                    values[(t * n_lat + task.lat_index) * n_lon + task.lon_index] = v;
                }
            }
            Err(error) => {
                let failure = CellFailure {
                    lat_index: task.lat_index,
                    lon_index: task.lon_index,
                    latitude: task.location.latitude,
                    longitude: task.location.longitude,
                    error,
                };
                warn!("{}", failure);
                failures.push(failure);
            }
        }
    }

    Ok(GridOutput {
        times: data.times.clone(),
        latitudes: data.latitudes.clone(),
        longitudes: data.longitudes.clone(),
        frequency,
        values,
        failures,
    })
}

fn run_task(
    data: &GridDataset,
    station: &StationConfig,
    options: &PipelineOptions,
    task: &Task,
) -> Result<Vec<Float>> {
    let config = station.for_cell(&task.location)?;
    let series = data
        .cell_series(task.lat_index, task.lon_index)
        .ok_or(Error::LengthMismatch {
            field: "grid",
            expected: data.n_cells(),
            found: task.index,
        })?;
    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(task.index as u64)),
        None => SmallRng::from_entropy(),
    };
    let out = run_cell(&series, &config, options, task.table, &mut rng)?;
    Ok(out.values)
}
