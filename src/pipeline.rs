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

use crate::{CellConfig, Error, Float, PipelineOptions, Result};
use calendar::{Frequency, TimeIndex};
use chrono::{Datelike, NaiveDate};
use climate::{
    broadcast_daily, estimate_diffuse_fraction, sample_period, synthesize_diurnal, PdfTable,
};
use pv::DEFAULT_TEMPERATURE;
use rand::Rng;
use tracing::debug;
use weather::solar::{clearness_index_series, project_series, sun_angles, sun_rise_set};
use weather::RiseSetTable;

/// Days used for representing a whole year when there are no
/// probability distributions: (month, day)
const REPRESENTATIVE_DAYS: [(u32, u32); 2] = [(3, 31), (9, 30)];

/// Scale of the synthetic diurnal cycles
const HOURS_PER_DAY: Float = 24.;

/// The inputs of one cell (or one point)
#[derive(Debug, Clone, PartialEq)]
pub struct CellSeries {
    /// When each value was recorded
    pub times: TimeIndex,

    /// Global horizontal irradiance (W/m2). For daily or coarser
    /// data, this is the mean irradiance over the period.
    pub global_horizontal: Vec<Float>,

    /// Fraction of the global irradiance that is diffuse. Estimated
    /// when missing.
    pub diffuse_fraction: Option<Vec<Float>>,

    /// Ambient temperature (C). 20 C is assumed when missing.
    pub temperature: Option<Vec<Float>>,
}

/// The output of one cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellOutput {
    /// Same timestamps as the inputs
    pub times: TimeIndex,
    /// Frequency of the inputs (and outputs)
    pub frequency: Frequency,
    /// Energy per time step
    pub values: Vec<Float>,
}

impl CellOutput {
    /// Units of [`CellOutput::values`]
    pub fn unit(&self) -> &'static str {
        self.frequency.unit()
    }
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}

impl CellSeries {
    /// Irradiance only
    pub fn new(times: TimeIndex, global_horizontal: Vec<Float>) -> Result<Self> {
        check_len("global_horizontal", times.len(), global_horizontal.len())?;
        Ok(Self {
            times,
            global_horizontal,
            diffuse_fraction: None,
            temperature: None,
        })
    }

    /// Adds the diffuse fraction
    pub fn with_diffuse_fraction(mut self, diffuse_fraction: Vec<Float>) -> Result<Self> {
        check_len("diffuse_fraction", self.times.len(), diffuse_fraction.len())?;
        self.diffuse_fraction = Some(diffuse_fraction);
        Ok(self)
    }

    /// Adds the temperature
    pub fn with_temperature(mut self, temperature: Vec<Float>) -> Result<Self> {
        check_len("temperature", self.times.len(), temperature.len())?;
        self.temperature = Some(temperature);
        Ok(self)
    }

    /// Checks that every variable has one value per timestamp
    pub fn validate(&self) -> Result<()> {
        let n = self.times.len();
        check_len("global_horizontal", n, self.global_horizontal.len())?;
        if let Some(v) = &self.diffuse_fraction {
            check_len("diffuse_fraction", n, v.len())?;
        }
        if let Some(v) = &self.temperature {
            check_len("temperature", n, v.len())?;
        }
        Ok(())
    }
}

/// The variables of a [`CellSeries`] with every non-physical value
/// replaced.
struct Clean {
    ghi: Vec<Float>,
    diffuse_fraction: Option<Vec<Float>>,
    temperature: Vec<Float>,
}

impl Clean {
    fn new(series: &CellSeries) -> Self {
        let mut replaced = 0;
        let ghi = series
            .global_horizontal
            .iter()
            .map(|v| {
                if v.is_finite() {
                    v.max(0.)
                } else {
                    replaced += 1;
                    0.
                }
            })
            .collect();
        if replaced > 0 {
            debug!("replaced {} non-finite irradiance values by zero", replaced);
        }

        let diffuse_fraction = series.diffuse_fraction.as_ref().map(|v| {
            v.iter()
                .map(|d| if d.is_finite() { d.clamp(0., 1.) } else { 0. })
                .collect()
        });

        let temperature = match &series.temperature {
            Some(v) => v
                .iter()
                .map(|t| if t.is_finite() { *t } else { DEFAULT_TEMPERATURE })
                .collect(),
            None => {
                debug!("no temperature, assuming {} C", DEFAULT_TEMPERATURE);
                vec![DEFAULT_TEMPERATURE; series.times.len()]
            }
        };

        Self {
            ghi,
            diffuse_fraction,
            temperature,
        }
    }
}

/// Hourly output (W, or Wh per hour) of hourly irradiance.
///
/// The diffuse fraction is estimated with the BRL model when not
/// given. Hours for which it cannot be estimated (the sun is below
/// the horizon, so the clearness index is undefined) keep a NaN
/// diffuse fraction and produce nothing, whatever their irradiance.
pub fn hourly_output(
    times: &TimeIndex,
    global_horizontal: &[Float],
    diffuse_fraction: Option<&[Float]>,
    temperature: &[Float],
    rise_set: Option<&RiseSetTable>,
    config: &CellConfig,
    options: &PipelineOptions,
) -> Result<Vec<Float>> {
    let n = times.len();
    check_len("global_horizontal", n, global_horizontal.len())?;
    check_len("temperature", n, temperature.len())?;
    let location = &config.location;

    let computed;
    let rise_set = match rise_set {
        Some(t) => t,
        None => {
            computed = sun_rise_set(times, location);
            &computed
        }
    };

    let diffuse_fraction = match diffuse_fraction {
        Some(d) => {
            check_len("diffuse_fraction", n, d.len())?;
            d.to_vec()
        }
        None => {
            let kt = clearness_index_series(times, global_horizontal, location, Some(rise_set))?;
            let estimated: Vec<Float> =
                estimate_diffuse_fraction(times, &kt, location, Some(rise_set), &options.brl)?
                    .into_iter()
                    .map(|d| if d.is_nan() { d } else { d.clamp(0., 1.) })
                    .collect();
            let dropped = estimated
                .iter()
                .zip(global_horizontal)
                .filter(|(d, g)| d.is_nan() && **g > 0.)
                .count();
            if dropped > 0 {
                debug!(
                    "{} hours with irradiance but no clearness index produce nothing",
                    dropped
                );
            }
            estimated
        }
    };

    let angles = sun_angles(times, location, Some(rise_set), config.irradiance_type)?;
    let (direct, diffuse): (Vec<Float>, Vec<Float>) = global_horizontal
        .iter()
        .zip(&diffuse_fraction)
        .map(|(g, d)| {
            if d.is_nan() {
                (0., 0.)
            } else {
                (g * (1. - d), g * d)
            }
        })
        .unzip();

    let plane = project_series(&direct, &diffuse, location, &config.orientation, &angles)?;
    let (direct, diffuse): (Vec<Float>, Vec<Float>) =
        plane.iter().map(|p| (p.direct, p.diffuse)).unzip();

    Ok(config.system.run_model(&direct, &diffuse, Some(temperature))?)
}

/// Energy (Wh) produced on each of `days`, whose mean irradiance
/// (W/m2) is `ghi`. A diurnal cycle is synthesized for each day.
fn daily_energy(
    days: &[NaiveDate],
    ghi: &[Float],
    diffuse_fraction: Option<&[Float]>,
    temperature: &[Float],
    config: &CellConfig,
    options: &PipelineOptions,
) -> Result<Vec<Float>> {
    let hours = synthesize_diurnal(days, ghi, &config.location, None, HOURS_PER_DAY)?;
    let diffuse_fraction = diffuse_fraction.map(broadcast_daily);
    let temperature = broadcast_daily(temperature);

    let output = hourly_output(
        &hours.times,
        &hours.values,
        diffuse_fraction.as_deref(),
        &temperature,
        Some(&hours.rise_set),
        config,
        options,
    )?;
    Ok(output.chunks(24).map(|day| day.iter().sum()).collect())
}

/// One synthetic day per value (daily, monthly or seasonal data)
fn run_representative_days(
    series: &CellSeries,
    clean: &Clean,
    frequency: Frequency,
    config: &CellConfig,
    options: &PipelineOptions,
) -> Result<Vec<Float>> {
    let days: Vec<NaiveDate> = series
        .times
        .iter()
        .map(|t| frequency.normalize(*t).date_naive())
        .collect();
    daily_energy(
        &days,
        &clean.ghi,
        clean.diffuse_fraction.as_deref(),
        &clean.temperature,
        config,
        options,
    )
}

/// Annual data: each year is represented by the mean of two days
/// around the equinoxes
fn run_annual(
    series: &CellSeries,
    clean: &Clean,
    config: &CellConfig,
    options: &PipelineOptions,
) -> Result<Vec<Float>> {
    let n_days = REPRESENTATIVE_DAYS.len();
    let mut days = Vec::with_capacity(n_days * series.times.len());
    for t in series.times.iter() {
        for (month, day) in REPRESENTATIVE_DAYS {
            let date = NaiveDate::from_ymd_opt(t.year(), month, day).ok_or_else(|| {
                Error::InvalidConfig {
                    field: "times",
                    reason: format!("year {} cannot be represented", t.year()),
                }
            })?;
            days.push(date);
        }
    }
    let repeat = |v: &[Float]| -> Vec<Float> {
        v.iter()
            .flat_map(|x| std::iter::repeat(*x).take(n_days))
            .collect()
    };

    let diffuse_fraction = clean.diffuse_fraction.as_deref().map(repeat);
    let energy = daily_energy(
        &days,
        &repeat(&clean.ghi),
        diffuse_fraction.as_deref(),
        &repeat(&clean.temperature),
        config,
        options,
    )?;
    Ok(energy
        .chunks(n_days)
        .map(|c| c.iter().sum::<Float>() / n_days as Float)
        .collect())
}

/// Annual, seasonal or monthly data: every day of each period is
/// drawn from the distributions of its month
fn run_with_pdfs<R: Rng + ?Sized>(
    series: &CellSeries,
    clean: &Clean,
    frequency: Frequency,
    table: &PdfTable,
    rng: &mut R,
    config: &CellConfig,
    options: &PipelineOptions,
) -> Result<Vec<Float>> {
    let mut ret = Vec::with_capacity(series.times.len());
    for (i, t) in series.times.iter().enumerate() {
        let start = frequency.period_start(*t);
        let (days, ghi) = sample_period(clean.ghi[i], start, frequency, table, rng)?;
        if days.is_empty() {
            ret.push(0.);
            continue;
        }
        let diffuse_fraction = clean
            .diffuse_fraction
            .as_ref()
            .map(|d| vec![d[i]; days.len()]);
        let temperature = vec![clean.temperature[i]; days.len()];
        let energy = daily_energy(
            &days,
            &ghi,
            diffuse_fraction.as_deref(),
            &temperature,
            config,
            options,
        )?;
        ret.push(energy.iter().sum::<Float>() / days.len() as Float);
    }
    Ok(ret)
}

/// Calculates the PV output of a single cell (or point).
///
/// Hourly data produces hourly energy (Wh). Daily and coarser data
/// produces the mean daily energy of each period (Wh/day).
///
/// `pdf` is only used when `options.use_pdfs` is set, in which case
/// it is required and `rng` is used for sampling the days.
pub fn run_cell<R: Rng + ?Sized>(
    series: &CellSeries,
    config: &CellConfig,
    options: &PipelineOptions,
    pdf: Option<&PdfTable>,
    rng: &mut R,
) -> Result<CellOutput> {
    series.validate()?;
    let frequency = Frequency::resolve(options.frequency, &series.times)?;
    options.check_frequency(frequency)?;
    let clean = Clean::new(series);

    let values = match (frequency, options.use_pdfs) {
        (Frequency::Hourly, _) => hourly_output(
            &series.times,
            &clean.ghi,
            clean.diffuse_fraction.as_deref(),
            &clean.temperature,
            None,
            config,
            options,
        )?,
        (_, true) => {
            let table = pdf.ok_or(Error::MissingPdfDataset)?;
            run_with_pdfs(series, &clean, frequency, table, rng, config, options)?
        }
        (Frequency::Annual, false) => run_annual(series, &clean, config, options)?,
        (_, false) => run_representative_days(series, &clean, frequency, config, options)?,
    };

    Ok(CellOutput {
        times: series.times.clone(),
        frequency,
        values,
    })
}
