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

use crate::error::check_len;
use crate::{ClimateError, Float, Result};
use calendar::{days_in_month, Frequency};
use chrono::{Datelike, Months, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sampled values are quantised to `1/RESOLUTION`
pub const RESOLUTION: Float = 10_000.;

/// A discrete probability distribution of daily mean
/// irradiance for one month
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyPdf {
    /// Bin centres
    pub xk: Vec<Float>,
    /// Probability of each bin. Should add up to 1, but
    /// they are normalised anyway.
    pub pk: Vec<Float>,
}

impl MonthlyPdf {
    /// Builds a distribution
    pub fn new(xk: Vec<Float>, pk: Vec<Float>) -> Self {
        Self { xk, pk }
    }

    /// Builds a histogram of daily mean irradiance values with
    /// `bins` bins of equal width between the smallest and largest
    /// value. Non-finite and negative values are skipped.
    ///
    /// If there is nothing to count, the distribution is empty
    /// (and thus samples zeroes).
    pub fn from_daily(values: &[Float], bins: usize) -> Self {
        let valid: Vec<Float> = values
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v >= 0.)
            .collect();
        if valid.is_empty() || bins == 0 {
            return Self::default();
        }
        let min = valid.iter().copied().fold(Float::INFINITY, Float::min);
        let max = valid.iter().copied().fold(Float::NEG_INFINITY, Float::max);
        if max <= min {
            return Self::new(vec![min], vec![1.]);
        }

        let width = (max - min) / bins as Float;
        let mut counts = vec![0usize; bins];
        for v in &valid {
            let i = ((v - min) / width).floor() as usize;
            counts[i.min(bins - 1)] += 1;
        }
        let n = valid.len() as Float;
        let xk = (0..bins).map(|i| min + (i as Float + 0.5) * width).collect();
        let pk = counts.iter().map(|c| *c as Float / n).collect();
        Self::new(xk, pk)
    }

    /// Normalised, non-negative weights. `None` if there is nothing
    /// to normalise (e.g., all probabilities are zero).
    fn weights(&self) -> Option<Vec<Float>> {
        let clean: Vec<Float> = self
            .pk
            .iter()
            .map(|p| if p.is_finite() && *p > 0. { *p } else { 0. })
            .collect();
        let total: Float = clean.iter().sum();
        if total > 0. && total.is_finite() {
            Some(clean.into_iter().map(|p| p / total).collect())
        } else {
            None
        }
    }
}

/// The twelve monthly distributions of one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MonthlyPdf>", into = "Vec<MonthlyPdf>")]
pub struct PdfTable {
    months: Vec<MonthlyPdf>,
}

impl PdfTable {
    /// Builds a table from January to December
    pub fn new(months: Vec<MonthlyPdf>) -> Result<Self> {
        if months.len() != 12 {
            return Err(ClimateError::MonthCount(months.len()));
        }
        for (i, m) in months.iter().enumerate() {
            if m.xk.len() != m.pk.len() {
                return Err(ClimateError::MalformedDistribution {
                    month: i + 1,
                    values: m.xk.len(),
                    probabilities: m.pk.len(),
                });
            }
            if let Some((index, x)) = m.xk.iter().enumerate().find(|(_, x)| !x.is_finite() || **x < 0.) {
                return Err(ClimateError::InvalidBin {
                    month: i + 1,
                    index,
                    value: *x as f64,
                });
            }
        }
        Ok(Self { months })
    }

    /// The distribution of a month (1 to 12)
    pub fn month(&self, month: u32) -> &MonthlyPdf {
        let i = (month.clamp(1, 12) - 1) as usize;
        &self.months[i]
    }
}

impl PdfTable {
    /// Builds the twelve distributions of a cell from a series of
    /// daily mean irradiance, grouping the days by calendar month.
    /// Months without data get an empty distribution.
    pub fn from_daily(days: &[NaiveDate], values: &[Float], bins: usize) -> Result<Self> {
        check_len("values", days.len(), values.len())?;
        let mut by_month: Vec<Vec<Float>> = vec![Vec::new(); 12];
        for (d, v) in days.iter().zip(values) {
            by_month[d.month0() as usize].push(*v);
        }
        let months = by_month
            .iter()
            .map(|v| MonthlyPdf::from_daily(v, bins))
            .collect();
        Self::new(months)
    }
}

impl TryFrom<Vec<MonthlyPdf>> for PdfTable {
    type Error = ClimateError;

    fn try_from(months: Vec<MonthlyPdf>) -> Result<Self> {
        Self::new(months)
    }
}

impl From<PdfTable> for Vec<MonthlyPdf> {
    fn from(t: PdfTable) -> Self {
        t.months
    }
}

/// A [`PdfTable`] and the coordinates (degrees) it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfCell {
    /// Latitude in degrees
    pub latitude: Float,
    /// Longitude in degrees
    pub longitude: Float,
    /// The distributions
    pub table: PdfTable,
}

impl RTreeObject for PdfCell {
    type Envelope = AABB<[Float; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

impl PointDistance for PdfCell {
    /// Squared distance in degree space
    fn distance_2(&self, point: &[Float; 2]) -> Float {
        let dlat = self.latitude - point[0];
        let dlon = self.longitude - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// Distributions for a whole grid, indexed spatially so that any
/// coordinate can be matched to its nearest cell.
pub struct PdfDataset {
    tree: RTree<PdfCell>,
}

impl PdfDataset {
    /// Indexes the cells
    pub fn new(cells: Vec<PdfCell>) -> Self {
        Self {
            tree: RTree::bulk_load(cells),
        }
    }

    /// The cell closest to a coordinate (degrees)
    pub fn nearest_cell(&self, latitude: Float, longitude: Float) -> Option<&PdfCell> {
        self.tree.nearest_neighbor(&[latitude, longitude])
    }

    /// The table of the cell closest to a coordinate (degrees)
    pub fn nearest(&self, latitude: Float, longitude: Float) -> Option<&PdfTable> {
        self.nearest_cell(latitude, longitude).map(|c| &c.table)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Is there any cell?
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Draws `n_days` daily values from a distribution. A distribution
/// with no positive probability produces zeroes.
pub fn sample_month<R: Rng + ?Sized>(pdf: &MonthlyPdf, n_days: usize, rng: &mut R) -> Vec<Float> {
    let weights = match pdf.weights() {
        Some(w) => w,
        None => {
            debug!("degenerate distribution, using zeroes");
            return vec![0.; n_days];
        }
    };
    let dist = match WeightedIndex::new(&weights) {
        Ok(d) => d,
        Err(e) => {
            debug!("could not build distribution ({}), using zeroes", e);
            return vec![0.; n_days];
        }
    };
    let values: Vec<Float> = pdf
        .xk
        .iter()
        .map(|x| (x * RESOLUTION).round() / RESOLUTION)
        .collect();
    (0..n_days).map(|_| values[dist.sample(rng)]).collect()
}

/// Draws one value per day for the period (month, season or year)
/// starting at `period_start`, and scales them so that their
/// mean is `mean`.
///
/// Returns the days and their values.
pub fn sample_period<R: Rng + ?Sized>(
    mean: Float,
    period_start: NaiveDate,
    frequency: Frequency,
    table: &PdfTable,
    rng: &mut R,
) -> Result<(Vec<NaiveDate>, Vec<Float>)> {
    let n_months = frequency
        .months_in_period()
        .ok_or(ClimateError::UnsupportedFrequency(frequency))?;

    let mut days = Vec::new();
    let mut values = Vec::new();
    for i in 0..n_months {
        let first = match period_start.checked_add_months(Months::new(i)) {
            Some(d) => d,
            None => break,
        };
        let n_days = days_in_month(first.year(), first.month()) as usize;
        values.extend(sample_month(table.month(first.month()), n_days, rng));
        days.extend(first.iter_days().take(n_days));
    }

    let sampled_mean = values.iter().sum::<Float>() / values.len().max(1) as Float;
    if sampled_mean > 0. {
        let factor = mean / sampled_mean;
        values.iter_mut().for_each(|v| *v *= factor);
    } else if mean > 0. {
        debug!(
            "sampled days from {} have no irradiance, cannot match a mean of {}",
            period_start, mean
        );
    }
    Ok((days, values))
}
