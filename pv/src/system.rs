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

use crate::{Float, Inverter, ModuleTemperature, PanelError, Result, Technology};
use tracing::debug;

/// Fraction of the output lost in cables, soiling, mismatch, etc.
pub const DEFAULT_SYSTEM_LOSS: Float = 0.10;

/// Ambient temperature (C) assumed when there is no data
pub const DEFAULT_TEMPERATURE: Float = 20.;

/// Efficiency used for sizing the aperture of the panels. It cancels
/// out in the output, as the aperture is derived from the capacity.
const REFERENCE_EFFICIENCY: Float = 0.1;

/// Irradiance (W/m2) at which a panel produces its nominal capacity
const REFERENCE_IRRADIANCE: Float = 1000.;

/// A PV installation: panels, an optional inverter and losses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvSystem {
    /// Installed DC capacity (W)
    pub capacity: Float,

    /// Kind of panel
    pub technology: Technology,

    /// Fraction of the output that is lost (0 to 1)
    pub system_loss: Float,

    /// Inverter, if the output should be AC
    pub inverter: Option<Inverter>,

    /// How the module heats up
    pub module_temperature: ModuleTemperature,
}

/// Everything calculated for one time step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PvRecord {
    /// Direct irradiance on the plane (W/m2)
    pub direct: Float,
    /// Diffuse irradiance on the plane (W/m2)
    pub diffuse: Float,
    /// Ambient temperature (C)
    pub temperature: Float,
    /// Module temperature (C)
    pub module_temperature: Float,
    /// Efficiency relative to standard test conditions
    pub relative_efficiency: Float,
    /// DC power (W)
    pub dc: Float,
    /// Final output (W)
    pub output: Float,
}

impl PvSystem {
    /// A system with default losses and no inverter
    pub fn new(capacity: Float, technology: Technology) -> Result<Self> {
        let ret = Self {
            capacity,
            technology,
            system_loss: DEFAULT_SYSTEM_LOSS,
            inverter: None,
            module_temperature: ModuleTemperature::default(),
        };
        ret.validate()?;
        Ok(ret)
    }

    /// Changes the system losses
    pub fn with_system_loss(mut self, system_loss: Float) -> Result<Self> {
        self.system_loss = system_loss;
        self.validate()?;
        Ok(self)
    }

    /// Adds an inverter
    pub fn with_inverter(mut self, inverter: Inverter) -> Result<Self> {
        self.inverter = Some(inverter);
        self.validate()?;
        Ok(self)
    }

    /// Changes the module temperature model
    pub fn with_module_temperature(mut self, module_temperature: ModuleTemperature) -> Self {
        self.module_temperature = module_temperature;
        self
    }

    /// Checks the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.capacity.is_finite() || self.capacity <= 0. {
            return Err(PanelError::InvalidCapacity {
                field: "capacity",
                value: self.capacity,
            });
        }
        if !(0.0..=1.0).contains(&self.system_loss) {
            return Err(PanelError::InvalidSystemLoss(self.system_loss));
        }
        if let Some(inverter) = &self.inverter {
            inverter.validate()?;
        }
        if let Technology::SingleDiode(p) = &self.technology {
            p.validate()?;
        }
        Ok(())
    }

    /// Area of panels (m2) needed for the capacity at
    /// the reference efficiency
    pub fn aperture(&self) -> Float {
        self.capacity / REFERENCE_IRRADIANCE / REFERENCE_EFFICIENCY
    }

    /// Output for one time step. A non-finite temperature is
    /// replaced by [`DEFAULT_TEMPERATURE`].
    pub fn power(&self, direct: Float, diffuse: Float, temperature: Float) -> PvRecord {
        let temperature = if temperature.is_finite() {
            temperature
        } else {
            DEFAULT_TEMPERATURE
        };
        let irradiance = direct + diffuse;
        let module_temperature = self
            .module_temperature
            .module_temperature(temperature, irradiance);
        let relative_efficiency = self
            .technology
            .relative_efficiency(irradiance, module_temperature);

        let mut dc = irradiance * self.aperture() * relative_efficiency * REFERENCE_EFFICIENCY;
        dc = if dc.is_finite() {
            dc.clamp(0., self.capacity)
        } else {
            0.
        };

        let ac = match &self.inverter {
            Some(inverter) => inverter.ac_output(dc),
            None => dc,
        };

        PvRecord {
            direct,
            diffuse,
            temperature,
            module_temperature,
            relative_efficiency,
            dc,
            output: ac * (1. - self.system_loss),
        }
    }

    /// [`PvSystem::power`] over a series, keeping every
    /// intermediate value. Missing temperatures are replaced
    /// by [`DEFAULT_TEMPERATURE`].
    pub fn run_model_detailed(
        &self,
        direct: &[Float],
        diffuse: &[Float],
        temperature: Option<&[Float]>,
    ) -> Result<Vec<PvRecord>> {
        let n = direct.len();
        if diffuse.len() != n {
            return Err(PanelError::LengthMismatch {
                field: "diffuse irradiance",
                expected: n,
                found: diffuse.len(),
            });
        }
        if let Some(t) = temperature {
            if t.len() != n {
                return Err(PanelError::LengthMismatch {
                    field: "temperature",
                    expected: n,
                    found: t.len(),
                });
            }
        }

        if temperature.is_none() {
            debug!("no temperature, assuming {} C", DEFAULT_TEMPERATURE);
        }
        Ok((0..n)
            .map(|i| {
                let t = temperature.map(|t| t[i]).unwrap_or(DEFAULT_TEMPERATURE);
                self.power(direct[i], diffuse[i], t)
            })
            .collect())
    }

    /// Output (W) for each time step
    pub fn run_model(
        &self,
        direct: &[Float],
        diffuse: &[Float],
        temperature: Option<&[Float]>,
    ) -> Result<Vec<Float>> {
        Ok(self
            .run_model_detailed(direct, diffuse, temperature)?
            .into_iter()
            .map(|r| r.output)
            .collect())
    }
}
