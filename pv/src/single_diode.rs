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

use crate::{Float, PanelError, Result};
use serde::{Deserialize, Serialize};

/// Band gap at reference conditions (eV), silicon
const EG_REF: Float = 1.121;

/// Temperature dependence of the band gap (1/K)
const D_EG_DT: Float = -0.0002677;

/// Boltzmann constant (eV/K)
const BOLTZMANN: Float = 8.617333262e-5;

/// Reference cell temperature (K)
const T_REF: Float = 298.15;

/// Reference irradiance (W/m2)
const S_REF: Float = 1000.;

const MAX_ITERATIONS: usize = 100;

const TOLERANCE: Float = 1e-10;

/// Parameters of the five-parameter single-diode model at reference
/// conditions, as adjusted to operating conditions by De Soto et al. (2006)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiodeParameters {
    /// Temperature coefficient of the short-circuit current (A/C)
    pub alpha_sc: Float,
    /// Modified ideality factor (V)
    pub a_ref: Float,
    /// Light-generated current (A)
    pub i_l_ref: Float,
    /// Diode saturation current (A)
    pub i_o_ref: Float,
    /// Shunt resistance (ohm)
    pub r_sh_ref: Float,
    /// Series resistance (ohm)
    pub r_s: Float,
}

/// Operating point of maximum power
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxPowerPoint {
    /// Voltage (V)
    pub v_mp: Float,
    /// Current (A)
    pub i_mp: Float,
    /// Power (W)
    pub p_mp: Float,
    /// Open circuit voltage (V)
    pub v_oc: Float,
}

/// The five parameters, at operating conditions
#[derive(Debug, Clone, Copy)]
struct Conditions {
    photocurrent: Float,
    saturation_current: Float,
    series_resistance: Float,
    shunt_resistance: Float,
    n_ns_vth: Float,
}

impl Conditions {
    /// Solves the implicit I-V equation for the current at `voltage`
    /// with Newton's method, starting from the photocurrent.
    fn current(&self, voltage: Float) -> Float {
        let Self {
            photocurrent: il,
            saturation_current: i0,
            series_resistance: rs,
            shunt_resistance: rsh,
            n_ns_vth: a,
        } = *self;
        let mut i = il;
        for _ in 0..MAX_ITERATIONS {
            let e = ((voltage + i * rs) / a).exp();
            let f = il - i0 * (e - 1.) - (voltage + i * rs) / rsh - i;
            let df = -i0 * rs / a * e - rs / rsh - 1.;
            let step = f / df;
            i -= step;
            if step.abs() < TOLERANCE {
                break;
            }
        }
        i
    }

    /// Voltage at which the current is zero
    fn open_circuit_voltage(&self) -> Float {
        let il = self.photocurrent;
        let i0 = self.saturation_current;
        let rsh = self.shunt_resistance;
        let a = self.n_ns_vth;
        let mut v = a * (il / i0 + 1.).ln();
        for _ in 0..MAX_ITERATIONS {
            let e = (v / a).exp();
            let f = il - i0 * (e - 1.) - v / rsh;
            let df = -i0 / a * e - 1. / rsh;
            let step = f / df;
            v -= step;
            if step.abs() < TOLERANCE {
                break;
            }
        }
        v.max(0.)
    }

    /// Golden-section search of the maximum of `V·I(V)` between
    /// zero and the open circuit voltage
    fn max_power_point(&self) -> MaxPowerPoint {
        let v_oc = self.open_circuit_voltage();
        let power = |v: Float| v * self.current(v);
        let ratio = ((5. as Float).sqrt() - 1.) / 2.;

        let (mut lo, mut hi) = (0., v_oc);
        let mut x1 = hi - ratio * (hi - lo);
        let mut x2 = lo + ratio * (hi - lo);
        let mut f1 = power(x1);
        let mut f2 = power(x2);
        for _ in 0..2 * MAX_ITERATIONS {
            if hi - lo < 1e-9 {
                break;
            }
            if f1 < f2 {
                lo = x1;
                x1 = x2;
                f1 = f2;
                x2 = lo + ratio * (hi - lo);
                f2 = power(x2);
            } else {
                hi = x2;
                x2 = x1;
                f2 = f1;
                x1 = hi - ratio * (hi - lo);
                f1 = power(x1);
            }
        }
        let v_mp = (lo + hi) / 2.;
        let i_mp = self.current(v_mp);
        MaxPowerPoint {
            v_mp,
            i_mp,
            p_mp: v_mp * i_mp,
            v_oc,
        }
    }
}

impl DiodeParameters {
    /// Checks that the parameters can be used
    pub fn validate(&self) -> Result<()> {
        let positive = |v: Float, name: &'static str| {
            if v.is_finite() && v > 0. {
                Ok(())
            } else {
                Err(PanelError::InvalidDiodeParameter(name))
            }
        };
        positive(self.a_ref, "a_ref")?;
        positive(self.i_l_ref, "i_l_ref")?;
        positive(self.i_o_ref, "i_o_ref")?;
        positive(self.r_sh_ref, "r_sh_ref")?;
        if !self.r_s.is_finite() || self.r_s < 0. {
            return Err(PanelError::InvalidDiodeParameter("r_s"));
        }
        if !self.alpha_sc.is_finite() {
            return Err(PanelError::InvalidDiodeParameter("alpha_sc"));
        }
        Ok(())
    }

    /// Adjusts the reference parameters to an irradiance (W/m2)
    /// and cell temperature (C)
    fn at(&self, irradiance: Float, cell_temperature: Float) -> Conditions {
        let tc = cell_temperature + 273.15;
        let eg = EG_REF * (1. + D_EG_DT * (tc - T_REF));
        Conditions {
            photocurrent: irradiance / S_REF * (self.i_l_ref + self.alpha_sc * (tc - T_REF)),
            saturation_current: self.i_o_ref
                * (tc / T_REF).powi(3)
                * (EG_REF / (BOLTZMANN * T_REF) - eg / (BOLTZMANN * tc)).exp(),
            series_resistance: self.r_s,
            shunt_resistance: self.r_sh_ref * S_REF / irradiance,
            n_ns_vth: self.a_ref * tc / T_REF,
        }
    }

    /// Maximum power point of one module. `None` if there is no light.
    pub fn max_power_point(&self, irradiance: Float, cell_temperature: Float) -> Option<MaxPowerPoint> {
        if !irradiance.is_finite() || irradiance <= 0. {
            return None;
        }
        Some(self.at(irradiance, cell_temperature).max_power_point())
    }

    /// Maximum power relative to what the module would produce at
    /// reference temperature with an efficiency independent of the
    /// irradiance
    pub fn relative_efficiency(&self, irradiance: Float, cell_temperature: Float) -> Float {
        let (mpp, stc) = match (
            self.max_power_point(irradiance, cell_temperature),
            self.max_power_point(S_REF, T_REF - 273.15),
        ) {
            (Some(mpp), Some(stc)) => (mpp, stc),
            _ => return 0.,
        };
        let eff = mpp.p_mp / (stc.p_mp * irradiance / S_REF);
        if eff.is_finite() {
            eff.max(0.)
        } else {
            0.
        }
    }
}
