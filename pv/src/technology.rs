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

use crate::{DiodeParameters, Float};
use serde::{Deserialize, Serialize};

/// Reference module temperature (C)
const R_TMOD: Float = 25.;

/// Reference irradiance (W/m2)
const R_IRRADIANCE: Float = 1000.;

/// Coefficients of the empirical model of Huld et al. (2010):
///
/// `η = 1 + k1·ln(G') + k2·ln²(G') + T'·(k3 + k4·ln(G') + k5·ln²(G')) + k6·T'²`
///
/// with `G' = G/1000` and `T' = Tmod - 25`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HuldCoefficients {
    /// ln(G')
    pub k1: Float,
    /// ln²(G')
    pub k2: Float,
    /// T'
    pub k3: Float,
    /// T'·ln(G')
    pub k4: Float,
    /// T'·ln²(G')
    pub k5: Float,
    /// T'²
    pub k6: Float,
}

impl HuldCoefficients {
    /// Crystalline silicon
    pub const CSI: Self = Self {
        k1: -0.017162,
        k2: -0.040289,
        k3: -0.004681,
        k4: 0.000148,
        k5: 0.000169,
        k6: 0.000005,
    };

    /// Cadmium telluride thin film
    pub const CDTE: Self = Self {
        k1: -0.103251,
        k2: -0.040446,
        k3: -0.001667,
        k4: -0.002075,
        k5: -0.001445,
        k6: -0.000023,
    };

    /// Efficiency relative to standard test conditions. Zero
    /// when there is no irradiance.
    pub fn relative_efficiency(&self, irradiance: Float, module_temperature: Float) -> Float {
        let g = irradiance / R_IRRADIANCE;
        let t = module_temperature - R_TMOD;
        let ln_g = g.ln();
        let eff = 1.
            + self.k1 * ln_g
            + self.k2 * ln_g.powi(2)
            + t * (self.k3 + self.k4 * ln_g + self.k5 * ln_g.powi(2))
            + self.k6 * t.powi(2);
        if eff.is_nan() {
            0.
        } else {
            eff.max(0.)
        }
    }
}

/// Module temperature as a linear function of ambient temperature
/// and irradiance: `Tmod = c_temp_amb·Tamb + c_temp_irrad·G`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleTemperature {
    /// Weight of the ambient temperature
    pub c_temp_amb: Float,
    /// Heating per W/m2 of irradiance (C m2/W)
    pub c_temp_irrad: Float,
}

impl Default for ModuleTemperature {
    fn default() -> Self {
        Self {
            c_temp_amb: 1.,
            c_temp_irrad: 0.035,
        }
    }
}

impl ModuleTemperature {
    /// Temperature of the module (C)
    pub fn module_temperature(&self, ambient: Float, irradiance: Float) -> Float {
        self.c_temp_amb * ambient + self.c_temp_irrad * irradiance
    }
}

/// The kind of panel, which determines how its efficiency reacts to
/// irradiance and temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    /// Crystalline silicon (Huld model)
    #[serde(rename = "csi")]
    CSi,
    /// Cadmium telluride (Huld model)
    #[serde(rename = "cdte")]
    CdTe,
    /// Physical single-diode model
    SingleDiode(DiodeParameters),
}

impl Technology {
    /// Efficiency relative to standard test conditions for a certain
    /// plane-of-array irradiance (W/m2) and module temperature (C)
    pub fn relative_efficiency(&self, irradiance: Float, module_temperature: Float) -> Float {
        match self {
            Self::CSi => HuldCoefficients::CSI.relative_efficiency(irradiance, module_temperature),
            Self::CdTe => HuldCoefficients::CDTE.relative_efficiency(irradiance, module_temperature),
            Self::SingleDiode(p) => p.relative_efficiency(irradiance, module_temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_conditions() {
        for c in [HuldCoefficients::CSI, HuldCoefficients::CDTE] {
            assert!((c.relative_efficiency(1000., 25.) - 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn test_huld() {
        let c = HuldCoefficients::CSI;
        // Hot modules are less efficient
        assert!(c.relative_efficiency(1000., 50.) < 1.);
        assert!(c.relative_efficiency(1000., 10.) > 1.);

        // Value at G' = 0.5, T' = 10
        let ln_g = (0.5 as Float).ln();
        let expected = 1. - 0.017162 * ln_g - 0.040289 * ln_g * ln_g
            + 10. * (-0.004681 + 0.000148 * ln_g + 0.000169 * ln_g * ln_g)
            + 0.000005 * 100.;
        assert!((c.relative_efficiency(500., 35.) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_light() {
        for t in [Technology::CSi, Technology::CdTe] {
            assert_eq!(t.relative_efficiency(0., 20.), 0.);
            assert_eq!(t.relative_efficiency(-5., 20.), 0.);
            assert_eq!(t.relative_efficiency(Float::NAN, 20.), 0.);
        }
        // Tiny irradiance drives the logarithm to minus infinity... the
        // efficiency is floored at zero
        assert!(Technology::CdTe.relative_efficiency(1e-30, 20.) >= 0.);
    }

    #[test]
    fn test_module_temperature() {
        let m = ModuleTemperature::default();
        assert!((m.module_temperature(20., 1000.) - 55.).abs() < 1e-12);
        let m: ModuleTemperature = serde_json::from_str(r#"{"c_temp_irrad": 0.025}"#).unwrap();
        assert_eq!(m.c_temp_amb, 1.);
        assert_eq!(m.c_temp_irrad, 0.025);
    }

    #[test]
    fn test_serde() {
        let t: Technology = serde_json::from_str("\"cdte\"").unwrap();
        assert_eq!(t, Technology::CdTe);
        assert_eq!(serde_json::to_string(&Technology::CSi).unwrap(), "\"csi\"");
    }
}
