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

/// Turns DC into AC.
///
/// The efficiency is `η(x) = 0.9858 - 0.0162·x - 0.0059/x`, where `x`
/// is the DC input relative to the (DC) capacity of the inverter.
/// The AC output is then limited to the AC capacity, which is the
/// DC one unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inverter {
    /// Rated DC input (W)
    pub capacity: Float,
    /// Maximum AC output (W)
    #[serde(default)]
    pub ac_capacity: Option<Float>,
}

impl Inverter {
    /// Builds an inverter with a certain capacity (W), used both
    /// for the loading ratio and as the AC limit
    pub fn new(capacity: Float) -> Result<Self> {
        let ret = Self {
            capacity,
            ac_capacity: None,
        };
        ret.validate()?;
        Ok(ret)
    }

    /// Sets a different AC capacity (W)
    pub fn with_ac_capacity(mut self, ac_capacity: Float) -> Result<Self> {
        self.ac_capacity = Some(ac_capacity);
        self.validate()?;
        Ok(self)
    }

    /// The limit of the AC output (W)
    pub fn ac_limit(&self) -> Float {
        self.ac_capacity.unwrap_or(self.capacity)
    }

    /// Checks the capacities
    pub fn validate(&self) -> Result<()> {
        let check = |field, value: Float| {
            if value.is_finite() && value > 0. {
                Ok(())
            } else {
                Err(PanelError::InvalidCapacity { field, value })
            }
        };
        check("inverter capacity", self.capacity)?;
        if let Some(ac) = self.ac_capacity {
            check("inverter AC capacity", ac)?;
        }
        Ok(())
    }

    /// Efficiency at a certain loading ratio (DC input over capacity)
    pub fn efficiency(&self, load_ratio: Float) -> Float {
        0.9858 - 0.0162 * load_ratio - 0.0059 / load_ratio
    }

    /// AC output for a DC input, between 0 and the AC capacity
    pub fn ac_output(&self, dc: Float) -> Float {
        if !dc.is_finite() || dc <= 0. {
            return 0.;
        }
        let ac = dc * self.efficiency(dc / self.capacity);
        ac.clamp(0., self.ac_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve() {
        let inv = Inverter::new(1000.).unwrap();
        assert_eq!(inv.ac_output(0.), 0.);
        assert_eq!(inv.ac_output(-3.), 0.);
        // Very low loads have negative efficiency
        assert_eq!(inv.ac_output(1.), 0.);

        let half = inv.ac_output(500.);
        assert!((half - 500. * (0.9858 - 0.0081 - 0.0118)).abs() < 1e-9);

        // Never above capacity
        assert!(inv.ac_output(5000.) <= 1000.);
        assert!((inv.ac_output(1000.) - 1000. * (0.9858 - 0.0162 - 0.0059)).abs() < 1e-9);
    }

    #[test]
    fn test_ac_capacity() {
        let inv = Inverter::new(1000.).unwrap();
        assert_eq!(inv.ac_limit(), 1000.);

        // Same loading ratio, lower limit
        let small = inv.with_ac_capacity(800.).unwrap();
        assert_eq!(small.ac_limit(), 800.);
        assert_eq!(small.ac_output(500.), inv.ac_output(500.));
        assert_eq!(small.ac_output(1000.), 800.);
        assert!(inv.ac_output(1000.) > 800.);
    }

    #[test]
    fn test_validate() {
        assert!(Inverter::new(0.).is_err());
        assert!(Inverter::new(Float::INFINITY).is_err());
        let inv = Inverter::new(1000.).unwrap();
        assert!(matches!(
            inv.with_ac_capacity(-1.),
            Err(PanelError::InvalidCapacity {
                field: "inverter AC capacity",
                ..
            })
        ));
    }
}
