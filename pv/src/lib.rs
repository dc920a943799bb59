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

//! Electrical response of PV panels and inverters.
//!
//! A [`PvSystem`] receives irradiance on the plane of the panel (already
//! split into direct and diffuse components) and the ambient
//! temperature, and returns the power it produces.
//!
//! ```
//! use pv::{PvSystem, Technology};
//!
//! let system = PvSystem::new(1000., Technology::CSi).unwrap();
//! let out = system.run_model(&[600.], &[100.], None).unwrap();
//! assert!(out[0] > 0. && out[0] < 1000.);
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
pub use crate::error::{PanelError, Result};

mod technology;
pub use crate::technology::{HuldCoefficients, ModuleTemperature, Technology};

mod single_diode;
pub use crate::single_diode::{DiodeParameters, MaxPowerPoint};

mod inverter;
pub use crate::inverter::Inverter;

mod system;
pub use crate::system::{PvRecord, PvSystem, DEFAULT_SYSTEM_LOSS, DEFAULT_TEMPERATURE};
