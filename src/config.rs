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

use crate::{Error, Float, Result};
use calendar::Frequency;
use climate::BrlParameters;
use pv::{Inverter, ModuleTemperature, PvSystem, Technology, DEFAULT_SYSTEM_LOSS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use weather::{IrradianceType, Location, PanelOrientation, Tracking};

/// A tilt (degrees) that depends on the latitude (degrees)
pub type TiltFunction = Arc<dyn Fn(Float) -> Float + Send + Sync>;

/// The tilt of the panels, which may change across a grid
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tilt {
    /// The same tilt (degrees) everywhere
    Constant(Float),

    /// `slope·latitude + intercept` (degrees)
    Linear {
        /// Degrees of tilt per degree of latitude
        slope: Float,
        /// Tilt at the Equator (degrees)
        intercept: Float,
    },

    /// A rule of thumb for equator-facing panels
    #[default]
    Optimal,

    /// Any function of the latitude. Cannot be serialized.
    #[serde(skip)]
    Function(TiltFunction),
}

impl std::fmt::Debug for Tilt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Linear { slope, intercept } => f
                .debug_struct("Linear")
                .field("slope", slope)
                .field("intercept", intercept)
                .finish(),
            Self::Optimal => write!(f, "Optimal"),
            Self::Function(_) => write!(f, "Function(..)"),
        }
    }
}

impl Tilt {
    /// Builds a [`Tilt::Function`]
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Float) -> Float + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// The tilt (degrees) at a certain latitude (degrees)
    pub fn resolve(&self, latitude: Float) -> Float {
        match self {
            Self::Constant(v) => *v,
            Self::Linear { slope, intercept } => slope * latitude + intercept,
            Self::Optimal => {
                let lat = latitude.abs();
                if lat <= 25. {
                    lat * 0.87
                } else if lat <= 50. {
                    lat * 0.76 + 3.1
                } else {
                    40.
                }
            }
            Self::Function(f) => f(latitude),
        }
    }
}

fn default_azimuth() -> Float {
    180.
}

fn default_system_loss() -> Float {
    DEFAULT_SYSTEM_LOSS
}

fn default_albedo() -> Float {
    0.3
}

/// Describes the PV installation placed on every cell of a grid.
///
/// Angles are in degrees. An `azimuth` of 180 faces the Equator
/// in both hemispheres.
///
/// ```
/// use pvgrid::StationConfig;
///
/// let config = StationConfig::from_json5(
///     "{
///         tilt: { constant: 35 },
///         capacity: 1000,
///         technology: 'csi',
///     }",
/// )
/// .unwrap();
/// assert_eq!(config.azimuth, 180.);
/// assert!((config.system_loss - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Tilt of the panels (or of the tracking axis)
    #[serde(default)]
    pub tilt: Tilt,

    /// Azimuth of the panels (or of the tracking axis)
    #[serde(default = "default_azimuth")]
    pub azimuth: Float,

    /// How the panels follow the sun
    #[serde(default)]
    pub tracking: Tracking,

    /// Installed DC capacity (W)
    pub capacity: Float,

    /// Kind of panel
    pub technology: Technology,

    /// Fraction of the output that is lost (0 to 1)
    #[serde(default = "default_system_loss")]
    pub system_loss: Float,

    /// Reflectance of the ground
    #[serde(default = "default_albedo")]
    pub albedo: Float,

    /// Inverter, if the output should be AC
    #[serde(default)]
    pub inverter: Option<Inverter>,

    /// Whether irradiance values are instantaneous or means
    /// over the time step
    #[serde(default)]
    pub irradiance_type: IrradianceType,

    /// How the modules heat up
    #[serde(default)]
    pub module_temperature: ModuleTemperature,
}

/// The configuration of a [`StationConfig`] resolved for a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellConfig {
    /// Where the cell is
    pub location: Location,
    /// Resolved tilt (degrees)
    pub tilt: Float,
    /// Geometry of the panels
    pub orientation: PanelOrientation,
    /// Electrical model
    pub system: PvSystem,
    /// Whether irradiance values are instantaneous or means
    pub irradiance_type: IrradianceType,
}

impl StationConfig {
    /// A fixed, equator-facing installation with default losses
    pub fn new(capacity: Float, technology: Technology) -> Self {
        Self {
            tilt: Tilt::default(),
            azimuth: default_azimuth(),
            tracking: Tracking::Fixed,
            capacity,
            technology,
            system_loss: default_system_loss(),
            albedo: default_albedo(),
            inverter: None,
            irradiance_type: IrradianceType::default(),
            module_temperature: ModuleTemperature::default(),
        }
    }

    /// Reads a configuration from JSON and validates it
    pub fn from_json(s: &str) -> Result<Self> {
        let ret: Self = serde_json::from_str(s).map_err(|e| Error::Parse(e.to_string()))?;
        ret.validate()?;
        Ok(ret)
    }

    /// Reads a configuration from JSON5 and validates it
    pub fn from_json5(s: &str) -> Result<Self> {
        let ret: Self = json5::from_str(s).map_err(|e| Error::Parse(e.to_string()))?;
        ret.validate()?;
        Ok(ret)
    }

    fn system(&self) -> Result<PvSystem> {
        let mut system = PvSystem::new(self.capacity, self.technology)?
            .with_system_loss(self.system_loss)?
            .with_module_temperature(self.module_temperature);
        if let Some(inverter) = self.inverter {
            system = system.with_inverter(inverter)?;
        }
        Ok(system)
    }

    /// Checks every field that does not depend on the location
    pub fn validate(&self) -> Result<()> {
        self.system()?;
        self.irradiance_type.validate()?;
        if !(0.0..=1.0).contains(&self.albedo) {
            return Err(Error::InvalidConfig {
                field: "albedo",
                reason: format!("{} is not between 0 and 1", self.albedo),
            });
        }
        if !self.azimuth.is_finite() {
            return Err(Error::InvalidConfig {
                field: "azimuth",
                reason: format!("{} is not a number", self.azimuth),
            });
        }
        if let Tilt::Constant(v) = self.tilt {
            check_tilt(v)?;
        }
        Ok(())
    }

    /// Resolves the configuration for a cell. The tilt is
    /// evaluated here, once.
    pub fn for_cell(&self, location: &Location) -> Result<CellConfig> {
        location.validate()?;
        let tilt = self.tilt.resolve(location.latitude);
        check_tilt(tilt)?;
        Ok(CellConfig {
            location: *location,
            tilt,
            orientation: PanelOrientation::from_degrees(
                tilt,
                self.azimuth,
                self.tracking,
                self.albedo,
            ),
            system: self.system()?,
            irradiance_type: self.irradiance_type,
        })
    }
}

fn check_tilt(tilt: Float) -> Result<()> {
    if tilt.is_finite() && (0.0..=90.0).contains(&tilt) {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field: "tilt",
            reason: format!("{} is not between 0 and 90 degrees", tilt),
        })
    }
}

/// How the data should be processed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineOptions {
    /// Frequency of the data. Detected from the timestamps if `None`.
    pub frequency: Option<Frequency>,

    /// Draw daily values from probability distributions when
    /// the data is annual, seasonal or monthly
    pub use_pdfs: bool,

    /// Seed for drawing daily values. Each cell uses
    /// `seed + cell index`. Random if `None`.
    pub seed: Option<u64>,

    /// Cells taking longer than this are reported
    pub max_task_duration: Option<Duration>,

    /// Coefficients for estimating the diffuse fraction
    pub brl: BrlParameters,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            frequency: None,
            use_pdfs: false,
            seed: None,
            max_task_duration: None,
            brl: BrlParameters::default(),
        }
    }
}

impl PipelineOptions {
    /// Checks the options that do not depend on the data
    pub fn validate(&self, has_pdfs: bool) -> Result<()> {
        if self.use_pdfs && !has_pdfs {
            return Err(Error::MissingPdfDataset);
        }
        Ok(())
    }

    /// Checks that the options make sense for data of a
    /// certain frequency. Days can only be drawn for periods made
    /// of whole months (annual, seasonal and monthly data).
    pub fn check_frequency(&self, frequency: Frequency) -> Result<()> {
        if self.use_pdfs && frequency.months_in_period().is_none() {
            return Err(Error::PdfsNotSupported { frequency });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_tilt() {
        let t = Tilt::Optimal;
        assert!((t.resolve(10.) - 8.7).abs() < 1e-9);
        assert!((t.resolve(-10.) - 8.7).abs() < 1e-9);
        assert!((t.resolve(40.) - 33.5).abs() < 1e-9);
        assert!((t.resolve(70.) - 40.).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_function() {
        let t = Tilt::function(|lat| lat.abs() / 2.);
        assert!((t.resolve(-30.) - 15.).abs() < 1e-9);
        assert_eq!(format!("{:?}", t), "Function(..)");

        let t = Tilt::Linear {
            slope: 0.5,
            intercept: 10.,
        };
        assert!((t.resolve(20.) - 20.).abs() < 1e-9);
    }

    #[test]
    fn test_serde_tilt() {
        let t: Tilt = serde_json::from_str("{\"constant\": 35.0}").unwrap();
        assert!((t.resolve(0.) - 35.).abs() < 1e-9);
        let t: Tilt = serde_json::from_str("\"optimal\"").unwrap();
        assert!(matches!(t, Tilt::Optimal));
        let t: Tilt =
            serde_json::from_str("{\"linear\": {\"slope\": 1.0, \"intercept\": 2.0}}").unwrap();
        assert!((t.resolve(3.) - 5.).abs() < 1e-9);
    }

    #[test]
    fn test_from_json() {
        let config = StationConfig::from_json(
            r#"{
                "tilt": {"constant": 20.0},
                "azimuth": 170.0,
                "tracking": 1,
                "capacity": 2000.0,
                "technology": "cdte",
                "system_loss": 0.2,
                "inverter": {"capacity": 1800.0, "ac_capacity": 1700.0},
                "irradiance_type": {"cumulative": {"substeps": 6}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.tracking, Tracking::SingleAxis);
        assert_eq!(config.technology, Technology::CdTe);
        assert_eq!(
            config.inverter,
            Some(Inverter {
                capacity: 1800.,
                ac_capacity: Some(1700.)
            })
        );
        assert_eq!(
            config.irradiance_type,
            IrradianceType::Cumulative { substeps: 6 }
        );
        assert!((config.albedo - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = StationConfig::new(1000., Technology::CSi);
        assert!(config.validate().is_ok());

        config.system_loss = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("1.5"));

        let mut config = StationConfig::new(-1., Technology::CSi);
        assert!(config.validate().is_err());
        config.capacity = 10.;
        config.albedo = 2.;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { field: "albedo", .. })
        ));

        // Tracking modes other than 0, 1 and 2
        let r = StationConfig::from_json(
            r#"{"capacity": 1000.0, "technology": "csi", "tracking": 3}"#,
        );
        assert!(matches!(r, Err(Error::Parse(_))));
    }

    #[test]
    fn test_for_cell() {
        let mut config = StationConfig::new(1000., Technology::CSi);
        config.tilt = Tilt::function(|lat| lat.abs());
        let north = config.for_cell(&Location::new(47.36, 8.55).unwrap()).unwrap();
        let south = config.for_cell(&Location::new(-33.9, 18.4).unwrap()).unwrap();
        assert!((north.tilt - 47.36).abs() < 1e-9);
        assert!((south.tilt - 33.9).abs() < 1e-9);
        assert!((north.orientation.tilt - 47.36_f64.to_radians() as Float).abs() < 1e-9);
        assert!((north.orientation.azimuth - (180. as Float).to_radians()).abs() < 1e-9);

        config.tilt = Tilt::function(|_| 120.);
        assert!(config.for_cell(&Location::new(0., 0.).unwrap()).is_err());
    }

    #[test]
    fn test_pipeline_options() {
        let options = PipelineOptions {
            use_pdfs: true,
            ..PipelineOptions::default()
        };
        assert_eq!(options.validate(false), Err(Error::MissingPdfDataset));
        assert!(options.validate(true).is_ok());
        assert!(options.check_frequency(Frequency::Monthly).is_ok());
        assert!(options.check_frequency(Frequency::Annual).is_ok());
        assert!(options.check_frequency(Frequency::Seasonal).is_ok());
        for frequency in [Frequency::Daily, Frequency::Hourly] {
            let err = options.check_frequency(frequency).unwrap_err();
            assert_eq!(err, Error::PdfsNotSupported { frequency });
            assert!(err.is_configuration());
        }
        // Without PDFs, anything goes
        assert!(PipelineOptions::default()
            .check_frequency(Frequency::Daily)
            .is_ok());

        let options: PipelineOptions =
            serde_json::from_str(r#"{"frequency": "M", "seed": 3}"#).unwrap();
        assert_eq!(options.frequency, Some(Frequency::Monthly));
        assert_eq!(options.seed, Some(3));
        assert!(!options.use_pdfs);
    }
}
