//! Plotter session configuration and device profiles.

use serde::{Deserialize, Serialize};

use crate::error::{HpglError, Result};

/// Device-unit clip limits of the plotter, as reported by `OH`/`OW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower-left X (device units).
    pub x_min: i32,
    /// Lower-left Y (device units).
    pub y_min: i32,
    /// Upper-right X (device units).
    pub x_max: i32,
    /// Upper-right Y (device units).
    pub y_max: i32,
}

impl Bounds {
    /// Create bounds from the two corners.
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width in device units.
    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    /// Height in device units.
    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }
}

/// Configuration for one plot session. Immutable once the session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotterConfig {
    /// Device coordinate bounds. Only `x_min`/`y_min` enter the transform;
    /// the maxima are informational and never used to clip.
    pub bounds: Bounds,
    /// Device units per drawing unit.
    pub scale: f64,
    /// Surface every composed statement through the diagnostics hook.
    #[serde(default)]
    pub debug: bool,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self::hp7475a_letter()
    }
}

impl PlotterConfig {
    /// Create a config from explicit bounds and scale, debug off.
    pub fn new(bounds: Bounds, scale: f64) -> Self {
        Self {
            bounds,
            scale,
            debug: false,
        }
    }

    /// Same config with the debug flag set.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Same config with a different scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// HP 7475A, US letter (A size) paper.
    pub fn hp7475a_letter() -> Self {
        Self::new(Bounds::new(0, 0, 10365, 7962), 1.0)
    }

    /// HP 7475A, ISO A4 paper.
    pub fn hp7475a_a4() -> Self {
        Self::new(Bounds::new(0, 0, 11040, 7721), 1.0)
    }

    /// HP 7475A, US tabloid (B size) paper.
    pub fn hp7475a_tabloid() -> Self {
        Self::new(Bounds::new(0, 0, 16640, 10365), 1.0)
    }

    /// HP 7475A, ISO A3 paper.
    pub fn hp7475a_a3() -> Self {
        Self::new(Bounds::new(0, 0, 16158, 11040), 1.0)
    }

    /// Look up a built-in profile by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "hp7475a-letter" | "hp7475a" => Some(Self::hp7475a_letter()),
            "hp7475a-a4" => Some(Self::hp7475a_a4()),
            "hp7475a-tabloid" => Some(Self::hp7475a_tabloid()),
            "hp7475a-a3" => Some(Self::hp7475a_a3()),
            _ => None,
        }
    }

    /// Names accepted by [`PlotterConfig::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["hp7475a-letter", "hp7475a-a4", "hp7475a-tabloid", "hp7475a-a3"]
    }

    /// Check the settings a session depends on: the scale must be positive
    /// and finite.
    pub fn validate(&self) -> Result<()> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(HpglError::InvalidScale(self.scale))
        }
    }
}
