//! Drawing space to plotter device units.

use crate::config::PlotterConfig;
use crate::geometry::Point;

/// Uniform scale plus origin offset. Values outside the device bounds are
/// passed through; clipping is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Device units per drawing unit.
    pub scale: f64,
    /// Device X of the drawing origin.
    pub x_origin: f64,
    /// Device Y of the drawing origin.
    pub y_origin: f64,
}

impl Transform {
    /// Create a transform.
    pub fn new(scale: f64, x_origin: f64, y_origin: f64) -> Self {
        Self {
            scale,
            x_origin,
            y_origin,
        }
    }

    /// Transform implied by a session config.
    pub fn from_config(config: &PlotterConfig) -> Self {
        Self::new(
            config.scale,
            config.bounds.x_min as f64,
            config.bounds.y_min as f64,
        )
    }

    /// `value * scale + origin`.
    #[inline]
    pub fn to_device(&self, value: f64, origin: f64) -> f64 {
        self.scalar(value) + origin
    }

    /// Positional X.
    #[inline]
    pub fn x(&self, x: f64) -> f64 {
        self.to_device(x, self.x_origin)
    }

    /// Positional Y.
    #[inline]
    pub fn y(&self, y: f64) -> f64 {
        self.to_device(y, self.y_origin)
    }

    /// Lengths, radii and spacings: scale only, no origin.
    #[inline]
    pub fn scalar(&self, value: f64) -> f64 {
        value * self.scale
    }

    /// Both coordinates of a point.
    pub fn point(&self, p: Point) -> Point {
        Point::new(self.x(p.x), self.y(p.y))
    }
}
