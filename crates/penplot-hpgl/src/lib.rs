#![warn(missing_docs)]

//! HP-GL command encoding for pen plotters.
//!
//! This crate turns 2-D drawing primitives into HP-GL statements and hands
//! each statement to a byte sink in one write. It provides:
//! - A coordinate [`Transform`] from drawing units to device units
//! - A stateless [`Encoder`] with one method per primitive
//! - A [`Plotter`] session that sends statements and reports bad arguments
//! - Device profiles for common plotters ([`PlotterConfig`])
//!
//! HP-GL has no error channel, so a wrong command order produces wrong ink
//! on paper rather than an error. Every statement composed here is
//! self-contained: paths end pen-up and polygon fills carry the full
//! `PM0` … `PM2` … `FP` sequence.
//!
//! # Example
//!
//! ```
//! use penplot_hpgl::{FillStyle, Plotter, PlotterConfig, PlotOptions, Point};
//!
//! let mut plotter = Plotter::new(Vec::new(), PlotterConfig::hp7475a_a4())?;
//! plotter.select_pen(1)?;
//! plotter.draw_line(Point::new(0.0, 0.0), Point::new(1000.0, 500.0))?;
//! plotter.fill_circle(
//!     Point::new(2000.0, 2000.0),
//!     400.0,
//!     &PlotOptions::fill(FillStyle::Hatch { spacing: 20.0, angle: 45.0 }),
//! )?;
//! plotter.park()?;
//!
//! let hpgl = String::from_utf8(plotter.into_sink()).unwrap();
//! assert!(hpgl.starts_with("IN;SP1;PU0,0;PD1000,500;PU;"));
//! # Ok::<(), penplot_hpgl::HpglError>(())
//! ```

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod plotter;
pub mod sink;
pub mod style;
pub mod transform;

pub use command::{Command, CommandBuilder};
pub use config::{Bounds, PlotterConfig};
pub use diagnostics::{Diagnostic, Diagnostics, LogDiagnostics, RecordingDiagnostics};
pub use encoder::Encoder;
pub use error::{HpglError, Result};
pub use geometry::{Point, Polygon, Shape};
pub use plotter::Plotter;
pub use sink::PlotSink;
pub use style::{FillStyle, LineType, Pen, PlotOptions, RawLineType, RawStyle, StyleContext};
pub use transform::Transform;
