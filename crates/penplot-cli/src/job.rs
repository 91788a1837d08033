//! JSON plot jobs.
//!
//! ```json
//! {
//!   "plotter": { "bounds": { "x_min": 0, "y_min": 0, "x_max": 10365, "y_max": 7962 }, "scale": 10 },
//!   "operations": [
//!     { "op": "pen", "slot": 1 },
//!     { "op": "line", "from": { "x": 0, "y": 0 }, "to": { "x": 100, "y": 50 } },
//!     { "op": "fill_circle", "center": { "x": 200, "y": 200 }, "diameter": 40,
//!       "fill": { "model": "hatch", "spacing": 2, "angle": 45 } },
//!     { "op": "park" }
//!   ]
//! }
//! ```

use penplot_hpgl::{
    Diagnostics, FillStyle, PlotOptions, PlotSink, Plotter, PlotterConfig, Point, RawStyle,
};
use serde::{Deserialize, Serialize};

/// A plot job: optional device settings plus drawing operations in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotJob {
    /// Device settings; the command line may override them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plotter: Option<PlotterConfig>,
    /// Operations, sent in order.
    pub operations: Vec<Operation>,
}

impl PlotJob {
    /// Parse a job from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One drawing or device operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Pen {
        slot: i32,
    },
    LineType {
        #[serde(default)]
        pattern: Option<i32>,
        #[serde(default)]
        space: Option<f64>,
    },
    FillType {
        model: i32,
        #[serde(default)]
        spacing: Option<f64>,
        #[serde(default)]
        angle: Option<f64>,
    },
    Style {
        #[serde(default)]
        style: RawStyle,
    },
    Rotate {
        theta: i32,
    },
    Speed {
        cm_per_s: f64,
    },
    SendTo {
        at: Point,
    },
    Line {
        from: Point,
        to: Point,
    },
    DrawTo {
        at: Point,
    },
    Lines {
        points: Vec<Point>,
    },
    Circle {
        center: Point,
        diameter: f64,
        #[serde(default)]
        resolution: Option<f64>,
    },
    FillCircle {
        center: Point,
        diameter: f64,
        #[serde(default)]
        fill: FillStyle,
        #[serde(default)]
        resolution: Option<f64>,
    },
    Wedge {
        center: Point,
        diameter: f64,
        start: f64,
        sweep: f64,
        #[serde(default)]
        resolution: Option<f64>,
    },
    FillWedge {
        center: Point,
        diameter: f64,
        start: f64,
        sweep: f64,
        #[serde(default)]
        fill: FillStyle,
        #[serde(default)]
        resolution: Option<f64>,
    },
    Arc {
        center: Point,
        size: f64,
        start: f64,
        end: f64,
        #[serde(default)]
        resolution: Option<f64>,
    },
    Rect {
        corner: Point,
        width: f64,
        height: f64,
    },
    FillRect {
        corner: Point,
        width: f64,
        height: f64,
        #[serde(default)]
        fill: FillStyle,
    },
    Poly {
        points: Vec<Point>,
    },
    FillPoly {
        points: Vec<Point>,
        #[serde(default)]
        fill: FillStyle,
    },
    Label {
        text: String,
        at: Point,
        size: f64,
    },
    Park,
    Raw {
        hpgl: String,
    },
}

fn opts(resolution: Option<f64>, fill: FillStyle) -> PlotOptions {
    PlotOptions { resolution, fill }
}

impl Operation {
    /// Send this operation through `plotter`.
    pub fn apply<S: PlotSink, D: Diagnostics>(
        &self,
        plotter: &mut Plotter<S, D>,
    ) -> penplot_hpgl::Result<()> {
        match self {
            Operation::Pen { slot } => plotter.select_pen(*slot),
            Operation::LineType { pattern: None, .. } => plotter.line_type(None),
            Operation::LineType {
                pattern: Some(mode),
                space,
            } => plotter.line_type_mode(*mode, *space),
            Operation::FillType {
                model,
                spacing,
                angle,
            } => plotter.fill_type_mode(*model, *spacing, *angle),
            Operation::Style { style } => plotter.apply_raw_style(style),
            Operation::Rotate { theta } => plotter.rotate_plotter(*theta),
            Operation::Speed { cm_per_s } => plotter.pen_speed(*cm_per_s),
            Operation::SendTo { at } => plotter.send_to(*at),
            Operation::Line { from, to } => plotter.draw_line(*from, *to),
            Operation::DrawTo { at } => plotter.draw_to(*at),
            Operation::Lines { points } => plotter.draw_lines(points.as_slice()),
            Operation::Circle {
                center,
                diameter,
                resolution,
            } => plotter.draw_circle(*center, *diameter, &opts(*resolution, FillStyle::Solid)),
            Operation::FillCircle {
                center,
                diameter,
                fill,
                resolution,
            } => plotter.fill_circle(*center, *diameter, &opts(*resolution, *fill)),
            Operation::Wedge {
                center,
                diameter,
                start,
                sweep,
                resolution,
            } => plotter.draw_wedge(
                *center,
                *diameter,
                *start,
                *sweep,
                &opts(*resolution, FillStyle::Solid),
            ),
            Operation::FillWedge {
                center,
                diameter,
                start,
                sweep,
                fill,
                resolution,
            } => plotter.fill_wedge(*center, *diameter, *start, *sweep, &opts(*resolution, *fill)),
            Operation::Arc {
                center,
                size,
                start,
                end,
                resolution,
            } => plotter.draw_arc(
                *center,
                *size,
                *start,
                *end,
                &opts(*resolution, FillStyle::Solid),
            ),
            Operation::Rect {
                corner,
                width,
                height,
            } => plotter.draw_rect(*corner, *width, *height),
            Operation::FillRect {
                corner,
                width,
                height,
                fill,
            } => plotter.fill_rect(*corner, *width, *height, &opts(None, *fill)),
            Operation::Poly { points } => plotter.draw_poly(points),
            Operation::FillPoly { points, fill } => plotter.fill_poly(points, &opts(None, *fill)),
            Operation::Label { text, at, size } => plotter.label(text, *at, *size),
            Operation::Park => plotter.park(),
            Operation::Raw { hpgl } => plotter.write(hpgl),
        }
    }
}

/// Send every operation of `job` through `plotter`, stopping at the first
/// sink error.
pub fn run<S: PlotSink, D: Diagnostics>(
    job: &PlotJob,
    plotter: &mut Plotter<S, D>,
) -> penplot_hpgl::Result<()> {
    for op in &job.operations {
        op.apply(plotter)?;
    }
    Ok(())
}
