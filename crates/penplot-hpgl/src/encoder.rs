//! Per-primitive HP-GL statement encoding.
//!
//! Each method composes one complete [`Command`] from its arguments and the
//! session transform. Nothing is written and no device state is tracked, so
//! the same inputs always produce byte-identical output.
//!
//! Statements that lower the pen for a path lift it again before they end,
//! with the single exception of [`Encoder::draw_to`]. Polygon statements
//! carry the whole `PM0` → vertices → `PM2` → `FP`/`EP` sequence so the
//! device is never left mid-buffer between calls.

use crate::command::{self, Command, CommandBuilder, Param};
use crate::config::PlotterConfig;
use crate::error::{HpglError, Result};
use crate::geometry::{Point, Shape};
use crate::style::{FillStyle, LineType, Pen, PlotOptions, StyleContext};
use crate::transform::Transform;

/// Label cell width per point of font size (cm).
pub const LABEL_WIDTH_PER_POINT: f64 = 0.0264;

/// HP-GL default character height to width ratio.
pub const LABEL_ASPECT: f64 = 1.32;

/// Degree values closer than this to an integer are treated as that integer
/// before truncation.
const DEGREE_SNAP: f64 = 1e-9;

/// Truncate degrees toward zero for the wire, after snapping away float
/// noise (`π/6` → 29.999999999999996 → 30).
pub fn whole_degrees(degrees: f64) -> i32 {
    let nearest = degrees.round();
    let snapped = if (degrees - nearest).abs() < DEGREE_SNAP {
        nearest
    } else {
        degrees
    };
    snapped.trunc() as i32
}

/// Label cell `(width, height)` in cm for a font size in points.
pub fn label_cell(size_points: f64) -> (f64, f64) {
    let width = size_points * LABEL_WIDTH_PER_POINT;
    (width, width * LABEL_ASPECT)
}

fn finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HpglError::NonFinite(what))
    }
}

fn finite_point(p: Point, what: &'static str) -> Result<Point> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(HpglError::NonFinite(what))
    }
}

fn resolution(opts: &PlotOptions) -> Result<Option<Param>> {
    match opts.resolution {
        None => Ok(None),
        Some(r) if r.is_finite() && r > 0.0 => Ok(Some(Param::Real(r))),
        Some(r) => Err(HpglError::InvalidResolution(r)),
    }
}

/// Stateless HP-GL encoder bound to one coordinate transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoder {
    transform: Transform,
}

impl Encoder {
    /// Create an encoder for a transform.
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Encoder for a session config.
    pub fn from_config(config: &PlotterConfig) -> Self {
        Self::new(Transform::from_config(config))
    }

    /// The transform applied to every coordinate.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    // Both checks run on the way in and again after scaling, which can
    // overflow a finite input to infinity.
    fn device(&self, p: Point, what: &'static str) -> Result<(f64, f64)> {
        let p = finite_point(p, what)?;
        let device = finite_point(self.transform.point(p), what)?;
        Ok((device.x, device.y))
    }

    fn length(&self, value: f64, what: &'static str) -> Result<f64> {
        finite(self.transform.scalar(finite(value, what)?), what)
    }

    fn radius(&self, diameter: f64) -> Result<f64> {
        self.length(diameter / 2.0, "diameter")
    }

    // ------------------------------------------------------------------
    // Device state
    // ------------------------------------------------------------------

    /// `IN;`: reset the plotter to its power-on defaults.
    pub fn initialize(&self) -> Command {
        CommandBuilder::new().op(command::INITIALIZE).build()
    }

    /// `SP<slot>;`. Slots outside 0-6 are rejected.
    pub fn select_pen(&self, slot: i32) -> Result<Command> {
        let pen = Pen::new(slot)?;
        Ok(CommandBuilder::new()
            .op_with(command::SELECT_PEN, &[pen.slot().into()])
            .build())
    }

    /// `PU;SP0;`: lift the pen and return it to the carousel.
    pub fn park(&self) -> Command {
        CommandBuilder::new()
            .op(command::PEN_UP)
            .op_with(command::SELECT_PEN, &[Pen::NONE.slot().into()])
            .build()
    }

    /// `LT;` for solid lines, otherwise `LT<pattern>[,<space%>];`. The
    /// pattern length is a percentage and passes through unscaled.
    pub fn line_type(&self, line_type: Option<&LineType>) -> Result<Command> {
        let builder = CommandBuilder::new();
        let Some(lt) = line_type else {
            return Ok(builder.op(command::LINE_TYPE).build());
        };
        lt.validate()?;
        let mut params = vec![Param::from(lt.pattern)];
        if let Some(space) = lt.space_percent {
            params.push(Param::Real(space));
        }
        Ok(builder.op_with(command::LINE_TYPE, &params).build())
    }

    /// `FT<model>;` or, for hatching, `FT<model>,<spacing>,<angle>;` with the
    /// spacing scaled to device units and the angle left in degrees.
    pub fn fill_type(&self, fill: &FillStyle) -> Result<Command> {
        let model = Param::from(fill.model());
        let builder = CommandBuilder::new();
        let cmd = match fill.hatch() {
            None => builder.op_with(command::FILL_TYPE, &[model]),
            Some((spacing, angle)) => {
                let spacing = self.length(spacing, "fill spacing")?;
                let angle = finite(angle, "fill angle")?;
                builder.op_with(command::FILL_TYPE, &[model, spacing.into(), angle.into()])
            }
        };
        Ok(cmd.build())
    }

    /// `RO<theta>;`. Only multiples of 90 are honoured by the device; other
    /// values are sent anyway.
    pub fn rotate(&self, theta_degrees: i32) -> Command {
        CommandBuilder::new()
            .op_with(command::ROTATE, &[theta_degrees.into()])
            .build()
    }

    /// `VS<speed>;`: pen velocity in cm/s.
    pub fn pen_speed(&self, cm_per_s: f64) -> Result<Command> {
        if !(cm_per_s.is_finite() && cm_per_s > 0.0) {
            return Err(HpglError::InvalidSpeed(cm_per_s));
        }
        Ok(CommandBuilder::new()
            .op_with(command::VELOCITY, &[cm_per_s.into()])
            .build())
    }

    /// Select every member set in `style`, in the order pen, line type,
    /// fill. An empty context yields an empty statement.
    pub fn style(&self, style: &StyleContext) -> Result<Command> {
        let mut builder = CommandBuilder::new();
        if let Some(pen) = style.pen {
            builder = builder.append(&self.select_pen(pen.slot() as i32)?);
        }
        if let Some(lt) = &style.line_type {
            builder = builder.append(&self.line_type(Some(lt))?);
        }
        if let Some(fill) = &style.fill {
            builder = builder.append(&self.fill_type(fill)?);
        }
        Ok(builder.build())
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    /// `PU<x>,<y>;`: move without drawing.
    pub fn send_to(&self, p: Point) -> Result<Command> {
        let (x, y) = self.device(p, "target")?;
        Ok(CommandBuilder::new().op_at(command::PEN_UP, x, y).build())
    }

    /// `PU<start>;PD<end>;PU;`.
    pub fn draw_line(&self, start: Point, end: Point) -> Result<Command> {
        let (xs, ys) = self.device(start, "line start")?;
        let (xe, ye) = self.device(end, "line end")?;
        Ok(CommandBuilder::new()
            .op_at(command::PEN_UP, xs, ys)
            .op_at(command::PEN_DOWN, xe, ye)
            .op(command::PEN_UP)
            .build())
    }

    /// `PD;PA<x>,<y>;`: draw from wherever the pen is. Leaves the pen
    /// down; the caller must lift it.
    pub fn draw_to(&self, p: Point) -> Result<Command> {
        let (x, y) = self.device(p, "target")?;
        Ok(CommandBuilder::new()
            .op(command::PEN_DOWN)
            .op_at(command::PLOT_ABSOLUTE, x, y)
            .build())
    }

    /// `PU<p0>;PD<p1>,<p2>,…;PU;`. A single point moves there and draws
    /// nothing.
    pub fn draw_lines<S: Shape + ?Sized>(&self, points: &S) -> Result<Command> {
        let device = self.device_vertices(points, "polyline")?;
        let (x0, y0) = device[0];
        Ok(CommandBuilder::new()
            .op_at(command::PEN_UP, x0, y0)
            .op_path(command::PEN_DOWN, device[1..].iter().copied())
            .op(command::PEN_UP)
            .build())
    }

    fn device_vertices<S: Shape + ?Sized>(
        &self,
        shape: &S,
        what: &'static str,
    ) -> Result<Vec<(f64, f64)>> {
        if shape.vertex_count() == 0 {
            return Err(HpglError::EmptyPath(what));
        }
        shape.vertices().map(|v| self.device(v, "vertex")).collect()
    }

    /// `PU;PA<p>;`: lift, then move in absolute coordinates.
    fn move_to(&self, p: Point, what: &'static str) -> Result<CommandBuilder> {
        let (x, y) = self.device(p, what)?;
        Ok(CommandBuilder::new()
            .op(command::PEN_UP)
            .op_at(command::PLOT_ABSOLUTE, x, y))
    }

    // ------------------------------------------------------------------
    // Circles, wedges, arcs
    // ------------------------------------------------------------------

    /// `PU;PA<center>;CI<r>[,<res>];` with `r` the scaled half diameter.
    pub fn draw_circle(&self, center: Point, diameter: f64, opts: &PlotOptions) -> Result<Command> {
        let radius = self.radius(diameter)?;
        let mut params = vec![Param::Real(radius)];
        params.extend(resolution(opts)?);
        Ok(self
            .move_to(center, "center")?
            .op_with(command::CIRCLE, &params)
            .build())
    }

    /// Filled circle as a full-sweep wedge: `PU;PA<center>;FT…;WG<r>,0,360;`.
    /// HP-GL has no filled circle instruction.
    pub fn fill_circle(&self, center: Point, diameter: f64, opts: &PlotOptions) -> Result<Command> {
        self.wedge(command::FILL_WEDGE, Some(&opts.fill), center, diameter, (0, 360), opts)
    }

    /// `PU;PA<center>;EW<r>,<start>,<sweep>;` with angles given in radians
    /// and sent as whole degrees.
    pub fn draw_wedge(
        &self,
        center: Point,
        diameter: f64,
        start: f64,
        sweep: f64,
        opts: &PlotOptions,
    ) -> Result<Command> {
        let angles = self.wedge_angles(start, sweep)?;
        self.wedge(command::EDGE_WEDGE, None, center, diameter, angles, opts)
    }

    /// Filled wedge: `PU;PA<center>;FT…;WG<r>,<start>,<sweep>;`.
    pub fn fill_wedge(
        &self,
        center: Point,
        diameter: f64,
        start: f64,
        sweep: f64,
        opts: &PlotOptions,
    ) -> Result<Command> {
        let angles = self.wedge_angles(start, sweep)?;
        self.wedge(command::FILL_WEDGE, Some(&opts.fill), center, diameter, angles, opts)
    }

    fn wedge_angles(&self, start: f64, sweep: f64) -> Result<(i32, i32)> {
        let start = finite(start, "start angle")?;
        let sweep = finite(sweep, "sweep angle")?;
        Ok((
            whole_degrees(start.to_degrees()),
            whole_degrees(sweep.to_degrees()),
        ))
    }

    fn wedge(
        &self,
        mnemonic: &str,
        fill: Option<&FillStyle>,
        center: Point,
        diameter: f64,
        (start, sweep): (i32, i32),
        opts: &PlotOptions,
    ) -> Result<Command> {
        let radius = self.radius(diameter)?;
        let mut params = vec![Param::Real(radius), start.into(), sweep.into()];
        params.extend(resolution(opts)?);
        let mut builder = self.move_to(center, "center")?;
        if let Some(fill) = fill {
            builder = builder.append(&self.fill_type(fill)?);
        }
        Ok(builder.op_with(mnemonic, &params).build())
    }

    /// Pen start for an arc of diameter `size` beginning at `start` radians,
    /// in drawing space.
    pub fn arc_start(center: Point, size: f64, start: f64) -> Point {
        center.on_circle(size / 2.0, start)
    }

    /// Sweep in whole degrees from `start` to `end` radians.
    pub fn arc_sweep(start: f64, end: f64) -> i32 {
        whole_degrees(end.to_degrees() - start.to_degrees())
    }

    /// `PU;PA<start>;PD;AA<center>,<sweep>[,<res>];PU;`. `AA` arcs from the
    /// current pen position, so the pen is first placed on the circle at
    /// the start angle.
    pub fn draw_arc(
        &self,
        center: Point,
        size: f64,
        start: f64,
        end: f64,
        opts: &PlotOptions,
    ) -> Result<Command> {
        finite(size, "arc size")?;
        finite(start, "start angle")?;
        finite(end, "end angle")?;
        let (cx, cy) = self.device(center, "center")?;
        let (sx, sy) = self.device(Self::arc_start(center, size, start), "arc start")?;
        let mut params = vec![
            Param::Real(cx),
            Param::Real(cy),
            Self::arc_sweep(start, end).into(),
        ];
        params.extend(resolution(opts)?);
        Ok(CommandBuilder::new()
            .op(command::PEN_UP)
            .op_at(command::PLOT_ABSOLUTE, sx, sy)
            .op(command::PEN_DOWN)
            .op_with(command::ARC_ABSOLUTE, &params)
            .op(command::PEN_UP)
            .build())
    }

    // ------------------------------------------------------------------
    // Rectangles
    // ------------------------------------------------------------------

    /// `PU;PA<corner>;PD;ER<w>,<h>;PU;`. Width and height are lengths.
    pub fn draw_rect(&self, corner: Point, width: f64, height: f64) -> Result<Command> {
        let w = self.length(width, "width")?;
        let h = self.length(height, "height")?;
        Ok(self
            .move_to(corner, "corner")?
            .op(command::PEN_DOWN)
            .op_at(command::EDGE_RECT, w, h)
            .op(command::PEN_UP)
            .build())
    }

    /// `PU;PA<corner>;FT…;PD;RR<w>,<h>;PU;`.
    pub fn fill_rect(
        &self,
        corner: Point,
        width: f64,
        height: f64,
        opts: &PlotOptions,
    ) -> Result<Command> {
        let w = self.length(width, "width")?;
        let h = self.length(height, "height")?;
        let fill = self.fill_type(&opts.fill)?;
        Ok(self
            .move_to(corner, "corner")?
            .append(&fill)
            .op(command::PEN_DOWN)
            .op_at(command::FILL_RECT, w, h)
            .op(command::PEN_UP)
            .build())
    }

    // ------------------------------------------------------------------
    // Polygon buffer
    // ------------------------------------------------------------------

    /// Outline a polygon through the polygon buffer:
    /// `PU;PA<v0>;PM0;PD;PA<v0>;…PA<vn>;PA<v0>;PU;PM2;EP;`.
    pub fn draw_poly(&self, points: &[Point]) -> Result<Command> {
        self.edge_polygon(points, "polygon")
    }

    /// [`Encoder::draw_poly`] for any vertex source.
    pub fn draw_shape<S: Shape + ?Sized>(&self, shape: &S) -> Result<Command> {
        self.edge_polygon(shape, "shape")
    }

    /// Fill a polygon without outlining it:
    /// `PU;PA<v0>;PM0;PA<v0>;…PA<vn>;PA<v0>;PM2;FT…;FP;`.
    pub fn fill_poly(&self, points: &[Point], opts: &PlotOptions) -> Result<Command> {
        self.fill_polygon(points, "polygon", opts)
    }

    /// [`Encoder::fill_poly`] for any vertex source.
    pub fn fill_shape<S: Shape + ?Sized>(&self, shape: &S, opts: &PlotOptions) -> Result<Command> {
        self.fill_polygon(shape, "shape", opts)
    }

    fn edge_polygon<S: Shape + ?Sized>(&self, shape: &S, what: &'static str) -> Result<Command> {
        let vertices = self.device_vertices(shape, what)?;
        Ok(self
            .record_polygon(&vertices, true)
            .op(command::PEN_UP)
            .op_with(command::POLYGON_MODE, &[command::PM_CLOSE.into()])
            .op(command::EDGE_POLYGON)
            .build())
    }

    fn fill_polygon<S: Shape + ?Sized>(
        &self,
        shape: &S,
        what: &'static str,
        opts: &PlotOptions,
    ) -> Result<Command> {
        let vertices = self.device_vertices(shape, what)?;
        let fill = self.fill_type(&opts.fill)?;
        Ok(self
            .record_polygon(&vertices, false)
            .op_with(command::POLYGON_MODE, &[command::PM_CLOSE.into()])
            .append(&fill)
            .op(command::FILL_POLYGON)
            .build())
    }

    /// Lift and move to the first vertex in absolute coordinates, whatever
    /// plot mode the device is in, then open the buffer and record every vertex
    /// plus the closing return to the first one.
    fn record_polygon(&self, vertices: &[(f64, f64)], pen_down: bool) -> CommandBuilder {
        let (x0, y0) = vertices[0];
        let mut builder = CommandBuilder::new()
            .op(command::PEN_UP)
            .op_at(command::PLOT_ABSOLUTE, x0, y0)
            .op_with(command::POLYGON_MODE, &[command::PM_OPEN.into()]);
        if pen_down {
            builder = builder.op(command::PEN_DOWN);
        }
        for &(x, y) in vertices.iter().chain(std::iter::once(&(x0, y0))) {
            builder = builder.op_at(command::PLOT_ABSOLUTE, x, y);
        }
        builder
    }

    // ------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------

    /// `PU;PA<at>;SS;SI<w>,<h>;LB<text><ETX>`. The cell size comes from the
    /// font size via [`label_cell`] and is not scaled. `;` in the text is
    /// sent as-is; an ETX byte in the text is rejected.
    pub fn label(&self, text: &str, at: Point, size_points: f64) -> Result<Command> {
        if let Some(pos) = text.find(command::LABEL_TERMINATOR) {
            return Err(HpglError::EmbeddedLabelTerminator(pos));
        }
        let (w, h) = label_cell(finite(size_points, "label size")?);
        let (x, y) = self.device(at, "label position")?;
        Ok(CommandBuilder::new()
            .op(command::PEN_UP)
            .op_at(command::PLOT_ABSOLUTE, x, y)
            .op(command::SELECT_STANDARD)
            .op_at(command::CHAR_SIZE, w, h)
            .label(text)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

    fn unit() -> Encoder {
        Encoder::new(Transform::new(1.0, 0.0, 0.0))
    }

    fn scaled() -> Encoder {
        Encoder::new(Transform::new(2.0, 100.0, 200.0))
    }

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_whole_degrees() {
        assert_eq!(whole_degrees(FRAC_PI_2.to_degrees()), 90);
        assert_eq!(whole_degrees(FRAC_PI_6.to_degrees()), 30);
        assert_eq!(whole_degrees(45.9), 45);
        assert_eq!(whole_degrees(-45.9), -45);
    }

    #[test]
    fn test_select_pen() {
        assert_eq!(unit().select_pen(3).unwrap().as_str(), "SP3;");
        assert!(matches!(
            unit().select_pen(7),
            Err(HpglError::PenOutOfRange(7))
        ));
    }

    #[test]
    fn test_line_type() {
        let e = unit();
        assert_eq!(e.line_type(None).unwrap().as_str(), "LT;");
        let dashed = LineType::new(2).unwrap();
        assert_eq!(e.line_type(Some(&dashed)).unwrap().as_str(), "LT2;");
        let spaced = LineType::with_space(4, 10.0).unwrap();
        // Percentages are not scaled.
        assert_eq!(scaled().line_type(Some(&spaced)).unwrap().as_str(), "LT4,10;");
    }

    #[test]
    fn test_fill_type_scales_spacing_once() {
        let e = scaled();
        assert_eq!(e.fill_type(&FillStyle::Solid).unwrap().as_str(), "FT1;");
        assert_eq!(
            e.fill_type(&FillStyle::SolidUnidirectional).unwrap().as_str(),
            "FT2;"
        );
        let hatch = FillStyle::Hatch {
            spacing: 5.0,
            angle: 45.0,
        };
        assert_eq!(e.fill_type(&hatch).unwrap().as_str(), "FT3,10,45;");
    }

    #[test]
    fn test_rotate_and_speed() {
        let e = unit();
        assert_eq!(e.rotate(90).as_str(), "RO90;");
        assert_eq!(e.pen_speed(38.1).unwrap().as_str(), "VS38.1;");
        assert!(matches!(e.pen_speed(0.0), Err(HpglError::InvalidSpeed(_))));
    }

    #[test]
    fn test_style_order() {
        let style = StyleContext::default()
            .with_fill(FillStyle::SolidUnidirectional)
            .with_pen(Pen::new(2).unwrap())
            .with_line_type(LineType::new(1).unwrap());
        assert_eq!(unit().style(&style).unwrap().as_str(), "SP2;LT1;FT2;");
        assert!(unit().style(&StyleContext::default()).unwrap().is_empty());
    }

    #[test]
    fn test_send_to() {
        let cmd = scaled().send_to(Point::new(1.0, 2.0)).unwrap();
        assert_eq!(cmd.as_str(), "PU102,204;");
    }

    #[test]
    fn test_draw_line_closes_pen_up() {
        let cmd = scaled()
            .draw_line(Point::new(0.0, 0.0), Point::new(10.0, 5.0))
            .unwrap();
        assert_eq!(cmd.as_str(), "PU100,200;PD120,210;PU;");

        let same = unit()
            .draw_line(Point::new(3.0, 3.0), Point::new(3.0, 3.0))
            .unwrap();
        assert!(same.as_str().starts_with("PU"));
        assert!(same.as_str().ends_with("PU;"));
    }

    #[test]
    fn test_draw_to_leaves_pen_down() {
        let cmd = unit().draw_to(Point::new(4.5, 6.0)).unwrap();
        assert_eq!(cmd.as_str(), "PD;PA4.5,6;");
    }

    #[test]
    fn test_draw_lines() {
        let cmd = unit()
            .draw_lines(&pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]))
            .unwrap();
        assert_eq!(cmd.as_str(), "PU0,0;PD10,0,10,10;PU;");
    }

    #[test]
    fn test_draw_lines_single_point() {
        let cmd = unit().draw_lines(&pts(&[(7.0, 8.0)])).unwrap();
        assert_eq!(cmd.as_str(), "PU7,8;PD;PU;");
        assert!(!cmd.as_str().contains(",;"));
    }

    #[test]
    fn test_draw_lines_empty_rejected() {
        let empty: Vec<Point> = Vec::new();
        assert!(matches!(
            unit().draw_lines(&empty),
            Err(HpglError::EmptyPath("polyline"))
        ));
    }

    #[test]
    fn test_draw_circle() {
        let e = scaled();
        let c = Point::new(10.0, 10.0);
        assert_eq!(
            e.draw_circle(c, 10.0, &PlotOptions::default())
                .unwrap()
                .as_str(),
            "PU;PA120,220;CI10;"
        );
        assert_eq!(
            e.draw_circle(c, 10.0, &PlotOptions::resolution(5.0))
                .unwrap()
                .as_str(),
            "PU;PA120,220;CI10,5;"
        );
        assert!(matches!(
            e.draw_circle(c, 10.0, &PlotOptions::resolution(-1.0)),
            Err(HpglError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_fill_circle_uses_full_wedge() {
        let opts = PlotOptions::fill(FillStyle::CrossHatch {
            spacing: 1.5,
            angle: 30.0,
        });
        let cmd = scaled()
            .fill_circle(Point::new(0.0, 0.0), 20.0, &opts)
            .unwrap();
        assert_eq!(cmd.as_str(), "PU;PA100,200;FT4,3,30;WG20,0,360;");
    }

    #[test]
    fn test_wedges() {
        let e = unit();
        let c = Point::new(50.0, 50.0);
        let edge = e
            .draw_wedge(c, 40.0, 0.0, FRAC_PI_2, &PlotOptions::default())
            .unwrap();
        assert_eq!(edge.as_str(), "PU;PA50,50;EW20,0,90;");

        let filled = e
            .fill_wedge(c, 40.0, FRAC_PI_6, PI, &PlotOptions::default())
            .unwrap();
        assert_eq!(filled.as_str(), "PU;PA50,50;FT1;WG20,30,180;");
    }

    #[test]
    fn test_wedge_truncates_degrees() {
        let cmd = unit()
            .draw_wedge(
                Point::new(0.0, 0.0),
                2.0,
                0.5_f64.to_radians() + 10.0_f64.to_radians(),
                45.7_f64.to_radians(),
                &PlotOptions::default(),
            )
            .unwrap();
        assert_eq!(cmd.as_str(), "PU;PA0,0;EW1,10,45;");
    }

    #[test]
    fn test_arc_geometry() {
        let start = Encoder::arc_start(Point::new(0.0, 0.0), 10.0, 0.0);
        assert_relative_eq!(start.x, 5.0);
        assert_relative_eq!(start.y, 0.0);
        assert_eq!(Encoder::arc_sweep(0.0, FRAC_PI_2), 90);
        assert_eq!(Encoder::arc_sweep(FRAC_PI_2, 0.0), -90);
    }

    #[test]
    fn test_draw_arc() {
        let cmd = unit()
            .draw_arc(Point::new(0.0, 0.0), 10.0, 0.0, FRAC_PI_2, &PlotOptions::default())
            .unwrap();
        assert_eq!(cmd.as_str(), "PU;PA5,0;PD;AA0,0,90;PU;");

        let scaled_cmd = scaled()
            .draw_arc(Point::new(0.0, 0.0), 10.0, 0.0, PI, &PlotOptions::resolution(2.0))
            .unwrap();
        assert_eq!(scaled_cmd.as_str(), "PU;PA110,200;PD;AA100,200,180,2;PU;");
    }

    #[test]
    fn test_rects_scale_sizes_not_position() {
        let e = scaled();
        let corner = Point::new(1.0, 1.0);
        assert_eq!(
            e.draw_rect(corner, 10.0, 5.0).unwrap().as_str(),
            "PU;PA102,202;PD;ER20,10;PU;"
        );
        let opts = PlotOptions::fill(FillStyle::Hatch {
            spacing: 2.0,
            angle: 90.0,
        });
        let filled = e.fill_rect(corner, 10.0, 5.0, &opts).unwrap();
        assert_eq!(filled.as_str(), "PU;PA102,202;FT3,4,90;PD;RR20,10;PU;");
        assert!(!filled.as_str().contains(':'));
    }

    #[test]
    fn test_draw_poly_sequence() {
        let tri = pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        let cmd = unit().draw_poly(&tri).unwrap();
        assert_eq!(
            cmd.as_str(),
            "PU;PA0,0;PM0;PD;PA0,0;PA10,0;PA5,8;PA0,0;PU;PM2;EP;"
        );
    }

    #[test]
    fn test_fill_poly_sequence() {
        let tri = pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        let cmd = unit().fill_poly(&tri, &PlotOptions::default()).unwrap();
        assert_eq!(
            cmd.as_str(),
            "PU;PA0,0;PM0;PA0,0;PA10,0;PA5,8;PA0,0;PM2;FT1;FP;"
        );
        assert_eq!(cmd.count_instruction("PM1"), 0);
        assert!(!cmd.as_str().contains("PD"));
    }

    #[test]
    fn test_polygon_buffer_ordering() {
        let square = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let e = scaled();
        for cmd in [
            e.draw_poly(&square).unwrap(),
            e.fill_poly(&square, &PlotOptions::default()).unwrap(),
        ] {
            let ops: Vec<_> = cmd.instructions().collect();
            let pm0 = ops.iter().position(|i| *i == "PM0").unwrap();
            let pm2 = ops.iter().position(|i| *i == "PM2").unwrap();
            let last_pa = ops.iter().rposition(|i| i.starts_with("PA")).unwrap();
            assert_eq!(cmd.count_instruction("PM0"), 1);
            assert_eq!(cmd.count_instruction("PM2"), 1);
            // Absolute move to the first vertex, pen up, before the buffer opens.
            assert_eq!(&ops[..pm0], &["PU", "PA100,200"]);
            assert!(ops[pm0 + 1..pm2].iter().any(|i| i.starts_with("PA")));
            assert!(last_pa < pm2);
            let finish = ops
                .iter()
                .position(|i| *i == "EP" || *i == "FP")
                .unwrap();
            assert!(pm2 < finish);
        }
    }

    #[test]
    fn test_single_vertex_polygon() {
        let cmd = unit().draw_poly(&pts(&[(2.0, 3.0)])).unwrap();
        assert_eq!(cmd.as_str(), "PU;PA2,3;PM0;PD;PA2,3;PA2,3;PU;PM2;EP;");
        assert!(!cmd.as_str().contains(",;"));
    }

    #[test]
    fn test_empty_shape_rejected() {
        let empty: Vec<Point> = Vec::new();
        assert!(matches!(
            unit().draw_shape(&empty),
            Err(HpglError::EmptyPath("shape"))
        ));
        assert!(matches!(
            unit().fill_poly(&empty, &PlotOptions::default()),
            Err(HpglError::EmptyPath("polygon"))
        ));
    }

    #[test]
    fn test_label() {
        let cmd = unit().label("hi", Point::new(1.0, 1.0), 10.0).unwrap();
        let (w, h) = label_cell(10.0);
        let expected = format!("PU;PA1,1;SS;SI{},{};LBhi\u{3}", w, h);
        assert_eq!(cmd.as_str(), expected);
        assert!(cmd.as_bytes().ends_with(b"hi\x03"));
    }

    #[test]
    fn test_label_cell() {
        let (w, h) = label_cell(10.0);
        assert_relative_eq!(w, 0.264);
        assert_relative_eq!(h, 0.264 * 1.32);
    }

    #[test]
    fn test_label_semicolon_passes_through() {
        let cmd = unit().label("a;b", Point::new(0.0, 0.0), 12.0).unwrap();
        assert!(cmd.as_bytes().ends_with(b"LBa;b\x03"));
    }

    #[test]
    fn test_label_rejects_etx() {
        assert!(matches!(
            unit().label("ab\u{3}SP1;", Point::new(0.0, 0.0), 12.0),
            Err(HpglError::EmbeddedLabelTerminator(2))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let e = unit();
        assert!(matches!(
            e.send_to(Point::new(f64::NAN, 0.0)),
            Err(HpglError::NonFinite(_))
        ));
        assert!(matches!(
            e.draw_circle(Point::new(0.0, 0.0), f64::INFINITY, &PlotOptions::default()),
            Err(HpglError::NonFinite("diameter"))
        ));
    }

    #[test]
    fn test_overflow_after_scaling_rejected() {
        let huge = Encoder::new(Transform::new(1e300, 0.0, 0.0));
        assert!(matches!(
            huge.send_to(Point::new(1e10, 1.0)),
            Err(HpglError::NonFinite("target"))
        ));
        assert!(matches!(
            huge.draw_rect(Point::new(0.0, 0.0), 1e10, 1.0),
            Err(HpglError::NonFinite("width"))
        ));
        let hatch = FillStyle::Hatch {
            spacing: 1e10,
            angle: 0.0,
        };
        assert!(matches!(
            huge.fill_type(&hatch),
            Err(HpglError::NonFinite("fill spacing"))
        ));
        // Small inputs still fit.
        assert_eq!(huge.send_to(Point::new(0.0, 0.0)).unwrap().as_str(), "PU0,0;");
    }

    #[test]
    fn test_deterministic() {
        let e = scaled();
        let poly = pts(&[(0.1, 0.2), (3.3, 4.4), (5.5, 0.7)]);
        let a = e.fill_poly(&poly, &PlotOptions::default()).unwrap();
        let b = e.fill_poly(&poly, &PlotOptions::default()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        let l1 = e.label("x", Point::new(1.0, 2.0), 9.0).unwrap();
        let l2 = e.label("x", Point::new(1.0, 2.0), 9.0).unwrap();
        assert_eq!(l1, l2);
    }
}
