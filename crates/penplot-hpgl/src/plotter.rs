//! A plot session: encoder, sink and diagnostics bound together.

use crate::command::{Command, CommandBuilder};
use crate::config::PlotterConfig;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::encoder::Encoder;
use crate::error::Result;
use crate::geometry::{Point, Shape};
use crate::sink::PlotSink;
use crate::style::{FillStyle, LineType, PlotOptions, RawStyle, StyleContext};

/// One plot job on one device connection.
///
/// Each drawing method composes its whole statement first and hands it to
/// the sink in a single `send`. Invalid arguments never reach the device:
/// they are reported to the diagnostics hook and the call returns `Ok(())`
/// without sending anything. Sink errors are returned as-is.
///
/// Methods take `&mut self`; to share one plotter between producers, wrap
/// it in a `Mutex` so statements cannot interleave.
pub struct Plotter<S, D = LogDiagnostics> {
    config: PlotterConfig,
    encoder: Encoder,
    sink: S,
    diagnostics: D,
}

impl<S: PlotSink> Plotter<S> {
    /// Open a session that logs through the `log` facade and send `IN;`.
    pub fn new(sink: S, config: PlotterConfig) -> Result<Self> {
        Self::with_diagnostics(sink, config, LogDiagnostics)
    }
}

impl<S: PlotSink, D: Diagnostics> Plotter<S, D> {
    /// Open a session with a custom diagnostics hook and send `IN;`.
    ///
    /// Fails with [`HpglError::InvalidScale`](crate::HpglError::InvalidScale)
    /// before anything is sent if the config's scale is not positive and
    /// finite.
    pub fn with_diagnostics(sink: S, config: PlotterConfig, diagnostics: D) -> Result<Self> {
        config.validate()?;
        let mut plotter = Self {
            encoder: Encoder::from_config(&config),
            config,
            sink,
            diagnostics,
        };
        plotter.initialize()?;
        Ok(plotter)
    }

    /// Session configuration.
    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    /// The encoder used for every statement.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The diagnostics hook.
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// End the session and take back the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Send an already composed statement.
    pub fn send(&mut self, command: &Command) -> Result<()> {
        if self.config.debug {
            self.diagnostics.statement(command);
        }
        self.sink.send(command.as_bytes())?;
        Ok(())
    }

    fn emit(&mut self, operation: &'static str, composed: Result<Command>) -> Result<()> {
        match composed {
            Ok(command) => self.send(&command),
            Err(e) if e.is_invalid_parameter() => {
                self.diagnostics.rejected(operation, &e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Pass caller-composed HP-GL straight to the sink.
    pub fn write(&mut self, hpgl: &str) -> Result<()> {
        if self.config.debug {
            self.diagnostics
                .statement(&CommandBuilder::new().raw(hpgl).build());
        }
        self.sink.send(hpgl.as_bytes())?;
        Ok(())
    }

    /// `IN;`
    pub fn initialize(&mut self) -> Result<()> {
        let cmd = self.encoder.initialize();
        self.send(&cmd)
    }

    /// Select pen `slot` (0-6). Other values are reported and the device
    /// keeps its current pen.
    pub fn select_pen(&mut self, slot: i32) -> Result<()> {
        let cmd = self.encoder.select_pen(slot);
        self.emit("select_pen", cmd)
    }

    /// Lift the pen and put it back in the carousel.
    pub fn park(&mut self) -> Result<()> {
        let cmd = self.encoder.park();
        self.send(&cmd)
    }

    /// Set the line pattern; `None` returns to solid lines.
    pub fn line_type(&mut self, line_type: Option<LineType>) -> Result<()> {
        let cmd = self.encoder.line_type(line_type.as_ref());
        self.emit("line_type", cmd)
    }

    /// Set the line pattern from a raw mode number (0-6) and optional
    /// pattern length. Out-of-range modes are reported and skipped.
    pub fn line_type_mode(&mut self, mode: i32, space_percent: Option<f64>) -> Result<()> {
        let cmd = LineType::new(mode).and_then(|lt| {
            let lt = LineType { space_percent, ..lt };
            self.encoder.line_type(Some(&lt))
        });
        self.emit("line_type", cmd)
    }

    /// Rotate the device coordinate system. Keep `theta` a multiple of 90.
    pub fn rotate_plotter(&mut self, theta: i32) -> Result<()> {
        let cmd = self.encoder.rotate(theta);
        self.send(&cmd)
    }

    /// Set pen velocity in cm/s.
    pub fn pen_speed(&mut self, cm_per_s: f64) -> Result<()> {
        let cmd = self.encoder.pen_speed(cm_per_s);
        self.emit("pen_speed", cmd)
    }

    /// Select the area fill used by later `RR`, `WG` and `FP` instructions.
    pub fn fill_type(&mut self, fill: &FillStyle) -> Result<()> {
        let cmd = self.encoder.fill_type(fill);
        self.emit("fill_type", cmd)
    }

    /// Select the area fill from a raw model number (1-4). Hatch models need
    /// both `spacing` and `angle`; anything else is reported and skipped.
    pub fn fill_type_mode(
        &mut self,
        model: i32,
        spacing: Option<f64>,
        angle: Option<f64>,
    ) -> Result<()> {
        let cmd = FillStyle::from_model(model, spacing, angle)
            .and_then(|fill| self.encoder.fill_type(&fill));
        self.emit("fill_type", cmd)
    }

    /// Select pen, line type and fill in one statement.
    pub fn apply_style(&mut self, style: &StyleContext) -> Result<()> {
        let cmd = self.encoder.style(style);
        self.emit("apply_style", cmd)
    }

    /// [`Plotter::apply_style`] for an unchecked style. An out-of-range pen
    /// or pattern is reported and nothing from the style is sent.
    pub fn apply_raw_style(&mut self, style: &RawStyle) -> Result<()> {
        let cmd = style
            .validate()
            .and_then(|style| self.encoder.style(&style));
        self.emit("apply_style", cmd)
    }

    /// Move to `p` with the pen up.
    pub fn send_to(&mut self, p: Point) -> Result<()> {
        let cmd = self.encoder.send_to(p);
        self.emit("send_to", cmd)
    }

    /// Draw a single line; the pen ends up.
    pub fn draw_line(&mut self, start: Point, end: Point) -> Result<()> {
        let cmd = self.encoder.draw_line(start, end);
        self.emit("draw_line", cmd)
    }

    /// Draw from the current pen position to `p`, leaving the pen down.
    pub fn draw_to(&mut self, p: Point) -> Result<()> {
        let cmd = self.encoder.draw_to(p);
        self.emit("draw_to", cmd)
    }

    /// Draw connected lines through `points`.
    pub fn draw_lines<P: Shape + ?Sized>(&mut self, points: &P) -> Result<()> {
        let cmd = self.encoder.draw_lines(points);
        self.emit("draw_lines", cmd)
    }

    /// Circle outline.
    pub fn draw_circle(&mut self, center: Point, diameter: f64, opts: &PlotOptions) -> Result<()> {
        let cmd = self.encoder.draw_circle(center, diameter, opts);
        self.emit("draw_circle", cmd)
    }

    /// Filled circle.
    pub fn fill_circle(&mut self, center: Point, diameter: f64, opts: &PlotOptions) -> Result<()> {
        let cmd = self.encoder.fill_circle(center, diameter, opts);
        self.emit("fill_circle", cmd)
    }

    /// Wedge outline; angles in radians.
    pub fn draw_wedge(
        &mut self,
        center: Point,
        diameter: f64,
        start: f64,
        sweep: f64,
        opts: &PlotOptions,
    ) -> Result<()> {
        let cmd = self.encoder.draw_wedge(center, diameter, start, sweep, opts);
        self.emit("draw_wedge", cmd)
    }

    /// Filled wedge; angles in radians.
    pub fn fill_wedge(
        &mut self,
        center: Point,
        diameter: f64,
        start: f64,
        sweep: f64,
        opts: &PlotOptions,
    ) -> Result<()> {
        let cmd = self.encoder.fill_wedge(center, diameter, start, sweep, opts);
        self.emit("fill_wedge", cmd)
    }

    /// Arc of diameter `size` from `start` to `end` radians.
    pub fn draw_arc(
        &mut self,
        center: Point,
        size: f64,
        start: f64,
        end: f64,
        opts: &PlotOptions,
    ) -> Result<()> {
        let cmd = self.encoder.draw_arc(center, size, start, end, opts);
        self.emit("draw_arc", cmd)
    }

    /// Rectangle outline.
    pub fn draw_rect(&mut self, corner: Point, width: f64, height: f64) -> Result<()> {
        let cmd = self.encoder.draw_rect(corner, width, height);
        self.emit("draw_rect", cmd)
    }

    /// Filled rectangle.
    pub fn fill_rect(
        &mut self,
        corner: Point,
        width: f64,
        height: f64,
        opts: &PlotOptions,
    ) -> Result<()> {
        let cmd = self.encoder.fill_rect(corner, width, height, opts);
        self.emit("fill_rect", cmd)
    }

    /// Polygon outline.
    pub fn draw_poly(&mut self, points: &[Point]) -> Result<()> {
        let cmd = self.encoder.draw_poly(points);
        self.emit("draw_poly", cmd)
    }

    /// Polygon outline from any vertex source.
    pub fn draw_shape<P: Shape + ?Sized>(&mut self, shape: &P) -> Result<()> {
        let cmd = self.encoder.draw_shape(shape);
        self.emit("draw_shape", cmd)
    }

    /// Filled polygon, no outline.
    pub fn fill_poly(&mut self, points: &[Point], opts: &PlotOptions) -> Result<()> {
        let cmd = self.encoder.fill_poly(points, opts);
        self.emit("fill_poly", cmd)
    }

    /// Filled polygon from any vertex source.
    pub fn fill_shape<P: Shape + ?Sized>(&mut self, shape: &P, opts: &PlotOptions) -> Result<()> {
        let cmd = self.encoder.fill_shape(shape, opts);
        self.emit("fill_shape", cmd)
    }

    /// Text label at `at`, sized in points.
    pub fn label(&mut self, text: &str, at: Point, size_points: f64) -> Result<()> {
        let cmd = self.encoder.label(text, at, size_points);
        self.emit("label", cmd)
    }
}
