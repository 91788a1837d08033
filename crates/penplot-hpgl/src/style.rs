//! Pen, line and fill styles.
//!
//! Styles are plain values passed into each encoding call. Nothing here
//! remembers what the device currently has selected.

use serde::{Deserialize, Serialize};

use crate::error::{HpglError, Result};

/// Highest pen carousel slot. Slot 0 stores the pen.
pub const MAX_PEN: i32 = 6;

/// Highest line type pattern number.
pub const MAX_LINE_TYPE: i32 = 6;

/// A validated pen carousel slot (0-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Pen(u8);

impl Pen {
    /// Put the pen back in the carousel.
    pub const NONE: Pen = Pen(0);

    /// Validate a slot number.
    pub fn new(slot: i32) -> Result<Self> {
        if (0..=MAX_PEN).contains(&slot) {
            Ok(Pen(slot as u8))
        } else {
            Err(HpglError::PenOutOfRange(slot))
        }
    }

    /// Slot number.
    pub fn slot(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Pen {
    type Error = HpglError;

    fn try_from(slot: i32) -> Result<Self> {
        Pen::new(slot)
    }
}

impl From<Pen> for i32 {
    fn from(pen: Pen) -> i32 {
        pen.0 as i32
    }
}

/// Dash pattern for `LT`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineType {
    /// Pattern number, 0-6.
    pub pattern: u8,
    /// Pattern length as a percentage of the P1-P2 diagonal. Sent unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_percent: Option<f64>,
}

impl LineType {
    /// Validate a pattern number.
    pub fn new(pattern: i32) -> Result<Self> {
        if (0..=MAX_LINE_TYPE).contains(&pattern) {
            Ok(Self {
                pattern: pattern as u8,
                space_percent: None,
            })
        } else {
            Err(HpglError::LineTypeOutOfRange(pattern))
        }
    }

    /// Validate a pattern number with an explicit pattern length.
    pub fn with_space(pattern: i32, space_percent: f64) -> Result<Self> {
        let mut lt = Self::new(pattern)?;
        lt.space_percent = Some(space_percent);
        Ok(lt)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.pattern as i32 > MAX_LINE_TYPE {
            return Err(HpglError::LineTypeOutOfRange(self.pattern as i32));
        }
        match self.space_percent {
            Some(s) if !s.is_finite() => Err(HpglError::NonFinite("line type spacing")),
            _ => Ok(()),
        }
    }
}

/// Area fill model for `FT`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FillStyle {
    /// FT1: bidirectional solid fill, line spacing from the pen thickness.
    #[default]
    Solid,
    /// FT2: unidirectional solid fill.
    SolidUnidirectional,
    /// FT3: parallel hatching.
    Hatch {
        /// Distance between hatch lines, in drawing units.
        spacing: f64,
        /// Hatch angle in degrees.
        angle: f64,
    },
    /// FT4: cross-hatching.
    CrossHatch {
        /// Distance between hatch lines, in drawing units.
        spacing: f64,
        /// Hatch angle in degrees.
        angle: f64,
    },
}

impl FillStyle {
    /// Build from the numeric model used on the wire. Models 3 and 4 need
    /// both `spacing` and `angle`; models 1 and 2 ignore them.
    pub fn from_model(model: i32, spacing: Option<f64>, angle: Option<f64>) -> Result<Self> {
        match model {
            1 => Ok(FillStyle::Solid),
            2 => Ok(FillStyle::SolidUnidirectional),
            3 | 4 => {
                let (Some(spacing), Some(angle)) = (spacing, angle) else {
                    return Err(HpglError::MissingHatchParameters(model));
                };
                Ok(if model == 3 {
                    FillStyle::Hatch { spacing, angle }
                } else {
                    FillStyle::CrossHatch { spacing, angle }
                })
            }
            _ => Err(HpglError::InvalidFillModel(model)),
        }
    }

    /// Numeric model sent after `FT`.
    pub fn model(&self) -> u8 {
        match self {
            FillStyle::Solid => 1,
            FillStyle::SolidUnidirectional => 2,
            FillStyle::Hatch { .. } => 3,
            FillStyle::CrossHatch { .. } => 4,
        }
    }

    /// Spacing and angle for the hatch models.
    pub fn hatch(&self) -> Option<(f64, f64)> {
        match *self {
            FillStyle::Hatch { spacing, angle } | FillStyle::CrossHatch { spacing, angle } => {
                Some((spacing, angle))
            }
            _ => None,
        }
    }
}

/// Optional parameters shared by the shape primitives.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Chord angle in degrees for circles, wedges and arcs. `None` keeps the
    /// device default (5°).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,
    /// Fill used by the `fill_*` primitives.
    #[serde(default)]
    pub fill: FillStyle,
}

impl PlotOptions {
    /// Options with an explicit chord resolution.
    pub fn resolution(degrees: f64) -> Self {
        Self {
            resolution: Some(degrees),
            ..Default::default()
        }
    }

    /// Options with an explicit fill.
    pub fn fill(fill: FillStyle) -> Self {
        Self {
            fill,
            ..Default::default()
        }
    }
}

/// Pen, line type and fill to select in one statement. Unset members leave
/// the device's current selection alone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleContext {
    /// Pen slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen: Option<Pen>,
    /// Line pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_type: Option<LineType>,
    /// Area fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillStyle>,
}

impl StyleContext {
    /// Select a pen.
    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.pen = Some(pen);
        self
    }

    /// Select a line type.
    pub fn with_line_type(mut self, line_type: LineType) -> Self {
        self.line_type = Some(line_type);
        self
    }

    /// Select a fill.
    pub fn with_fill(mut self, fill: FillStyle) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// Style selection as read from a job file, before range checks.
///
/// Deserializing a [`StyleContext`] rejects a bad pen or pattern outright;
/// this form accepts any integer so the value can be reported and skipped
/// by the session instead.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawStyle {
    /// Pen slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen: Option<i32>,
    /// Line pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_type: Option<RawLineType>,
    /// Area fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillStyle>,
}

/// Unchecked [`LineType`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLineType {
    /// Pattern number.
    pub pattern: i32,
    /// Pattern length percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_percent: Option<f64>,
}

impl RawStyle {
    /// Range-check every member.
    pub fn validate(&self) -> Result<StyleContext> {
        let mut style = StyleContext {
            fill: self.fill,
            ..Default::default()
        };
        if let Some(slot) = self.pen {
            style.pen = Some(Pen::new(slot)?);
        }
        if let Some(lt) = self.line_type {
            style.line_type = Some(LineType {
                space_percent: lt.space_percent,
                ..LineType::new(lt.pattern)?
            });
        }
        Ok(style)
    }
}
