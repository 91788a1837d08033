//! HP-GL statement composition.
//!
//! Every instruction is a two-letter mnemonic followed by comma-separated
//! parameters and a `;` terminator. A [`Command`] holds one or more
//! instructions that must reach the device as a single write.
//!
//! # Number formatting
//!
//! Parameters use the shortest decimal that round-trips the `f64` (`100`,
//! `2.5`, `0.30000000000000004`); Rust never switches to exponent notation
//! for `Display`, which HP-GL would not parse. Negative zero prints as `0`.

use std::fmt::{self, Write as _};

/// Initialize the plotter.
pub const INITIALIZE: &str = "IN";
/// Select pen.
pub const SELECT_PEN: &str = "SP";
/// Pen up, optionally moving.
pub const PEN_UP: &str = "PU";
/// Pen down, optionally moving.
pub const PEN_DOWN: &str = "PD";
/// Plot absolute.
pub const PLOT_ABSOLUTE: &str = "PA";
/// Line type.
pub const LINE_TYPE: &str = "LT";
/// Fill type.
pub const FILL_TYPE: &str = "FT";
/// Rotate coordinate system.
pub const ROTATE: &str = "RO";
/// Velocity select.
pub const VELOCITY: &str = "VS";
/// Circle.
pub const CIRCLE: &str = "CI";
/// Arc absolute.
pub const ARC_ABSOLUTE: &str = "AA";
/// Edge wedge.
pub const EDGE_WEDGE: &str = "EW";
/// Filled wedge.
pub const FILL_WEDGE: &str = "WG";
/// Edge rectangle, relative.
pub const EDGE_RECT: &str = "ER";
/// Filled rectangle, relative.
pub const FILL_RECT: &str = "RR";
/// Polygon mode.
pub const POLYGON_MODE: &str = "PM";
/// Edge polygon.
pub const EDGE_POLYGON: &str = "EP";
/// Fill polygon.
pub const FILL_POLYGON: &str = "FP";
/// Select standard character set.
pub const SELECT_STANDARD: &str = "SS";
/// Absolute character size.
pub const CHAR_SIZE: &str = "SI";
/// Label.
pub const LABEL: &str = "LB";

/// Instruction terminator.
pub const TERMINATOR: char = ';';
/// Label terminator (ETX). Ends `LB` text instead of `;`.
pub const LABEL_TERMINATOR: char = '\u{3}';

/// `PM` argument: clear the buffer and start recording a polygon.
pub const PM_OPEN: u8 = 0;
/// `PM` argument: close the polygon and leave polygon mode.
pub const PM_CLOSE: u8 = 2;

/// A numeric HP-GL parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param {
    /// Device-unit or free-form real value.
    Real(f64),
    /// Integer value (pens, patterns, degrees).
    Int(i64),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            // -0.0 == 0.0, so this also catches negative zero.
            Param::Real(v) if v == 0.0 => f.write_str("0"),
            Param::Real(v) => write!(f, "{}", v),
            Param::Int(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Real(v)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int(v as i64)
    }
}

impl From<u8> for Param {
    fn from(v: u8) -> Self {
        Param::Int(v as i64)
    }
}

/// One composed HP-GL statement, ready to send as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    text: String,
}

impl Command {
    /// Statement text, including any label terminator byte.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Number of bytes on the wire.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when nothing would be sent.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consume into the statement text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Printable form with control bytes escaped, for logs.
    pub fn escaped(&self) -> String {
        self.text.escape_debug().to_string()
    }

    /// Count occurrences of an instruction mnemonic at instruction
    /// boundaries.
    pub fn count_instruction(&self, mnemonic: &str) -> usize {
        self.instructions()
            .filter(|i| i.starts_with(mnemonic))
            .count()
    }

    /// Split into instructions (terminators removed). Label text runs to the
    /// ETX byte and may contain `;`.
    pub fn instructions(&self) -> impl Iterator<Item = &str> {
        let mut rest = self.text.as_str();
        std::iter::from_fn(move || {
            if rest.is_empty() {
                return None;
            }
            let end = if rest.starts_with(LABEL) {
                rest.find(LABEL_TERMINATOR)
            } else {
                rest.find(TERMINATOR)
            };
            let (head, tail) = match end {
                Some(i) => (&rest[..i], &rest[i + 1..]),
                None => (rest, ""),
            };
            rest = tail;
            Some(head)
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<[u8]> for Command {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Accumulates instructions into a [`Command`].
#[derive(Debug, Default)]
pub struct CommandBuilder {
    text: String,
}

impl CommandBuilder {
    /// Start an empty statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instruction with no parameters: `XX;`.
    pub fn op(mut self, mnemonic: &str) -> Self {
        self.text.push_str(mnemonic);
        self.text.push(TERMINATOR);
        self
    }

    /// Instruction with parameters: `XXa,b,c;`.
    pub fn op_with(mut self, mnemonic: &str, params: &[Param]) -> Self {
        self.text.push_str(mnemonic);
        self.push_params(params);
        self.text.push(TERMINATOR);
        self
    }

    /// Instruction with a point: `XXx,y;`.
    pub fn op_at(self, mnemonic: &str, x: f64, y: f64) -> Self {
        self.op_with(mnemonic, &[Param::Real(x), Param::Real(y)])
    }

    /// Instruction whose parameters are a flat list of coordinate pairs.
    /// An empty list yields the bare `XX;` form.
    pub fn op_path(mut self, mnemonic: &str, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        self.text.push_str(mnemonic);
        for (i, (x, y)) in points.into_iter().enumerate() {
            if i > 0 {
                self.text.push(',');
            }
            let _ = write!(self.text, "{},{}", Param::Real(x), Param::Real(y));
        }
        self.text.push(TERMINATOR);
        self
    }

    /// Label instruction: `LB<text><ETX>`.
    pub fn label(mut self, text: &str) -> Self {
        self.text.push_str(LABEL);
        self.text.push_str(text);
        self.text.push(LABEL_TERMINATOR);
        self
    }

    /// Splice an already composed statement.
    pub fn append(mut self, other: &Command) -> Self {
        self.text.push_str(other.as_str());
        self
    }

    /// Splice caller-supplied HP-GL verbatim.
    pub fn raw(mut self, hpgl: &str) -> Self {
        self.text.push_str(hpgl);
        self
    }

    /// Finish the statement.
    pub fn build(self) -> Command {
        Command { text: self.text }
    }

    fn push_params(&mut self, params: &[Param]) {
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                self.text.push(',');
            }
            let _ = write!(self.text, "{}", p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_formatting() {
        let wire = |v: f64| Param::Real(v).to_string();
        assert_eq!(wire(100.0), "100");
        assert_eq!(wire(2.5), "2.5");
        assert_eq!(wire(-12.75), "-12.75");
        assert_eq!(wire(-0.0), "0");
        assert_eq!(wire(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_builder_grammar() {
        let cmd = CommandBuilder::new()
            .op(PEN_UP)
            .op_at(PLOT_ABSOLUTE, 10.0, 20.5)
            .op_with(FILL_WEDGE, &[Param::Real(50.0), 0.into(), 360.into()])
            .build();
        assert_eq!(cmd.as_str(), "PU;PA10,20.5;WG50,0,360;");
    }

    #[test]
    fn test_path_no_dangling_comma() {
        let cmd = CommandBuilder::new()
            .op_path(PEN_DOWN, [(1.0, 2.0), (3.0, 4.0)])
            .build();
        assert_eq!(cmd.as_str(), "PD1,2,3,4;");

        let empty = CommandBuilder::new().op_path(PEN_DOWN, Vec::<(f64, f64)>::new()).build();
        assert_eq!(empty.as_str(), "PD;");
    }

    #[test]
    fn test_label_terminator() {
        let cmd = CommandBuilder::new().label("a;b").build();
        assert_eq!(cmd.as_bytes(), b"LBa;b\x03");
        assert_eq!(cmd.escaped(), "LBa;b\\u{3}");
    }

    #[test]
    fn test_instructions_split() {
        let cmd = CommandBuilder::new()
            .op(PEN_UP)
            .op_with(POLYGON_MODE, &[PM_OPEN.into()])
            .label("x;y")
            .op(PEN_UP)
            .build();
        let parts: Vec<_> = cmd.instructions().collect();
        assert_eq!(parts, vec!["PU", "PM0", "LBx;y", "PU"]);
        assert_eq!(cmd.count_instruction(PEN_UP), 2);
    }
}
