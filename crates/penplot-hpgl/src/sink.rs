//! Byte sinks that carry statements to the plotter.

use std::io::{self, Write};

/// Destination for composed statements.
///
/// Each call receives one complete statement. The sink owns transport
/// concerns (line settings, flow control, retries); the session never reads
/// from it.
pub trait PlotSink {
    /// Deliver one statement.
    fn send(&mut self, statement: &[u8]) -> io::Result<()>;
}

impl<W: Write> PlotSink for W {
    fn send(&mut self, statement: &[u8]) -> io::Result<()> {
        self.write_all(statement)?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chunks(Vec<Vec<u8>>);

    impl Write for Chunks {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_vec_sink_appends() {
        let mut out: Vec<u8> = Vec::new();
        out.send(b"IN;").unwrap();
        out.send(b"SP1;").unwrap();
        assert_eq!(out, b"IN;SP1;");
    }

    #[test]
    fn test_one_write_per_statement() {
        let mut sink = Chunks(Vec::new());
        sink.send(b"PU0,0;PD10,10;PU;").unwrap();
        assert_eq!(sink.0, vec![b"PU0,0;PD10,10;PU;".to_vec()]);
    }
}
