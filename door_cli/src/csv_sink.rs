//! Delimited text output in the layout the robot-arm program reads.
//!
//! One row per frame, no header:
//!
//! ```text
//! 21599920;4055;6000;217;1946;0;2376;;;;;;
//! ```
//!
//! Column 1 is the timestamp in ms, then one angle per door, then
//! `trailing_columns` empty fields. Every '.' in a rendered value is replaced
//! by the configured decimal separator.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use door_traits::FrameSink;

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    decimal_separator: String,
    trailing_columns: usize,
    record: Vec<String>,
    rows: u64,
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) `path` using the `[output]` layout settings.
    pub fn create(path: &Path, out: &door_config::Output) -> eyre::Result<Self> {
        let delimiter = out
            .delimiter_byte()
            .ok_or_else(|| eyre::eyre!("output.delimiter must be a single ASCII character"))?;
        let file = File::create(path).map_err(|e| eyre::eyre!("create output {:?}: {}", path, e))?;
        Ok(Self::new(
            BufWriter::new(file),
            delimiter,
            &out.decimal_separator,
            out.trailing_columns,
        ))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W, delimiter: u8, decimal_separator: &str, trailing_columns: usize) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner);
        Self {
            writer,
            decimal_separator: decimal_separator.to_string(),
            trailing_columns,
            record: Vec::new(),
            rows: 0,
        }
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    fn render(&self, v: impl Display) -> String {
        let text = v.to_string();
        if text.contains('.') {
            text.replace('.', &self.decimal_separator)
        } else {
            text
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> eyre::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| eyre::eyre!("flush output: {}", e.error()))
    }
}

impl<W: Write> FrameSink for CsvSink<W> {
    fn write_frame(
        &mut self,
        timestamp_ms: u64,
        angles: &[i32],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut record = std::mem::take(&mut self.record);
        record.clear();
        record.push(self.render(timestamp_ms));
        record.extend(angles.iter().map(|a| self.render(a)));
        record.extend(std::iter::repeat_n(String::new(), self.trailing_columns));
        self.writer.write_record(&record)?;
        self.record = record;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_rows(trailing: usize, frames: &[(u64, Vec<i32>)]) -> String {
        let mut sink = CsvSink::new(Vec::new(), b';', ",", trailing);
        for (ts, angles) in frames {
            sink.write_frame(*ts, angles).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(sink.rows(), frames.len() as u64);
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn rows_carry_trailing_empty_columns() {
        let out = render_rows(
            6,
            &[
                (0, vec![0, 0, 0, 0, 0, 0]),
                (10, vec![24, 0, 3000, 6000, 5950, 0]),
            ],
        );
        assert_eq!(
            out,
            "0;0;0;0;0;0;0;;;;;;\n10;24;0;3000;6000;5950;0;;;;;;\n"
        );
    }

    #[test]
    fn no_trailing_columns() {
        let out = render_rows(0, &[(20, vec![1, 2])]);
        assert_eq!(out, "20;1;2\n");
    }

    #[test]
    fn decimal_point_is_localized() {
        let sink = CsvSink::new(Vec::new(), b';', ",", 0);
        assert_eq!(sink.render(4055.5_f64), "4055,5");
        assert_eq!(sink.render(6000), "6000");
    }
}
