//! Plain CSV output for the timeline table.

use std::io::Write;

use super::{ExportError, TableWriter, TimelineTable};

/// Writes the table as RFC 4180 CSV. The sheet name is not represented.
#[derive(Debug)]
pub struct CsvTableWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvTableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record<I, S>(&mut self, fields: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = fields
            .into_iter()
            .map(|f| escape(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{line}")
    }
}

impl<W: Write> TableWriter for CsvTableWriter<W> {
    fn write_table(&mut self, _sheet_name: &str, table: &TimelineTable) -> Result<(), ExportError> {
        self.write_record(&table.header)?;
        for row in &table.rows {
            self.write_record(row.iter().map(ToString::to_string))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
