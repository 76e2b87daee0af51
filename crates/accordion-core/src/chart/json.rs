//! Renderer that emits the chart input as JSON, for consumption by an
//! external Gantt component.

use std::io::Write;

use super::{ChartError, ChartRenderer, GanttData};

/// Writes each data set as one pretty-printed `{ "data": [...], "links": [...] }`
/// document.
#[derive(Debug)]
pub struct JsonChartRenderer<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonChartRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
        }
    }

    /// Emit compact single-line JSON instead.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChartRenderer for JsonChartRenderer<W> {
    fn init(&mut self) -> Result<(), ChartError> {
        Ok(())
    }

    fn replace_data(&mut self, data: &GanttData) -> Result<(), ChartError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, data)?;
        } else {
            serde_json::to_writer(&mut self.writer, data)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{GanttLink, GanttNode};

    #[test]
    fn writes_one_document_per_load() {
        let mut renderer = JsonChartRenderer::new(Vec::new()).compact();
        renderer.init().unwrap();
        renderer
            .replace_data(&GanttData {
                data: vec![GanttNode {
                    id: 1,
                    text: "Full Page (Metro)".to_owned(),
                    node_type: Some("project".to_owned()),
                    open: Some(true),
                    start_date: None,
                    duration: None,
                    parent: None,
                }],
                links: vec![],
            })
            .unwrap();
        renderer
            .replace_data(&GanttData {
                data: vec![],
                links: vec![GanttLink {
                    id: 1,
                    source: 2,
                    target: 3,
                    link_type: "0".to_owned(),
                }],
            })
            .unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"data":[{"id":1,"text":"Full Page (Metro)","type":"project","open":true}],"links":[]}"#
        );
        assert_eq!(
            lines[1],
            r#"{"data":[],"links":[{"id":1,"source":2,"target":3,"type":"0"}]}"#
        );
    }
}
