use std::{io, path::Path};

/// Resolved finger state of a single frame.
#[derive(Debug, serde_derive::Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    pub time: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub target_z: f32,
    pub effector_x: f32,
    pub effector_y: f32,
    pub effector_z: f32,
    pub error: f32,
    pub solve: String,
    pub proximal: f32,
    pub middle: f32,
    pub distal: f32,
}

pub struct CsvTracer {
    writer: csv::Writer<Box<dyn io::Write>>,
}

impl CsvTracer {
    fn with_writer(writer: Box<dyn io::Write>) -> Self {
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::NonNumeric)
            .has_headers(true)
            .from_writer(writer);

        Self { writer }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::with_writer(Box::new(std::fs::File::create(path)?)))
    }

    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn write_record(&mut self, record: &FrameRecord) -> csv::Result<()> {
        self.writer.serialize(record)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_trace() {
        let path = std::env::temp_dir().join("fingerik_trace_test.csv");

        let mut tracer = CsvTracer::from_path(&path).unwrap();
        tracer
            .write_record(&FrameRecord {
                frame: 0,
                time: 0.0,
                target_x: 0.0,
                target_y: -0.02,
                target_z: 0.03,
                effector_x: 0.0,
                effector_y: 0.0,
                effector_z: 0.045,
                error: 0.025,
                solve: "exhausted".to_owned(),
                proximal: 0.0,
                middle: 6.0,
                distal: 6.0,
            })
            .unwrap();
        tracer.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("\"frame\",\"time\""));
        assert!(lines.next().unwrap().contains("\"exhausted\""));

        std::fs::remove_file(&path).ok();
    }
}
