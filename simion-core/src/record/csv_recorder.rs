use super::{Record, Recorder};
use crate::error::SimionError;
use anyhow::Result;
use csv::{Writer, WriterBuilder};
use std::{fs::File, path::Path};

/// Writes one CSV row per record, with a fixed set of columns.
///
/// Every record must hold a value for each column.
pub struct CsvRecorder {
    columns: Vec<String>,
    wtr: Writer<File>,
    pending: Vec<Record>,
}

impl CsvRecorder {
    /// Creates the file and writes the header.
    pub fn new(path: impl AsRef<Path>, columns: &[&str]) -> Result<Self> {
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .from_writer(File::create(path)?);
        wtr.write_record(columns)?;
        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            wtr,
            pending: Vec::new(),
        })
    }

    fn write_row(&mut self, record: &Record) -> Result<()> {
        let row = self
            .columns
            .iter()
            .map(|c| match record.get(c) {
                Some(v) => Ok(v.to_text()),
                None => Err(SimionError::RecordKeyError(c.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.wtr.write_record(&row)?;
        Ok(())
    }
}

impl Recorder for CsvRecorder {
    fn write(&mut self, record: Record) -> Result<()> {
        self.write_row(&record)?;
        self.wtr.flush()?;
        Ok(())
    }

    fn store(&mut self, record: Record) {
        self.pending.push(record);
    }

    fn flush(&mut self) -> Result<()> {
        for record in std::mem::take(&mut self.pending).iter() {
            self.write_row(record)?;
        }
        self.wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordValue;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_rows_follow_columns() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let path = dir.path().join("episodes.csv");
        let mut recorder = CsvRecorder::new(&path, &["episode", "total_reward"])?;

        recorder.write(Record::from_slice(&[
            ("total_reward", RecordValue::Scalar(-1.0)),
            ("episode", RecordValue::Scalar(0.0)),
        ]))?;
        recorder.store(Record::from_slice(&[
            ("episode", RecordValue::Scalar(1.0)),
            ("total_reward", RecordValue::Scalar(0.5)),
        ]));
        recorder.flush()?;

        let text = fs::read_to_string(&path)?;
        assert_eq!(text, "episode,total_reward\n0,-1\n1,0.5\n");
        Ok(())
    }

    #[test]
    fn test_missing_column_fails() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let mut recorder = CsvRecorder::new(dir.path().join("episodes.csv"), &["episode"])?;
        assert!(recorder.write(Record::from_scalar("steps", 1.0)).is_err());
        Ok(())
    }
}
