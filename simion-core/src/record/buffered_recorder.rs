use super::{Record, Recorder};
use anyhow::Result;

/// Keeps every record in memory.
///
/// Used to inspect the episode records of a run.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    pending: Vec<Record>,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the written records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of written records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) -> Result<()> {
        self.buf.push(record);
        Ok(())
    }

    fn store(&mut self, record: Record) {
        self.pending.push(record);
    }

    fn flush(&mut self) -> Result<()> {
        self.buf.append(&mut self.pending);
        Ok(())
    }
}
