use super::{Record, Recorder};
use anyhow::Result;

/// A recorder that ignores any record.
#[derive(Default)]
pub struct NullRecorder {}

impl NullRecorder {
    /// Creates the recorder.
    pub fn new() -> Self {
        Self {}
    }
}

impl Recorder for NullRecorder {
    /// Discards the given record.
    fn write(&mut self, _record: Record) -> Result<()> {
        Ok(())
    }

    fn store(&mut self, _record: Record) {}

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
