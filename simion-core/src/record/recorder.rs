use super::Record;
use anyhow::Result;

/// Writes records to an output destination.
pub trait Recorder {
    /// Writes a record immediately.
    fn write(&mut self, record: Record) -> Result<()>;

    /// Keeps a record until the next call to [`Recorder::flush`].
    fn store(&mut self, record: Record);

    /// Writes the stored records.
    fn flush(&mut self) -> Result<()>;
}
