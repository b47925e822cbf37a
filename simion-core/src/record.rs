//! Records of an experiment and the recorders persisting them.
//!
//! The [`Runner`](crate::Runner) writes one [`Record`] per episode into a
//! [`Recorder`]. [`CsvRecorder`] persists them as the episode log read by
//! downstream tools.
//!
//! ```rust
//! use simion_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(3.0));
//! record.insert("total_reward", RecordValue::Scalar(-1.0));
//! assert_eq!(record.get_scalar("episode").unwrap(), 3.0);
//! ```
mod base;
mod buffered_recorder;
mod csv_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use csv_recorder::CsvRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
