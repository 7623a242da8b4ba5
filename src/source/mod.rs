pub mod record;
pub mod serial;

pub use record::{parse_record, RawSample};
pub use serial::{open_serial, LineSource, SerialSource};

use crate::error::SourceError;

/// Blocking producer of one raw record per call.
pub trait SampleSource: Send {
    fn pull(&mut self) -> Result<RawSample, SourceError>;
}
